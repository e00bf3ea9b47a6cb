use axum::Router;
use domain_categories::PgCategoryRepository;
use domain_products::{PgProductRepository, ProductService, router as product_router};

pub fn router(state: &crate::state::AppState) -> Router {
    let service = ProductService::new(
        PgProductRepository::new(state.db.clone()),
        PgCategoryRepository::new(state.db.clone()),
    );
    product_router(service)
}
