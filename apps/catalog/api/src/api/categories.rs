use axum::Router;
use domain_categories::{CategoryService, PgCategoryRepository, router as category_router};

pub fn router(state: &crate::state::AppState) -> Router {
    let repository = PgCategoryRepository::new(state.db.clone());
    let service = CategoryService::new(repository);
    category_router(service)
}
