//! Products domain
//!
//! Products are identified by a unique `code` and linked to any number of
//! categories from [`domain_categories`].
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Validation, category resolution, pagination
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + PostgreSQL implementation)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_categories::PgCategoryRepository;
//! use domain_products::{PgProductRepository, ProductService, router};
//! use sea_orm::DatabaseConnection;
//!
//! fn routes(db: DatabaseConnection) -> axum::Router {
//!     let service = ProductService::new(
//!         PgProductRepository::new(db.clone()),
//!         PgCategoryRepository::new(db),
//!     );
//!     axum::Router::new().nest("/products", router(service))
//! }
//! ```

mod de;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{ProductError, ProductResult};
pub use handlers::{ApiDoc, router};
pub use models::{
    CreateProduct, NewProduct, Product, ProductDetail, ProductListQuery, ProductPage,
    ProductSummary, UpdateProduct,
};
pub use postgres::PgProductRepository;
pub use repository::{InMemoryProductRepository, ProductRepository};
pub use service::ProductService;
