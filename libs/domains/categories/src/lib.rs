//! Category domain: a tree of named categories with a computed nesting level.
//!
//! Children point at their parent; the nested view is rebuilt from a flat
//! list on read (see [`tree`]). A category that still has children cannot be
//! deleted.

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;
pub mod tree;

pub use error::{CategoryError, CategoryResult};
pub use handlers::{ApiDoc, router};
pub use models::{Category, CategoryNode, CreateCategory, NewCategory, UpdateCategory};
pub use postgres::PgCategoryRepository;
pub use repository::{CategoryRepository, InMemoryCategoryRepository};
pub use service::CategoryService;
