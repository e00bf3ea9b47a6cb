//! Custom extractors for Axum handlers.
//!
//! All of them reject with [`AppError`](crate::errors::AppError) so bad input
//! produces the same envelope as any other error.

pub mod uuid_path;
pub mod validated_body;
pub mod validated_json;

pub use uuid_path::UuidPath;
pub use validated_body::ValidatedBody;
pub use validated_json::ValidatedJson;
