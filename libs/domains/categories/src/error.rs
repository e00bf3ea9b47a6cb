use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;
use validator::ValidationErrors;

/// Message returned when deleting a category that still has children.
pub const REFERENCED_MESSAGE: &str = "This category is referenced to other objects";

#[derive(Debug, Error)]
pub enum CategoryError {
    #[error("Category not found: {0}")]
    NotFound(Uuid),

    #[error("Parent category '{0}' not found")]
    ParentNotFound(String),

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Category {0} still has children")]
    HasChildren(Uuid),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type CategoryResult<T> = Result<T, CategoryError>;

impl From<CategoryError> for AppError {
    fn from(err: CategoryError) -> Self {
        match err {
            CategoryError::NotFound(id) => AppError::NotFound(format!("Category {} not found", id)),
            CategoryError::ParentNotFound(name) => {
                AppError::NotFound(format!("Parent category '{}' not found", name))
            }
            CategoryError::Validation(errors) => AppError::Validation(errors),
            CategoryError::HasChildren(_) => AppError::Forbidden(REFERENCED_MESSAGE.to_string()),
            CategoryError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for CategoryError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
