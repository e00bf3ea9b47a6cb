use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use std::borrow::Cow;
use thiserror::Error;
use validator::{ValidationError, ValidationErrors};

pub const DUPLICATE_CODE_MESSAGE: &str = "product with this code already exists.";

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(String),

    #[error("Category '{0}' not found")]
    CategoryNotFound(String),

    #[error("The category query parameter is required")]
    MissingCategory,

    #[error("Invalid page")]
    InvalidPage,

    #[error("Product with code '{0}' already exists")]
    DuplicateCode(String),

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

/// Field error reported for a code that is already taken.
fn duplicate_code_errors() -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add(
        "code",
        ValidationError::new("unique").with_message(Cow::Borrowed(DUPLICATE_CODE_MESSAGE)),
    );
    errors
}

impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(code) => {
                AppError::NotFound(format!("Product '{}' not found", code))
            }
            ProductError::CategoryNotFound(name) => {
                AppError::NotFound(format!("Category '{}' not found", name))
            }
            ProductError::MissingCategory => {
                AppError::NotFound("No category was given to list products for".to_string())
            }
            ProductError::InvalidPage => AppError::NotFound("Invalid page".to_string()),
            ProductError::DuplicateCode(_) => AppError::Validation(duplicate_code_errors()),
            ProductError::Validation(errors) => AppError::Validation(errors),
            ProductError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<domain_categories::CategoryError> for ProductError {
    fn from(err: domain_categories::CategoryError) -> Self {
        ProductError::Internal(err.to_string())
    }
}
