//! JSON extractor with validation through the validator crate.

use crate::errors::AppError;
use axum::extract::{FromRequest, Json, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON extractor that runs `Validate::validate` after decoding.
///
/// Decoding failures (bad syntax, wrong types, missing content type) become
/// `400 INVALID_BODY`; validation failures become `400 VALIDATION_ERROR`
/// with per-field details.
///
/// ```ignore
/// #[derive(Deserialize, Validate)]
/// struct UpdateCategory {
///     #[validate(length(min = 1, max = 100))]
///     name: String,
/// }
///
/// async fn update(ValidatedJson(payload): ValidatedJson<UpdateCategory>) -> String {
///     payload.name
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::InvalidBody(e.body_text()))?;

        data.validate()?;

        Ok(ValidatedJson(data))
    }
}
