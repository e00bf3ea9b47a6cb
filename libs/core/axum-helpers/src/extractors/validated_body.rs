//! Request body extractor that accepts JSON or URL-encoded forms.

use crate::errors::AppError;
use axum::{
    extract::{Form, FromRequest, Json, Request},
    http::header::CONTENT_TYPE,
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// Like [`ValidatedJson`](super::ValidatedJson), but also decodes
/// `application/x-www-form-urlencoded` bodies.
///
/// The content type picks the decoder. Anything that is not a form is
/// treated as JSON.
pub struct ValidatedBody<T>(pub T);

fn is_form(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"))
}

impl<T, S> FromRequest<S> for ValidatedBody<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let data = if is_form(&req) {
            let Form(data) = Form::<T>::from_request(req, state)
                .await
                .map_err(|e| AppError::InvalidBody(e.body_text()))?;
            data
        } else {
            let Json(data) = Json::<T>::from_request(req, state)
                .await
                .map_err(|e| AppError::InvalidBody(e.body_text()))?;
            data
        };

        data.validate()?;

        Ok(ValidatedBody(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode},
        routing::post,
    };
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize, Validate)]
    struct Payload {
        #[serde(default)]
        #[validate(length(min = 1, message = "This field may not be blank."))]
        name: String,
        parent_name: Option<String>,
    }

    async fn echo(ValidatedBody(payload): ValidatedBody<Payload>) -> String {
        format!("{}|{}", payload.name, payload.parent_name.unwrap_or_default())
    }

    fn app() -> Router {
        Router::new().route("/", post(echo))
    }

    async fn send(content_type: &str, body: &'static str) -> (StatusCode, String) {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header(CONTENT_TYPE, content_type)
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_decodes_json() {
        let (status, body) = send(
            "application/json",
            r#"{"name":"Phones","parent_name":"Electronics"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Phones|Electronics");
    }

    #[tokio::test]
    async fn test_decodes_form() {
        let (status, body) = send(
            "application/x-www-form-urlencoded",
            "name=Phones&parent_name=Electronics",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Phones|Electronics");
    }

    #[tokio::test]
    async fn test_missing_field_fails_validation() {
        let (status, body) = send("application/json", "{}").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("VALIDATION_ERROR"));
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let (status, body) = send("application/json", "{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("INVALID_BODY"));
    }
}
