use axum::http::{HeaderValue, Method, header};
use std::io;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Builds the CORS layer for the configured origin list.
///
/// Methods: GET, POST, PUT, PATCH, DELETE, OPTIONS. Headers: Content-Type,
/// Accept. Preflight responses are cached for an hour.
///
/// # Errors
/// Fails when the list is empty or an origin is not a valid header value.
pub fn create_cors_layer(origins: &[String]) -> io::Result<CorsLayer> {
    let allowed_origins = origins
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid CORS_ALLOWED_ORIGIN value: {}", e),
            )
        })?;

    if allowed_origins.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "CORS_ALLOWED_ORIGIN cannot be empty",
        ));
    }

    tracing::info!("CORS configured with allowed origins: {}", origins.join(","));

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_origin_list() {
        let err = create_cors_layer(&[]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_rejects_invalid_origin() {
        assert!(create_cors_layer(&["http://bad\norigin".to_string()]).is_err());
    }

    #[test]
    fn test_accepts_origin_list() {
        let origins = vec![
            "http://localhost:3000".to_string(),
            "https://shop.example.com".to_string(),
        ];
        assert!(create_cors_layer(&origins).is_ok());
    }
}
