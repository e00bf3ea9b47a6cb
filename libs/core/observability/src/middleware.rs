//! HTTP request metrics for axum routers.

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{Request, Response, StatusCode},
    middleware::Next,
};
use metrics::{counter, histogram};
use std::time::Instant;

/// Label used for requests no route matched, so stray URLs cannot grow the
/// series count.
pub const UNMATCHED_ROUTE: &str = "unmatched";

fn route_label(matched_path: Option<&MatchedPath>) -> String {
    matched_path
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string())
}

fn status_class(status: StatusCode) -> &'static str {
    match status.as_u16() / 100 {
        2 => "2xx",
        3 => "3xx",
        4 => "4xx",
        5 => "5xx",
        _ => "other",
    }
}

/// Records `http_requests_total`, `http_request_duration_seconds` and, for
/// 4xx/5xx responses, `http_requests_errors_total`.
///
/// The `path` label is the route template (`/api/categories/{id}`), never the
/// raw URI.
///
/// ```rust,ignore
/// let app = Router::new()
///     .nest("/api", routes)
///     .layer(axum::middleware::from_fn(metrics_middleware));
/// ```
pub async fn metrics_middleware(
    matched_path: Option<MatchedPath>,
    request: Request<Body>,
    next: Next,
) -> Response<Body> {
    let started = Instant::now();
    let method = request.method().as_str().to_owned();
    let path = route_label(matched_path.as_ref());

    let response = next.run(request).await;

    let status = response.status();
    let code = status.as_u16().to_string();

    counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => code.clone(),
        "status_class" => status_class(status)
    )
    .increment(1);

    histogram!(
        "http_request_duration_seconds",
        "method" => method.clone(),
        "path" => path.clone()
    )
    .record(started.elapsed().as_secs_f64());

    if status.is_client_error() || status.is_server_error() {
        counter!(
            "http_requests_errors_total",
            "method" => method,
            "path" => path,
            "status" => code
        )
        .increment(1);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, middleware, routing::get};
    use tower::ServiceExt;

    #[test]
    fn test_status_class() {
        assert_eq!(status_class(StatusCode::CREATED), "2xx");
        assert_eq!(status_class(StatusCode::NOT_MODIFIED), "3xx");
        assert_eq!(status_class(StatusCode::FORBIDDEN), "4xx");
        assert_eq!(status_class(StatusCode::SERVICE_UNAVAILABLE), "5xx");
        assert_eq!(status_class(StatusCode::CONTINUE), "other");
    }

    #[test]
    fn test_unmatched_route_label() {
        assert_eq!(route_label(None), UNMATCHED_ROUTE);
    }

    #[tokio::test]
    async fn test_middleware_passes_response_through() {
        let app = Router::new()
            .route("/api/categories/{id}", get(|| async { "ok" }))
            .layer(middleware::from_fn(metrics_middleware));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/categories/42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
