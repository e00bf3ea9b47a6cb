use axum::{Router, routing::get};

pub mod categories;
pub mod health;
pub mod products;

/// API routes without the `/api` prefix; `create_router` adds it.
pub fn routes(state: &crate::state::AppState) -> Router {
    Router::new()
        .nest("/categories", categories::router(state))
        .nest("/products", products::router(state))
}

/// `GET /ready`, checking the database connection.
pub fn ready_router(state: crate::state::AppState) -> Router {
    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}

/// `GET /metrics` in the Prometheus text format.
pub fn metrics_router() -> Router {
    Router::new().route("/metrics", get(observability::metrics_handler))
}
