//! Observability utilities for the catalog service.
//!
//! - Prometheus recorder installation and `/metrics` rendering
//! - Catalog counters (categories, products, unresolved category names)
//! - Axum middleware for per-request HTTP metrics
//!
//! ```rust,ignore
//! use observability::{init_metrics, metrics_handler, CatalogMetrics};
//!
//! init_metrics()?;
//! CatalogMetrics::record_product_created(2);
//!
//! let app = Router::new().route("/metrics", get(metrics_handler));
//! ```

pub mod catalog;
pub mod middleware;

pub use catalog::CatalogMetrics;
pub use middleware::metrics_middleware;

pub use metrics::{counter, gauge, histogram};

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing::info;

static METRICS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Installs the global Prometheus recorder. Later calls return the same handle.
pub fn init_metrics() -> Result<&'static PrometheusHandle, BuildError> {
    METRICS_HANDLE.get_or_try_init(|| {
        let handle = PrometheusBuilder::new().install_recorder()?;

        info!("Prometheus metrics recorder initialized");
        register_metric_descriptions();

        Ok(handle)
    })
}

pub fn get_metrics_handle() -> Option<&'static PrometheusHandle> {
    METRICS_HANDLE.get()
}

/// Axum handler for `/metrics`.
pub async fn metrics_handler() -> String {
    match get_metrics_handle() {
        Some(handle) => handle.render(),
        None => "# Metrics not initialized\n".to_string(),
    }
}

fn register_metric_descriptions() {
    use metrics::{describe_counter, describe_histogram};

    // HTTP metrics
    describe_counter!("http_requests_total", "Total number of HTTP requests");
    describe_histogram!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    describe_counter!(
        "http_requests_errors_total",
        "Total number of HTTP request errors"
    );

    // Catalog metrics
    describe_counter!(
        catalog::CATEGORIES_CREATED,
        "Categories created, labelled by whether they are a root"
    );
    describe_counter!(
        catalog::CATEGORIES_DELETED,
        "Categories deleted"
    );
    describe_counter!(
        catalog::CATEGORY_DELETE_BLOCKED,
        "Category deletions refused because the category still has children"
    );
    describe_counter!(catalog::PRODUCTS_CREATED, "Products created");
    describe_counter!(catalog::PRODUCTS_DELETED, "Products deleted");
    describe_counter!(
        catalog::UNRESOLVED_CATEGORY_NAMES,
        "Category names in product payloads that matched no category"
    );
    describe_histogram!(
        catalog::PRODUCT_LIST_PAGE_SIZE,
        "Number of products returned per list page"
    );
}
