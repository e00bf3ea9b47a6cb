//! # Axum Helpers
//!
//! Shared building blocks for the catalog HTTP services.
//!
//! - **[`server`]**: router assembly with OpenAPI UIs, health endpoint, graceful shutdown
//! - **[`http`]**: CORS and security header middleware
//! - **[`errors`]**: `AppError` and the JSON error envelope
//! - **[`extractors`]**: UUID path, validated JSON and JSON-or-form bodies
//! - **[`audit`]**: audit events for mutations
//!
//! ```ignore
//! use axum_helpers::server::{create_production_app, create_router};
//! use core_config::server::ServerConfig;
//!
//! let config = ServerConfig::default().with_allowed_origins(["http://localhost:3000"]);
//! let router = create_router::<ApiDoc>(api_routes, &config)?;
//! create_production_app(router, &config, Duration::from_secs(30), async {}).await?;
//! ```

pub mod audit;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app,
    create_router, health_router, run_health_checks,
};

pub use http::{create_cors_layer, security_headers};

pub use errors::{AppError, ErrorCode, ErrorResponse, error_response};

pub use extractors::{UuidPath, ValidatedBody, ValidatedJson};

pub use audit::{AuditEvent, AuditOutcome, extract_ip_from_headers, extract_user_agent};
