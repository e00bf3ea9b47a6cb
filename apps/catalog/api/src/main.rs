use axum::middleware;
use axum_helpers::server::{create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use migration::Migrator;
use observability::{init_metrics, metrics_middleware};
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Before anything fallible, so startup errors get colored reports
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment);

    init_metrics().map_err(|e| eyre::eyre!("Failed to install metrics recorder: {}", e))?;

    let db =
        database::postgres::connect_from_config_with_retry(config.database.clone(), None).await?;
    database::postgres::run_migrations::<Migrator>(&db, config.app.name).await?;

    let server_config = config.server.clone();
    let state = AppState {
        config,
        db: db.clone(),
    };

    let api_routes = api::routes(&state);

    // Adds /api prefix, docs UIs, tracing, CORS and compression
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes, &server_config)?;

    let app = router
        .merge(health_router(state.config.app))
        .merge(api::ready_router(state))
        .merge(api::metrics_router())
        .layer(middleware::from_fn(metrics_middleware));

    info!("Starting catalog API (30s graceful shutdown)");

    create_production_app(
        app,
        &server_config,
        Duration::from_secs(30),
        async move {
            info!("Shutting down: closing database connections");
            match db.close().await {
                Ok(_) => info!("PostgreSQL connection closed successfully"),
                Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
            }
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Catalog API shutdown complete");
    Ok(())
}
