use sea_orm::DbErr;
use thiserror::Error;

/// Failures of the connector, the migration runner and the health probe
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Could not connect to PostgreSQL: {0}")]
    Connection(#[source] DbErr),

    #[error("Migrations for {app} failed: {source}")]
    Migration {
        app: String,
        #[source]
        source: DbErr,
    },

    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;
