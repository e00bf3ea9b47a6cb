use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, Statement};
use tracing::debug;

use crate::common::{DatabaseError, DatabaseResult};

/// Readiness probe: one `SELECT 1` round trip through the pool.
pub async fn check_health(db: &DatabaseConnection) -> DatabaseResult<()> {
    let probe = Statement::from_string(DatabaseBackend::Postgres, "SELECT 1".to_owned());

    db.query_one_raw(probe)
        .await
        .map_err(|e| DatabaseError::HealthCheckFailed(format!("PostgreSQL did not answer: {}", e)))?;

    debug!("PostgreSQL answered the readiness probe");
    Ok(())
}
