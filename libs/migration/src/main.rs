//! Catalog schema migration CLI.
//!
//! Reads `DATABASE_URL` and accepts the standard SeaORM sub-commands
//! (`up`, `down`, `status`, `fresh`, ...).

use migration::Migrator;
use sea_orm_migration::cli;

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
