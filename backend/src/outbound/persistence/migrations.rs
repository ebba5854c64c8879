//! Embedded schema migrations.
//!
//! The SQL under `backend/migrations` is compiled into the binary and applied
//! at start-up before the pool is handed to the repositories.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

use super::pool::PoolError;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Apply every pending migration to the database at `database_url`.
///
/// Diesel's migration harness is synchronous, so the work runs on the
/// blocking thread pool.
///
/// # Errors
///
/// Returns [`PoolError::Build`] when the connection or a migration fails.
pub async fn run_migrations(database_url: &str) -> Result<usize, PoolError> {
    let url = database_url.to_owned();
    tokio::task::spawn_blocking(move || apply_pending(&url))
        .await
        .map_err(|err| PoolError::build(format!("migration task aborted: {err}")))?
}

fn apply_pending(database_url: &str) -> Result<usize, PoolError> {
    let mut conn = PgConnection::establish(database_url)
        .map_err(|err| PoolError::build(format!("connect for migrations: {err}")))?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| PoolError::build(format!("apply migrations: {err}")))?;
    for version in &applied {
        info!(%version, "applied migration");
    }
    Ok(applied.len())
}
