//! # Scholaris DB
//!
//! PostgreSQL connection pool and migrations for the Scholaris API.
//!
//! ```ignore
//! use scholaris_db::{init_db_pool, run_migrations};
//!
//! let pool = init_db_pool().await?;
//! run_migrations(&pool).await?;
//! ```

use std::env;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

pub use sqlx::PgPool;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, thiserror::Error)]
pub enum DbInitError {
    #[error("DATABASE_URL must be set")]
    MissingUrl,
    #[error("failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),
    #[error("failed to run migrations: {0}")]
    Migrate(#[source] sqlx::migrate::MigrateError),
}

/// Opens the pool described by `DATABASE_URL`.
///
/// `DATABASE_MAX_CONNECTIONS` caps the pool size (default 10).
pub async fn init_db_pool() -> Result<PgPool, DbInitError> {
    let database_url = env::var("DATABASE_URL").map_err(|_| DbInitError::MissingUrl)?;
    let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_MAX_CONNECTIONS);

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&database_url)
        .await
        .map_err(DbInitError::Connect)?;

    tracing::info!(max_connections, "Database pool ready");
    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), DbInitError> {
    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(DbInitError::Migrate)
}
