use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tracing::info;

use crate::config::AppConfig;

/// Errors from pool construction and schema management
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Migration error: {0}")]
    Migration(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Build the process-lifetime pool. The pool is handed to each store at
/// construction rather than held in a global, so tests can substitute an
/// isolated instance.
pub async fn connect(config: &AppConfig) -> Result<PgPool, DbError> {
    let url = config
        .database_url()
        .map_err(|_| DbError::InvalidDatabaseUrl)?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&url)
        .await?;

    info!("database pool ready");
    Ok(pool)
}

/// Apply the embedded migrations.
pub async fn migrate(pool: &PgPool) -> Result<(), DbError> {
    sqlx::migrate!()
        .run(pool)
        .await
        .map_err(|e| DbError::Migration(e.to_string()))
}

/// Pings the pool to ensure connectivity
pub async fn health_check(pool: &PgPool) -> Result<(), DbError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
