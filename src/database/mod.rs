pub mod models;

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

use crate::config;

/// Connect the service pool from DATABASE_URL with config-driven sizing.
pub async fn connect() -> Result<PgPool, sqlx::Error> {
    let url = std::env::var("DATABASE_URL")
        .map_err(|_| sqlx::Error::Configuration("DATABASE_URL is not set".into()))?;

    let db = &config::config().database;
    let pool = PgPoolOptions::new()
        .max_connections(db.max_connections)
        .acquire_timeout(Duration::from_secs(db.connection_timeout_secs))
        .connect(&url)
        .await?;

    tracing::info!("connected database pool (max_connections={})", db.max_connections);
    Ok(pool)
}

/// Pings the pool to ensure connectivity
pub async fn health_check(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
