use anyhow::Context;
use tracing_subscriber::EnvFilter;

use tooldeck_api::services::AppState;
use tooldeck_api::{config, database, handlers};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = config::config();
    tracing::info!("Starting Tooldeck API in {:?} mode", config.environment);

    let pool = database::connect()
        .await
        .context("failed to connect database pool")?;
    let app = handlers::app(AppState::postgres(pool));

    // Allow tests or deployments to override port via env
    let port = std::env::var("TOOLDECK_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Tooldeck API listening on http://{}", bind_addr);
    axum::serve(listener, app).await.context("server")?;

    Ok(())
}
