use anyhow::Context;
use tracing_subscriber::EnvFilter;

mod config;
mod database;
mod errors;
mod handlers;
mod middleware;
mod models;
mod routes;
mod services;
mod state;

use config::AppConfig;
use database::connection::get_db_client;
use database::indexes::ensure_indexes;
use services::accounts::ensure_bootstrap_admin;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env().context("failed to load configuration")?;
    let address = config.bind_address();

    let db = get_db_client(&config)
        .await
        .context("failed to create the MongoDB client")?;

    ensure_indexes(&db)
        .await
        .context("failed to ensure indexes")?;

    if let Some(bootstrap) = &config.bootstrap_admin {
        if let Err(e) = ensure_bootstrap_admin(&db, bootstrap).await {
            tracing::error!("❌ Failed to create bootstrap admin: {}", e);
        }
    }

    let state = AppState::new(db, config).context("failed to initialise application state")?;
    let app = routes::app_router(state).context("failed to build router")?;

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind to {}", address))?;
    tracing::info!("🚀 Server starting on {}", address);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
