//! Bakery API server: loads config, opens the SQLite store, seeds bakeries, serves HTTP.
//!
//! Run from repo root: `cargo run -p bakery-server`

use bakery_api::{app, connect, ensure_tables, seed_bakeries, AppConfig, AppState, SqliteStore};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("bakery_api=info,bakery_server=info,tower_http=info")
            }),
        )
        .init();

    let config = AppConfig::from_env()?;
    let pool = connect(&config.database_url, config.max_connections).await?;
    ensure_tables(&pool).await?;

    let store = SqliteStore::new(pool.clone());
    if !config.seed_bakeries.is_empty() {
        let inserted = seed_bakeries(&store, &config.seed_bakeries).await?;
        tracing::info!(inserted, "bakery seeding done");
    }

    let state = AppState::new(store);
    let router = app(state, config.max_body_bytes);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Bakery API listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
