//! Server binary: reads config from the environment, connects the pool, serves the admin API.

use preorder_admin::{app, AppConfig, AppState, FileStore, PgStore};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("preorder_admin=info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await?;

    let files = FileStore::new(&config.upload_dir);
    files.ensure_dir().await?;
    tracing::info!(dir = %files.dir().display(), "upload directory ready");

    let state = AppState::new(Arc::new(PgStore::new(pool)), files);
    let router = app(state, config.max_upload_bytes);

    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router).await?;
    Ok(())
}
