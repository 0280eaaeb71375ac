//! Application setup and initialization

pub mod database;
pub mod routes;
pub mod server;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::Router;

use vidbox_core::Config;
use vidbox_storage::VideoStore;

use crate::state::AppState;

const SESSION_SWEEP_INTERVAL_SECS: u64 = 3600;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, Router)> {
    let pool = database::setup_database(&config).await?;

    // Upload root unavailability is fatal: no uploads or streams without it.
    let store = VideoStore::new(config.upload_dir.clone())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to prepare upload root: {}", e))?;
    tracing::info!(upload_root = %config.upload_dir.display(), "Upload root ready");

    let state = Arc::new(AppState::new(config, pool, store));

    tokio::spawn(sweep_expired_sessions(state.clone()));

    let router = routes::setup_routes(state.clone())?;

    Ok((state, router))
}

async fn sweep_expired_sessions(state: Arc<AppState>) {
    let mut interval = tokio::time::interval(Duration::from_secs(SESSION_SWEEP_INTERVAL_SECS));
    loop {
        interval.tick().await;
        match state.sessions.delete_expired().await {
            Ok(0) => {}
            Ok(removed) => tracing::debug!(removed, "Swept expired sessions"),
            Err(e) => tracing::warn!(error = %e, "Failed to sweep expired sessions"),
        }
    }
}
