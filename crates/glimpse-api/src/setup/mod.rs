//! Application setup and initialization
//!
//! Everything main.rs needs to go from a `Config` to a running router. Tests build
//! the router from injected components through [`routes::build_router`] instead.

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use glimpse_captions::create_caption_generator;
use glimpse_core::Config;
use glimpse_db::{ArtifactStore, PgArtifactRepository};
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.log_format())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = config.environment(),
        "Configuration loaded and validated successfully"
    );

    let pool = database::setup_database(&config).await?;
    let artifacts: Arc<dyn ArtifactStore> = Arc::new(PgArtifactRepository::new(pool));

    let (storage, local_storage) = storage::setup_storage(&config).await?;

    let captioner =
        create_caption_generator(&config).context("Failed to initialize caption generator")?;

    let state = Arc::new(AppState::new(
        config,
        storage,
        artifacts,
        captioner,
        local_storage,
    ));

    let router = routes::build_router(state.clone())?;

    Ok((state, router))
}
