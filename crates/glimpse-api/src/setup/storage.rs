//! Storage setup and initialization

use anyhow::Result;
use glimpse_core::{Config, StorageBackend};
use glimpse_storage::{create_local_storage, create_storage, LocalStorage, Storage};
use std::sync::Arc;

/// Setup storage; for the local backend also return the concrete client so
/// `/media` can verify its signed URLs.
pub async fn setup_storage(
    config: &Config,
) -> Result<(Arc<dyn Storage>, Option<Arc<LocalStorage>>)> {
    tracing::info!("Initializing storage...");

    let (storage, local): (Arc<dyn Storage>, Option<Arc<LocalStorage>>) =
        match config.storage_backend() {
            StorageBackend::Local => {
                let local = Arc::new(create_local_storage(config).await?);
                let storage: Arc<dyn Storage> = local.clone();
                (storage, Some(local))
            }
            StorageBackend::S3 => (create_storage(config).await?, None),
        };

    tracing::info!(
        backend = %storage.backend_type(),
        originals_prefix = config.originals_prefix(),
        thumbnails_prefix = config.thumbnails_prefix(),
        "Storage initialized successfully"
    );

    Ok((storage, local))
}
