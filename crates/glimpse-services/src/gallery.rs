//! Gallery reconciliation.
//!
//! Thumbnails are produced out of band, so the metadata store never knows whether
//! one exists yet. Each record is resolved at read time: probe the thumbnail key,
//! sign the thumbnail if present, otherwise sign the original. A probe that errors
//! or times out yields the `#` sentinel rather than guessing.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use glimpse_core::models::{ArtifactRecord, GalleryItem, ImageSource};
use glimpse_core::Config;
use glimpse_db::ArtifactStore;
use glimpse_storage::{KeyLayout, Storage};

use crate::GalleryError;

/// Tuning for a gallery render
#[derive(Debug, Clone, Copy)]
pub struct GallerySettings {
    /// Lifetime of every signed URL
    pub signed_url_ttl: Duration,
    /// Upper bound for a single thumbnail existence check
    pub probe_timeout: Duration,
    /// Records resolved concurrently
    pub concurrency: usize,
}

impl GallerySettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            signed_url_ttl: Duration::from_secs(config.signed_url_ttl_secs()),
            probe_timeout: Duration::from_secs(config.thumbnail_probe_timeout_secs()),
            concurrency: config.gallery_probe_concurrency(),
        }
    }
}

pub struct GalleryReconciler {
    storage: Arc<dyn Storage>,
    artifacts: Arc<dyn ArtifactStore>,
    layout: KeyLayout,
    settings: GallerySettings,
}

impl GalleryReconciler {
    pub fn new(
        storage: Arc<dyn Storage>,
        artifacts: Arc<dyn ArtifactStore>,
        layout: KeyLayout,
        settings: GallerySettings,
    ) -> Self {
        Self {
            storage,
            artifacts,
            layout,
            settings,
        }
    }

    pub fn from_config(
        config: &Config,
        storage: Arc<dyn Storage>,
        artifacts: Arc<dyn ArtifactStore>,
    ) -> Self {
        Self::new(
            storage,
            artifacts,
            KeyLayout::from_config(config),
            GallerySettings::from_config(config),
        )
    }

    /// One item per record, newest first.
    ///
    /// Only the listing can fail. Per-record problems degrade that record to the
    /// unavailable sentinel and the rest of the gallery still renders.
    #[tracing::instrument(skip(self))]
    pub async fn render(&self) -> Result<Vec<GalleryItem>, GalleryError> {
        let records = self.artifacts.list_recent().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to list artifact records");
            GalleryError::MetadataRead(e.to_string())
        })?;

        // `buffered` keeps input order, so the listing order survives.
        let probes: Vec<_> = records.iter().map(|r| self.resolve(r)).collect();
        let items: Vec<GalleryItem> = stream::iter(probes)
            .buffered(self.settings.concurrency.max(1))
            .collect()
            .await;

        let unavailable = items
            .iter()
            .filter(|item| item.source == ImageSource::Unavailable)
            .count();
        tracing::debug!(items = items.len(), unavailable, "Gallery rendered");

        Ok(items)
    }

    /// Resolve the display URL for one record.
    pub async fn resolve(&self, record: &ArtifactRecord) -> GalleryItem {
        let thumbnail_key = self.layout.thumbnail_key(&record.storage_key);

        let probe =
            tokio::time::timeout(self.settings.probe_timeout, self.storage.exists(&thumbnail_key))
                .await;

        let (key, source) = match probe {
            Ok(Ok(true)) => (thumbnail_key, ImageSource::Thumbnail),
            Ok(Ok(false)) => (record.storage_key.clone(), ImageSource::Original),
            Ok(Err(e)) => {
                tracing::warn!(
                    artifact_id = record.id,
                    thumbnail_key = %thumbnail_key,
                    error = %e,
                    "Thumbnail probe failed"
                );
                return GalleryItem::unavailable(record.caption.clone());
            }
            Err(_) => {
                tracing::warn!(
                    artifact_id = record.id,
                    thumbnail_key = %thumbnail_key,
                    timeout_ms = self.settings.probe_timeout.as_millis() as u64,
                    "Thumbnail probe timed out"
                );
                return GalleryItem::unavailable(record.caption.clone());
            }
        };

        match self
            .storage
            .get_presigned_url(&key, self.settings.signed_url_ttl)
            .await
        {
            Ok(url) => GalleryItem {
                url,
                caption: record.caption.clone(),
                source,
            },
            Err(e) => {
                tracing::warn!(
                    artifact_id = record.id,
                    key = %key,
                    error = %e,
                    "Failed to sign gallery URL"
                );
                GalleryItem::unavailable(record.caption.clone())
            }
        }
    }
}
