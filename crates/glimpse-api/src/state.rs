//! Application state shared by all handlers.

use glimpse_captions::CaptionGenerator;
use glimpse_core::Config;
use glimpse_db::ArtifactStore;
use glimpse_services::{GalleryReconciler, IngestionPipeline};
use glimpse_storage::{LocalStorage, Storage};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub ingestion: Arc<IngestionPipeline>,
    pub gallery: Arc<GalleryReconciler>,
    pub storage: Arc<dyn Storage>,
    pub artifacts: Arc<dyn ArtifactStore>,
    /// Set when the local backend is active; `/media` verifies its signed URLs.
    pub local_storage: Option<Arc<LocalStorage>>,
}

impl AppState {
    /// Wire the pipeline and reconciler over the given collaborators.
    pub fn new(
        config: Config,
        storage: Arc<dyn Storage>,
        artifacts: Arc<dyn ArtifactStore>,
        captioner: Arc<dyn CaptionGenerator>,
        local_storage: Option<Arc<LocalStorage>>,
    ) -> Self {
        let ingestion = Arc::new(IngestionPipeline::from_config(
            &config,
            storage.clone(),
            artifacts.clone(),
            captioner,
        ));
        let gallery = Arc::new(GalleryReconciler::from_config(
            &config,
            storage.clone(),
            artifacts.clone(),
        ));

        Self {
            config,
            ingestion,
            gallery,
            storage,
            artifacts,
            local_storage,
        }
    }
}
