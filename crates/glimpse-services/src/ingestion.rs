//! Upload ingestion: validate, store the original, caption it, record metadata.
//!
//! The steps run strictly in that order. A metadata row is only written after the
//! blob write has been confirmed, so every row points at an existing object.
//! The reverse does not hold: if the insert fails the blob stays behind.

use std::sync::Arc;
use std::time::Duration;

use glimpse_captions::CaptionGenerator;
use glimpse_core::models::{caption_error, NewArtifact, NO_CAPTION_GENERATED};
use glimpse_core::{content_type_for, Config, UploadValidator};
use glimpse_db::ArtifactStore;
use glimpse_storage::{KeyLayout, Storage};

use crate::IngestError;

/// Result of a successful ingestion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOutcome {
    pub file_name: String,
    pub storage_key: String,
    pub url: String,
    pub caption: String,
}

pub struct IngestionPipeline {
    storage: Arc<dyn Storage>,
    artifacts: Arc<dyn ArtifactStore>,
    captioner: Arc<dyn CaptionGenerator>,
    validator: UploadValidator,
    layout: KeyLayout,
    caption_timeout: Duration,
}

impl IngestionPipeline {
    pub fn new(
        storage: Arc<dyn Storage>,
        artifacts: Arc<dyn ArtifactStore>,
        captioner: Arc<dyn CaptionGenerator>,
        validator: UploadValidator,
        layout: KeyLayout,
        caption_timeout: Duration,
    ) -> Self {
        Self {
            storage,
            artifacts,
            captioner,
            validator,
            layout,
            caption_timeout,
        }
    }

    pub fn from_config(
        config: &Config,
        storage: Arc<dyn Storage>,
        artifacts: Arc<dyn ArtifactStore>,
        captioner: Arc<dyn CaptionGenerator>,
    ) -> Self {
        Self::new(
            storage,
            artifacts,
            captioner,
            UploadValidator::new(
                config.allowed_extensions().to_vec(),
                config.max_file_size_bytes(),
            ),
            KeyLayout::from_config(config),
            Duration::from_secs(config.caption_timeout_secs()),
        )
    }

    pub fn validator(&self) -> &UploadValidator {
        &self.validator
    }

    /// Ingest one uploaded file.
    ///
    /// Validation failures return before any external call. A caption failure
    /// never fails the upload; it is stored as an `Error: ...` caption instead.
    #[tracing::instrument(
        skip(self, data, content_type),
        fields(file_name = ?file_name, size_bytes = data.len())
    )]
    pub async fn ingest(
        &self,
        file_name: Option<&str>,
        data: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<IngestOutcome, IngestError> {
        let file_name = self.validator.validate(file_name, data.len())?;
        let storage_key = self.layout.original_key(&file_name);
        let content_type = resolve_content_type(content_type, &file_name);

        self.storage
            .put(&storage_key, data.clone(), content_type)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    storage_key = %storage_key,
                    "Failed to store original"
                );
                IngestError::StorageWrite(e.to_string())
            })?;

        let caption = self.generate_caption(&data).await;

        let record = self
            .artifacts
            .insert(NewArtifact {
                file_name: file_name.clone(),
                storage_key: storage_key.clone(),
                caption,
            })
            .await
            .map_err(|e| {
                tracing::warn!(
                    error = %e,
                    orphaned_key = %storage_key,
                    "Metadata insert failed after the original was stored; blob is orphaned"
                );
                IngestError::MetadataWrite(e.to_string())
            })?;

        tracing::info!(
            artifact_id = record.id,
            storage_key = %record.storage_key,
            caption_failed = glimpse_core::models::is_caption_error(&record.caption),
            "Upload ingested"
        );

        Ok(IngestOutcome {
            url: self.storage.public_url(&record.storage_key),
            file_name: record.file_name,
            storage_key: record.storage_key,
            caption: record.caption,
        })
    }

    /// Caption text to store. Never fails.
    async fn generate_caption(&self, image: &[u8]) -> String {
        let provider = self.captioner.provider();
        match tokio::time::timeout(self.caption_timeout, self.captioner.caption(image)).await {
            Ok(Ok(text)) => {
                let text = text.trim();
                if text.is_empty() {
                    tracing::debug!(provider, "Caption provider returned no text");
                    NO_CAPTION_GENERATED.to_string()
                } else {
                    text.to_string()
                }
            }
            Ok(Err(e)) => {
                tracing::warn!(provider, error = %e, "Caption generation failed");
                caption_error(e.to_string())
            }
            Err(_) => {
                tracing::warn!(
                    provider,
                    timeout_secs = self.caption_timeout.as_secs_f64(),
                    "Caption generation timed out"
                );
                caption_error(format!(
                    "caption generation timed out after {}s",
                    self.caption_timeout.as_secs()
                ))
            }
        }
    }
}

/// Client-declared type when it names an image, else derived from the extension.
fn resolve_content_type<'a>(declared: Option<&'a str>, file_name: &str) -> &'a str {
    match declared.map(str::trim) {
        Some(ct) if ct.starts_with("image/") => ct,
        _ => content_type_for(file_name),
    }
}
