use glimpse_core::{AppError, ValidationError};
use thiserror::Error;

/// Why an upload was not ingested.
///
/// Caption failures are absent on purpose: they are recorded in the caption text
/// and the upload still succeeds.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Rejected before any external call was made
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The object store write failed. No metadata was written.
    #[error("S3 Upload Error: {0}")]
    StorageWrite(String),

    /// The blob was written but the metadata insert failed, leaving an orphan.
    #[error("Database Error: {0}")]
    MetadataWrite(String),
}

#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("Database Error: {0}")]
    MetadataRead(String),
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::Validation(e) => AppError::from(e),
            IngestError::StorageWrite(msg) => AppError::StorageWrite(msg),
            IngestError::MetadataWrite(msg) => AppError::MetadataWrite(msg),
        }
    }
}

impl From<GalleryError> for AppError {
    fn from(err: GalleryError) -> Self {
        match err {
            GalleryError::MetadataRead(msg) => AppError::MetadataRead(msg),
        }
    }
}
