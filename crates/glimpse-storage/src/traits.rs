//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Object store client
///
/// Keys are full object keys (`uploads/cat.jpg`, `thumbnails/cat.jpg`); they never
/// contain `..` or start with `/`. See [`crate::KeyLayout`] for how keys are built.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write `data` under `key`, overwriting any existing object.
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> StorageResult<()>;

    /// Download an object by key
    async fn download(&self, key: &str) -> StorageResult<Vec<u8>>;

    /// Check whether an object exists.
    ///
    /// A missing object is `Ok(false)`. Any other failure (permissions, network,
    /// throttling) is an error so callers can tell "absent" from "unknown".
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Generate a time-limited GET URL for an object.
    ///
    /// Signing does not check that the object exists.
    async fn get_presigned_url(&self, key: &str, expires_in: Duration) -> StorageResult<String>;

    /// Direct, non-expiring URL of an object
    fn public_url(&self, key: &str) -> String;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
