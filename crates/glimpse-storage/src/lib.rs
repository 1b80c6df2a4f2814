//! Glimpse Storage Library
//!
//! Object store client used by ingestion (writes originals) and the gallery
//! (probes thumbnails, signs URLs). Backends: S3 via `object_store`, and the local
//! filesystem for development.
//!
//! # Storage key format
//!
//! - Originals: `{originals_prefix}/{file_name}` (default `uploads/`)
//! - Thumbnails: `{thumbnails_prefix}/{basename}` (default `thumbnails/`), written
//!   by an external producer and only ever read here
//!
//! Keys must not contain `..` segments or a leading `/`.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
#[cfg(feature = "storage-local")]
pub use factory::create_local_storage;
pub use factory::create_storage;
pub use glimpse_core::StorageBackend;
pub use keys::KeyLayout;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
