//! Glimpse Core Library
//!
//! This crate provides the domain models, error types, configuration, and upload
//! validation shared by every Glimpse component.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;
pub mod validation;

// Re-export commonly used types
pub use config::{BaseConfig, CaptionProvider, Config, ServiceConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use storage_types::StorageBackend;
// Note: Storage, StorageError, StorageResult live in glimpse-storage
pub use validation::{
    allowed_file, content_type_for, sanitize_filename, UploadValidator, ValidationError,
};
