//! Glimpse Services Layer
//!
//! Orchestration between the object store, the metadata store and the caption
//! provider. The HTTP crate stays thin and calls into [`IngestionPipeline`] and
//! [`GalleryReconciler`].

pub mod error;
pub mod gallery;
pub mod ingestion;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use error::{GalleryError, IngestError};
pub use gallery::{GalleryReconciler, GallerySettings};
pub use ingestion::{IngestOutcome, IngestionPipeline};
