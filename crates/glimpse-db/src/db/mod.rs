//! Database repositories for data access layer
//!
//! The only table is `image_metadata`: one row per stored original, written after
//! the blob is confirmed and read back newest first by the gallery.

pub mod artifact;

pub use artifact::{ArtifactStore, PgArtifactRepository};
