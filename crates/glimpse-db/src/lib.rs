//! Glimpse metadata store
//!
//! Postgres-backed persistence for artifact records (`image_metadata`).

pub mod db;

pub use db::{ArtifactStore, PgArtifactRepository};
