use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[cfg(feature = "sqlx")]
use sqlx::FromRow;

/// Caption stored when the model answers with nothing usable.
pub const NO_CAPTION_GENERATED: &str = "No caption generated.";

/// Prefix of every caption that records a generation failure.
pub const CAPTION_ERROR_PREFIX: &str = "Error: ";

/// URL emitted for a gallery item whose image could not be resolved.
pub const UNAVAILABLE_URL: &str = "#";

/// One row of `image_metadata`: an original blob plus its caption.
///
/// Rows are written once, after the blob write has been confirmed, and are never
/// updated. `created_at` is assigned by the database and is the listing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct ArtifactRecord {
    pub id: i64,
    pub file_name: String,
    #[cfg_attr(feature = "sqlx", sqlx(rename = "s3_key"))]
    pub storage_key: String,
    #[cfg_attr(feature = "sqlx", sqlx(rename = "description"))]
    pub caption: String,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for an artifact record. All fields are required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArtifact {
    pub file_name: String,
    pub storage_key: String,
    pub caption: String,
}

/// Build the caption stored when generation failed.
pub fn caption_error(message: impl AsRef<str>) -> String {
    format!("{}{}", CAPTION_ERROR_PREFIX, message.as_ref())
}

/// Whether a stored caption records a generation failure rather than model output.
pub fn is_caption_error(caption: &str) -> bool {
    caption.starts_with(CAPTION_ERROR_PREFIX)
}

/// Response body for a successful upload
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    /// Sanitized file name the original was stored under
    pub file_name: String,
    /// Object store key of the original (always under the originals prefix)
    pub storage_key: String,
    /// Direct, non-expiring URL of the original
    pub url: String,
    /// Generated caption, or a failure sentinel
    pub caption: String,
}

/// Which asset a gallery URL points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ImageSource {
    Thumbnail,
    Original,
    Unavailable,
}

/// A single reconciled gallery entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GalleryItem {
    pub url: String,
    pub caption: String,
    pub source: ImageSource,
}

impl GalleryItem {
    pub fn unavailable(caption: String) -> Self {
        Self {
            url: UNAVAILABLE_URL.to_string(),
            caption,
            source: ImageSource::Unavailable,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GalleryResponse {
    pub images: Vec<GalleryItem>,
}
