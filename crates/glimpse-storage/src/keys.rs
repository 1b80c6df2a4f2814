//! Object key layout.
//!
//! Originals live under `{originals_prefix}/{file_name}`. The thumbnail producer
//! writes `{thumbnails_prefix}/{basename}` for each original it processes, so the
//! thumbnail key is a pure function of the original key.

use crate::{StorageError, StorageResult};
use glimpse_core::Config;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyLayout {
    originals_prefix: String,
    thumbnails_prefix: String,
}

impl KeyLayout {
    pub fn new(originals_prefix: impl AsRef<str>, thumbnails_prefix: impl AsRef<str>) -> Self {
        Self {
            originals_prefix: originals_prefix.as_ref().trim_matches('/').to_string(),
            thumbnails_prefix: thumbnails_prefix.as_ref().trim_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.originals_prefix(), config.thumbnails_prefix())
    }

    pub fn originals_prefix(&self) -> &str {
        &self.originals_prefix
    }

    pub fn thumbnails_prefix(&self) -> &str {
        &self.thumbnails_prefix
    }

    /// Key of the original for a sanitized file name.
    pub fn original_key(&self, file_name: &str) -> String {
        format!("{}/{}", self.originals_prefix, file_name)
    }

    /// Key the thumbnail producer writes for an original.
    ///
    /// Only the base name of `storage_key` is kept, so `uploads/a/cat.jpg` maps to
    /// `thumbnails/cat.jpg`.
    pub fn thumbnail_key(&self, storage_key: &str) -> String {
        let basename = storage_key.rsplit('/').next().unwrap_or(storage_key);
        format!("{}/{}", self.thumbnails_prefix, basename)
    }
}

/// Reject keys that could escape a backend root.
pub fn validate_key(key: &str) -> StorageResult<()> {
    let bad_segment = key
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..");
    if bad_segment || key.contains('\\') {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn original_key_uses_originals_prefix() {
        let layout = KeyLayout::new("originals", "thumbnails");
        assert_eq!(layout.original_key("cat.jpg"), "originals/cat.jpg");
    }

    #[test]
    fn thumbnail_key_keeps_only_basename() {
        let layout = KeyLayout::new("uploads", "thumbnails");
        assert_eq!(layout.thumbnail_key("uploads/cat.jpg"), "thumbnails/cat.jpg");
        assert_eq!(layout.thumbnail_key("uploads/2024/cat.jpg"), "thumbnails/cat.jpg");
        assert_eq!(layout.thumbnail_key("cat.jpg"), "thumbnails/cat.jpg");
    }

    #[test]
    fn prefixes_are_trimmed_of_slashes() {
        let layout = KeyLayout::new("/uploads/", "thumbs/");
        assert_eq!(layout.original_key("a.png"), "uploads/a.png");
        assert_eq!(layout.thumbnail_key("uploads/a.png"), "thumbs/a.png");
    }

    #[test]
    fn validate_key_rejects_traversal_and_absolute_keys() {
        assert!(validate_key("uploads/cat.jpg").is_ok());
        assert!(validate_key("../etc/passwd").is_err());
        assert!(validate_key("/etc/passwd").is_err());
        assert!(validate_key("uploads\\cat.jpg").is_err());
        assert!(validate_key("").is_err());
        assert!(validate_key("uploads//cat.jpg").is_err());
        assert!(validate_key("uploads/cat..jpg").is_ok());
    }
}
