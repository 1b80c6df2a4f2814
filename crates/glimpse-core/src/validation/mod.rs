//! Upload validation
//!
//! Checks run before any side effect: a rejected upload never reaches storage,
//! the caption provider, or the metadata store.

use unicode_normalization::UnicodeNormalization;

const MAX_FILENAME_LENGTH: usize = 255;

/// Reasons an upload is rejected before ingestion starts
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("No file selected")]
    NoFileSelected,

    #[error("Invalid file type: {file_name} (allowed: {allowed})")]
    InvalidFileType { file_name: String, allowed: String },

    #[error("Empty file")]
    EmptyFile,

    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),
}

/// Lowercased extension after the last `.`, if any.
fn extension_of(file_name: &str) -> Option<String> {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
}

/// True when `file_name` has an extension (text after the last `.`) contained in
/// `allowed`, compared case-insensitively. A name without a `.` is never allowed.
pub fn allowed_file<S: AsRef<str>>(file_name: &str, allowed: &[S]) -> bool {
    match extension_of(file_name) {
        Some(ext) if !ext.is_empty() => allowed
            .iter()
            .any(|candidate| candidate.as_ref().eq_ignore_ascii_case(&ext)),
        _ => false,
    }
}

/// Reduce a client-supplied file name to a safe object key component.
///
/// Folds accented letters to ASCII and drops what has no ASCII form. Path
/// separators become whitespace, whitespace runs become a single `_`, anything
/// else outside `[A-Za-z0-9._-]` is dropped, and `.`/`_` are trimmed from both ends.
/// `../../etc/cat.jpg` becomes `etc_cat.jpg`. The result is capped at 255 bytes
/// with the extension kept.
pub fn sanitize_filename(file_name: &str) -> Result<String, ValidationError> {
    let ascii: String = file_name.nfkd().filter(char::is_ascii).collect();
    let spaced = ascii.replace(['/', '\\'], " ");
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");

    let sanitized: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();
    let sanitized = sanitized.trim_matches(|c| c == '.' || c == '_');

    if sanitized.is_empty() {
        return Err(ValidationError::InvalidFilename(file_name.to_string()));
    }

    if sanitized.len() <= MAX_FILENAME_LENGTH {
        return Ok(sanitized.to_string());
    }

    // ASCII only from here, so byte offsets are char offsets.
    match sanitized.rsplit_once('.') {
        Some((stem, ext)) if ext.len() + 1 < MAX_FILENAME_LENGTH => {
            let keep = MAX_FILENAME_LENGTH - ext.len() - 1;
            Ok(format!("{}.{}", &stem[..keep.min(stem.len())], ext))
        }
        _ => Ok(sanitized[..MAX_FILENAME_LENGTH].to_string()),
    }
}

/// MIME type for an image file name, by extension.
pub fn content_type_for(file_name: &str) -> &'static str {
    match extension_of(file_name).as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Validator for incoming uploads
#[derive(Debug, Clone)]
pub struct UploadValidator {
    allowed_extensions: Vec<String>,
    max_file_size: usize,
}

impl UploadValidator {
    pub fn new(allowed_extensions: Vec<String>, max_file_size: usize) -> Self {
        Self {
            allowed_extensions: allowed_extensions
                .into_iter()
                .map(|ext| ext.to_lowercase())
                .collect(),
            max_file_size,
        }
    }

    pub fn allowed_extensions(&self) -> &[String] {
        &self.allowed_extensions
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    /// Validate an upload and return the sanitized file name to store it under.
    ///
    /// Order: file selected, extension, non-empty, size, then sanitization. The
    /// sanitized name must still carry an allowed extension.
    pub fn validate(&self, file_name: Option<&str>, size: usize) -> Result<String, ValidationError> {
        let file_name = match file_name.map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => return Err(ValidationError::NoFileSelected),
        };

        if !allowed_file(file_name, &self.allowed_extensions) {
            return Err(ValidationError::InvalidFileType {
                file_name: file_name.to_string(),
                allowed: self.allowed_extensions.join(", "),
            });
        }

        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        let sanitized = sanitize_filename(file_name)?;
        if !allowed_file(&sanitized, &self.allowed_extensions) {
            return Err(ValidationError::InvalidFilename(file_name.to_string()));
        }

        Ok(sanitized)
    }
}
