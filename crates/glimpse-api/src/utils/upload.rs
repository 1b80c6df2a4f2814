//! Common utilities for file upload handlers

use axum::extract::Multipart;
use glimpse_core::{AppError, ValidationError};

use crate::error::HttpAppError;

/// The `file` part of an upload form
#[derive(Debug)]
pub struct UploadedFile {
    pub data: Vec<u8>,
    /// Client-supplied name; `None` or empty when the form was submitted without a file
    pub file_name: Option<String>,
    pub content_type: Option<String>,
}

/// Extract the single field named "file" from a multipart form.
///
/// Other fields are ignored. A form without a `file` field is treated as no file
/// selected; more than one `file` field is rejected.
pub async fn extract_multipart_file(mut multipart: Multipart) -> Result<UploadedFile, HttpAppError> {
    let mut uploaded: Option<UploadedFile> = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        if uploaded.is_some() {
            return Err(AppError::InvalidInput(
                "Multiple file fields are not allowed; send exactly one field named 'file'"
                    .to_string(),
            )
            .into());
        }

        let file_name = field.file_name().map(String::from);
        let content_type = field.content_type().map(String::from);
        let data = field.bytes().await?;

        uploaded = Some(UploadedFile {
            data: data.to_vec(),
            file_name,
            content_type,
        });
    }

    uploaded.ok_or_else(|| ValidationError::NoFileSelected.into())
}
