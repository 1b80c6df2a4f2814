use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    Json,
};
use glimpse_core::models::UploadResponse;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::extract_multipart_file;

/// Upload an image
///
/// Validates the file, stores the original under the originals prefix, captions
/// it, and records the metadata row. A caption failure does not fail the upload;
/// the returned caption then starts with `Error: `.
#[utoipa::path(
    post,
    path = "/upload",
    tag = "images",
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "Form with a single `file` field"),
    responses(
        (status = 201, description = "Image stored and recorded", body = UploadResponse),
        (status = 400, description = "No file, disallowed extension, or empty file", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Metadata write failed after the original was stored", body = ErrorResponse),
        (status = 502, description = "Object store write failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_image"))]
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<UploadResponse>), HttpAppError> {
    let file = extract_multipart_file(multipart?).await?;

    let outcome = state
        .ingestion
        .ingest(
            file.file_name.as_deref(),
            file.data,
            file.content_type.as_deref(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            file_name: outcome.file_name,
            storage_key: outcome.storage_key,
            url: outcome.url,
            caption: outcome.caption,
        }),
    ))
}
