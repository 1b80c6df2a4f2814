//! Signed file route for the local storage backend.
//! S3 signed URLs point at the bucket directly and never reach this handler.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::Response,
};
use glimpse_core::{content_type_for, AppError};
use glimpse_storage::Storage;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SignedUrlQuery {
    /// Unix time after which the link is rejected
    pub expires: Option<u64>,
    /// Hex HMAC-SHA256 over `"{key}\n{expires}"`
    pub signature: Option<String>,
}

/// Serve a stored object by signed URL
#[utoipa::path(
    get,
    path = "/media/{key}",
    tag = "media",
    params(
        ("key" = String, Path, description = "Object key, e.g. `thumbnails/cat.jpg`"),
        SignedUrlQuery
    ),
    responses(
        (status = 200, description = "Object bytes"),
        (status = 403, description = "Missing, invalid, or expired signature", body = ErrorResponse),
        (status = 404, description = "No such object, or local backend not in use", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, query), fields(operation = "serve_media"))]
pub async fn serve_media(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    Query(query): Query<SignedUrlQuery>,
) -> Result<Response, HttpAppError> {
    let local = state
        .local_storage
        .as_ref()
        .ok_or_else(|| AppError::NotFound("Media is not served by this backend".to_string()))?;

    let (Some(expires), Some(signature)) = (query.expires, query.signature.as_deref()) else {
        return Err(AppError::Forbidden("Missing signature".to_string()).into());
    };

    local.verify_signature(&key, expires, signature)?;
    let data = local.download(&key).await?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type_for(&key))
        .header(header::CONTENT_LENGTH, data.len())
        .header(header::CACHE_CONTROL, "private, max-age=3600")
        .body(Body::from(data))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)).into())
}
