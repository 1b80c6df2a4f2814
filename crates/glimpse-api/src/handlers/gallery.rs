use std::sync::Arc;

use axum::{extract::State, Json};
use glimpse_core::models::GalleryResponse;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

/// List every uploaded image, newest first
///
/// Each item links to the thumbnail when one exists and to the original otherwise.
/// Links are signed and expire. An item whose thumbnail could not be checked has
/// `url = "#"` and `source = "unavailable"`.
#[utoipa::path(
    get,
    path = "/gallery",
    tag = "images",
    responses(
        (status = 200, description = "Gallery items in upload order, newest first", body = GalleryResponse),
        (status = 503, description = "Metadata store unavailable", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "get_gallery"))]
pub async fn get_gallery(
    State(state): State<Arc<AppState>>,
) -> Result<Json<GalleryResponse>, HttpAppError> {
    let images = state.gallery.render().await?;
    Ok(Json(GalleryResponse { images }))
}
