//! OpenAPI documentation, served at `/api/openapi.json` and rendered at `/docs`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use glimpse_core::models;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Glimpse API",
        version = "0.1.0",
        description = "Image upload with AI-generated captions, and a gallery that prefers derived thumbnails over originals once they exist."
    ),
    paths(
        handlers::upload::upload_image,
        handlers::gallery::get_gallery,
        handlers::media::serve_media,
    ),
    components(
        schemas(
            models::UploadResponse,
            models::GalleryResponse,
            models::GalleryItem,
            models::ImageSource,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "images", description = "Upload and gallery"),
        (name = "media", description = "Signed file serving for the local storage backend")
    )
)]
pub struct ApiDoc;
