//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. Anything that converts
//! into `AppError` converts into `HttpAppError` and renders the same JSON body.
//!
//! The full body always carries details. Sensitive errors also attach a
//! [`RedactedErrorBody`] extension, which the production middleware swaps in.

use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use glimpse_core::{AppError, ErrorMetadata, LogLevel, ValidationError};
use glimpse_services::{GalleryError, IngestError};
use glimpse_storage::StorageError;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    /// Suggested action for the client
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

impl ErrorResponse {
    fn from_app_error(error: &AppError, with_details: bool) -> Self {
        Self {
            error: error.client_message(),
            details: with_details.then(|| error.detailed_message()),
            error_type: with_details.then(|| error.error_type().to_string()),
            code: error.error_code().to_string(),
            recoverable: error.is_recoverable(),
            suggested_action: error.suggested_action().map(String::from),
        }
    }
}

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from glimpse-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

/// Client-safe JSON body for a sensitive error, without details
#[derive(Debug, Clone)]
pub struct RedactedErrorBody(pub String);

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let redacted = app_error
            .is_sensitive()
            .then(|| serde_json::to_string(&ErrorResponse::from_app_error(app_error, false)))
            .and_then(Result::ok);

        let mut response = (
            status,
            Json(ErrorResponse::from_app_error(app_error, true)),
        )
            .into_response();

        if let Some(body) = redacted {
            response.extensions_mut().insert(RedactedErrorBody(body));
        }
        response
    }
}

// Convert domain errors to HttpAppError (avoids orphan rule: we impl for local HttpAppError)

impl From<IngestError> for HttpAppError {
    fn from(err: IngestError) -> Self {
        HttpAppError(err.into())
    }
}

impl From<GalleryError> for HttpAppError {
    fn from(err: GalleryError) -> Self {
        HttpAppError(err.into())
    }
}

impl From<ValidationError> for HttpAppError {
    fn from(err: ValidationError) -> Self {
        HttpAppError(err.into())
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        let app = match err {
            StorageError::NotFound(msg) => AppError::NotFound(msg),
            StorageError::InvalidSignature(msg) => AppError::Forbidden(msg),
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            StorageError::UploadFailed(msg) => AppError::StorageWrite(msg),
            StorageError::DownloadFailed(msg) | StorageError::BackendError(msg) => {
                AppError::Storage(msg)
            }
            StorageError::IoError(err) => AppError::Internal(format!("IO error: {}", err)),
            StorageError::ConfigError(msg) => AppError::Internal(msg),
        };
        HttpAppError(app)
    }
}

/// Convert non-multipart request bodies into a 400 with our ErrorResponse format.
impl From<MultipartRejection> for HttpAppError {
    fn from(rejection: MultipartRejection) -> Self {
        HttpAppError(AppError::InvalidInput(format!(
            "Expected a multipart/form-data body: {}",
            rejection.body_text()
        )))
    }
}

impl From<MultipartError> for HttpAppError {
    fn from(err: MultipartError) -> Self {
        let app = if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(err.body_text())
        } else {
            AppError::InvalidInput(format!("Failed to read multipart: {}", err.body_text()))
        };
        HttpAppError(app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_storage_error_not_found() {
        let HttpAppError(app_err) = StorageError::NotFound("uploads/cat.jpg".to_string()).into();
        match app_err {
            AppError::NotFound(msg) => assert_eq!(msg, "uploads/cat.jpg"),
            _ => panic!("Expected NotFound variant"),
        }
    }

    #[test]
    fn test_from_storage_error_invalid_signature() {
        let HttpAppError(app_err) =
            StorageError::InvalidSignature("link has expired".to_string()).into();
        assert!(matches!(app_err, AppError::Forbidden(_)));
        assert_eq!(app_err.http_status_code(), 403);
    }

    #[test]
    fn test_from_storage_error_upload_failed() {
        let HttpAppError(app_err) = StorageError::UploadFailed("timeout".to_string()).into();
        match app_err {
            AppError::StorageWrite(msg) => assert_eq!(msg, "timeout"),
            _ => panic!("Expected StorageWrite variant"),
        }
    }

    #[test]
    fn test_from_storage_error_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let HttpAppError(app_err) = StorageError::IoError(io_err).into();
        match app_err {
            AppError::Internal(msg) => assert!(msg.contains("IO error")),
            _ => panic!("Expected Internal variant"),
        }
    }

    #[test]
    fn test_from_ingest_errors() {
        let HttpAppError(app_err) = IngestError::Validation(ValidationError::FileTooLarge {
            size: 1000,
            max: 500,
        })
        .into();
        assert!(matches!(app_err, AppError::PayloadTooLarge(_)));

        let HttpAppError(app_err) = IngestError::MetadataWrite("deadlock".to_string()).into();
        assert_eq!(app_err.http_status_code(), 500);
        assert_eq!(app_err.to_string(), "Database Error: deadlock");
    }

    #[test]
    fn test_from_gallery_error() {
        let HttpAppError(app_err) = GalleryError::MetadataRead("refused".to_string()).into();
        assert_eq!(app_err.error_code(), "DATABASE_READ_ERROR");
    }

    #[test]
    fn test_sensitive_errors_carry_redacted_body() {
        let response =
            HttpAppError(AppError::MetadataWrite("password authentication failed".to_string()))
                .into_response();
        let RedactedErrorBody(body) = response
            .extensions()
            .get::<RedactedErrorBody>()
            .cloned()
            .expect("redacted body attached");
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["code"], "DATABASE_WRITE_ERROR");
        assert!(json.get("details").is_none());

        let response = HttpAppError(ValidationError::EmptyFile.into()).into_response();
        assert!(response.extensions().get::<RedactedErrorBody>().is_none());
    }

    /// The public error response contract: "error", "code", "recoverable", and
    /// optionally "details" / "error_type" / "suggested_action".
    #[test]
    fn test_error_response_shape() {
        let err = AppError::StorageWrite("connection reset".to_string());

        let json = serde_json::to_value(ErrorResponse::from_app_error(&err, true)).unwrap();
        assert_eq!(json["error"], "S3 Upload Error");
        assert_eq!(json["code"], "STORAGE_WRITE_ERROR");
        assert_eq!(json["recoverable"], true);
        assert_eq!(json["details"], "S3 Upload Error: connection reset");

        let json = serde_json::to_value(ErrorResponse::from_app_error(&err, false)).unwrap();
        assert!(json.get("details").is_none());
        assert!(json.get("error_type").is_none());
    }
}
