use axum::{
    body::Body,
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::error::RedactedErrorBody;

/// Whether sensitive error details reach clients
#[derive(Debug, Clone, Copy)]
pub struct ErrorDetailsPolicy {
    pub is_production: bool,
}

/// In production, replace the body of a sensitive error with its redacted form.
pub async fn redact_error_details(
    State(policy): State<ErrorDetailsPolicy>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    let Some(RedactedErrorBody(body)) = response.extensions_mut().remove::<RedactedErrorBody>()
    else {
        return response;
    };

    if policy.is_production {
        response.headers_mut().remove(header::CONTENT_LENGTH);
        *response.body_mut() = Body::from(body);
    }

    response
}
