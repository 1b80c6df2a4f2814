use async_trait::async_trait;

/// Errors from a caption provider
#[derive(Debug, Clone, thiserror::Error)]
pub enum CaptionError {
    #[error("{0} is not set")]
    MissingApiKey(&'static str),

    #[error("caption request failed: {0}")]
    Request(String),

    #[error("caption API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("invalid caption response: {0}")]
    InvalidResponse(String),
}

/// Vision model that captions a single image.
///
/// One attempt per call, no retries. An empty string means the model answered
/// without usable text.
#[async_trait]
pub trait CaptionGenerator: Send + Sync {
    async fn caption(&self, image: &[u8]) -> Result<String, CaptionError>;

    /// Provider name for logs
    fn provider(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_read_as_caption_text() {
        assert_eq!(
            CaptionError::MissingApiKey("GEMINI_API_KEY").to_string(),
            "GEMINI_API_KEY is not set"
        );
        assert_eq!(
            CaptionError::Api {
                status: 429,
                message: "quota exceeded".to_string()
            }
            .to_string(),
            "caption API returned 429: quota exceeded"
        );
        assert_eq!(
            CaptionError::InvalidResponse("missing candidates".to_string()).to_string(),
            "invalid caption response: missing candidates"
        );
    }
}
