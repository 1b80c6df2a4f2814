//! Claude captioning via Anthropic's Messages API

use anyhow::Context;
use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use crate::{detect_media_type, CaptionError, CaptionGenerator};

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 300;

pub struct ClaudeCaptioner {
    http_client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    prompt: String,
}

impl Debug for ClaudeCaptioner {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ClaudeCaptioner")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

// Messages API request/response structures
#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<MessageParam>,
}

#[derive(Debug, Serialize)]
struct MessageParam {
    role: String,
    content: Vec<ContentBlock>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text { text: String },
    Image { source: ImageSource },
}

#[derive(Debug, Serialize)]
struct ImageSource {
    #[serde(rename = "type")]
    source_type: String,
    media_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlockResponse>,
}

#[derive(Debug, Deserialize)]
struct ContentBlockResponse {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: Option<String>,
}

impl ClaudeCaptioner {
    pub fn new(
        base_url: Option<&str>,
        api_key: Option<String>,
        model: impl Into<String>,
        prompt: impl Into<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client for Claude")?;

        Ok(Self {
            http_client,
            base_url: base_url
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            api_key,
            model: model.into(),
            prompt: prompt.into(),
        })
    }
}

#[async_trait]
impl CaptionGenerator for ClaudeCaptioner {
    async fn caption(&self, image: &[u8]) -> Result<String, CaptionError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(CaptionError::MissingApiKey("ANTHROPIC_API_KEY"))?;

        let media_type = detect_media_type(image);
        let body = MessagesRequest {
            model: self.model.clone(),
            max_tokens: MAX_TOKENS,
            messages: vec![MessageParam {
                role: "user".to_string(),
                content: vec![
                    ContentBlock::Image {
                        source: ImageSource {
                            source_type: "base64".to_string(),
                            media_type: media_type.to_string(),
                            data: base64::engine::general_purpose::STANDARD.encode(image),
                        },
                    },
                    ContentBlock::Text {
                        text: self.prompt.clone(),
                    },
                ],
            }],
        };

        tracing::debug!(
            model = %self.model,
            image_size = image.len(),
            media_type = media_type,
            "Sending image to Claude"
        );

        let response = self
            .http_client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| CaptionError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(CaptionError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| CaptionError::InvalidResponse(e.to_string()))?;

        let text = parsed
            .content
            .into_iter()
            .filter(|block| block.block_type == "text")
            .find_map(|block| block.text)
            .unwrap_or_default();

        Ok(text)
    }

    fn provider(&self) -> &'static str {
        "claude"
    }
}
