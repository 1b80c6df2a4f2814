use std::sync::Arc;
use std::time::Duration;

use glimpse_core::{CaptionProvider, Config};

use crate::CaptionGenerator;

/// Build the configured caption provider.
///
/// A missing API key is not a startup error: every caption then fails and is
/// recorded as an error caption, which keeps uploads working without a model.
pub fn create_caption_generator(config: &Config) -> anyhow::Result<Arc<dyn CaptionGenerator>> {
    let timeout = Duration::from_secs(config.caption_timeout_secs());

    let generator: Arc<dyn CaptionGenerator> = match config.caption_provider() {
        #[cfg(feature = "provider-gemini")]
        CaptionProvider::Gemini => {
            if config.gemini_api_key().is_none() {
                tracing::warn!("GEMINI_API_KEY is not set; captions will be recorded as errors");
            }
            Arc::new(crate::GeminiCaptioner::new(
                config.caption_api_base_url(),
                config.gemini_api_key().map(String::from),
                config.gemini_model(),
                config.caption_prompt(),
                timeout,
            )?)
        }
        #[cfg(feature = "provider-claude")]
        CaptionProvider::Claude => {
            if config.anthropic_api_key().is_none() {
                tracing::warn!("ANTHROPIC_API_KEY is not set; captions will be recorded as errors");
            }
            Arc::new(crate::ClaudeCaptioner::new(
                config.caption_api_base_url(),
                config.anthropic_api_key().map(String::from),
                config.anthropic_vision_model(),
                config.caption_prompt(),
                timeout,
            )?)
        }
        #[allow(unreachable_patterns)]
        other => {
            return Err(anyhow::anyhow!(
                "Caption provider '{}' is not compiled in",
                other
            ))
        }
    };

    tracing::info!(provider = generator.provider(), "Caption generator initialized");
    Ok(generator)
}
