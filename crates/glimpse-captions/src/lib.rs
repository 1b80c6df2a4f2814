//! Caption generation
//!
//! A [`CaptionGenerator`] turns image bytes into a short caption with a single call
//! to an external vision model. Failures are returned as [`CaptionError`]; callers
//! decide how to degrade.

mod caption;
#[cfg(feature = "provider-claude")]
mod claude;
mod factory;
#[cfg(feature = "provider-gemini")]
mod gemini;
mod media_type;

pub use caption::{CaptionError, CaptionGenerator};
#[cfg(feature = "provider-claude")]
pub use claude::ClaudeCaptioner;
pub use factory::create_caption_generator;
#[cfg(feature = "provider-gemini")]
pub use gemini::GeminiCaptioner;
pub use media_type::detect_media_type;
