//! Upstream provider implementations
//!
//! Two traits form the seam between the relay and the outside world:
//!
//! - [`ChatProvider`]: turns user text into a single reply string
//! - [`ImageProvider`]: turns a prompt into a [`GeneratedImage`]
//!
//! ```text
//! http.rs        <- shared reqwest client, timeout and error mapping
//!    |      |          |           |
//! gemini.rs imagen.rs openai.rs raw_image.rs
//!
//! canned.rs      <- offline keyword responder, no network
//! ```
//!
//! Every provider validates its own configuration before touching the
//! network, so a missing credential never produces an outbound call.

pub mod canned;
pub mod gemini;
pub mod http;
pub mod imagen;
pub mod openai;
pub mod raw_image;

use crate::config::{ChatProviderConfig, ImageProviderConfig, ProviderConfig};
use crate::error::{RelayError, RelayResult};
use async_trait::async_trait;

pub use canned::CannedProvider;
pub use gemini::{GeminiChatProvider, GeminiImageProvider};
pub use http::UpstreamClient;
pub use imagen::ImagenProvider;
pub use openai::{OpenAIChatProvider, OpenAIImageProvider};
pub use raw_image::RawImageProvider;

/// Image produced by a provider: inline base64 bytes or a link to them
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratedImage {
    Base64(String),
    Uri(String),
}

impl GeneratedImage {
    /// Pick whichever field the provider filled, preferring inline data
    ///
    /// # Errors
    ///
    /// Returns an upstream "no image data" error when both are absent or blank.
    pub fn from_fields(base64: Option<String>, uri: Option<String>) -> RelayResult<Self> {
        if let Some(data) = base64.filter(|d| !d.trim().is_empty()) {
            return Ok(Self::Base64(data));
        }
        if let Some(uri) = uri.filter(|u| !u.trim().is_empty()) {
            return Ok(Self::Uri(uri));
        }
        Err(RelayError::no_image_data())
    }
}

/// Provider answering chat messages
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatProvider: Send + Sync {
    fn provider_name(&self) -> &'static str;

    /// Send one user message upstream and return the flattened reply
    async fn complete(&self, text: &str) -> RelayResult<String>;
}

/// Provider generating images from a prompt
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageProvider: Send + Sync {
    fn provider_name(&self) -> &'static str;

    async fn generate(&self, prompt: &str) -> RelayResult<GeneratedImage>;
}

/// Build the configured chat provider
pub fn build_chat_provider(
    config: &ChatProviderConfig,
    client: UpstreamClient,
) -> Box<dyn ChatProvider> {
    match config {
        ChatProviderConfig::Gemini(c) => Box::new(GeminiChatProvider::new(c.clone(), client)),
        ChatProviderConfig::OpenAI(c) => Box::new(OpenAIChatProvider::new(c.clone(), client)),
        ChatProviderConfig::Canned => Box::new(CannedProvider),
    }
}

/// Build the configured image provider
pub fn build_image_provider(
    config: &ImageProviderConfig,
    client: UpstreamClient,
) -> Box<dyn ImageProvider> {
    match config {
        ImageProviderConfig::Raw(c) => Box::new(RawImageProvider::new(c.clone(), client)),
        ImageProviderConfig::Imagen(c) => Box::new(ImagenProvider::new(c.clone(), client)),
        ImageProviderConfig::Gemini(c) => Box::new(GeminiImageProvider::new(c.clone(), client)),
        ImageProviderConfig::OpenAI(c) => Box::new(OpenAIImageProvider::new(c.clone(), client)),
    }
}

/// Validate a config and hand back its API key
pub(crate) fn require_api_key(config: &dyn ProviderConfig) -> RelayResult<&str> {
    config.validate()?;
    config.api_key().ok_or_else(|| {
        RelayError::configuration_error(format!(
            "{} API key is not set",
            config.provider_name()
        ))
    })
}

/// `{base_url}/{path}` without doubled slashes
pub(crate) fn endpoint(config: &dyn ProviderConfig, path: &str) -> String {
    format!(
        "{}/{}",
        config.base_url().trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Model name, or an error for configs that need one and lack it
pub(crate) fn require_model(config: &dyn ProviderConfig) -> RelayResult<&str> {
    config
        .model()
        .filter(|m| !m.is_empty())
        .ok_or_else(|| {
            RelayError::configuration_error(format!(
                "{} model is not set",
                config.provider_name()
            ))
        })
}
