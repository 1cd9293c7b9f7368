//! OpenAI provider implementation
//!
//! Chat completions and image generations, both authenticated with a bearer
//! token.

use super::{endpoint, require_api_key, require_model, ChatProvider, GeneratedImage, ImageProvider};
use super::http::UpstreamClient;
use crate::config::{OpenAIConfig, OpenAIImageConfig, ProviderConfig};
use crate::error::{RelayError, RelayResult};
use crate::logging::log_debug;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// OpenAI-compatible message structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct OpenAIMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct OpenAIRequest {
    pub model: String,
    pub messages: Vec<OpenAIMessage>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct OpenAIResponse {
    #[serde(default)]
    pub choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OpenAIChoice {
    pub message: OpenAIResponseMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OpenAIResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct OpenAIImageRequest {
    pub model: String,
    pub prompt: String,
    pub n: u32,
    pub size: String,
    pub response_format: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct OpenAIImageResponse {
    #[serde(default)]
    pub data: Vec<OpenAIImageData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OpenAIImageData {
    #[serde(default)]
    pub b64_json: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// OpenAI chat completions
#[derive(Debug)]
pub struct OpenAIChatProvider {
    config: OpenAIConfig,
    client: UpstreamClient,
}

impl OpenAIChatProvider {
    pub fn new(config: OpenAIConfig, client: UpstreamClient) -> Self {
        log_debug!(
            provider = "openai",
            has_api_key = config.api_key.is_some(),
            base_url = %config.base_url,
            default_model = %config.default_model,
            "Creating OpenAI chat provider"
        );
        Self { config, client }
    }
}

#[async_trait]
impl ChatProvider for OpenAIChatProvider {
    fn provider_name(&self) -> &'static str {
        self.config.provider_name()
    }

    async fn complete(&self, text: &str) -> RelayResult<String> {
        let api_key = require_api_key(&self.config)?;
        let headers = UpstreamClient::build_auth_headers(api_key)?;
        let url = endpoint(&self.config, "v1/chat/completions");

        let request = OpenAIRequest {
            model: require_model(&self.config)?.to_string(),
            messages: vec![OpenAIMessage {
                role: "user".to_string(),
                content: text.to_string(),
            }],
        };

        let response: OpenAIResponse = self
            .client
            .post_json(self.provider_name(), &url, &[], headers, &request)
            .await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| RelayError::upstream(None, "no reply text in OpenAI response"))
    }
}

/// OpenAI image generations
#[derive(Debug)]
pub struct OpenAIImageProvider {
    config: OpenAIImageConfig,
    client: UpstreamClient,
}

impl OpenAIImageProvider {
    pub fn new(config: OpenAIImageConfig, client: UpstreamClient) -> Self {
        log_debug!(
            provider = "openai",
            has_api_key = config.api_key.is_some(),
            default_model = %config.default_model,
            size = %config.size,
            "Creating OpenAI image provider"
        );
        Self { config, client }
    }
}

#[async_trait]
impl ImageProvider for OpenAIImageProvider {
    fn provider_name(&self) -> &'static str {
        self.config.provider_name()
    }

    async fn generate(&self, prompt: &str) -> RelayResult<GeneratedImage> {
        let api_key = require_api_key(&self.config)?;
        let headers = UpstreamClient::build_auth_headers(api_key)?;
        let url = endpoint(&self.config, "v1/images/generations");

        let request = OpenAIImageRequest {
            model: require_model(&self.config)?.to_string(),
            prompt: prompt.to_string(),
            n: 1,
            size: self.config.size.clone(),
            response_format: "b64_json".to_string(),
        };

        let response: OpenAIImageResponse = self
            .client
            .post_json(self.provider_name(), &url, &[], headers, &request)
            .await?;

        let (data, url) = match response.data.into_iter().next() {
            Some(d) => (d.b64_json, d.url),
            None => (None, None),
        };
        GeneratedImage::from_fields(data, url)
    }
}
