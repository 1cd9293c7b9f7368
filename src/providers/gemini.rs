//! Gemini `generateContent` provider
//!
//! Text chat and multimodal image generation hit the same endpoint with
//! different models. The API key travels as the `key` query parameter.

use super::{endpoint, require_api_key, require_model, ChatProvider, GeneratedImage, ImageProvider};
use super::http::UpstreamClient;
use crate::config::{GeminiConfig, ProviderConfig};
use crate::error::{RelayError, RelayResult};
use crate::logging::log_debug;
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest {
    pub contents: Vec<RequestContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct RequestContent {
    pub role: String,
    pub parts: Vec<RequestPart>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct RequestPart {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerationConfig {
    pub response_modalities: Vec<String>,
}

impl GenerateContentRequest {
    /// Single user-role message
    pub fn user_text(text: &str) -> Self {
        Self {
            contents: vec![RequestContent {
                role: "user".to_string(),
                parts: vec![RequestPart {
                    text: text.to_string(),
                }],
            }],
            generation_config: None,
        }
    }

    pub fn with_image_output(mut self) -> Self {
        self.generation_config = Some(GenerationConfig {
            response_modalities: vec!["TEXT".to_string(), "IMAGE".to_string()],
        });
        self
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, alias = "inline_data")]
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InlineData {
    #[serde(default, alias = "mime_type")]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub data: Option<String>,
}

impl GenerateContentResponse {
    fn first_parts(&self) -> &[ResponsePart] {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.as_slice())
            .unwrap_or_default()
    }

    /// Text parts of the first candidate, concatenated
    pub fn reply_text(&self) -> Option<String> {
        let reply: String = self
            .first_parts()
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        (!reply.is_empty()).then_some(reply)
    }

    /// First inline image payload of the first candidate
    pub fn inline_image(&self) -> Option<&InlineData> {
        self.first_parts()
            .iter()
            .filter_map(|p| p.inline_data.as_ref())
            .find(|d| d.data.as_deref().is_some_and(|data| !data.is_empty()))
    }
}

async fn generate_content(
    config: &GeminiConfig,
    client: &UpstreamClient,
    provider: &'static str,
    request: &GenerateContentRequest,
) -> RelayResult<GenerateContentResponse> {
    let api_key = require_api_key(config)?;
    let model = require_model(config)?;
    let url = endpoint(config, &format!("v1beta/models/{model}:generateContent"));

    client
        .post_json(provider, &url, &[("key", api_key)], HeaderMap::new(), request)
        .await
}

/// Gemini text chat
#[derive(Debug)]
pub struct GeminiChatProvider {
    config: GeminiConfig,
    client: UpstreamClient,
}

impl GeminiChatProvider {
    pub fn new(config: GeminiConfig, client: UpstreamClient) -> Self {
        log_debug!(
            provider = "gemini",
            has_api_key = config.api_key.is_some(),
            base_url = %config.base_url,
            default_model = %config.default_model,
            "Creating Gemini chat provider"
        );
        Self { config, client }
    }
}

#[async_trait]
impl ChatProvider for GeminiChatProvider {
    fn provider_name(&self) -> &'static str {
        self.config.provider_name()
    }

    async fn complete(&self, text: &str) -> RelayResult<String> {
        let request = GenerateContentRequest::user_text(text);
        let response =
            generate_content(&self.config, &self.client, self.provider_name(), &request).await?;

        response
            .reply_text()
            .ok_or_else(|| RelayError::upstream(None, "no reply text in Gemini response"))
    }
}

/// Gemini multimodal image generation
#[derive(Debug)]
pub struct GeminiImageProvider {
    config: GeminiConfig,
    client: UpstreamClient,
}

impl GeminiImageProvider {
    pub fn new(config: GeminiConfig, client: UpstreamClient) -> Self {
        log_debug!(
            provider = "gemini",
            has_api_key = config.api_key.is_some(),
            default_model = %config.default_model,
            "Creating Gemini image provider"
        );
        Self { config, client }
    }
}

#[async_trait]
impl ImageProvider for GeminiImageProvider {
    fn provider_name(&self) -> &'static str {
        self.config.provider_name()
    }

    async fn generate(&self, prompt: &str) -> RelayResult<GeneratedImage> {
        let request = GenerateContentRequest::user_text(prompt).with_image_output();
        let response =
            generate_content(&self.config, &self.client, self.provider_name(), &request).await?;

        let inline = response.inline_image();
        if let Some(mime) = inline.and_then(|d| d.mime_type.as_deref()) {
            log_debug!(provider = "gemini", mime_type = %mime, "Gemini returned inline image");
        }

        GeneratedImage::from_fields(inline.and_then(|d| d.data.clone()), None)
    }
}
