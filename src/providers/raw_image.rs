//! Raw-image endpoint provider
//!
//! The endpoint takes the prompt as a query string and answers with the image
//! bytes, which are base64-encoded for the JSON response. If it answers with
//! JSON instead, the first base64 or URL field found is used.
//!
//! Optional fallback targets are URL prefixes (relay services) that receive
//! the percent-encoded endpoint URL. They are tried in order and the first
//! one producing an image wins.

use super::http::{RawBody, UpstreamClient};
use super::{GeneratedImage, ImageProvider};
use crate::config::{ProviderConfig, RawImageConfig};
use crate::error::{RelayError, RelayResult};
use crate::logging::{log_debug, log_warn};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::Url;
use serde_json::Value;

/// Keys that may carry base64 image data in a JSON answer, in priority order
const BASE64_KEYS: &[&str] = &["image", "b64_json", "base64", "data"];
/// Keys that may carry an image link in a JSON answer
const URI_KEYS: &[&str] = &["url", "uri", "image_url"];

#[derive(Debug)]
pub struct RawImageProvider {
    config: RawImageConfig,
    client: UpstreamClient,
}

impl RawImageProvider {
    pub fn new(config: RawImageConfig, client: UpstreamClient) -> Self {
        log_debug!(
            provider = "raw",
            has_endpoint = config.endpoint.is_some(),
            quality = %config.quality,
            size = %config.size,
            fallback_targets = config.fallback_targets.len(),
            "Creating raw image provider"
        );
        Self { config, client }
    }

    /// Endpoint URL with the prompt query string
    pub fn target_url(&self, prompt: &str) -> RelayResult<Url> {
        self.config.validate()?;
        let base = self.config.base_url();
        Url::parse_with_params(
            base,
            &[
                ("text", prompt),
                ("quality", self.config.quality.as_str()),
                ("size", self.config.size.as_str()),
            ],
        )
        .map_err(|e| RelayError::configuration_error(format!("RAW_IMAGE_URL is not a valid URL: {e}")))
    }

    /// URLs to try, in order
    pub fn attempt_urls(&self, target: &Url) -> Vec<String> {
        if self.config.fallback_targets.is_empty() {
            return vec![target.to_string()];
        }
        let encoded = urlencoding::encode(target.as_str());
        self.config
            .fallback_targets
            .iter()
            .map(|prefix| format!("{prefix}{encoded}"))
            .collect()
    }

    async fn fetch(&self, url: &str) -> RelayResult<GeneratedImage> {
        let body = self.client.get_raw(self.provider_name(), url).await?;
        decode_body(body)
    }
}

#[async_trait]
impl ImageProvider for RawImageProvider {
    fn provider_name(&self) -> &'static str {
        self.config.provider_name()
    }

    async fn generate(&self, prompt: &str) -> RelayResult<GeneratedImage> {
        let target = self.target_url(prompt)?;
        let attempts = self.attempt_urls(&target);
        let total = attempts.len();

        let mut last_error = None;
        for (index, url) in attempts.iter().enumerate() {
            match self.fetch(url).await {
                Ok(image) => return Ok(image),
                Err(e) => {
                    if index + 1 < total {
                        log_warn!(
                            provider = "raw",
                            attempt = index + 1,
                            remaining = total - index - 1,
                            error = %e,
                            "Image target failed, trying next"
                        );
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(RelayError::no_image_data))
    }
}

/// Normalize a raw answer into an image
pub(crate) fn decode_body(body: RawBody) -> RelayResult<GeneratedImage> {
    if body.is_json() {
        let value: Value = serde_json::from_slice(&body.bytes).map_err(|e| {
            RelayError::internal(format!("Invalid JSON from raw image endpoint: {e}"), Some(Box::new(e)))
        })?;
        return GeneratedImage::from_fields(
            first_string(&value, BASE64_KEYS),
            first_string(&value, URI_KEYS),
        );
    }

    if !body.is_image() {
        return Err(RelayError::upstream(
            None,
            format!(
                "raw image endpoint returned {} instead of an image",
                body.content_type.as_deref().unwrap_or("unknown content")
            ),
        ));
    }

    if body.bytes.is_empty() {
        return Err(RelayError::no_image_data());
    }

    Ok(GeneratedImage::Base64(BASE64.encode(&body.bytes)))
}

fn first_string(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(String::from)
}
