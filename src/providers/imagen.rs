//! Imagen `predict` provider

use super::{endpoint, require_api_key, require_model, GeneratedImage, ImageProvider};
use super::http::UpstreamClient;
use crate::config::{ImagenConfig, ProviderConfig};
use crate::error::RelayResult;
use crate::logging::log_debug;
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct PredictRequest {
    pub instances: Vec<PredictInstance>,
    pub parameters: PredictParameters,
}

#[derive(Debug, Serialize)]
pub(crate) struct PredictInstance {
    pub prompt: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PredictParameters {
    pub sample_count: u32,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PredictResponse {
    #[serde(default)]
    pub predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Prediction {
    #[serde(default)]
    pub bytes_base64_encoded: Option<String>,
    #[serde(default, alias = "uri")]
    pub gcs_uri: Option<String>,
}

impl PredictResponse {
    pub fn into_image(self) -> RelayResult<GeneratedImage> {
        let first = self.predictions.into_iter().next();
        let (data, uri) = match first {
            Some(p) => (p.bytes_base64_encoded, p.gcs_uri),
            None => (None, None),
        };
        GeneratedImage::from_fields(data, uri)
    }
}

/// Imagen image generation
#[derive(Debug)]
pub struct ImagenProvider {
    config: ImagenConfig,
    client: UpstreamClient,
}

impl ImagenProvider {
    pub fn new(config: ImagenConfig, client: UpstreamClient) -> Self {
        log_debug!(
            provider = "imagen",
            has_api_key = config.api_key.is_some(),
            default_model = %config.default_model,
            sample_count = config.sample_count,
            "Creating Imagen provider"
        );
        Self { config, client }
    }
}

#[async_trait]
impl ImageProvider for ImagenProvider {
    fn provider_name(&self) -> &'static str {
        self.config.provider_name()
    }

    async fn generate(&self, prompt: &str) -> RelayResult<GeneratedImage> {
        let api_key = require_api_key(&self.config)?;
        let model = require_model(&self.config)?;
        let url = endpoint(&self.config, &format!("v1beta/models/{model}:predict"));

        let request = PredictRequest {
            instances: vec![PredictInstance {
                prompt: prompt.to_string(),
            }],
            parameters: PredictParameters {
                sample_count: self.config.sample_count,
            },
        };

        let response: PredictResponse = self
            .client
            .post_json(self.provider_name(), &url, &[("key", api_key)], HeaderMap::new(), &request)
            .await?;

        response.into_image()
    }
}
