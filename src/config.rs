use crate::error::{RelayError, RelayResult};
use crate::logging::log_debug;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::time::Duration;

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const GEMINI_CHAT_MODEL: &str = "gemini-2.5-flash-preview-05-20";
pub const GEMINI_IMAGE_MODEL: &str = "gemini-2.0-flash-preview-image-generation";
pub const IMAGEN_MODEL: &str = "imagen-3.0-generate-002";
pub const OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const OPENAI_CHAT_MODEL: &str = "gpt-4o-mini";
pub const OPENAI_IMAGE_MODEL: &str = "dall-e-3";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Trait for provider-specific configuration
pub trait ProviderConfig: Send + Sync + Debug {
    /// Get the provider name
    fn provider_name(&self) -> &'static str;

    /// Validate provider configuration
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Configuration`] naming the missing setting when a
    /// required credential or endpoint is absent.
    fn validate(&self) -> RelayResult<()>;

    /// Get the base URL for API calls
    fn base_url(&self) -> &str;

    /// Get the API key if required
    fn api_key(&self) -> Option<&str>;

    /// Model identifier sent upstream, for providers that take one
    fn model(&self) -> Option<&str>;
}

/// Gemini `generateContent` configuration, shared by text chat and
/// multimodal image generation (with different models).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub default_model: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: GEMINI_BASE_URL.to_string(),
            default_model: GEMINI_CHAT_MODEL.to_string(),
        }
    }
}

impl ProviderConfig for GeminiConfig {
    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    fn validate(&self) -> RelayResult<()> {
        if self.api_key.is_none() {
            return Err(RelayError::configuration_error(
                "GEMINI_API_KEY is not set",
            ));
        }
        Ok(())
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    fn model(&self) -> Option<&str> {
        Some(&self.default_model)
    }
}

/// Imagen `predict` configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagenConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub default_model: String,
    pub sample_count: u32,
}

impl Default for ImagenConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: GEMINI_BASE_URL.to_string(),
            default_model: IMAGEN_MODEL.to_string(),
            sample_count: 1,
        }
    }
}

impl ProviderConfig for ImagenConfig {
    fn provider_name(&self) -> &'static str {
        "imagen"
    }

    fn validate(&self) -> RelayResult<()> {
        if self.api_key.is_none() {
            return Err(RelayError::configuration_error(
                "GEMINI_API_KEY is not set",
            ));
        }
        Ok(())
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    fn model(&self) -> Option<&str> {
        Some(&self.default_model)
    }
}

/// OpenAI chat completions configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub default_model: String,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: OPENAI_BASE_URL.to_string(),
            default_model: OPENAI_CHAT_MODEL.to_string(),
        }
    }
}

impl ProviderConfig for OpenAIConfig {
    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn validate(&self) -> RelayResult<()> {
        if self.api_key.is_none() {
            return Err(RelayError::configuration_error("OPENAI_API_KEY is not set"));
        }
        Ok(())
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    fn model(&self) -> Option<&str> {
        Some(&self.default_model)
    }
}

/// OpenAI image generations configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIImageConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub default_model: String,
    pub size: String,
}

impl Default for OpenAIImageConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: OPENAI_BASE_URL.to_string(),
            default_model: OPENAI_IMAGE_MODEL.to_string(),
            size: "1024x1024".to_string(),
        }
    }
}

impl ProviderConfig for OpenAIImageConfig {
    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn validate(&self) -> RelayResult<()> {
        if self.api_key.is_none() {
            return Err(RelayError::configuration_error("OPENAI_API_KEY is not set"));
        }
        Ok(())
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    fn model(&self) -> Option<&str> {
        Some(&self.default_model)
    }
}

/// Raw-image endpoint configuration
///
/// The endpoint answers a GET with the image bytes. `fallback_targets` are URL
/// prefixes the percent-encoded target URL is appended to, tried in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawImageConfig {
    pub endpoint: Option<String>,
    pub quality: String,
    pub size: String,
    pub fallback_targets: Vec<String>,
}

impl Default for RawImageConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            quality: "high".to_string(),
            size: "512x512".to_string(),
            fallback_targets: Vec::new(),
        }
    }
}

impl ProviderConfig for RawImageConfig {
    fn provider_name(&self) -> &'static str {
        "raw"
    }

    fn validate(&self) -> RelayResult<()> {
        if self.endpoint.is_none() {
            return Err(RelayError::configuration_error("RAW_IMAGE_URL is not set"));
        }
        Ok(())
    }

    fn base_url(&self) -> &str {
        self.endpoint.as_deref().unwrap_or_default()
    }

    fn api_key(&self) -> Option<&str> {
        None // raw endpoint is unauthenticated
    }

    fn model(&self) -> Option<&str> {
        None
    }
}

/// Selected chat provider
#[derive(Debug, Clone)]
pub enum ChatProviderConfig {
    Gemini(GeminiConfig),
    OpenAI(OpenAIConfig),
    /// Offline keyword responder, needs no credentials
    Canned,
}

impl ChatProviderConfig {
    pub fn provider_name(&self) -> &'static str {
        match self {
            Self::Gemini(c) => c.provider_name(),
            Self::OpenAI(c) => c.provider_name(),
            Self::Canned => "canned",
        }
    }

    pub fn validate(&self) -> RelayResult<()> {
        match self {
            Self::Gemini(c) => c.validate(),
            Self::OpenAI(c) => c.validate(),
            Self::Canned => Ok(()),
        }
    }
}

/// Selected image provider
#[derive(Debug, Clone)]
pub enum ImageProviderConfig {
    Raw(RawImageConfig),
    Imagen(ImagenConfig),
    Gemini(GeminiConfig),
    OpenAI(OpenAIImageConfig),
}

impl ImageProviderConfig {
    pub fn provider_name(&self) -> &'static str {
        self.as_provider_config().provider_name()
    }

    pub fn validate(&self) -> RelayResult<()> {
        self.as_provider_config().validate()
    }

    fn as_provider_config(&self) -> &dyn ProviderConfig {
        match self {
            Self::Raw(c) => c,
            Self::Imagen(c) => c,
            Self::Gemini(c) => c,
            Self::OpenAI(c) => c,
        }
    }
}

/// Complete relay configuration, read once at startup
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub chat: ChatProviderConfig,
    pub image: ImageProviderConfig,
    /// Bound on every outbound call
    pub request_timeout: Duration,
    /// Infer the request kind from the text when the client sends none
    pub infer_kind: bool,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            chat: ChatProviderConfig::Gemini(GeminiConfig::default()),
            image: ImageProviderConfig::Raw(RawImageConfig::default()),
            request_timeout: DEFAULT_TIMEOUT,
            infer_kind: false,
        }
    }
}

impl RelayConfig {
    /// Load configuration from environment variables
    /// This is the ONLY method that should access environment variables
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Configuration`] if a provider name is not
    /// recognized or a numeric/boolean setting does not parse. Missing
    /// credentials are not an error here; they surface per request.
    pub fn from_env() -> RelayResult<Self> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_vars<F>(lookup: F) -> RelayResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let chat_name = var("CHAT_PROVIDER").unwrap_or_else(|| "gemini".to_string());
        let image_name = var("IMAGE_PROVIDER").unwrap_or_else(|| "raw".to_string());

        let gemini_key = var("GEMINI_API_KEY");
        let gemini_base = var("GEMINI_BASE_URL").unwrap_or_else(|| GEMINI_BASE_URL.to_string());
        let openai_key = var("OPENAI_API_KEY");
        let openai_base = var("OPENAI_BASE_URL").unwrap_or_else(|| OPENAI_BASE_URL.to_string());

        let chat = match chat_name.to_lowercase().as_str() {
            "gemini" => ChatProviderConfig::Gemini(GeminiConfig {
                api_key: gemini_key.clone(),
                base_url: gemini_base.clone(),
                default_model: var("GEMINI_MODEL").unwrap_or_else(|| GEMINI_CHAT_MODEL.to_string()),
            }),
            "openai" => ChatProviderConfig::OpenAI(OpenAIConfig {
                api_key: openai_key.clone(),
                base_url: openai_base.clone(),
                default_model: var("OPENAI_MODEL").unwrap_or_else(|| OPENAI_CHAT_MODEL.to_string()),
            }),
            "canned" => ChatProviderConfig::Canned,
            _ => {
                return Err(RelayError::configuration_error(format!(
                    "Unsupported chat provider: {}. Supported providers: gemini, openai, canned",
                    chat_name
                )));
            }
        };

        let image = match image_name.to_lowercase().as_str() {
            "raw" => {
                let defaults = RawImageConfig::default();
                ImageProviderConfig::Raw(RawImageConfig {
                    endpoint: var("RAW_IMAGE_URL"),
                    quality: var("RAW_IMAGE_QUALITY").unwrap_or(defaults.quality),
                    size: var("RAW_IMAGE_SIZE").unwrap_or(defaults.size),
                    fallback_targets: var("RAW_IMAGE_PROXIES")
                        .map(|list| parse_list(&list))
                        .unwrap_or_default(),
                })
            }
            "imagen" => ImageProviderConfig::Imagen(ImagenConfig {
                api_key: gemini_key,
                base_url: gemini_base,
                default_model: var("IMAGEN_MODEL").unwrap_or_else(|| IMAGEN_MODEL.to_string()),
                sample_count: 1,
            }),
            "gemini" => ImageProviderConfig::Gemini(GeminiConfig {
                api_key: gemini_key,
                base_url: gemini_base,
                default_model: var("GEMINI_IMAGE_MODEL")
                    .unwrap_or_else(|| GEMINI_IMAGE_MODEL.to_string()),
            }),
            "openai" => {
                let defaults = OpenAIImageConfig::default();
                ImageProviderConfig::OpenAI(OpenAIImageConfig {
                    api_key: openai_key,
                    base_url: openai_base,
                    default_model: var("OPENAI_IMAGE_MODEL").unwrap_or(defaults.default_model),
                    size: var("OPENAI_IMAGE_SIZE").unwrap_or(defaults.size),
                })
            }
            _ => {
                return Err(RelayError::configuration_error(format!(
                    "Unsupported image provider: {}. Supported providers: raw, imagen, gemini, openai",
                    image_name
                )));
            }
        };

        let request_timeout = match var("RELAY_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.parse::<u64>().ok().filter(|s| *s > 0).ok_or_else(|| {
                    RelayError::configuration_error(format!(
                        "RELAY_TIMEOUT_SECS must be a positive integer, got '{raw}'"
                    ))
                })?;
                Duration::from_secs(secs)
            }
            None => DEFAULT_TIMEOUT,
        };

        let infer_kind = match var("RELAY_INFER_KIND") {
            Some(raw) => parse_flag(&raw).ok_or_else(|| {
                RelayError::configuration_error(format!(
                    "RELAY_INFER_KIND must be true or false, got '{raw}'"
                ))
            })?,
            None => false,
        };

        let config = Self {
            chat,
            image,
            request_timeout,
            infer_kind,
        };

        log_debug!(
            chat_provider = config.chat.provider_name(),
            image_provider = config.image.provider_name(),
            timeout_seconds = config.request_timeout.as_secs(),
            infer_kind = config.infer_kind,
            "Relay configuration loaded"
        );

        Ok(config)
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
