//! Request relay: dispatch and response normalization
//!
//! A relay invocation is `Received → Validated → Dispatched → (Succeeded | Failed)`.
//! [`Relay::handle`] never fails: every [`RelayError`] raised along the way is
//! turned into [`RelayResponse::Error`] carrying the HTTP status to send.

use crate::config::RelayConfig;
use crate::error::{RelayError, RelayResult};
use crate::logging::{log_debug, log_info, log_warn};
use crate::providers::{
    build_chat_provider, build_image_provider, ChatProvider, GeneratedImage, ImageProvider,
    UpstreamClient,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

/// Words that mark a message as an image request when the kind is inferred
const IMAGE_KEYWORDS: &[&str] = &["image", "صورة", "ارسم"];

/// What the client wants done with its text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayKind {
    Chat,
    Image,
}

impl RelayKind {
    /// Parse a wire kind; `"text"` is accepted as an alias for chat
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "chat" | "text" => Some(Self::Chat),
            "image" => Some(Self::Image),
            _ => None,
        }
    }

    /// Guess the kind from the message itself
    pub fn infer(text: &str) -> Self {
        let lower = text.to_lowercase();
        if IMAGE_KEYWORDS.iter().any(|k| lower.contains(k)) {
            Self::Image
        } else {
            Self::Chat
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Image => "image",
        }
    }
}

impl fmt::Display for RelayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inbound JSON body as sent by the chat widget
///
/// Older widget versions sent the text as `prompt`; both are accepted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InboundMessage {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// A validated relay request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayRequest {
    pub kind: RelayKind,
    pub text: String,
}

impl RelayRequest {
    pub fn new(kind: RelayKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// Normalize an inbound body
    ///
    /// `forced` wins over the body's `type` (kind-specific routes). Without
    /// either, the kind is inferred from the text when `infer_kind` is set and
    /// rejected otherwise.
    ///
    /// # Errors
    ///
    /// [`RelayError::Validation`] for an unknown or absent kind.
    pub fn from_inbound(
        message: InboundMessage,
        forced: Option<RelayKind>,
        infer_kind: bool,
    ) -> RelayResult<Self> {
        let text = message
            .message
            .filter(|m| !m.trim().is_empty())
            .or(message.prompt)
            .unwrap_or_default();

        let kind = match (forced, message.kind.as_deref()) {
            (Some(kind), _) => kind,
            (None, Some(raw)) if !raw.trim().is_empty() => RelayKind::parse(raw).ok_or_else(|| {
                RelayError::validation(format!(
                    "unsupported request type '{raw}', expected \"chat\" or \"image\""
                ))
            })?,
            (None, _) if infer_kind => RelayKind::infer(&text),
            (None, _) => {
                return Err(RelayError::validation(
                    "missing request type, expected \"chat\" or \"image\"",
                ))
            }
        };

        Ok(Self { kind, text })
    }
}

/// Normalized relay outcome
///
/// Serializes to the client wire shape: `{"reply"}`, `{"image","uri"}` or
/// `{"error"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RelayResponse {
    Chat {
        reply: String,
    },
    Image {
        #[serde(rename = "image")]
        image_base64: Option<String>,
        #[serde(rename = "uri")]
        image_uri: Option<String>,
    },
    Error {
        #[serde(rename = "error")]
        message: String,
        #[serde(skip)]
        http_status: u16,
    },
}

impl RelayResponse {
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Chat { .. } | Self::Image { .. } => 200,
            Self::Error { http_status, .. } => *http_status,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

impl From<GeneratedImage> for RelayResponse {
    fn from(image: GeneratedImage) -> Self {
        match image {
            GeneratedImage::Base64(data) => Self::Image {
                image_base64: Some(data),
                image_uri: None,
            },
            GeneratedImage::Uri(uri) => Self::Image {
                image_base64: None,
                image_uri: Some(uri),
            },
        }
    }
}

impl From<RelayError> for RelayResponse {
    fn from(err: RelayError) -> Self {
        Self::Error {
            http_status: err.status_code(),
            message: err.to_string(),
        }
    }
}

/// The relay: one chat provider, one image provider, chosen at startup
pub struct Relay {
    chat: Box<dyn ChatProvider>,
    image: Box<dyn ImageProvider>,
    infer_kind: bool,
}

impl Relay {
    pub fn new(chat: Box<dyn ChatProvider>, image: Box<dyn ImageProvider>) -> Self {
        Self {
            chat,
            image,
            infer_kind: false,
        }
    }

    /// Build providers from configuration, sharing one HTTP client
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Internal`] if the HTTP client cannot be built.
    pub fn from_config(config: &RelayConfig) -> RelayResult<Self> {
        let client = UpstreamClient::new(config.request_timeout)?;
        let relay = Self::new(
            build_chat_provider(&config.chat, client.clone()),
            build_image_provider(&config.image, client),
        )
        .with_kind_inference(config.infer_kind);

        log_debug!(
            chat_provider = relay.chat_provider_name(),
            image_provider = relay.image_provider_name(),
            infer_kind = relay.infer_kind,
            "Relay created"
        );

        Ok(relay)
    }

    pub fn with_kind_inference(mut self, infer_kind: bool) -> Self {
        self.infer_kind = infer_kind;
        self
    }

    pub fn chat_provider_name(&self) -> &'static str {
        self.chat.provider_name()
    }

    pub fn image_provider_name(&self) -> &'static str {
        self.image.provider_name()
    }

    /// Normalize an inbound body and relay it
    pub async fn handle_message(
        &self,
        message: InboundMessage,
        forced: Option<RelayKind>,
    ) -> RelayResponse {
        match RelayRequest::from_inbound(message, forced, self.infer_kind) {
            Ok(request) => self.handle(request).await,
            Err(e) => e.into(),
        }
    }

    /// Relay one request; failures become the error variant
    pub async fn handle(&self, request: RelayRequest) -> RelayResponse {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("relay", %request_id, kind = %request.kind);

        async move {
            let started = Instant::now();
            let outcome = self.dispatch(request).await;
            let duration_ms = started.elapsed().as_millis() as u64;

            match outcome {
                Ok(response) => {
                    log_info!(duration_ms = duration_ms, "Relay request succeeded");
                    response
                }
                Err(e) => {
                    let response = RelayResponse::from(e);
                    log_warn!(
                        duration_ms = duration_ms,
                        status = response.http_status(),
                        "Relay request failed"
                    );
                    response
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn dispatch(&self, request: RelayRequest) -> RelayResult<RelayResponse> {
        let text = request.text.trim();
        if text.is_empty() {
            return Err(RelayError::validation("message must not be empty"));
        }

        match request.kind {
            RelayKind::Chat => {
                log_debug!(provider = self.chat.provider_name(), "Dispatching chat request");
                let reply = self.chat.complete(text).await?;
                Ok(RelayResponse::Chat { reply })
            }
            RelayKind::Image => {
                log_debug!(provider = self.image.provider_name(), "Dispatching image request");
                let image = self.image.generate(text).await?;
                Ok(image.into())
            }
        }
    }
}
