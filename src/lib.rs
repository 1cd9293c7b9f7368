//! # genai-relay
//!
//! HTTP relay between a browser chat widget and generative-AI providers.
//!
//! The widget posts `{ "message": ..., "type": "chat" | "image" }`. The relay
//! forwards the text to the configured chat or image provider and answers
//! with `{ "reply": ... }`, `{ "image": ..., "uri": ... }` or `{ "error": ... }`.
//!
//! ## Key Features
//!
//! - **Pluggable providers**: Gemini, OpenAI and an offline keyword responder
//!   for chat; raw-image endpoints, Imagen, Gemini and OpenAI for images
//! - **Normalized responses**: binary images are base64-inlined, nested
//!   provider replies are flattened to one string
//! - **Bounded calls**: one outbound call per request with a fixed timeout
//!
//! ## Example
//!
//! ```rust,no_run
//! use genai_relay::{Relay, RelayConfig, RelayKind, RelayRequest};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = RelayConfig::from_env()?;
//! let relay = Relay::from_config(&config)?;
//!
//! let response = relay.handle(RelayRequest::new(RelayKind::Chat, "Hello")).await;
//! println!("{}", serde_json::to_string(&response)?);
//! # Ok(())
//! # }
//! ```

// Allow missing errors documentation - errors are self-documenting via type signatures
#![allow(clippy::missing_errors_doc)]

// Logging utilities (re-exports tracing with log_* naming) - internal only
pub(crate) mod logging;

pub mod config;
pub mod error;
pub mod providers;
pub mod relay;
pub mod server;

#[cfg(test)]
pub mod tests;

// Re-export main types
pub use config::{
    ChatProviderConfig, GeminiConfig, ImageProviderConfig, ImagenConfig, OpenAIConfig,
    OpenAIImageConfig, ProviderConfig, RawImageConfig, RelayConfig,
};
pub use error::{RelayError, RelayResult};
pub use providers::{ChatProvider, GeneratedImage, ImageProvider};
pub use relay::{InboundMessage, Relay, RelayKind, RelayRequest, RelayResponse};
pub use server::router;
