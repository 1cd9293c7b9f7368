//! Test helper utilities for genai-relay integration tests
//!
//! IMPORTANT: These helpers are test-only and should NEVER be used in production code.

// Allow dead code in test utilities - functions are used across different test files
#![allow(dead_code)]

use genai_relay::config::{
    ChatProviderConfig, GeminiConfig, ImageProviderConfig, ImagenConfig, OpenAIConfig,
    OpenAIImageConfig, RawImageConfig, RelayConfig,
};
use genai_relay::Relay;
use std::time::Duration;

pub const GEMINI_KEY: &str = "test-gemini-key";
pub const OPENAI_KEY: &str = "test-openai-key";

/// Smallest valid PNG header plus a few payload bytes, including non-UTF-8 bytes
pub const PNG_BYTES: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0xFF, 0xFE, 0x80, 0x00,
];

pub fn gemini_config(base_url: &str) -> GeminiConfig {
    GeminiConfig {
        api_key: Some(GEMINI_KEY.to_string()),
        base_url: base_url.to_string(),
        default_model: "gemini-test".to_string(),
    }
}

pub fn openai_config(base_url: &str) -> OpenAIConfig {
    OpenAIConfig {
        api_key: Some(OPENAI_KEY.to_string()),
        base_url: base_url.to_string(),
        default_model: "gpt-test".to_string(),
    }
}

pub fn openai_image_config(base_url: &str) -> OpenAIImageConfig {
    OpenAIImageConfig {
        api_key: Some(OPENAI_KEY.to_string()),
        base_url: base_url.to_string(),
        default_model: "image-test".to_string(),
        size: "256x256".to_string(),
    }
}

pub fn imagen_config(base_url: &str) -> ImagenConfig {
    ImagenConfig {
        api_key: Some(GEMINI_KEY.to_string()),
        base_url: base_url.to_string(),
        default_model: "imagen-test".to_string(),
        sample_count: 1,
    }
}

pub fn raw_config(endpoint: &str) -> RawImageConfig {
    RawImageConfig {
        endpoint: Some(endpoint.to_string()),
        ..RawImageConfig::default()
    }
}

/// Config whose chat goes to `chat` and whose image goes to `image`
pub fn relay_config(chat: ChatProviderConfig, image: ImageProviderConfig) -> RelayConfig {
    RelayConfig {
        chat,
        image,
        request_timeout: Duration::from_secs(5),
        infer_kind: false,
    }
}

/// Gemini chat plus raw image, both pointed at the same mock server
pub fn default_relay(server_uri: &str) -> Relay {
    let config = relay_config(
        ChatProviderConfig::Gemini(gemini_config(server_uri)),
        ImageProviderConfig::Raw(raw_config(&format!("{server_uri}/ai/image.php"))),
    );
    Relay::from_config(&config).expect("relay should build")
}

pub fn gemini_reply(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{"content": {"parts": [{"text": text}], "role": "model"}}]
    })
}
