//! Test helper utilities for unit tests
//!
//! IMPORTANT: These helpers are test-only and should NEVER be used in production code.

use crate::providers::{GeneratedImage, MockChatProvider, MockImageProvider};
use crate::relay::{InboundMessage, Relay};
use std::collections::HashMap;

/// Variable lookup backed by a fixed table
pub fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let table: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| table.get(name).cloned()
}

/// Chat mock that must never be called
pub fn idle_chat() -> MockChatProvider {
    let mut chat = MockChatProvider::new();
    chat.expect_provider_name().return_const("mock-chat");
    chat.expect_complete().never();
    chat
}

/// Image mock that must never be called
pub fn idle_image() -> MockImageProvider {
    let mut image = MockImageProvider::new();
    image.expect_provider_name().return_const("mock-image");
    image.expect_generate().never();
    image
}

/// Chat mock answering exactly once with `reply`
pub fn chat_replying(reply: &'static str) -> MockChatProvider {
    let mut chat = MockChatProvider::new();
    chat.expect_provider_name().return_const("mock-chat");
    chat.expect_complete()
        .times(1)
        .returning(move |_| Ok(reply.to_string()));
    chat
}

/// Image mock answering exactly once with `image`
pub fn image_returning(image: GeneratedImage) -> MockImageProvider {
    let mut mock = MockImageProvider::new();
    mock.expect_provider_name().return_const("mock-image");
    mock.expect_generate()
        .times(1)
        .returning(move |_| Ok(image.clone()));
    mock
}

pub fn relay_with(chat: MockChatProvider, image: MockImageProvider) -> Relay {
    Relay::new(Box::new(chat), Box::new(image))
}

pub fn inbound(message: Option<&str>, kind: Option<&str>) -> InboundMessage {
    InboundMessage {
        message: message.map(String::from),
        prompt: None,
        kind: kind.map(String::from),
    }
}
