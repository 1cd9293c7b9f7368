//! HTTP surface for the chat widget
//!
//! - `POST /api/relay`: kind taken from the body's `type`
//! - `POST /api/chat`, `POST /api/image`: kind fixed by the route
//! - `GET /health`

use crate::error::RelayError;
use crate::relay::{InboundMessage, Relay, RelayKind, RelayResponse};
use axum::{
    body::Bytes,
    extract::State,
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

impl IntoResponse for RelayResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// Router with CORS and request tracing applied
pub fn router(relay: Arc<Relay>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(Duration::from_secs(86_400));

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/relay", post(relay_handler))
        .route("/api/chat", post(chat_handler))
        .route("/api/image", post(image_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(relay)
}

async fn health_handler(State(relay): State<Arc<Relay>>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "chat_provider": relay.chat_provider_name(),
        "image_provider": relay.image_provider_name(),
        "timestamp": Utc::now().to_rfc3339()
    }))
}

async fn relay_handler(State(relay): State<Arc<Relay>>, body: Bytes) -> RelayResponse {
    handle_body(&relay, &body, None).await
}

async fn chat_handler(State(relay): State<Arc<Relay>>, body: Bytes) -> RelayResponse {
    handle_body(&relay, &body, Some(RelayKind::Chat)).await
}

async fn image_handler(State(relay): State<Arc<Relay>>, body: Bytes) -> RelayResponse {
    handle_body(&relay, &body, Some(RelayKind::Image)).await
}

async fn handle_body(relay: &Relay, body: &[u8], forced: Option<RelayKind>) -> RelayResponse {
    match parse_body(body) {
        Ok(message) => relay.handle_message(message, forced).await,
        Err(e) => e.into(),
    }
}

/// Decode the widget's JSON body; malformed input is a validation error
fn parse_body(body: &[u8]) -> Result<InboundMessage, RelayError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(RelayError::validation("request body is empty"));
    }
    serde_json::from_slice(body)
        .map_err(|e| RelayError::validation(format!("invalid JSON body: {e}")))
}
