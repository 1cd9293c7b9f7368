//! Shared outbound HTTP client
//!
//! Every provider goes through [`UpstreamClient`], which owns the pooled
//! `reqwest::Client`, applies the relay timeout and maps transport failures
//! and non-2xx answers onto [`RelayError`]. There is no retry layer: one
//! failed call is a terminal failure for that request.

use crate::error::{RelayError, RelayResult};
use crate::logging::{log_debug, log_error};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::{Duration, Instant};

/// Body and content type of a successful non-JSON call
#[derive(Debug, Clone)]
pub struct RawBody {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

impl RawBody {
    /// Whether the provider labelled the body as JSON
    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| ct.to_ascii_lowercase().contains("json"))
            .unwrap_or(false)
    }

    /// Whether the body may hold image bytes: `image/*`, octet-stream or unlabelled
    pub fn is_image(&self) -> bool {
        match self.content_type.as_deref() {
            None => true,
            Some(ct) => {
                let ct = ct.trim().to_ascii_lowercase();
                ct.starts_with("image/") || ct.starts_with("application/octet-stream")
            }
        }
    }
}

/// HTTP client shared by all providers
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl UpstreamClient {
    /// Create a client whose calls fail with [`RelayError::Timeout`] after `timeout`
    pub fn new(timeout: Duration) -> RelayResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                RelayError::internal(format!("Failed to build HTTP client: {e}"), Some(Box::new(e)))
            })?;

        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Bearer authentication headers for OpenAI-style APIs
    pub fn build_auth_headers(api_key: &str) -> RelayResult<HeaderMap> {
        let mut headers = HeaderMap::new();

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|e| {
                RelayError::configuration_error(format!("Invalid API key format: {e}"))
            })?,
        );

        Ok(headers)
    }

    /// POST a JSON body and decode the JSON answer
    ///
    /// `query` carries query-string credentials (Gemini's `key=`). `url` is
    /// logged, so it must never contain a credential itself.
    pub async fn post_json<B, R>(
        &self,
        provider: &'static str,
        url: &str,
        query: &[(&str, &str)],
        headers: HeaderMap,
        body: &B,
    ) -> RelayResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        log_debug!(provider = provider, url = %url, "Sending provider request");

        let started = Instant::now();
        let response = self
            .client
            .post(url)
            .query(query)
            .headers(headers)
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_send_error(provider, url, e))?;

        if !response.status().is_success() {
            return Err(handle_error_response(provider, response).await);
        }

        let raw_body = response.text().await.map_err(|e| self.map_send_error(provider, url, e))?;

        log_debug!(
            provider = provider,
            duration_ms = started.elapsed().as_millis() as u64,
            body_len = raw_body.len(),
            "Provider responded"
        );

        serde_json::from_str(&raw_body).map_err(|e| {
            log_error!(
                provider = provider,
                error = %e,
                raw_body = %raw_body,
                "Failed to parse provider response"
            );
            RelayError::internal(format!("Invalid JSON from {provider}: {e}"), Some(Box::new(e)))
        })
    }

    /// GET a URL and return the body untouched
    pub async fn get_raw(&self, provider: &'static str, url: &str) -> RelayResult<RawBody> {
        log_debug!(provider = provider, url = %url, "Sending provider request");

        let started = Instant::now();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_send_error(provider, url, e))?;

        if !response.status().is_success() {
            return Err(handle_error_response(provider, response).await);
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.map_send_error(provider, url, e))?
            .to_vec();

        log_debug!(
            provider = provider,
            duration_ms = started.elapsed().as_millis() as u64,
            body_len = bytes.len(),
            content_type = ?content_type,
            "Provider responded"
        );

        Ok(RawBody {
            bytes,
            content_type,
        })
    }

    fn map_send_error(&self, provider: &'static str, url: &str, e: reqwest::Error) -> RelayError {
        // reqwest's Display includes the full URL, and Gemini's carries `key=`
        let e = e.without_url();
        if e.is_timeout() {
            return RelayError::timeout(self.timeout.as_secs_f64().ceil() as u64);
        }

        log_error!(
            provider = provider,
            url = %url,
            error = %e,
            "HTTP request failed"
        );
        RelayError::internal(format!("Request to {provider} failed: {e}"), Some(Box::new(e)))
    }
}

/// Turn a non-success response into an upstream error carrying status and raw text
async fn handle_error_response(provider: &'static str, response: reqwest::Response) -> RelayError {
    let status = response.status();
    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    log_error!(
        provider = provider,
        status = %status,
        error_text = %error_text,
        "API error response"
    );

    RelayError::upstream(
        Some(status.as_u16()),
        format!("upstream returned {}: {}", status.as_u16(), error_text),
    )
}
