//! Error types for relay operations.
//!
//! Every failure a relay invocation can hit is a [`RelayError`]. The relay
//! boundary turns each one into a normalized `{ "error": ... }` response using
//! [`RelayError::status_code`], so no error ever reaches the transport layer
//! as a raw failure.
//!
//! # Error Types
//!
//! - Validation errors (missing or unknown request kind, empty text)
//! - Configuration errors (missing API key, missing endpoint)
//! - Upstream errors (non-2xx provider status, response without usable data)
//! - Timeouts (provider did not answer within the configured bound)
//! - Internal errors (network failures, malformed JSON)
//!
//! # Example
//!
//! ```rust
//! use genai_relay::RelayError;
//!
//! let err = RelayError::upstream(Some(503), "upstream returned 503: overloaded");
//! assert_eq!(err.status_code(), 503);
//! assert!(err.to_string().contains("overloaded"));
//! ```

use crate::logging::{log_error, log_info, log_warn};
use thiserror::Error;

// ============================================================================
// Error categorization types
// ============================================================================

/// High-level categorization of errors for routing and handling decisions.
///
/// Use [`RelayError::category()`] to get the category for any error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The caller sent something the relay cannot act on.
    Client,

    /// The provider failed or answered with something unusable.
    External,

    /// The relay itself is misconfigured or hit an unexpected failure.
    Internal,

    /// Temporary failures such as timeouts.
    Transient,
}

/// Severity level for logging and alerting decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Action failed and should be investigated.
    Error,

    /// Unexpected but recoverable situation.
    Warning,

    /// Expected failure (e.g., validation error).
    Info,
}

// ============================================================================
// Relay Error types
// ============================================================================

/// Convenient result type for relay operations.
pub type RelayResult<T> = std::result::Result<T, RelayError>;

/// Errors that can occur while relaying a request.
///
/// | Variant | HTTP | Category |
/// |---------|------|----------|
/// | `Validation` | 400 | Client |
/// | `Configuration` | 500 | Internal |
/// | `Upstream` | provider status or 500 | External |
/// | `Timeout` | 504 | Transient |
/// | `Internal` | 500 | Internal |
///
/// Use the constructor methods, which log the error at the matching level.
#[derive(Error, Debug)]
pub enum RelayError {
    /// The inbound request was rejected before any outbound call.
    #[error("Invalid request: {message}")]
    Validation {
        /// What was wrong with the request.
        message: String,
    },

    /// A required setting (usually a credential) is missing or invalid.
    ///
    /// The message names the setting, never its value.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration problem.
        message: String,
    },

    /// The provider answered with a failure status or without usable data.
    #[error("Upstream error: {message}")]
    Upstream {
        /// Status returned by the provider, if it returned one.
        status: Option<u16>,
        /// Provider error text or a description of the missing data.
        message: String,
    },

    /// The provider did not respond within the configured timeout.
    #[error("Upstream timed out after {timeout_seconds}s")]
    Timeout {
        /// The timeout that was exceeded.
        timeout_seconds: u64,
    },

    /// Network failures, malformed provider JSON and other unexpected errors.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the failure.
        message: String,
        /// The underlying error, if available.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl RelayError {
    /// Get the error category for routing and handling decisions.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation { .. } => ErrorCategory::Client,
            Self::Configuration { .. } => ErrorCategory::Internal,
            Self::Upstream { .. } => ErrorCategory::External,
            Self::Timeout { .. } => ErrorCategory::Transient,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Get the error severity for logging and alerting.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Validation { .. } => ErrorSeverity::Info,
            Self::Configuration { .. } => ErrorSeverity::Error,
            Self::Upstream { .. } => ErrorSeverity::Error,
            Self::Timeout { .. } => ErrorSeverity::Warning,
            Self::Internal { .. } => ErrorSeverity::Error,
        }
    }

    /// HTTP status the client receives for this error.
    ///
    /// Upstream failures mirror the provider's status when it is itself a
    /// client or server error; anything else (a 2xx body with no data, a
    /// missing status) becomes 500.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::Configuration { .. } => 500,
            Self::Upstream {
                status: Some(status),
                ..
            } if (400..=599).contains(status) => *status,
            Self::Upstream { .. } => 500,
            Self::Timeout { .. } => 504,
            Self::Internal { .. } => 500,
        }
    }

    // =========================================================================
    // Constructor methods with automatic logging
    // =========================================================================

    pub fn validation(message: impl Into<String>) -> Self {
        let message = message.into();
        log_info!(
            error_type = "validation",
            message = %message,
            "Relay request rejected"
        );
        Self::Validation { message }
    }

    pub fn configuration_error(message: impl Into<String>) -> Self {
        let message = message.into();
        log_error!(
            error_type = "configuration_error",
            message = %message,
            "Relay configuration invalid"
        );
        Self::Configuration { message }
    }

    pub fn upstream(status: Option<u16>, message: impl Into<String>) -> Self {
        let message = message.into();
        log_error!(
            error_type = "upstream_error",
            status = ?status,
            message = %message,
            "Provider request failed"
        );
        Self::Upstream { status, message }
    }

    pub fn timeout(timeout_seconds: u64) -> Self {
        log_warn!(
            error_type = "timeout",
            timeout_seconds = timeout_seconds,
            "Provider request timed out"
        );
        Self::Timeout { timeout_seconds }
    }

    pub fn internal(
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        let message = message.into();
        log_error!(
            error_type = "internal_error",
            message = %message,
            has_source = source.is_some(),
            "Relay internal failure"
        );
        Self::Internal { message, source }
    }

    /// Response with status but no image or reply payload.
    pub(crate) fn no_image_data() -> Self {
        Self::upstream(None, "no image data in provider response")
    }
}
