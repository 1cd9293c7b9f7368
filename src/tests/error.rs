// Unit Tests for Relay Error Handling
//
// UNIT UNDER TEST: RelayError
//
// BUSINESS RESPONSIBILITY:
//   - Maps every failure mode onto the HTTP status the widget receives
//   - Mirrors meaningful upstream statuses instead of flattening them to 500
//   - Keeps upstream error text in the message for diagnosis
//   - Categorizes errors for logging and alerting decisions
//
// TEST COVERAGE:
//   - Status code mapping per variant
//   - Upstream status mirroring and the 500 fallback
//   - Category and severity assignment
//   - Conversion into the normalized error response

use crate::error::{ErrorCategory, ErrorSeverity, RelayError};
use crate::relay::RelayResponse;

#[cfg(test)]
mod status_code_tests {
    use super::*;

    #[test]
    fn test_validation_error_is_bad_request() {
        let error = RelayError::validation("missing request type");

        assert_eq!(error.status_code(), 400);
        assert_eq!(error.category(), ErrorCategory::Client);
        assert_eq!(error.severity(), ErrorSeverity::Info);
    }

    #[test]
    fn test_configuration_error_is_internal_server_error() {
        let error = RelayError::configuration_error("GEMINI_API_KEY is not set");

        assert_eq!(error.status_code(), 500);
        assert_eq!(error.category(), ErrorCategory::Internal);
        assert!(error.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_upstream_error_mirrors_provider_status() {
        // A 503 from the provider must reach the client as 503
        let error = RelayError::upstream(Some(503), "upstream returned 503: overloaded");

        assert_eq!(error.status_code(), 503);
        assert_eq!(error.category(), ErrorCategory::External);
        assert!(error.to_string().contains("overloaded"));
    }

    #[test]
    fn test_upstream_error_mirrors_client_errors_too() {
        let error = RelayError::upstream(Some(401), "upstream returned 401: bad key");

        assert_eq!(error.status_code(), 401);
    }

    #[test]
    fn test_upstream_error_without_status_is_500() {
        let error = RelayError::upstream(None, "no image data in provider response");

        assert_eq!(error.status_code(), 500);
    }

    #[test]
    fn test_upstream_error_with_success_status_is_500() {
        // A 2xx with unusable data is still a failure for the client
        let error = RelayError::upstream(Some(200), "no reply text");

        assert_eq!(error.status_code(), 500);
    }

    #[test]
    fn test_timeout_is_gateway_timeout() {
        let error = RelayError::timeout(30);

        assert_eq!(error.status_code(), 504);
        assert_eq!(error.category(), ErrorCategory::Transient);
        assert_eq!(error.severity(), ErrorSeverity::Warning);
        assert_eq!(error.to_string(), "Upstream timed out after 30s");
    }

    #[test]
    fn test_internal_error_keeps_source() {
        let source = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let error = RelayError::internal("Invalid JSON from gemini", Some(Box::new(source)));

        assert_eq!(error.status_code(), 500);
        assert!(std::error::Error::source(&error).is_some());
    }
}

#[cfg(test)]
mod response_conversion_tests {
    use super::*;

    #[test]
    fn test_error_converts_to_error_response() {
        let response = RelayResponse::from(RelayError::upstream(Some(503), "upstream returned 503: busy"));

        match &response {
            RelayResponse::Error {
                message,
                http_status,
            } => {
                assert_eq!(*http_status, 503);
                assert!(message.contains("busy"));
            }
            other => panic!("expected error response, got {other:?}"),
        }
        assert!(response.is_error());
    }

    #[test]
    fn test_error_response_serializes_to_error_field_only() {
        let response = RelayResponse::from(RelayError::validation("message must not be empty"));

        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"error": "Invalid request: message must not be empty"})
        );
    }
}
