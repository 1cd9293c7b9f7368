// Unit Tests for Relay Configuration
//
// UNIT UNDER TEST: RelayConfig
//
// BUSINESS RESPONSIBILITY:
//   - Selects chat and image providers from environment variables
//   - Applies defaults for endpoints, models and timeouts
//   - Defers missing credentials to request time instead of failing startup
//   - Rejects unknown provider names and malformed settings
//
// TEST COVERAGE:
//   - Default provider selection with an empty environment
//   - Each provider name and its variables
//   - Fallback target list parsing
//   - Timeout and kind-inference parsing
//   - Validation messages that name the variable, never the value

use crate::config::{
    ChatProviderConfig, ImageProviderConfig, ProviderConfig, RelayConfig, DEFAULT_TIMEOUT,
    GEMINI_BASE_URL, GEMINI_CHAT_MODEL, IMAGEN_MODEL,
};
use crate::error::RelayError;
use crate::tests::helpers::vars;
use std::time::Duration;

#[cfg(test)]
mod provider_selection_tests {
    use super::*;

    #[test]
    fn test_empty_environment_uses_defaults() {
        // Arrange & Act
        let config = RelayConfig::from_vars(vars(&[])).unwrap();

        // Assert
        match &config.chat {
            ChatProviderConfig::Gemini(gemini) => {
                assert_eq!(gemini.base_url, GEMINI_BASE_URL);
                assert_eq!(gemini.default_model, GEMINI_CHAT_MODEL);
                assert!(gemini.api_key.is_none());
            }
            other => panic!("expected gemini chat provider, got {other:?}"),
        }
        match &config.image {
            ImageProviderConfig::Raw(raw) => {
                assert!(raw.endpoint.is_none());
                assert_eq!(raw.quality, "high");
                assert_eq!(raw.size, "512x512");
                assert!(raw.fallback_targets.is_empty());
            }
            other => panic!("expected raw image provider, got {other:?}"),
        }
        assert_eq!(config.request_timeout, DEFAULT_TIMEOUT);
        assert!(!config.infer_kind);
    }

    #[test]
    fn test_missing_credentials_do_not_fail_loading() {
        // Credentials are checked per request so the server can still start
        let config = RelayConfig::from_vars(vars(&[("CHAT_PROVIDER", "openai")])).unwrap();

        let err = config.chat.validate().unwrap_err();

        assert!(matches!(err, RelayError::Configuration { .. }));
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_gemini_chat_reads_key_and_model() {
        let config = RelayConfig::from_vars(vars(&[
            ("GEMINI_API_KEY", "secret-gemini"),
            ("GEMINI_MODEL", "gemini-test"),
            ("GEMINI_BASE_URL", "http://localhost:9000"),
        ]))
        .unwrap();

        let ChatProviderConfig::Gemini(gemini) = &config.chat else {
            panic!("expected gemini chat provider");
        };
        assert_eq!(gemini.api_key(), Some("secret-gemini"));
        assert_eq!(gemini.model(), Some("gemini-test"));
        assert_eq!(gemini.base_url(), "http://localhost:9000");
        assert!(config.chat.validate().is_ok());
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let config = RelayConfig::from_vars(vars(&[("GEMINI_API_KEY", "   ")])).unwrap();

        assert!(config.chat.validate().is_err());
    }

    #[test]
    fn test_canned_chat_needs_no_credentials() {
        let config = RelayConfig::from_vars(vars(&[("CHAT_PROVIDER", "canned")])).unwrap();

        assert!(matches!(config.chat, ChatProviderConfig::Canned));
        assert_eq!(config.chat.provider_name(), "canned");
        assert!(config.chat.validate().is_ok());
    }

    #[test]
    fn test_provider_names_are_case_insensitive() {
        let config = RelayConfig::from_vars(vars(&[
            ("CHAT_PROVIDER", "OpenAI"),
            ("IMAGE_PROVIDER", "IMAGEN"),
        ]))
        .unwrap();

        assert_eq!(config.chat.provider_name(), "openai");
        assert_eq!(config.image.provider_name(), "imagen");
    }

    #[test]
    fn test_imagen_shares_gemini_key() {
        let config = RelayConfig::from_vars(vars(&[
            ("IMAGE_PROVIDER", "imagen"),
            ("GEMINI_API_KEY", "secret-gemini"),
        ]))
        .unwrap();

        let ImageProviderConfig::Imagen(imagen) = &config.image else {
            panic!("expected imagen image provider");
        };
        assert_eq!(imagen.api_key(), Some("secret-gemini"));
        assert_eq!(imagen.default_model, IMAGEN_MODEL);
        assert_eq!(imagen.sample_count, 1);
    }

    #[test]
    fn test_openai_image_reads_model_and_size() {
        let config = RelayConfig::from_vars(vars(&[
            ("IMAGE_PROVIDER", "openai"),
            ("OPENAI_API_KEY", "secret-openai"),
            ("OPENAI_IMAGE_MODEL", "gpt-image-1"),
            ("OPENAI_IMAGE_SIZE", "512x512"),
        ]))
        .unwrap();

        let ImageProviderConfig::OpenAI(openai) = &config.image else {
            panic!("expected openai image provider");
        };
        assert_eq!(openai.default_model, "gpt-image-1");
        assert_eq!(openai.size, "512x512");
        assert!(config.image.validate().is_ok());
    }

    #[test]
    fn test_raw_image_requires_endpoint() {
        let config = RelayConfig::from_vars(vars(&[])).unwrap();

        let err = config.image.validate().unwrap_err();

        assert!(err.to_string().contains("RAW_IMAGE_URL"));
    }

    #[test]
    fn test_raw_image_parses_fallback_targets_in_order() {
        let config = RelayConfig::from_vars(vars(&[
            ("RAW_IMAGE_URL", "http://images.local/ai/image.php"),
            ("RAW_IMAGE_PROXIES", " https://a.example/?url= , ,https://b.example/? "),
            ("RAW_IMAGE_QUALITY", "medium"),
        ]))
        .unwrap();

        let ImageProviderConfig::Raw(raw) = &config.image else {
            panic!("expected raw image provider");
        };
        assert_eq!(
            raw.fallback_targets,
            vec!["https://a.example/?url=".to_string(), "https://b.example/?".to_string()]
        );
        assert_eq!(raw.quality, "medium");
        assert_eq!(raw.base_url(), "http://images.local/ai/image.php");
        assert_eq!(raw.model(), None);
    }

    #[test]
    fn test_unknown_chat_provider_is_rejected() {
        let err = RelayConfig::from_vars(vars(&[("CHAT_PROVIDER", "claude")])).unwrap_err();

        assert!(matches!(err, RelayError::Configuration { .. }));
        assert!(err.to_string().contains("claude"));
    }

    #[test]
    fn test_unknown_image_provider_is_rejected() {
        let err = RelayConfig::from_vars(vars(&[("IMAGE_PROVIDER", "midjourney")])).unwrap_err();

        assert!(err.to_string().contains("midjourney"));
    }
}

#[cfg(test)]
mod relay_settings_tests {
    use super::*;

    #[test]
    fn test_timeout_override() {
        let config = RelayConfig::from_vars(vars(&[("RELAY_TIMEOUT_SECS", "5")])).unwrap();

        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_timeout_is_rejected() {
        assert!(RelayConfig::from_vars(vars(&[("RELAY_TIMEOUT_SECS", "soon")])).is_err());
        assert!(RelayConfig::from_vars(vars(&[("RELAY_TIMEOUT_SECS", "0")])).is_err());
    }

    #[test]
    fn test_infer_kind_flag_values() {
        for (raw, expected) in [("true", true), ("1", true), ("yes", true), ("false", false), ("off", false)] {
            let config = RelayConfig::from_vars(vars(&[("RELAY_INFER_KIND", raw)])).unwrap();
            assert_eq!(config.infer_kind, expected, "RELAY_INFER_KIND={raw}");
        }
    }

    #[test]
    fn test_invalid_infer_kind_is_rejected() {
        assert!(RelayConfig::from_vars(vars(&[("RELAY_INFER_KIND", "maybe")])).is_err());
    }
}

#[cfg(test)]
mod from_env_tests {
    use super::*;
    use serial_test::serial;

    const RELAY_VARS: &[&str] = &[
        "CHAT_PROVIDER",
        "IMAGE_PROVIDER",
        "GEMINI_API_KEY",
        "OPENAI_API_KEY",
        "RAW_IMAGE_URL",
        "RAW_IMAGE_PROXIES",
        "RELAY_TIMEOUT_SECS",
        "RELAY_INFER_KIND",
    ];

    fn clear_relay_vars() {
        for name in RELAY_VARS {
            std::env::remove_var(name);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_reads_process_environment() {
        clear_relay_vars();
        std::env::set_var("CHAT_PROVIDER", "openai");
        std::env::set_var("OPENAI_API_KEY", "env-openai-key");
        std::env::set_var("RAW_IMAGE_URL", "https://images.example/ai/image.php");
        std::env::set_var("RELAY_TIMEOUT_SECS", "12");

        let config = RelayConfig::from_env().expect("Should load config from environment");

        match &config.chat {
            ChatProviderConfig::OpenAI(openai) => {
                assert_eq!(openai.api_key.as_deref(), Some("env-openai-key"));
            }
            other => panic!("expected OpenAI chat config, got {other:?}"),
        }
        assert!(config.image.validate().is_ok());
        assert_eq!(config.request_timeout, Duration::from_secs(12));

        clear_relay_vars();
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_unknown_image_provider() {
        clear_relay_vars();
        std::env::set_var("IMAGE_PROVIDER", "midjourney");

        let err = RelayConfig::from_env().unwrap_err();

        assert!(err.to_string().contains("midjourney"));

        clear_relay_vars();
    }
}
