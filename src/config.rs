//! Configuration management for the Routewise application
//!
//! Provider credentials and endpoints are read once from the process
//! environment at startup (`.env` supported) and never mutated afterwards.
//! A missing required key is fatal at startup, before any request is
//! accepted; it is never reported as a per-request failure.

use std::env;

use serde::{Deserialize, Serialize};

use crate::error::RoutewiseError;

/// Root configuration for the Routewise application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// TomTom API key, used for geocoding and routing
    pub tomtom_api_key: String,
    /// OpenWeather API key
    pub openweather_api_key: String,
    /// Groq API key, used for advisory generation
    pub groq_api_key: String,
    /// Base URL of the TomTom search/routing APIs
    pub tomtom_base_url: String,
    /// Base URL of the OpenWeather API
    pub weather_base_url: String,
    /// Base URL of the Groq OpenAI-compatible API
    pub advisory_base_url: String,
    /// Chat model used for advisory generation
    pub advisory_model: String,
    /// Country filter applied to geocoding queries (ISO 3166-1 alpha-2)
    pub country_filter: Option<String>,
    /// HTTP port of the API server
    pub port: u16,
}

fn default_tomtom_base_url() -> String {
    "https://api.tomtom.com".to_string()
}

fn default_weather_base_url() -> String {
    "https://api.openweathermap.org".to_string()
}

fn default_advisory_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_advisory_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Required: `TOMTOM_API_KEY`, `OPENWEATHER_API_KEY`, `GROQ_API_KEY`.
    /// Optional overrides use the `ROUTEWISE_` prefix.
    pub fn from_env() -> crate::Result<Self> {
        let config = Self {
            tomtom_api_key: require_env("TOMTOM_API_KEY")?,
            openweather_api_key: require_env("OPENWEATHER_API_KEY")?,
            groq_api_key: require_env("GROQ_API_KEY")?,
            tomtom_base_url: optional_env("ROUTEWISE_TOMTOM_URL")
                .unwrap_or_else(default_tomtom_base_url),
            weather_base_url: optional_env("ROUTEWISE_WEATHER_URL")
                .unwrap_or_else(default_weather_base_url),
            advisory_base_url: optional_env("ROUTEWISE_ADVISORY_URL")
                .unwrap_or_else(default_advisory_base_url),
            advisory_model: optional_env("ROUTEWISE_ADVISORY_MODEL")
                .unwrap_or_else(default_advisory_model),
            country_filter: optional_env("ROUTEWISE_COUNTRY")
                .or_else(|| Some("IN".to_string())),
            port: match optional_env("ROUTEWISE_PORT") {
                Some(raw) => raw.parse().map_err(|_| {
                    RoutewiseError::config(format!("Invalid ROUTEWISE_PORT value: {raw}"))
                })?,
                None => 8080,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> crate::Result<()> {
        for (name, url) in [
            ("TomTom", &self.tomtom_base_url),
            ("weather", &self.weather_base_url),
            ("advisory", &self.advisory_base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(RoutewiseError::config(format!(
                    "{name} base URL must be a valid HTTP or HTTPS URL"
                )));
            }
        }

        if self.advisory_model.is_empty() {
            return Err(RoutewiseError::config("Advisory model cannot be empty"));
        }

        Ok(())
    }
}

fn require_env(name: &str) -> crate::Result<String> {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| RoutewiseError::config(format!("Missing {name} env var")))
}

fn optional_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AppConfig {
        AppConfig {
            tomtom_api_key: "tomtom_test_key".to_string(),
            openweather_api_key: "weather_test_key".to_string(),
            groq_api_key: "groq_test_key".to_string(),
            tomtom_base_url: default_tomtom_base_url(),
            weather_base_url: default_weather_base_url(),
            advisory_base_url: default_advisory_base_url(),
            advisory_model: default_advisory_model(),
            country_filter: Some("IN".to_string()),
            port: 8080,
        }
    }

    #[test]
    fn test_default_urls_validate() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let mut config = test_config();
        config.weather_base_url = "ftp://example.com".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("HTTP or HTTPS URL")
        );
    }

    #[test]
    fn test_empty_model_rejected() {
        let mut config = test_config();
        config.advisory_model = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_required_key_is_config_error() {
        // SAFETY: Test environment, touching a test-only variable
        unsafe {
            env::remove_var("ROUTEWISE_TEST_REQUIRED_KEY");
        }
        let result = require_env("ROUTEWISE_TEST_REQUIRED_KEY");
        assert!(matches!(result, Err(RoutewiseError::Config { .. })));
    }

    #[test]
    fn test_blank_required_key_is_config_error() {
        // SAFETY: Test environment, touching a test-only variable
        unsafe {
            env::set_var("ROUTEWISE_TEST_BLANK_KEY", "   ");
        }
        let result = require_env("ROUTEWISE_TEST_BLANK_KEY");
        // SAFETY: Test cleanup
        unsafe {
            env::remove_var("ROUTEWISE_TEST_BLANK_KEY");
        }
        assert!(matches!(result, Err(RoutewiseError::Config { .. })));
    }
}
