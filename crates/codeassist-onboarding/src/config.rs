//! Onboarding configuration.

use std::{collections::BTreeMap, time::Duration};

use codeassist_core::ClientMetadata;
use serde::Deserialize;
use thiserror::Error;

use crate::PollPolicy;

/// Comma-separated list of endpoint base URLs.
pub const ENV_ENDPOINTS: &str = "CODEASSIST_ENDPOINTS";
/// Polls per endpoint.
pub const ENV_MAX_ATTEMPTS: &str = "CODEASSIST_ONBOARD_MAX_ATTEMPTS";
/// Delay between polls, in milliseconds.
pub const ENV_DELAY_MS: &str = "CODEASSIST_ONBOARD_DELAY_MS";
/// Per-request HTTP timeout, in milliseconds.
pub const ENV_REQUEST_TIMEOUT_MS: &str = "CODEASSIST_REQUEST_TIMEOUT_MS";

const DEFAULT_ENDPOINTS: [&str; 3] = [
    "https://daily-cloudcode-pa.sandbox.googleapis.com",
    "https://autopush-cloudcode-pa.sandbox.googleapis.com",
    "https://cloudcode-pa.googleapis.com",
];

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No onboarding endpoints configured")]
    NoEndpoints,
    #[error("max_attempts must be at least 1")]
    ZeroAttempts,
    #[error("request_timeout_ms must be at least 1")]
    ZeroTimeout,
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
    #[error("Invalid header {name}: {reason}")]
    InvalidHeader { name: String, reason: String },
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[from] reqwest::Error),
}

/// Endpoints, headers and poll policy for onboarding.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OnboardingConfig {
    /// Candidate base URLs, tried in order.
    pub endpoints: Vec<String>,
    /// Product-identifying headers sent with every request.
    pub headers: BTreeMap<String, String>,
    pub client_metadata: ClientMetadata,
    pub max_attempts: u32,
    pub delay_ms: u64,
    pub request_timeout_ms: u64,
}

impl Default for OnboardingConfig {
    fn default() -> Self {
        let client_metadata = ClientMetadata::default();
        let mut headers = BTreeMap::new();
        headers.insert(
            "User-Agent".to_string(),
            "google-api-nodejs-client/9.15.1".to_string(),
        );
        headers.insert(
            "X-Goog-Api-Client".to_string(),
            "google-cloud-sdk vscode_cloudshelleditor/0.1".to_string(),
        );
        headers.insert(
            "Client-Metadata".to_string(),
            serde_json::to_string(&client_metadata).unwrap_or_default(),
        );

        Self {
            endpoints: DEFAULT_ENDPOINTS.iter().map(ToString::to_string).collect(),
            headers,
            client_metadata,
            max_attempts: 10,
            delay_ms: 5000,
            request_timeout_ms: 30_000,
        }
    }
}

impl OnboardingConfig {
    /// Defaults with overrides from the process environment.
    ///
    /// # Errors
    /// Returns error if an override cannot be parsed or the result is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults with overrides from an arbitrary key lookup.
    ///
    /// # Errors
    /// Returns error if an override cannot be parsed or the result is invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_ENDPOINTS) {
            config.endpoints = raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToString::to_string)
                .collect();
        }
        if let Some(raw) = lookup(ENV_MAX_ATTEMPTS) {
            config.max_attempts = parse_number(ENV_MAX_ATTEMPTS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_DELAY_MS) {
            config.delay_ms = parse_number(ENV_DELAY_MS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_REQUEST_TIMEOUT_MS) {
            config.request_timeout_ms = parse_number(ENV_REQUEST_TIMEOUT_MS, &raw)?;
        }

        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Defaults overlaid with the fields present in a JSON document.
    ///
    /// # Errors
    /// Returns error if the JSON is malformed or the result is invalid.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_json::from_str(raw)?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Strip trailing slashes so `{endpoint}/v1internal:...` joins cleanly.
    pub fn normalize(&mut self) {
        for endpoint in &mut self.endpoints {
            let trimmed = endpoint.trim_end_matches('/').len();
            endpoint.truncate(trimmed);
        }
    }

    /// Check the config is usable.
    ///
    /// # Errors
    /// Returns error if there are no endpoints, or `max_attempts` or the
    /// request timeout is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoints.is_empty() {
            return Err(ConfigError::NoEndpoints);
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    #[must_use]
    pub const fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            max_attempts: self.max_attempts,
            delay: Duration::from_millis(self.delay_ms),
        }
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = OnboardingConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.endpoints.len(), 3);
        assert_eq!(config.endpoints[2], "https://cloudcode-pa.googleapis.com");
        assert_eq!(config.poll_policy(), PollPolicy::default());
        assert!(config.headers.contains_key("Client-Metadata"));
    }

    #[test]
    fn test_overrides() {
        let config = OnboardingConfig::from_lookup(lookup(&[
            (ENV_ENDPOINTS, "http://a.test/, http://b.test//,,"),
            (ENV_MAX_ATTEMPTS, "3"),
            (ENV_DELAY_MS, "250"),
        ]))
        .unwrap();

        assert_eq!(config.endpoints, vec!["http://a.test", "http://b.test"]);
        assert_eq!(config.poll_policy().max_attempts, 3);
        assert_eq!(config.poll_policy().delay, Duration::from_millis(250));
    }

    #[test]
    fn test_invalid_overrides() {
        assert!(matches!(
            OnboardingConfig::from_lookup(lookup(&[(ENV_DELAY_MS, "soon")])),
            Err(ConfigError::InvalidValue { key: ENV_DELAY_MS, .. })
        ));
        assert!(matches!(
            OnboardingConfig::from_lookup(lookup(&[(ENV_MAX_ATTEMPTS, "0")])),
            Err(ConfigError::ZeroAttempts)
        ));
        assert!(matches!(
            OnboardingConfig::from_lookup(lookup(&[(ENV_ENDPOINTS, " , ")])),
            Err(ConfigError::NoEndpoints)
        ));
        assert!(matches!(
            OnboardingConfig::from_lookup(lookup(&[(ENV_REQUEST_TIMEOUT_MS, "0")])),
            Err(ConfigError::ZeroTimeout)
        ));
    }

    #[test]
    fn test_from_json_fills_missing_fields_with_defaults() {
        let config = OnboardingConfig::from_json(
            r#"{"endpoints": ["http://a.test/"], "max_attempts": 2, "client_metadata": {"ideType": "VSCODE", "platform": "LINUX", "pluginType": "GEMINI"}}"#,
        )
        .unwrap();

        assert_eq!(config.endpoints, vec!["http://a.test"]);
        assert_eq!(config.max_attempts, 2);
        assert_eq!(config.delay_ms, 5000);
        assert_eq!(config.client_metadata.ide_type, "VSCODE");
        assert!(config.headers.contains_key("User-Agent"));
    }

    #[test]
    fn test_from_json_rejects_bad_input() {
        assert!(matches!(
            OnboardingConfig::from_json("{not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            OnboardingConfig::from_json(r#"{"request_timeout_ms": 0}"#),
            Err(ConfigError::ZeroTimeout)
        ));
    }
}
