//! HTTP transport for the onboarding handshake.

use async_trait::async_trait;
use codeassist_core::{OnboardTransport, OnboardingRequest, OnboardingResponse, TransportError};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};

use crate::{ConfigError, OnboardingConfig};

const ONBOARD_PATH: &str = "/v1internal:onboardUser";

/// reqwest-backed onboarding transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport carrying the configured product headers and timeout.
    ///
    /// # Errors
    /// Returns error if a header is invalid or the client cannot be built.
    pub fn new(config: &OnboardingConfig) -> Result<Self, ConfigError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let header_name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|e| ConfigError::InvalidHeader {
                    name: name.clone(),
                    reason: e.to_string(),
                })?;
            let header_value =
                HeaderValue::from_str(value).map_err(|e| ConfigError::InvalidHeader {
                    name: name.clone(),
                    reason: e.to_string(),
                })?;
            headers.insert(header_name, header_value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self { client })
    }

    /// Wrap an existing client.
    #[must_use]
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl OnboardTransport for HttpTransport {
    async fn onboard_user(
        &self,
        endpoint: &str,
        token: &str,
        request: &OnboardingRequest,
    ) -> Result<OnboardingResponse, TransportError> {
        let url = format!("{}{ONBOARD_PATH}", endpoint.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = error_body(response.text().await);
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<OnboardingResponse>()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))
    }
}

/// Body of a failed response, or why it could not be read.
fn error_body<E: std::fmt::Display>(body: Result<String, E>) -> String {
    body.unwrap_or_else(|e| format!("<unreadable body: {e}>"))
}
