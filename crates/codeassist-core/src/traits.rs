//! Transport seam for the onboarding handshake.

use async_trait::async_trait;
use thiserror::Error;

use crate::{OnboardingRequest, OnboardingResponse};

/// Transport error.
///
/// Every variant is treated the same by the coordinator: the endpoint is
/// abandoned and the next one is tried.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Request failed: {0}")]
    Request(String),
    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

/// Trait for submitting onboarding requests.
#[async_trait]
pub trait OnboardTransport: Send + Sync {
    /// Submit one onboarding poll to `{endpoint}/v1internal:onboardUser`.
    ///
    /// # Errors
    /// Returns error on network failure, non-success status or an undecodable body.
    async fn onboard_user(
        &self,
        endpoint: &str,
        token: &str,
        request: &OnboardingRequest,
    ) -> Result<OnboardingResponse, TransportError>;
}
