//! Onboarding coordinator.
//!
//! Drives `onboardUser` against an ordered list of candidate endpoints until
//! the backend reports completion or every endpoint is exhausted. Endpoints and
//! attempts are strictly sequential so the first completion wins.

use std::time::Duration;

use codeassist_core::{
    ClientMetadata, OnboardTransport, OnboardingOutcome, OnboardingRequest, TierId,
};
use tracing::{debug, info, warn};

use crate::OnboardingConfig;

/// How often and how many times a single endpoint is polled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Polls per endpoint (values below 1 are treated as 1).
    pub max_attempts: u32,
    /// Wait between polls of the same endpoint.
    pub delay: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            delay: Duration::from_millis(5000),
        }
    }
}

/// Result of a single poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Onboarding finished; stop everything.
    Complete(String),
    /// Not finished yet; poll the same endpoint again.
    Pending,
    /// Transport failed; move to the next endpoint.
    Abandon,
}

impl AttemptOutcome {
    /// Decide what a successfully decoded poll means.
    ///
    /// A managed project id always wins over the caller's own project.
    #[must_use]
    pub fn classify(outcome: OnboardingOutcome, project_id: Option<&str>) -> Self {
        if !outcome.done {
            return Self::Pending;
        }
        if let Some(id) = outcome.managed_project_id {
            return Self::Complete(id);
        }
        match project_id.filter(|p| !p.is_empty()) {
            Some(project) => {
                warn!(
                    project_id = %project,
                    "Onboarding done without a managed project, using caller project"
                );
                Self::Complete(project.to_string())
            }
            None => Self::Pending,
        }
    }
}

/// Provisions a managed project through the onboarding handshake.
pub struct OnboardingCoordinator<T: OnboardTransport> {
    transport: T,
    endpoints: Vec<String>,
    client_metadata: ClientMetadata,
    policy: PollPolicy,
}

impl<T: OnboardTransport> OnboardingCoordinator<T> {
    /// Create a coordinator with the default poll policy.
    #[must_use]
    pub fn new<I, S>(transport: T, endpoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            transport,
            endpoints: endpoints.into_iter().map(Into::into).collect(),
            client_metadata: ClientMetadata::default(),
            policy: PollPolicy::default(),
        }
    }

    /// Create a coordinator from configuration.
    #[must_use]
    pub fn from_config(transport: T, config: &OnboardingConfig) -> Self {
        Self::new(transport, config.endpoints.iter().cloned())
            .with_policy(config.poll_policy())
            .with_client_metadata(config.client_metadata.clone())
    }

    /// Override the poll policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Override the client markers sent in request metadata.
    #[must_use]
    pub fn with_client_metadata(mut self, client_metadata: ClientMetadata) -> Self {
        self.client_metadata = client_metadata;
        self
    }

    #[must_use]
    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }

    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Onboard with the configured poll policy.
    ///
    /// Returns the managed project id, or `None` if no endpoint completed.
    pub async fn onboard(
        &self,
        token: &str,
        tier: TierId,
        project_id: Option<&str>,
    ) -> Option<String> {
        self.onboard_with(token, tier, project_id, self.policy).await
    }

    /// Onboard with an explicit poll policy.
    ///
    /// Failures never propagate: a transport error abandons the current
    /// endpoint, and exhausting every endpoint yields `None`.
    pub async fn onboard_with(
        &self,
        token: &str,
        tier: TierId,
        project_id: Option<&str>,
        policy: PollPolicy,
    ) -> Option<String> {
        let max_attempts = policy.max_attempts.max(1);
        let request = OnboardingRequest::build(tier, project_id, &self.client_metadata);

        for endpoint in &self.endpoints {
            for attempt in 1..=max_attempts {
                match self.poll(endpoint, token, &request, project_id, attempt).await {
                    AttemptOutcome::Complete(id) => {
                        info!(%endpoint, attempt, managed_project_id = %id, "Onboarding complete");
                        return Some(id);
                    }
                    AttemptOutcome::Abandon => break,
                    AttemptOutcome::Pending => {
                        debug!(%endpoint, attempt, max_attempts, "Onboarding not done yet");
                        if attempt < max_attempts && !policy.delay.is_zero() {
                            tokio::time::sleep(policy.delay).await;
                        }
                    }
                }
            }
        }

        warn!(
            endpoints = self.endpoints.len(),
            max_attempts,
            %tier,
            "Onboarding did not complete on any endpoint"
        );
        None
    }

    async fn poll(
        &self,
        endpoint: &str,
        token: &str,
        request: &OnboardingRequest,
        project_id: Option<&str>,
        attempt: u32,
    ) -> AttemptOutcome {
        match self.transport.onboard_user(endpoint, token, request).await {
            Ok(response) => {
                AttemptOutcome::classify(OnboardingOutcome::from_response(&response), project_id)
            }
            Err(e) => {
                warn!(%endpoint, attempt, error = %e, "Onboarding request failed, trying next endpoint");
                AttemptOutcome::Abandon
            }
        }
    }
}
