//! Onboarding wire types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::TierId;

/// Fixed client markers sent with every onboarding request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientMetadata {
    pub ide_type: String,
    pub platform: String,
    pub plugin_type: String,
}

impl Default for ClientMetadata {
    fn default() -> Self {
        Self {
            ide_type: "IDE_UNSPECIFIED".to_string(),
            platform: "PLATFORM_UNSPECIFIED".to_string(),
            plugin_type: "GEMINI".to_string(),
        }
    }
}

/// `metadata` object of an onboarding request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingMetadata {
    #[serde(flatten)]
    pub client: ClientMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duet_project: Option<String>,
}

/// Body of `POST /v1internal:onboardUser`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingRequest {
    pub tier_id: TierId,
    pub metadata: OnboardingMetadata,
    /// Only set for paid tiers with a known project.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloudaicompanion_project: Option<String>,
}

impl OnboardingRequest {
    /// Build the request body for a tier and optional project.
    #[must_use]
    pub fn build(tier: TierId, project_id: Option<&str>, client: &ClientMetadata) -> Self {
        let project_id = project_id.filter(|p| !p.is_empty()).map(str::to_string);
        let cloudaicompanion_project = if tier.is_free() {
            None
        } else {
            project_id.clone()
        };

        Self {
            tier_id: tier,
            metadata: OnboardingMetadata {
                client: client.clone(),
                duet_project: project_id,
            },
            cloudaicompanion_project,
        }
    }
}

/// Raw onboarding response body.
///
/// Kept as an untyped JSON value: missing or oddly shaped fields mean
/// "not done yet" rather than a decode failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OnboardingResponse(pub Value);

/// Parsed result of a single poll.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OnboardingOutcome {
    pub done: bool,
    pub managed_project_id: Option<String>,
}

impl OnboardingOutcome {
    /// Extract `done` and `response.cloudaicompanionProject.id`.
    #[must_use]
    pub fn from_response(response: &OnboardingResponse) -> Self {
        let body = &response.0;
        let done = body.get("done").and_then(Value::as_bool).unwrap_or(false);
        let managed_project_id = body
            .pointer("/response/cloudaicompanionProject/id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .map(str::to_string);

        Self {
            done,
            managed_project_id,
        }
    }
}
