//! Managed-project onboarding for Code Assist accounts.
//!
//! Provides:
//! - `OnboardingCoordinator` - Poll `onboardUser` across candidate endpoints
//! - `HttpTransport` - reqwest-backed `OnboardTransport`
//! - `OnboardingConfig` - Endpoints, headers and poll policy

pub mod client;
pub mod config;
pub mod coordinator;

pub use client::HttpTransport;
pub use config::{ConfigError, OnboardingConfig};
pub use coordinator::{AttemptOutcome, OnboardingCoordinator, PollPolicy};
