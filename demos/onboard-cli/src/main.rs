//! Onboard an account and derive its session token.
//!
//! Run with:
//! `CODEASSIST_TOKEN=... CODEASSIST_TIER=PRO CODEASSIST_PROJECT_ID=my-proj cargo run -p onboard-cli`
//!
//! Endpoints and poll policy can be overridden through the
//! `CODEASSIST_ENDPOINTS`, `CODEASSIST_ONBOARD_MAX_ATTEMPTS` and
//! `CODEASSIST_ONBOARD_DELAY_MS` variables.

use anyhow::Context;
use codeassist_core::{RequestContext, TierId};
use codeassist_onboarding::{HttpTransport, OnboardingConfig, OnboardingCoordinator};
use codeassist_session::SessionIdentityStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let token = std::env::var("CODEASSIST_TOKEN").context("CODEASSIST_TOKEN is not set")?;
    let tier: TierId = std::env::var("CODEASSIST_TIER")
        .unwrap_or_else(|_| "FREE".to_string())
        .parse()?;
    let project_id = std::env::var("CODEASSIST_PROJECT_ID").ok();
    let account = std::env::var("CODEASSIST_ACCOUNT").ok();

    let config = OnboardingConfig::from_env()?;
    let transport = HttpTransport::new(&config)?;
    let coordinator = OnboardingCoordinator::from_config(transport, &config);
    let sessions = SessionIdentityStore::new();

    tracing::info!(%tier, endpoints = config.endpoints.len(), "Starting onboarding");

    match coordinator
        .onboard(&token, tier, project_id.as_deref())
        .await
    {
        Some(project) => println!("managed project: {project}"),
        None => println!("onboarding did not finish"),
    }

    let session_id = sessions.derive_session_id(&RequestContext::new(), account.as_deref());
    println!("session id: {session_id}");

    Ok(())
}
