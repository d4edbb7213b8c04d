//! Core abstractions for Code Assist account provisioning.
//!
//! This crate provides the shared vocabulary:
//! - `TierId` / `TierDescriptor` - Service plans and default-tier selection
//! - `RequestContext` - Per-request context handed to session derivation
//! - `OnboardingRequest` / `OnboardingOutcome` - Onboarding wire types
//! - `OnboardTransport` - Transport seam for the onboarding handshake

pub mod context;
pub mod protocol;
pub mod tier;
pub mod traits;

pub use context::RequestContext;
pub use protocol::{
    ClientMetadata, OnboardingMetadata, OnboardingOutcome, OnboardingRequest, OnboardingResponse,
};
pub use tier::{TierDescriptor, TierId, UnknownTier, default_tier};
pub use traits::{OnboardTransport, TransportError};
