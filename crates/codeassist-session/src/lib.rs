//! Per-account session identifiers.
//!
//! Provides:
//! - `SessionIdentityStore` - Memoize one session token per account
//! - `generate_token` / `is_session_token` - Token minting and shape check

pub mod store;
pub mod token;

pub use store::SessionIdentityStore;
pub use token::{generate_token, is_session_token};
