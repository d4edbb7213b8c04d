//! Session token format.
//!
//! A token is a hyphenated v4 UUID immediately followed by the current Unix
//! time in milliseconds, with no separator. Downstream caches match on this
//! exact shape.

use std::time::{SystemTime, UNIX_EPOCH};

use uuid::Uuid;

const UUID_LEN: usize = 36;

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

/// Mint a fresh session token.
#[must_use]
pub fn generate_token() -> String {
    format!("{}{}", Uuid::new_v4(), now_millis())
}

/// Whether `token` has the session token shape.
#[must_use]
pub fn is_session_token(token: &str) -> bool {
    if token.len() <= UUID_LEN || !token.is_char_boundary(UUID_LEN) {
        return false;
    }
    let (id, millis) = token.split_at(UUID_LEN);

    let canonical = Uuid::parse_str(id).is_ok_and(|u| u.hyphenated().to_string() == id);
    canonical && millis.bytes().all(|b| b.is_ascii_digit())
}
