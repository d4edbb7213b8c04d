//! In-memory session identity store.

use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock},
};

use codeassist_core::RequestContext;

use crate::generate_token;

/// Process-lifetime map from account to session token.
///
/// The first derivation for an account mints a token; every later one
/// returns it unchanged until `reset`. Nothing is persisted.
pub struct SessionIdentityStore {
    sessions: RwLock<HashMap<String, String>>,
}

impl SessionIdentityStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Session token for `account_id`, minting one on first use.
    ///
    /// Without an account there is nothing to key on, so every call
    /// returns a fresh token.
    #[must_use]
    pub fn derive_session_id(&self, _ctx: &RequestContext, account_id: Option<&str>) -> String {
        let Some(account) = account_id.filter(|a| !a.is_empty()) else {
            return generate_token();
        };

        if let Some(token) = self
            .sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(account)
        {
            return token.clone();
        }

        // Re-checked under the write lock: racing first calls keep one token.
        let mut sessions = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        sessions
            .entry(account.to_string())
            .or_insert_with(|| {
                tracing::debug!(account = %account, "Minted session token");
                generate_token()
            })
            .clone()
    }

    /// Forget every cached token.
    pub fn reset(&self) {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Whether a token is cached for `account_id`.
    #[must_use]
    pub fn contains(&self, account_id: &str) -> bool {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(account_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SessionIdentityStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashSet, sync::Arc};

    use super::*;
    use crate::is_session_token;

    #[test]
    fn test_same_account_same_token() {
        let store = SessionIdentityStore::new();
        let ctx = RequestContext::new();

        let first = store.derive_session_id(&ctx, Some("a@x.com"));
        let second =
            store.derive_session_id(&RequestContext::for_model("gemini-pro"), Some("a@x.com"));

        assert_eq!(first, second);
        assert!(is_session_token(&first));
    }

    #[test]
    fn test_different_accounts_different_tokens() {
        let store = SessionIdentityStore::new();
        let ctx = RequestContext::new();

        let a = store.derive_session_id(&ctx, Some("a@x.com"));
        let b = store.derive_session_id(&ctx, Some("b@x.com"));

        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_no_account_is_never_cached() {
        let store = SessionIdentityStore::new();
        let ctx = RequestContext::new();

        let first = store.derive_session_id(&ctx, None);
        let second = store.derive_session_id(&ctx, None);
        let empty = store.derive_session_id(&ctx, Some(""));

        assert_ne!(first, second);
        assert!(is_session_token(&empty));
        assert!(store.is_empty());
    }

    #[test]
    fn test_reset_mints_new_token() {
        let store = SessionIdentityStore::new();
        let ctx = RequestContext::new();

        let before = store.derive_session_id(&ctx, Some("a@x.com"));
        store.reset();
        assert!(!store.contains("a@x.com"));

        let after = store.derive_session_id(&ctx, Some("a@x.com"));
        assert_ne!(before, after);
        assert_eq!(store.derive_session_id(&ctx, Some("a@x.com")), after);
    }

    #[test]
    fn test_racing_threads_converge_on_one_token() {
        let store = SessionIdentityStore::new();

        let tokens: Vec<String> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..16)
                .map(|_| {
                    s.spawn(|| store.derive_session_id(&RequestContext::new(), Some("race@x.com")))
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let unique: HashSet<_> = tokens.iter().collect();
        assert_eq!(unique.len(), 1);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_racing_tasks_converge_on_one_token() {
        let store = Arc::new(SessionIdentityStore::new());

        let handles = (0..32).map(|i| {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                let account = if i % 2 == 0 { "even@x.com" } else { "odd@x.com" };
                (account, store.derive_session_id(&RequestContext::new(), Some(account)))
            })
        });
        let results = futures::future::join_all(handles).await;

        let mut by_account: HashMap<&str, HashSet<String>> = HashMap::new();
        for result in results {
            let (account, token) = result.unwrap();
            by_account.entry(account).or_default().insert(token);
        }

        assert_eq!(by_account.len(), 2);
        assert!(by_account.values().all(|tokens| tokens.len() == 1));
        assert_ne!(by_account["even@x.com"], by_account["odd@x.com"]);
    }
}
