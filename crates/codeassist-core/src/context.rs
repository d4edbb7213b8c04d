//! Request context for session derivation.

/// Per-request context handed to session derivation.
///
/// The session token depends only on the account; the context identifies
/// the request for callers and logs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Model the request targets, if known.
    pub model: Option<String>,
}

impl RequestContext {
    /// Create an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context for a model.
    #[must_use]
    pub fn for_model(model: impl Into<String>) -> Self {
        Self {
            model: Some(model.into()),
        }
    }
}
