/// Errors returned by the rule catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// No rule has ever been created under this stable id.
    #[error("rule not found: {stable_id}")]
    RuleNotFound { stable_id: String },

    /// The rule exists but has no version with this number.
    #[error("rule version not found: {stable_id}:{version}")]
    RuleVersionNotFound { stable_id: String, version: u32 },

    /// A create or replace payload failed its shape checks. Nothing was
    /// written.
    #[error("invalid rule: {message}")]
    InvalidRule { message: String },
}

impl CatalogError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        CatalogError::InvalidRule {
            message: message.into(),
        }
    }
}

/// Errors returned by the evaluation proof store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProofError {
    #[error("unknown artifact id '{id}'")]
    ArtifactNotFound { id: String },
}
