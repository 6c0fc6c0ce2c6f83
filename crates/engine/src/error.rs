use rulebook_eval::EvalError;
use rulebook_storage::{CatalogError, ProofError};

/// Errors surfaced by the engine's entry points.
///
/// Evaluation, catalog and proof failures pass through unchanged so callers
/// can still tell them apart.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Proof(#[from] ProofError),

    #[error("no regression cases were provided or stored for {stable_id} v{version}")]
    NoRegressionCases { stable_id: String, version: u32 },

    #[error("evaluation request names neither an inline expression nor a stable id")]
    MissingTarget,
}
