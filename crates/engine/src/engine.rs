//! The composed engine: one catalog and one proof store, shared.

use std::sync::Arc;

use rulebook_eval::validate;
use rulebook_storage::{EvaluationProofArtifact, NewRuleVersion, ProofStore, RuleCatalog, RuleVersion};

use crate::error::EngineError;

/// Owns the catalog and proof store that every evaluation goes through.
///
/// Cloning is cheap and clones share state, so one engine can be handed to
/// any number of threads.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    catalog: Arc<RuleCatalog>,
    proofs: Arc<ProofStore>,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stores(catalog: Arc<RuleCatalog>, proofs: Arc<ProofStore>) -> Self {
        Engine { catalog, proofs }
    }

    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    pub fn proofs(&self) -> &ProofStore {
        &self.proofs
    }

    /// Create the next version of a rule after checking that its definition
    /// is structurally sound. Rejected payloads leave the catalog untouched.
    pub fn create_rule(&self, payload: NewRuleVersion) -> Result<RuleVersion, EngineError> {
        payload.check()?;
        validate(&payload.definition)?;
        Ok(self.catalog.create_version(payload)?)
    }

    pub fn proof(&self, id: &str) -> Result<Arc<EvaluationProofArtifact>, EngineError> {
        Ok(self.proofs.get(id)?)
    }
}
