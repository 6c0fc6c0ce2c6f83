//! Append-only store of evaluation proof artifacts.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rulebook_eval::{TraceStep, Value};
use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::error::ProofError;
use crate::record::EvaluationProofArtifact;

#[derive(Default)]
struct Index {
    by_id: HashMap<String, Arc<EvaluationProofArtifact>>,
    ordered: Vec<Arc<EvaluationProofArtifact>>,
}

/// Artifacts are shared as `Arc`s and never mutated after insertion.
/// Inputs are copied in, so later changes by the caller don't leak into
/// the record.
pub struct ProofStore {
    index: RwLock<Index>,
    clock: Arc<dyn Clock>,
}

impl Default for ProofStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ProofStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProofStore")
            .field("artifacts", &self.len())
            .finish_non_exhaustive()
    }
}

impl ProofStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        ProofStore {
            index: RwLock::new(Index::default()),
            clock,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Index> {
        self.index.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Index> {
        self.index.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record one evaluation under a fresh random id.
    pub fn record(
        &self,
        stable_id: Option<&str>,
        version: Option<u32>,
        definition: &Value,
        context: &Value,
        result: &Value,
        trace: &[TraceStep],
    ) -> Arc<EvaluationProofArtifact> {
        let artifact = Arc::new(EvaluationProofArtifact {
            id: Uuid::new_v4().to_string(),
            stable_id: stable_id.map(str::to_string),
            version,
            definition: definition.clone(),
            context: context.clone(),
            result: result.clone(),
            trace: trace.to_vec(),
            created_at: self.clock.now(),
        });

        let mut index = self.write();
        index.by_id.insert(artifact.id.clone(), Arc::clone(&artifact));
        index.ordered.push(Arc::clone(&artifact));
        drop(index);

        tracing::debug!(id = %artifact.id, stable_id, version, "evaluation proof recorded");
        artifact
    }

    pub fn get(&self, id: &str) -> Result<Arc<EvaluationProofArtifact>, ProofError> {
        self.read()
            .by_id
            .get(id)
            .cloned()
            .ok_or_else(|| ProofError::ArtifactNotFound { id: id.to_string() })
    }

    /// Artifacts recorded for a rule, in insertion order.
    pub fn list_for_rule(&self, stable_id: &str) -> Vec<Arc<EvaluationProofArtifact>> {
        self.read()
            .ordered
            .iter()
            .filter(|artifact| artifact.stable_id.as_deref() == Some(stable_id))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.read().ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut index = self.write();
        index.by_id.clear();
        index.ordered.clear();
        tracing::debug!("proof store cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record_one(store: &ProofStore, stable_id: Option<&str>) -> Arc<EvaluationProofArtifact> {
        store.record(
            stable_id,
            stable_id.map(|_| 1),
            &Value::from(json!({"var": "x"})),
            &Value::from(json!({"x": 1})),
            &Value::Number(1.0),
            &[],
        )
    }

    #[test]
    fn ids_are_unique_and_resolvable() {
        let store = ProofStore::new();
        let a = record_one(&store, Some("alpha"));
        let b = record_one(&store, Some("alpha"));
        assert_ne!(a.id, b.id);
        assert_eq!(store.get(&b.id).unwrap(), b);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn unknown_id_is_an_error() {
        let store = ProofStore::new();
        assert_eq!(
            store.get("missing").unwrap_err(),
            ProofError::ArtifactNotFound { id: "missing".to_string() }
        );
    }

    #[test]
    fn list_for_rule_skips_ad_hoc_and_other_rules() {
        let store = ProofStore::new();
        let first = record_one(&store, Some("alpha"));
        record_one(&store, None);
        record_one(&store, Some("beta"));
        let second = record_one(&store, Some("alpha"));

        let ids: Vec<_> = store.list_for_rule("alpha").iter().map(|a| a.id.clone()).collect();
        assert_eq!(ids, vec![first.id.clone(), second.id.clone()]);
        assert!(store.list_for_rule("gamma").is_empty());
    }

    #[test]
    fn clear_drops_everything() {
        let store = ProofStore::new();
        let artifact = record_one(&store, None);
        store.clear();
        assert!(store.is_empty());
        assert!(store.get(&artifact.id).is_err());
    }
}
