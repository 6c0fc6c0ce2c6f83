//! Recorded evaluation of inline expressions or catalog rules.

use rulebook_eval::{evaluate, TraceStep, Value};
use rulebook_storage::EvaluationProof;
use serde::{Deserialize, Serialize};

use crate::engine::Engine;
use crate::error::EngineError;

/// What to evaluate and against which context.
///
/// An inline `logic` expression takes precedence; otherwise `stable_id`
/// (with the optional `version` and `prefer_latest`) selects a catalog rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    #[serde(default)]
    pub logic: Option<Value>,
    #[serde(default)]
    pub stable_id: Option<String>,
    #[serde(default)]
    pub version: Option<u32>,
    #[serde(default = "Value::empty_object")]
    pub context: Value,
    #[serde(default)]
    pub prefer_latest: bool,
}

impl EvaluationRequest {
    pub fn inline(logic: Value, context: Value) -> Self {
        EvaluationRequest {
            logic: Some(logic),
            stable_id: None,
            version: None,
            context,
            prefer_latest: false,
        }
    }

    pub fn rule(stable_id: impl Into<String>, context: Value) -> Self {
        EvaluationRequest {
            logic: None,
            stable_id: Some(stable_id.into()),
            version: None,
            context,
            prefer_latest: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResponse {
    pub stable_id: Option<String>,
    pub version: Option<u32>,
    pub result: Value,
    pub trace: Vec<TraceStep>,
    pub proof: EvaluationProof,
}

impl Engine {
    /// Evaluate and record the outcome.
    ///
    /// For inline expressions the request's `stable_id` and `version` are
    /// attached to the proof as given. A failed evaluation records nothing.
    pub fn evaluate(&self, request: &EvaluationRequest) -> Result<EvaluationResponse, EngineError> {
        let (definition, stable_id, version) = match (&request.logic, &request.stable_id) {
            (Some(logic), _) => (logic.clone(), request.stable_id.clone(), request.version),
            (None, Some(stable_id)) => {
                let rule = self
                    .catalog()
                    .get_version(stable_id, request.version, request.prefer_latest)?;
                (rule.definition, Some(rule.stable_id), Some(rule.version))
            }
            (None, None) => return Err(EngineError::MissingTarget),
        };

        let evaluation = evaluate(&definition, &request.context)?;
        let artifact = self.proofs().record(
            stable_id.as_deref(),
            version,
            &definition,
            &request.context,
            &evaluation.result,
            &evaluation.trace,
        );

        Ok(EvaluationResponse {
            stable_id,
            version,
            result: evaluation.result,
            trace: evaluation.trace,
            proof: EvaluationProof::from(artifact.as_ref()),
        })
    }
}
