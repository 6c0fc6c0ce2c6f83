//! Regression runs: replay stored or ad-hoc cases against one rule version.
//!
//! Every case is evaluated and recorded in the proof store, then compared
//! to its expected value by structural equality. A mismatch never stops
//! the run, but an evaluation error aborts it. Artifacts already recorded
//! for earlier cases stay in the proof store: they describe evaluations
//! that really happened, and the audit trail is append-only.

use rulebook_eval::{evaluate, TraceStep, Value};
use rulebook_storage::RegressionCase;
use serde::{Deserialize, Serialize};

use crate::engine::Engine;
use crate::error::EngineError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionRunRequest {
    pub stable_id: String,
    #[serde(default)]
    pub version: Option<u32>,
    #[serde(default)]
    pub prefer_latest: bool,
    /// Ad-hoc cases; when empty the version's stored cases are used.
    #[serde(default)]
    pub cases: Vec<RegressionCase>,
}

impl RegressionRunRequest {
    pub fn new(stable_id: impl Into<String>) -> Self {
        RegressionRunRequest {
            stable_id: stable_id.into(),
            version: None,
            prefer_latest: false,
            cases: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionCaseResult {
    pub name: String,
    pub description: Option<String>,
    pub success: bool,
    pub expected: Value,
    pub actual: Value,
    pub trace: Vec<TraceStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionRunResult {
    pub stable_id: String,
    pub version: u32,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub cases: Vec<RegressionCaseResult>,
}

impl RegressionRunResult {
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &RegressionCaseResult> {
        self.cases.iter().filter(|case| !case.success)
    }
}

impl Engine {
    pub fn run_regressions(
        &self,
        request: &RegressionRunRequest,
    ) -> Result<RegressionRunResult, EngineError> {
        let rule = self.catalog().get_version(
            &request.stable_id,
            request.version,
            request.prefer_latest,
        )?;

        let cases = if request.cases.is_empty() {
            &rule.regression_cases
        } else {
            &request.cases
        };
        if cases.is_empty() {
            return Err(EngineError::NoRegressionCases {
                stable_id: rule.stable_id.clone(),
                version: rule.version,
            });
        }

        let mut results = Vec::with_capacity(cases.len());
        for case in cases {
            let evaluation = evaluate(&rule.definition, &case.context)?;
            self.proofs().record(
                Some(&rule.stable_id),
                Some(rule.version),
                &rule.definition,
                &case.context,
                &evaluation.result,
                &evaluation.trace,
            );

            let success = evaluation.result == case.expected;
            if !success {
                tracing::warn!(
                    stable_id = %rule.stable_id,
                    version = rule.version,
                    case = %case.name,
                    expected = %case.expected,
                    actual = %evaluation.result,
                    "regression case failed"
                );
            }
            results.push(RegressionCaseResult {
                name: case.name.clone(),
                description: case.description.clone(),
                success,
                expected: case.expected.clone(),
                actual: evaluation.result,
                trace: evaluation.trace,
            });
        }

        let passed = results.iter().filter(|case| case.success).count();
        let outcome = RegressionRunResult {
            stable_id: rule.stable_id,
            version: rule.version,
            total: results.len(),
            passed,
            failed: results.len() - passed,
            cases: results,
        };
        tracing::info!(
            stable_id = %outcome.stable_id,
            version = outcome.version,
            total = outcome.total,
            failed = outcome.failed,
            "regression run finished"
        );
        Ok(outcome)
    }
}
