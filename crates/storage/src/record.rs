use std::collections::BTreeMap;

use rulebook_eval::{TraceStep, Value};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::CatalogError;

/// Shortest and longest accepted stable id.
const STABLE_ID_LEN: std::ops::RangeInclusive<usize> = 3..=64;

/// Lifecycle status of a rule version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleStatus {
    Draft,
    Published,
}

/// A stored input/expected-output pair for a rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionCase {
    pub name: String,
    /// Input context; an empty object when omitted.
    #[serde(default = "Value::empty_object")]
    pub context: Value,
    pub expected: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RegressionCase {
    pub fn new(name: impl Into<String>, context: Value, expected: Value) -> Self {
        RegressionCase {
            name: name.into(),
            context,
            expected,
            description: None,
        }
    }
}

/// One immutable version of a rule.
///
/// Only `status`, `updated_at`, `published_at`, `revision_notes` and
/// `regression_cases` ever change after creation; a new definition means a
/// new version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleVersion {
    pub stable_id: String,
    pub version: u32,
    pub name: String,
    pub description: Option<String>,
    pub labels: BTreeMap<String, String>,
    pub definition: Value,
    pub status: RuleStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub published_at: Option<OffsetDateTime>,
    pub revision_notes: Option<String>,
    pub regression_cases: Vec<RegressionCase>,
}

impl RuleVersion {
    pub fn is_published(&self) -> bool {
        self.status == RuleStatus::Published
    }
}

/// Payload for creating the next version of a rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRuleVersion {
    pub stable_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub definition: Value,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub revision_notes: Option<String>,
    #[serde(default, alias = "regression_tests")]
    pub regression_cases: Vec<RegressionCase>,
}

impl NewRuleVersion {
    pub fn new(stable_id: impl Into<String>, name: impl Into<String>, definition: Value) -> Self {
        NewRuleVersion {
            stable_id: stable_id.into(),
            name: name.into(),
            description: None,
            definition,
            labels: BTreeMap::new(),
            revision_notes: None,
            regression_cases: Vec::new(),
        }
    }

    pub fn with_regression_cases(mut self, cases: Vec<RegressionCase>) -> Self {
        self.regression_cases = cases;
        self
    }

    /// Shape checks only; the definition is not evaluated or validated here.
    pub fn check(&self) -> Result<(), CatalogError> {
        if !is_valid_stable_id(&self.stable_id) {
            return Err(CatalogError::invalid(format!(
                "stable id '{}' must be 3-64 characters, start alphanumeric, and contain only alphanumerics, '_' or '-'",
                self.stable_id
            )));
        }
        if self.name.trim().is_empty() {
            return Err(CatalogError::invalid("rule name cannot be empty"));
        }
        if is_empty_definition(&self.definition) {
            return Err(CatalogError::invalid("rule definition cannot be empty"));
        }
        check_case_names(&self.regression_cases)
    }
}

pub(crate) fn check_case_names(cases: &[RegressionCase]) -> Result<(), CatalogError> {
    match cases.iter().position(|case| case.name.is_empty()) {
        Some(idx) => Err(CatalogError::invalid(format!(
            "regression case {idx} has an empty name"
        ))),
        None => Ok(()),
    }
}

/// `[A-Za-z0-9][A-Za-z0-9_-]*`, 3 to 64 characters.
pub fn is_valid_stable_id(id: &str) -> bool {
    let mut bytes = id.bytes();
    STABLE_ID_LEN.contains(&id.len())
        && bytes.next().is_some_and(|b| b.is_ascii_alphanumeric())
        && bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

fn is_empty_definition(definition: &Value) -> bool {
    match definition {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Listing view of a rule: the latest version's display fields plus the
/// currently published version number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSummary {
    pub stable_id: String,
    pub name: String,
    pub description: Option<String>,
    pub labels: BTreeMap<String, String>,
    pub latest_version: u32,
    pub published_version: Option<u32>,
    pub status: RuleStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleListing {
    pub total: usize,
    pub rules: Vec<RuleSummary>,
}

// ──────────────────────────────────────────────
// Audit records
// ──────────────────────────────────────────────

/// Immutable audit record of one evaluation.
///
/// `stable_id` and `version` are present when a catalog rule was evaluated.
/// Everything else is a snapshot taken at record time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationProofArtifact {
    pub id: String,
    pub stable_id: Option<String>,
    pub version: Option<u32>,
    pub definition: Value,
    pub context: Value,
    pub result: Value,
    pub trace: Vec<TraceStep>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Metadata handed back to callers about a recorded artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationProof {
    pub id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub stable_id: Option<String>,
    pub version: Option<u32>,
}

impl From<&EvaluationProofArtifact> for EvaluationProof {
    fn from(artifact: &EvaluationProofArtifact) -> Self {
        EvaluationProof {
            id: artifact.id.clone(),
            created_at: artifact.created_at,
            stable_id: artifact.stable_id.clone(),
            version: artifact.version,
        }
    }
}
