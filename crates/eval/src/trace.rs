//! Explainability trace records.
//!
//! One [`TraceStep`] is produced per operator node evaluated. Steps nest:
//! the children of a step are the operator nodes evaluated while computing
//! it, in evaluation order. Branches skipped by short-circuiting leave no
//! record.

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Record of a single operator evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceStep {
    /// Address of the node from the expression root, e.g. `$.args[1]`.
    pub path: String,
    pub operator: String,
    pub result: Value,
    /// Operator-specific debug payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Value>,
    #[serde(default)]
    pub children: Vec<TraceStep>,
}

impl TraceStep {
    /// Number of steps in this subtree, including `self`.
    pub fn step_count(&self) -> usize {
        1 + count_steps(&self.children)
    }

    /// Depth-first search for the first step applying `operator`.
    pub fn find(&self, operator: &str) -> Option<&TraceStep> {
        if self.operator == operator {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(operator))
    }
}

/// Total number of steps across a trace forest.
pub fn count_steps(trace: &[TraceStep]) -> usize {
    trace.iter().map(TraceStep::step_count).sum()
}
