//! Rulebook engine -- composes the interpreter, rule catalog and proof
//! store into the operations callers actually use: recorded evaluation,
//! validated rule creation and regression runs.

mod engine;
mod error;
mod evaluate;
mod regression;

pub use engine::Engine;
pub use error::EngineError;
pub use evaluate::{EvaluationRequest, EvaluationResponse};
pub use regression::{RegressionCaseResult, RegressionRunRequest, RegressionRunResult};
