//! Rulebook expression interpreter -- evaluates JSON-tree decision rules
//! against an input context and explains the result.
//!
//! An expression is a [`Value`]: single-key objects are operator nodes,
//! arrays are evaluated element-wise, everything else is a literal.
//! Evaluation returns the result together with a [`TraceStep`] tree that
//! records every operator evaluated, in order, so a decision can be audited
//! after the fact.

pub mod error;
pub mod interpreter;
pub mod operators;
pub mod trace;
pub mod validate;
pub mod value;

pub use error::EvalError;
pub use interpreter::{evaluate, Evaluation, Scope, ROOT_PATH};
pub use operators::{resolve_path, supported_operators, Operator};
pub use trace::{count_steps, TraceStep};
pub use validate::validate;
pub use value::{Object, Value};
