//! Structural validation of expressions before they are stored.
//!
//! Checks node shape and operator names against the same registry the
//! interpreter uses, without evaluating anything. A definition that passes
//! can still fail at evaluation time on argument types or input data.

use crate::error::EvalError;
use crate::interpreter::{single_entry, ROOT_PATH};
use crate::operators::Operator;
use crate::value::Value;

/// Validate `expression`, reporting the first structural problem found.
pub fn validate(expression: &Value) -> Result<(), EvalError> {
    validate_node(expression, ROOT_PATH)
}

fn validate_node(expression: &Value, path: &str) -> Result<(), EvalError> {
    match expression {
        Value::Object(node) => {
            let (name, args) = single_entry(node, path)?;
            if Operator::from_name(name).is_none() {
                return Err(EvalError::UnsupportedOperator {
                    operator: name.to_string(),
                    path: path.to_string(),
                });
            }
            validate_arguments(args, &format!("{path}.{name}"))
        }
        Value::Array(items) => items
            .iter()
            .enumerate()
            .try_for_each(|(idx, item)| validate_node(item, &format!("{path}[{idx}]"))),
        _ => Ok(()),
    }
}

fn validate_arguments(args: &Value, path: &str) -> Result<(), EvalError> {
    match args {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .try_for_each(|(idx, item)| validate_node(item, &format!("{path}[{idx}]"))),
        // A bare object argument is evaluated as a node, so it must be one.
        other => validate_node(other, path),
    }
}
