//! Sequence predicates: `bl_all`, `bl_any`, `bl_none`.
//!
//! The predicate runs once per element in a scope where `item` and `index`
//! are bound on top of the current context, stopping at the first element
//! that decides the outcome.

use super::{expect_pair, OperatorOutput};
use crate::error::EvalError;
use crate::interpreter::Scope;
use crate::value::{Object, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Quantifier {
    All,
    Any,
    None,
}

impl Quantifier {
    fn operator(self) -> &'static str {
        match self {
            Quantifier::All => "bl_all",
            Quantifier::Any => "bl_any",
            Quantifier::None => "bl_none",
        }
    }

    /// Result to return when an element with this predicate outcome stops
    /// the scan, or `None` to keep going.
    fn decides(self, truthy: bool) -> Option<bool> {
        match (self, truthy) {
            (Quantifier::All, false) => Some(false),
            (Quantifier::Any, true) => Some(true),
            (Quantifier::None, true) => Some(false),
            _ => None,
        }
    }

    /// Result when every element was scanned (including the empty case).
    fn exhausted(self) -> bool {
        !matches!(self, Quantifier::Any)
    }
}

pub(super) fn quantify(quantifier: Quantifier, args: &Value, scope: &mut Scope<'_>) -> OperatorOutput {
    let operator = quantifier.operator();
    let (sequence_expr, predicate) = expect_pair(
        args,
        operator,
        "expects a sequence expression and a predicate expression",
    )?;

    let elements = match scope.eval(sequence_expr, "sequence")? {
        Value::Array(items) => items,
        // Objects are scanned by key.
        Value::Object(map) => map.into_keys().map(Value::String).collect(),
        other => {
            return Err(EvalError::invalid(
                operator,
                format!("expects an iterable sequence, got {}", other.type_name()),
            ))
        }
    };

    let mut history = Vec::new();
    for (idx, item) in elements.into_iter().enumerate() {
        let bound = bind_item(scope.context(), &item, idx);
        let outcome = scope.eval_with(predicate, &format!("predicate[{idx}]"), &bound)?;
        let truthy = outcome.is_truthy();

        let mut record = Object::new();
        record.insert("index".to_string(), Value::from(idx));
        record.insert("item".to_string(), item);
        record.insert("result".to_string(), outcome);
        history.push(Value::Object(record));

        if let Some(result) = quantifier.decides(truthy) {
            return Ok((Value::Bool(result), Some(Value::Array(history))));
        }
    }
    Ok((Value::Bool(quantifier.exhausted()), Some(Value::Array(history))))
}

/// The current context with `item` and `index` added or overwritten. A
/// non-object context contributes nothing.
fn bind_item(context: &Value, item: &Value, index: usize) -> Value {
    let mut scope = match context {
        Value::Object(map) => map.clone(),
        _ => Object::new(),
    };
    scope.insert("item".to_string(), item.clone());
    scope.insert("index".to_string(), Value::from(index));
    Value::Object(scope)
}
