//! Logical operators. All of them short-circuit: branches past the deciding
//! one are never evaluated and so never traced.

use super::{expect_array, OperatorOutput};
use crate::error::EvalError;
use crate::interpreter::Scope;
use crate::value::{Object, Value};

pub(super) fn and(args: &Value, scope: &mut Scope<'_>) -> OperatorOutput {
    let mut seen = Vec::new();
    for (idx, arg) in expect_array(args, "and")?.iter().enumerate() {
        let value = scope.eval(arg, &format!("args[{idx}]"))?;
        seen.push(value.clone());
        if !value.is_truthy() {
            return Ok((value, Some(Value::Array(seen))));
        }
    }
    let result = seen.last().cloned().unwrap_or(Value::Bool(true));
    Ok((result, Some(Value::Array(seen))))
}

pub(super) fn or(args: &Value, scope: &mut Scope<'_>) -> OperatorOutput {
    let mut seen = Vec::new();
    for (idx, arg) in expect_array(args, "or")?.iter().enumerate() {
        let value = scope.eval(arg, &format!("args[{idx}]"))?;
        seen.push(value.clone());
        if value.is_truthy() {
            return Ok((value, Some(Value::Array(seen))));
        }
    }
    let result = seen.last().cloned().unwrap_or(Value::Bool(false));
    Ok((result, Some(Value::Array(seen))))
}

pub(super) fn not(args: &Value, scope: &mut Scope<'_>) -> OperatorOutput {
    let value = match args {
        Value::Array(items) => match items.as_slice() {
            [single] => scope.eval(single, "args[0]")?,
            _ => return Err(EvalError::invalid("!", "expects a single argument")),
        },
        other => scope.eval(other, "args[0]")?,
    };
    Ok((Value::Bool(!value.is_truthy()), Some(Value::Array(vec![value]))))
}

/// `if`: `[cond, then, cond, then, ..., else?]`. Only the taken branch runs.
pub(super) fn if_then_else(args: &Value, scope: &mut Scope<'_>) -> OperatorOutput {
    let items = expect_array(args, "if")?;
    if items.is_empty() {
        return Err(EvalError::invalid("if", "requires at least one condition"));
    }

    let mut history = Vec::new();
    for (pair, branch) in items.chunks_exact(2).enumerate() {
        let condition = scope.eval(&branch[0], &format!("condition[{pair}]"))?;
        let mut record = Object::new();
        record.insert("condition".to_string(), condition.clone());
        if condition.is_truthy() {
            let result = scope.eval(&branch[1], &format!("result[{pair}]"))?;
            record.insert("branch".to_string(), result.clone());
            history.push(Value::Object(record));
            return Ok((result, Some(Value::Array(history))));
        }
        history.push(Value::Object(record));
    }

    let fallback = match items.chunks_exact(2).remainder() {
        [otherwise] => scope.eval(otherwise, "default")?,
        _ => Value::Null,
    };
    let mut record = Object::new();
    record.insert("default".to_string(), fallback.clone());
    history.push(Value::Object(record));
    Ok((fallback, Some(Value::Array(history))))
}
