//! Data access operators: `var`, `missing`, `missing_some`, `in`.

use super::{expect_array, expect_pair, expect_str, to_number, OperatorOutput};
use crate::error::EvalError;
use crate::interpreter::Scope;
use crate::value::{Object, Value};

/// Resolve a dot-separated path against `data`.
///
/// Objects are indexed by key, arrays by an all-digit segment. An empty path
/// resolves to `data` itself. Returns `None` when any segment is absent.
pub fn resolve_path<'v>(data: &'v Value, path: &str) -> Option<&'v Value> {
    if path.is_empty() {
        return Some(data);
    }
    path.split('.').try_fold(data, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => {
            if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            segment.parse::<usize>().ok().and_then(|idx| items.get(idx))
        }
        _ => None,
    })
}

fn is_present(data: &Value, path: &str) -> bool {
    resolve_path(data, path).is_some_and(|value| !value.is_null())
}

pub(super) fn var(args: &Value, scope: &mut Scope<'_>) -> OperatorOutput {
    let (path, default) = match args {
        Value::Array(items) => match items.first() {
            Some(first) => (expect_str(first, "var", "path")?, items.get(1)),
            None => ("", None),
        },
        Value::Null => ("", None),
        other => (expect_str(other, "var", "path")?, None),
    };

    let found = resolve_path(scope.context(), path).cloned();
    let default_used = found.is_none() && default.is_some();
    let value = match (found, default) {
        (Some(value), _) => value,
        (None, Some(expr)) => scope.eval(expr, "default")?,
        (None, None) => Value::Null,
    };

    let mut debug = Object::new();
    debug.insert("path".to_string(), Value::from(path));
    debug.insert("value".to_string(), value.clone());
    debug.insert("default_used".to_string(), Value::Bool(default_used));
    Ok((value, Some(Value::Object(debug))))
}

pub(super) fn missing(args: &Value, scope: &mut Scope<'_>) -> OperatorOutput {
    let keys = expect_array(args, "missing")?;
    let mut absent = Vec::new();
    for key in keys {
        let path = expect_str(key, "missing", "key")?;
        if !is_present(scope.context(), path) {
            absent.push(Value::from(path));
        }
    }

    let mut debug = Object::new();
    debug.insert("keys".to_string(), Value::Array(keys.to_vec()));
    debug.insert("missing".to_string(), Value::Array(absent.clone()));
    Ok((Value::Array(absent), Some(Value::Object(debug))))
}

pub(super) fn missing_some(args: &Value, scope: &mut Scope<'_>) -> OperatorOutput {
    let (min_expr, keys_value) = expect_pair(
        args,
        "missing_some",
        "expects a threshold and a list of keys",
    )?;
    let min_required = to_number(&scope.eval(min_expr, "min")?, "missing_some")?;
    let keys = expect_array(keys_value, "missing_some")?;

    let mut absent = Vec::new();
    let mut present = 0usize;
    for key in keys {
        let path = expect_str(key, "missing_some", "key")?;
        if is_present(scope.context(), path) {
            present += 1;
        } else {
            absent.push(Value::from(path));
        }
    }
    let result = if (present as f64) < min_required {
        Value::Array(absent)
    } else {
        Value::Array(Vec::new())
    };

    let mut debug = Object::new();
    debug.insert("min".to_string(), Value::Number(min_required));
    debug.insert("missing".to_string(), result.clone());
    Ok((result, Some(Value::Object(debug))))
}

/// `in`: substring test for string haystacks, membership otherwise.
pub(super) fn contains(args: &Value, scope: &mut Scope<'_>) -> OperatorOutput {
    let (needle_expr, haystack_expr) = expect_pair(args, "in", "expects two arguments")?;
    let needle = scope.eval(needle_expr, "needle")?;
    let haystack = scope.eval(haystack_expr, "haystack")?;

    let found = match &haystack {
        Value::String(text) => text.contains(needle.to_display_string().as_str()),
        Value::Array(items) => items.contains(&needle),
        Value::Object(map) => needle.as_str().is_some_and(|key| map.contains_key(key)),
        other => {
            return Err(EvalError::invalid(
                "in",
                format!("cannot search a {} haystack", other.type_name()),
            ))
        }
    };

    let mut debug = Object::new();
    debug.insert("needle".to_string(), needle);
    debug.insert("haystack".to_string(), haystack);
    Ok((Value::Bool(found), Some(Value::Object(debug))))
}
