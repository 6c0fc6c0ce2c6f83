//! Equality, comparison and arithmetic.
//!
//! All arithmetic is done in `f64`. Booleans, strings and null never coerce
//! into numbers.

use super::{eval_each, eval_numbers, numbers_payload, Operator, OperatorOutput};
use crate::error::EvalError;
use crate::interpreter::Scope;
use crate::value::Value;

pub(super) fn equal(args: &Value, scope: &mut Scope<'_>) -> OperatorOutput {
    let values = eval_each(args, scope, "==")?;
    let Some((first, rest)) = values.split_first() else {
        return Err(EvalError::invalid("==", "requires at least one argument"));
    };
    let result = rest.iter().all(|value| value == first);
    Ok((Value::Bool(result), Some(Value::Array(values))))
}

pub(super) fn not_equal(args: &Value, scope: &mut Scope<'_>) -> OperatorOutput {
    let values = eval_each(args, scope, "!=")?;
    if values.len() < 2 {
        return Err(EvalError::invalid("!=", "requires at least two arguments"));
    }
    let result = values[1..].iter().any(|value| *value != values[0]);
    Ok((Value::Bool(result), Some(Value::Array(values))))
}

/// Chained comparison: true iff `cmp` holds for every consecutive pair.
pub(super) fn compare(
    operator: Operator,
    args: &Value,
    scope: &mut Scope<'_>,
    cmp: fn(f64, f64) -> bool,
) -> OperatorOutput {
    let name = operator.name();
    let numbers = eval_numbers(args, scope, name)?;
    if numbers.len() < 2 {
        return Err(EvalError::invalid(name, "requires at least two arguments"));
    }
    let result = numbers.windows(2).all(|pair| cmp(pair[0], pair[1]));
    Ok((Value::Bool(result), numbers_payload(&numbers)))
}

pub(super) fn add(args: &Value, scope: &mut Scope<'_>) -> OperatorOutput {
    let numbers = eval_numbers(args, scope, "+")?;
    let sum: f64 = numbers.iter().sum();
    Ok((Value::Number(sum), numbers_payload(&numbers)))
}

pub(super) fn subtract(args: &Value, scope: &mut Scope<'_>) -> OperatorOutput {
    let numbers = eval_numbers(args, scope, "-")?;
    let result = match numbers.as_slice() {
        [] => return Err(EvalError::invalid("-", "requires at least one argument")),
        [single] => -single,
        [first, rest @ ..] => rest.iter().fold(*first, |acc, n| acc - n),
    };
    Ok((Value::Number(result), numbers_payload(&numbers)))
}

pub(super) fn multiply(args: &Value, scope: &mut Scope<'_>) -> OperatorOutput {
    let numbers = eval_numbers(args, scope, "*")?;
    let product = numbers.iter().fold(1.0, |acc, n| acc * n);
    Ok((Value::Number(product), numbers_payload(&numbers)))
}

pub(super) fn divide(args: &Value, scope: &mut Scope<'_>) -> OperatorOutput {
    let numbers = eval_numbers(args, scope, "/")?;
    let Some((first, divisors)) = numbers.split_first() else {
        return Err(EvalError::invalid("/", "requires at least two arguments"));
    };
    if divisors.is_empty() {
        return Err(EvalError::invalid("/", "requires at least two arguments"));
    }
    let mut quotient = *first;
    for divisor in divisors {
        if *divisor == 0.0 {
            return Err(EvalError::DivisionByZero);
        }
        quotient /= divisor;
    }
    Ok((Value::Number(quotient), numbers_payload(&numbers)))
}

/// `max` / `min`.
pub(super) fn extremum(
    operator: Operator,
    args: &Value,
    scope: &mut Scope<'_>,
    pick: fn(f64, f64) -> f64,
) -> OperatorOutput {
    let name = operator.name();
    let numbers = eval_numbers(args, scope, name)?;
    let Some((first, rest)) = numbers.split_first() else {
        return Err(EvalError::invalid(name, "requires at least one argument"));
    };
    let result = rest.iter().copied().fold(*first, pick);
    Ok((Value::Number(result), numbers_payload(&numbers)))
}
