//! Operator registry.
//!
//! The registry is a closed enumeration: the interpreter and the structural
//! validator both resolve operator names through [`Operator::from_name`], so
//! they always agree on the supported set.

mod collection;
mod data;
mod logic;
mod numeric;

use crate::error::EvalError;
use crate::interpreter::Scope;
use crate::value::Value;

pub use data::resolve_path;

/// What an operator returns: its result plus an optional debug payload for
/// the trace.
pub type OperatorOutput = Result<(Value, Option<Value>), EvalError>;

/// Every operator the interpreter understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Var,
    And,
    Or,
    Not,
    If,
    In,
    Missing,
    MissingSome,
    Equal,
    NotEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    Add,
    Subtract,
    Multiply,
    Divide,
    Max,
    Min,
    BlAll,
    BlAny,
    BlNone,
}

impl Operator {
    pub const ALL: [Operator; 23] = [
        Operator::Var,
        Operator::And,
        Operator::Or,
        Operator::Not,
        Operator::If,
        Operator::In,
        Operator::Missing,
        Operator::MissingSome,
        Operator::Equal,
        Operator::NotEqual,
        Operator::Greater,
        Operator::GreaterEqual,
        Operator::Less,
        Operator::LessEqual,
        Operator::Add,
        Operator::Subtract,
        Operator::Multiply,
        Operator::Divide,
        Operator::Max,
        Operator::Min,
        Operator::BlAll,
        Operator::BlAny,
        Operator::BlNone,
    ];

    /// The name used as the node key in expressions.
    pub fn name(self) -> &'static str {
        match self {
            Operator::Var => "var",
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Not => "!",
            Operator::If => "if",
            Operator::In => "in",
            Operator::Missing => "missing",
            Operator::MissingSome => "missing_some",
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
            Operator::Greater => ">",
            Operator::GreaterEqual => ">=",
            Operator::Less => "<",
            Operator::LessEqual => "<=",
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Max => "max",
            Operator::Min => "min",
            Operator::BlAll => "bl_all",
            Operator::BlAny => "bl_any",
            Operator::BlNone => "bl_none",
        }
    }

    pub fn from_name(name: &str) -> Option<Operator> {
        Operator::ALL.into_iter().find(|op| op.name() == name)
    }

    /// Apply the operator to its raw, unevaluated arguments.
    pub fn apply(self, args: &Value, scope: &mut Scope<'_>) -> OperatorOutput {
        match self {
            Operator::Var => data::var(args, scope),
            Operator::And => logic::and(args, scope),
            Operator::Or => logic::or(args, scope),
            Operator::Not => logic::not(args, scope),
            Operator::If => logic::if_then_else(args, scope),
            Operator::In => data::contains(args, scope),
            Operator::Missing => data::missing(args, scope),
            Operator::MissingSome => data::missing_some(args, scope),
            Operator::Equal => numeric::equal(args, scope),
            Operator::NotEqual => numeric::not_equal(args, scope),
            Operator::Greater => numeric::compare(self, args, scope, |a, b| a > b),
            Operator::GreaterEqual => numeric::compare(self, args, scope, |a, b| a >= b),
            Operator::Less => numeric::compare(self, args, scope, |a, b| a < b),
            Operator::LessEqual => numeric::compare(self, args, scope, |a, b| a <= b),
            Operator::Add => numeric::add(args, scope),
            Operator::Subtract => numeric::subtract(args, scope),
            Operator::Multiply => numeric::multiply(args, scope),
            Operator::Divide => numeric::divide(args, scope),
            Operator::Max => numeric::extremum(self, args, scope, f64::max),
            Operator::Min => numeric::extremum(self, args, scope, f64::min),
            Operator::BlAll => collection::quantify(collection::Quantifier::All, args, scope),
            Operator::BlAny => collection::quantify(collection::Quantifier::Any, args, scope),
            Operator::BlNone => collection::quantify(collection::Quantifier::None, args, scope),
        }
    }
}

/// Names of all registered operators, in registry order.
pub fn supported_operators() -> impl Iterator<Item = &'static str> {
    Operator::ALL.into_iter().map(Operator::name)
}

// ──────────────────────────────────────────────
// Argument helpers shared by operator families
// ──────────────────────────────────────────────

fn expect_array<'v>(args: &'v Value, operator: &'static str) -> Result<&'v [Value], EvalError> {
    args.as_array()
        .ok_or_else(|| EvalError::invalid(operator, "expects an array argument"))
}

fn expect_pair<'v>(
    args: &'v Value,
    operator: &'static str,
    message: &str,
) -> Result<(&'v Value, &'v Value), EvalError> {
    match args.as_array() {
        Some([first, second]) => Ok((first, second)),
        _ => Err(EvalError::invalid(operator, message)),
    }
}

fn expect_str<'v>(value: &'v Value, operator: &'static str, what: &str) -> Result<&'v str, EvalError> {
    value
        .as_str()
        .ok_or_else(|| EvalError::invalid(operator, format!("{what} must be a string")))
}

fn to_number(value: &Value, operator: &'static str) -> Result<f64, EvalError> {
    match value {
        Value::Number(n) => Ok(*n),
        other => Err(EvalError::NotNumeric {
            operator,
            found: other.type_name(),
            value: other.to_string(),
        }),
    }
}

/// Evaluate every argument in order, labelling each `args[i]`.
fn eval_each(
    args: &Value,
    scope: &mut Scope<'_>,
    operator: &'static str,
) -> Result<Vec<Value>, EvalError> {
    expect_array(args, operator)?
        .iter()
        .enumerate()
        .map(|(idx, arg)| scope.eval(arg, &format!("args[{idx}]")))
        .collect()
}

/// Evaluate every argument and coerce it to a number, failing on the first
/// non-numeric value.
fn eval_numbers(
    args: &Value,
    scope: &mut Scope<'_>,
    operator: &'static str,
) -> Result<Vec<f64>, EvalError> {
    expect_array(args, operator)?
        .iter()
        .enumerate()
        .map(|(idx, arg)| to_number(&scope.eval(arg, &format!("args[{idx}]"))?, operator))
        .collect()
}

fn numbers_payload(numbers: &[f64]) -> Option<Value> {
    Some(Value::Array(numbers.iter().copied().map(Value::Number).collect()))
}
