//! Tree-walking expression interpreter.
//!
//! An object with exactly one key is an operator node, any other array is
//! evaluated element-wise, and everything else is a literal. Each operator
//! node appends one [`TraceStep`] to the trace list of its tree level, with
//! the steps produced by its own sub-evaluations as children.

use crate::error::EvalError;
use crate::operators::Operator;
use crate::trace::TraceStep;
use crate::value::{Object, Value};

/// Path of the expression root.
pub const ROOT_PATH: &str = "$";

/// Result of a successful evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub result: Value,
    pub trace: Vec<TraceStep>,
}

/// Evaluate `expression` against `context`.
///
/// The context is never mutated. On failure no partial trace is returned.
pub fn evaluate(expression: &Value, context: &Value) -> Result<Evaluation, EvalError> {
    let mut trace = Vec::new();
    let result = eval_node(expression, context, &mut trace, ROOT_PATH)?;
    tracing::debug!(steps = trace.len(), "expression evaluated");
    Ok(Evaluation { result, trace })
}

fn eval_node(
    expression: &Value,
    context: &Value,
    trace: &mut Vec<TraceStep>,
    path: &str,
) -> Result<Value, EvalError> {
    match expression {
        Value::Object(node) => {
            let (name, args) = single_entry(node, path)?;
            let operator =
                Operator::from_name(name).ok_or_else(|| EvalError::UnsupportedOperator {
                    operator: name.to_string(),
                    path: path.to_string(),
                })?;

            let mut scope = Scope::new(context, path);
            let (result, arguments) = operator.apply(args, &mut scope)?;
            trace.push(TraceStep {
                path: path.to_string(),
                operator: name.to_string(),
                result: result.clone(),
                arguments,
                children: scope.children,
            });
            Ok(result)
        }
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(idx, item)| eval_node(item, context, trace, &format!("{path}[{idx}]")))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        literal => Ok(literal.clone()),
    }
}

/// Splits an operator node into its name and raw arguments.
pub(crate) fn single_entry<'v>(
    node: &'v Object,
    path: &str,
) -> Result<(&'v str, &'v Value), EvalError> {
    let mut entries = node.iter();
    match (entries.next(), entries.next()) {
        (Some((name, args)), None) => Ok((name.as_str(), args)),
        _ => Err(EvalError::MalformedNode {
            path: path.to_string(),
            keys: node.len(),
        }),
    }
}

// ──────────────────────────────────────────────
// Child evaluation scope
// ──────────────────────────────────────────────

/// The view an operator gets of the interpreter while it runs.
///
/// Sub-expressions evaluated through a scope land in a fresh child trace
/// list that becomes the `children` of the operator's own step.
pub struct Scope<'a> {
    context: &'a Value,
    path: &'a str,
    children: Vec<TraceStep>,
}

impl<'a> Scope<'a> {
    fn new(context: &'a Value, path: &'a str) -> Self {
        Scope {
            context,
            path,
            children: Vec::new(),
        }
    }

    /// The context the operator node is being evaluated against.
    pub fn context(&self) -> &'a Value {
        self.context
    }

    /// Evaluate a sub-expression against the current context.
    pub fn eval(&mut self, expression: &Value, label: &str) -> Result<Value, EvalError> {
        let context = self.context;
        self.eval_with(expression, label, context)
    }

    /// Evaluate a sub-expression against an overridden scope.
    pub fn eval_with(
        &mut self,
        expression: &Value,
        label: &str,
        context: &Value,
    ) -> Result<Value, EvalError> {
        let path = format!("{}.{}", self.path, label);
        eval_node(expression, context, &mut self.children, &path)
    }
}
