//! Evaluation errors.
//!
//! Every variant is caused by a bad expression or a bad input context,
//! never by an internal fault, so none of them are worth retrying.

/// Errors raised while validating or evaluating an expression.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvalError {
    /// An object node did not contain exactly one operator key.
    #[error("malformed node at {path}: expected exactly one operator, found {keys} keys")]
    MalformedNode { path: String, keys: usize },

    /// The node key does not name a registered operator.
    #[error("unsupported operator '{operator}' at {path}")]
    UnsupportedOperator { operator: String, path: String },

    /// Wrong arity or argument shape for an operator.
    #[error("'{operator}' {message}")]
    InvalidArguments {
        operator: &'static str,
        message: String,
    },

    /// A numeric operator received a non-numeric value. Booleans included.
    #[error("'{operator}' expects numbers, got {found} value {value}")]
    NotNumeric {
        operator: &'static str,
        found: &'static str,
        value: String,
    },

    /// `/` with a zero divisor.
    #[error("division by zero is not allowed")]
    DivisionByZero,
}

impl EvalError {
    pub(crate) fn invalid(operator: &'static str, message: impl Into<String>) -> Self {
        EvalError::InvalidArguments {
            operator,
            message: message.into(),
        }
    }
}
