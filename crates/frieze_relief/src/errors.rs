//! Error types for expression evaluation and collection iteration.

use thiserror::Error;

/// Errors raised while parsing or evaluating an expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// The expression text is malformed.
    #[error("syntax error at offset {offset}: {message}")]
    Syntax { offset: usize, message: String },

    /// A variable or property path does not resolve.
    #[error("`{path}` is not defined")]
    Undefined { path: String },

    /// An operator was applied to values it does not support.
    #[error("type error: {0}")]
    Type(String),

    /// The left-hand side of `=` is not a variable or property path.
    #[error("invalid assignment target `{0}`")]
    InvalidAssignment(String),
}

impl EvalError {
    /// Create a syntax error at `offset`.
    pub fn syntax(offset: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            offset,
            message: message.into(),
        }
    }

    /// Create an undefined-path error.
    pub fn undefined(path: impl Into<String>) -> Self {
        Self::Undefined { path: path.into() }
    }
}

/// Result type for evaluation.
pub type EvalResult<T> = Result<T, EvalError>;

/// A value that cannot be iterated as ordered key/value pairs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected an array or object to iterate, found {found}")]
pub struct CollectionTypeError {
    /// Type name of the offending value.
    pub found: &'static str,
}
