//! Error types for compiling and running templates.

use frieze_croquis::ScopeError;
use frieze_fresco::DomError;
use frieze_relief::{CollectionTypeError, EvalError};
use thiserror::Error;

/// Errors raised while compiling templates or running directives.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AtelierError {
    /// An expression failed to parse or evaluate
    #[error(transparent)]
    Eval(#[from] EvalError),

    /// A scope operation failed
    #[error(transparent)]
    Scope(ScopeError),

    /// A DOM operation failed
    #[error(transparent)]
    Dom(#[from] DomError),

    /// A repeat expression produced something that cannot be iterated
    #[error(transparent)]
    CollectionType(#[from] CollectionTypeError),

    /// A directive attribute does not follow its directive's syntax
    #[error("invalid `{directive}` expression `{expression}`: {reason}")]
    DirectiveParse {
        directive: &'static str,
        expression: String,
        reason: String,
    },
}

impl AtelierError {
    pub fn directive_parse(
        directive: &'static str,
        expression: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::DirectiveParse {
            directive,
            expression: expression.into(),
            reason: reason.into(),
        }
    }
}

impl From<ScopeError> for AtelierError {
    fn from(err: ScopeError) -> Self {
        match err {
            ScopeError::Eval(err) => Self::Eval(err),
            other => Self::Scope(other),
        }
    }
}

/// Result type for atelier operations.
pub type Result<T> = std::result::Result<T, AtelierError>;
