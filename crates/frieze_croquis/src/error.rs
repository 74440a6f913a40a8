use frieze_relief::EvalError;
use thiserror::Error;

use crate::scope::ScopeId;

/// Errors raised by scope operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScopeError {
    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error("scope {0} does not exist")]
    UnknownScope(ScopeId),

    #[error("scope {0} is already running an update pass")]
    ReentrantUpdate(ScopeId),
}
