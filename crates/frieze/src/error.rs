//! Top-level errors.

use std::path::PathBuf;

use frieze_armature::MarkupError;
use frieze_atelier::AtelierError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FriezeError {
    #[error(transparent)]
    Markup(#[from] MarkupError),

    #[error(transparent)]
    Atelier(#[from] AtelierError),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A scope file whose top level is not an object
    #[error("{} must hold a JSON object, found {found}", path.display())]
    ScopeShape { path: PathBuf, found: &'static str },
}

pub type Result<T> = std::result::Result<T, FriezeError>;
