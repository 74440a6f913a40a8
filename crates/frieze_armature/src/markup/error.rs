//! Markup errors.

use thiserror::Error;

/// Kinds of markup error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    EofInTag,
    EofInComment,
    MissingEndTagName,
    UnexpectedClosingTag,
    UnclosedElement,
    NestingTooDeep,
}

impl ErrorCode {
    pub const fn message(self) -> &'static str {
        match self {
            ErrorCode::EofInTag => "Unexpected EOF in tag.",
            ErrorCode::EofInComment => "Unexpected EOF in comment.",
            ErrorCode::MissingEndTagName => "End tag name was expected.",
            ErrorCode::UnexpectedClosingTag => "Invalid end tag.",
            ErrorCode::UnclosedElement => "Element is missing end tag.",
            ErrorCode::NestingTooDeep => "Elements are nested too deeply.",
        }
    }
}

/// A markup error with its source position.
///
/// Lines and columns are 1-based; `offset` is a byte offset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at {line}:{column}")]
pub struct MarkupError {
    pub code: ErrorCode,
    pub message: String,
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl MarkupError {
    pub fn new(code: ErrorCode, offset: usize, line: usize, column: usize) -> Self {
        Self {
            code,
            message: code.message().to_string(),
            offset,
            line,
            column,
        }
    }
}
