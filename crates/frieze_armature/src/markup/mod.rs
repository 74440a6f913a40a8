//! Markup parsing.
//!
//! Supports the HTML subset templates are written in: elements with quoted,
//! unquoted and valueless attributes, text, comments, void elements,
//! self-closing tags and a handful of character references. Doctypes and
//! processing instructions are skipped.

mod error;
mod parser;
pub mod tokenizer;

pub use error::{ErrorCode, MarkupError};
pub use parser::{parse_document, parse_markup, MAX_ELEMENT_DEPTH};
