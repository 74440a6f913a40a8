//! Armature - the structural parsers of Frieze.
//!
//! - [`expression`] turns directive attribute values into [`Expr`] trees and
//!   evaluates them against an [`Environment`].
//! - [`markup`] turns an HTML subset into a [`frieze_fresco::Document`].

pub mod expression;
pub mod markup;

pub use expression::{evaluate, parse_expression, read, Environment};
pub use frieze_relief::Expr;
pub use markup::{parse_document, parse_markup, ErrorCode, MarkupError, MAX_ELEMENT_DEPTH};
