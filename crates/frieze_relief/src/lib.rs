//! Relief - the raised surface every Frieze layer reads from.
//!
//! - [`value`] - the dynamic [`Value`] model and its display/truthiness rules
//! - [`entries`] - ordered key/value view over collection values
//! - [`ast`] - expression syntax tree
//! - [`errors`] - evaluation and collection errors
//! - [`options`] - render options shared by parser, compiler and reconciler

pub mod ast;
pub mod entries;
pub mod errors;
pub mod options;
pub mod value;

pub use ast::{BinaryOp, Expr, UnaryOp};
pub use entries::{Entries, Key};
pub use errors::{CollectionTypeError, EvalError, EvalResult};
pub use options::{RenderOptions, WhitespaceStrategy};
pub use value::{number_value, Map, Value, ValueExt};
