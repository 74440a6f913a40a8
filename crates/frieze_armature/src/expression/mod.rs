//! Expression language.
//!
//! The grammar covers what directive attributes need: literals, variable and
//! property paths, array/object literals, arithmetic, comparison, logical
//! operators, the ternary operator, assignment and `;`-separated statements.
//! Function calls are not part of the language.

mod eval;
mod lexer;
mod parser;

pub use eval::{evaluate, read, Environment};
pub use lexer::{tokenize, Punct, Token, TokenKind};
pub use parser::parse_expression;
