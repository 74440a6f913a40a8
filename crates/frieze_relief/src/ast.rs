//! Expression syntax tree.
//!
//! Directive attribute values parse into [`Expr`]. Trees are immutable once
//! parsed and are evaluated many times (once per watch per update cycle).

use std::fmt;

use frieze_carton::CompactString;

use crate::value::Value;

/// An expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `null`, `true`, `42`, `'text'`
    Literal(Value),
    /// `book`, `$index`
    Ident(CompactString),
    /// `object.property`
    Member {
        object: Box<Expr>,
        property: CompactString,
    },
    /// `object[index]`
    Index { object: Box<Expr>, index: Box<Expr> },
    /// `[a, b]`
    Array(Vec<Expr>),
    /// `{key: value}`
    Object(Vec<(CompactString, Expr)>),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `test ? consequent : alternate`
    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
    },
    /// `target = value`
    Assign { target: Box<Expr>, value: Box<Expr> },
    /// `a; b; c` evaluates to the last statement
    Sequence(Vec<Expr>),
}

impl Expr {
    /// Whether this node can appear on the left of `=`.
    pub fn is_assignable(&self) -> bool {
        match self {
            Expr::Ident(_) => true,
            Expr::Member { object, .. } | Expr::Index { object, .. } => object.is_assignable(),
            _ => false,
        }
    }

    /// Root variable of a property path (`a` for `a.b[0].c`).
    pub fn root_ident(&self) -> Option<&str> {
        match self {
            Expr::Ident(name) => Some(name.as_str()),
            Expr::Member { object, .. } | Expr::Index { object, .. } => object.root_ident(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
}

impl UnaryOp {
    pub const fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Neg => "-",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Mul,
    Div,
    Rem,
    Add,
    Sub,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Eq,
    NotEq,
    And,
    Or,
}

impl BinaryOp {
    pub const fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }

    /// Binding power; higher binds tighter.
    pub const fn precedence(self) -> u8 {
        match self {
            BinaryOp::Or => 1,
            BinaryOp::And => 2,
            BinaryOp::Eq | BinaryOp::NotEq => 3,
            BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => 4,
            BinaryOp::Add | BinaryOp::Sub => 5,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => 6,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(Value::String(s)) => write!(f, "'{}'", s.replace('\'', "\\'")),
            Expr::Literal(value) => write!(f, "{value}"),
            Expr::Ident(name) => f.write_str(name),
            Expr::Member { object, property } => write!(f, "{object}.{property}"),
            Expr::Index { object, index } => write!(f, "{object}[{index}]"),
            Expr::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Expr::Object(members) => {
                f.write_str("{")?;
                for (i, (key, value)) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
            Expr::Unary { op, operand } => write!(f, "{}{operand}", op.as_str()),
            Expr::Binary { op, left, right } => write!(f, "({left} {} {right})", op.as_str()),
            Expr::Conditional {
                test,
                consequent,
                alternate,
            } => write!(f, "({test} ? {consequent} : {alternate})"),
            Expr::Assign { target, value } => write!(f, "{target} = {value}"),
            Expr::Sequence(stmts) => {
                for (i, stmt) in stmts.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{stmt}")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str) -> Expr {
        Expr::Ident(CompactString::new(name))
    }

    #[test]
    fn test_display_path() {
        let expr = Expr::Member {
            object: Box::new(Expr::Index {
                object: Box::new(ident("books")),
                index: Box::new(Expr::Literal(Value::from(0))),
            }),
            property: CompactString::new("title"),
        };
        assert_eq!(expr.to_string(), "books[0].title");
        assert_eq!(expr.root_ident(), Some("books"));
        assert!(expr.is_assignable());
    }

    #[test]
    fn test_literal_not_assignable() {
        assert!(!Expr::Literal(Value::Null).is_assignable());
        let call = Expr::Binary {
            op: BinaryOp::Add,
            left: Box::new(ident("a")),
            right: Box::new(ident("b")),
        };
        assert!(!call.is_assignable());
        assert_eq!(call.to_string(), "(a + b)");
    }
}
