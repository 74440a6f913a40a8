//! Expression parser (precedence climbing over the token stream).

use compact_str::CompactString;
use frieze_relief::{number_value, BinaryOp, EvalError, EvalResult, Expr, UnaryOp, Value};

use super::lexer::{tokenize, Punct, Token, TokenKind};

/// Deepest nesting of sub-expressions, operator chains and member accesses
/// an expression may have.
pub const MAX_DEPTH: usize = 128;

/// Parse an expression or `;`-separated statement list.
///
/// An empty source parses to a `null` literal.
pub fn parse_expression(src: &str) -> EvalResult<Expr> {
    let tokens = tokenize(src)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    parser.program()
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        // tokenize always ends with Eof
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn at_punct(&self, punct: Punct) -> bool {
        matches!(self.peek().kind, TokenKind::Punct(p) if p == punct)
    }

    fn eat(&mut self, punct: Punct) -> bool {
        if self.at_punct(punct) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, punct: Punct, what: &str) -> EvalResult<()> {
        if self.eat(punct) {
            Ok(())
        } else {
            Err(self.unexpected(what))
        }
    }

    /// Descend one level. Callers undo this with `self.depth -= 1` on success;
    /// an error aborts the whole parse.
    fn enter(&mut self) -> EvalResult<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(EvalError::syntax(
                self.peek().start,
                format!("expression nests deeper than {MAX_DEPTH} levels"),
            ));
        }
        Ok(())
    }

    fn unexpected(&self, expected: &str) -> EvalError {
        let token = self.peek();
        let found = match &token.kind {
            TokenKind::Eof => "end of input".to_string(),
            TokenKind::Number(n) => format!("number {n}"),
            TokenKind::String(s) => format!("string '{s}'"),
            TokenKind::Ident(name) => format!("`{name}`"),
            TokenKind::Punct(p) => format!("{p:?}"),
        };
        EvalError::syntax(token.start, format!("expected {expected}, found {found}"))
    }

    fn program(&mut self) -> EvalResult<Expr> {
        let mut statements = Vec::new();
        loop {
            while self.eat(Punct::Semi) {}
            if matches!(self.peek().kind, TokenKind::Eof) {
                break;
            }
            statements.push(self.assignment()?);
            if !self.at_punct(Punct::Semi) && !matches!(self.peek().kind, TokenKind::Eof) {
                return Err(self.unexpected("`;` or end of input"));
            }
        }
        Ok(match statements.len() {
            0 => Expr::Literal(Value::Null),
            1 => statements.remove(0),
            _ => Expr::Sequence(statements),
        })
    }

    fn assignment(&mut self) -> EvalResult<Expr> {
        self.enter()?;
        let target = self.conditional()?;
        let expr = if self.eat(Punct::Assign) {
            if !target.is_assignable() {
                return Err(EvalError::InvalidAssignment(target.to_string()));
            }
            let value = self.assignment()?;
            Expr::Assign {
                target: Box::new(target),
                value: Box::new(value),
            }
        } else {
            target
        };
        self.depth -= 1;
        Ok(expr)
    }

    fn conditional(&mut self) -> EvalResult<Expr> {
        let test = self.binary(0)?;
        if !self.eat(Punct::Question) {
            return Ok(test);
        }
        let consequent = self.assignment()?;
        self.expect(Punct::Colon, "`:`")?;
        let alternate = self.assignment()?;
        Ok(Expr::Conditional {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
        })
    }

    fn binary_op(&self) -> Option<BinaryOp> {
        let TokenKind::Punct(punct) = self.peek().kind else {
            return None;
        };
        Some(match punct {
            Punct::Star => BinaryOp::Mul,
            Punct::Slash => BinaryOp::Div,
            Punct::Percent => BinaryOp::Rem,
            Punct::Plus => BinaryOp::Add,
            Punct::Minus => BinaryOp::Sub,
            Punct::Lt => BinaryOp::Lt,
            Punct::LtEq => BinaryOp::LtEq,
            Punct::Gt => BinaryOp::Gt,
            Punct::GtEq => BinaryOp::GtEq,
            Punct::EqEq => BinaryOp::Eq,
            Punct::NotEq => BinaryOp::NotEq,
            Punct::AndAnd => BinaryOp::And,
            Punct::OrOr => BinaryOp::Or,
            _ => return None,
        })
    }

    fn binary(&mut self, min_precedence: u8) -> EvalResult<Expr> {
        let mut left = self.unary()?;
        let mut folds = 0;
        while let Some(op) = self.binary_op() {
            let precedence = op.precedence();
            if precedence <= min_precedence {
                break;
            }
            self.pos += 1;
            self.enter()?;
            folds += 1;
            let right = self.binary(precedence)?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        self.depth -= folds;
        Ok(left)
    }

    fn unary(&mut self) -> EvalResult<Expr> {
        let op = if self.eat(Punct::Not) {
            UnaryOp::Not
        } else if self.eat(Punct::Minus) {
            UnaryOp::Neg
        } else if self.eat(Punct::Plus) {
            self.enter()?;
            let operand = self.unary()?;
            self.depth -= 1;
            return Ok(operand);
        } else {
            return self.postfix();
        };
        self.enter()?;
        let operand = self.unary()?;
        self.depth -= 1;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn postfix(&mut self) -> EvalResult<Expr> {
        let mut expr = self.primary()?;
        let mut folds = 0;
        loop {
            if self.at_punct(Punct::Dot) || self.at_punct(Punct::LBracket) {
                self.enter()?;
                folds += 1;
            }
            if self.eat(Punct::Dot) {
                let TokenKind::Ident(property) = self.peek().kind.clone() else {
                    return Err(self.unexpected("property name"));
                };
                self.pos += 1;
                expr = Expr::Member {
                    object: Box::new(expr),
                    property,
                };
            } else if self.eat(Punct::LBracket) {
                let index = self.assignment()?;
                self.expect(Punct::RBracket, "`]`")?;
                expr = Expr::Index {
                    object: Box::new(expr),
                    index: Box::new(index),
                };
            } else if self.at_punct(Punct::LParen) {
                return Err(EvalError::syntax(
                    self.peek().start,
                    "function calls are not supported",
                ));
            } else {
                self.depth -= folds;
                return Ok(expr);
            }
        }
    }

    fn primary(&mut self) -> EvalResult<Expr> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Number(n) => {
                self.pos += 1;
                Ok(Expr::Literal(number_value(n)))
            }
            TokenKind::String(s) => {
                self.pos += 1;
                Ok(Expr::Literal(Value::String(s)))
            }
            TokenKind::Ident(name) => {
                self.pos += 1;
                Ok(match name.as_str() {
                    "null" | "undefined" => Expr::Literal(Value::Null),
                    "true" => Expr::Literal(Value::Bool(true)),
                    "false" => Expr::Literal(Value::Bool(false)),
                    _ => Expr::Ident(name),
                })
            }
            TokenKind::Punct(Punct::LParen) => {
                self.pos += 1;
                let expr = self.assignment()?;
                self.expect(Punct::RParen, "`)`")?;
                Ok(expr)
            }
            TokenKind::Punct(Punct::LBracket) => {
                self.pos += 1;
                self.array()
            }
            TokenKind::Punct(Punct::LBrace) => {
                self.pos += 1;
                self.object()
            }
            _ => Err(self.unexpected("an expression")),
        }
    }

    fn array(&mut self) -> EvalResult<Expr> {
        let mut items = Vec::new();
        while !self.eat(Punct::RBracket) {
            items.push(self.assignment()?);
            if !self.eat(Punct::Comma) {
                self.expect(Punct::RBracket, "`,` or `]`")?;
                break;
            }
        }
        Ok(Expr::Array(items))
    }

    fn object(&mut self) -> EvalResult<Expr> {
        let mut members = Vec::new();
        while !self.eat(Punct::RBrace) {
            let key: CompactString = match self.peek().kind.clone() {
                TokenKind::Ident(name) => name,
                TokenKind::String(s) => CompactString::from(s),
                TokenKind::Number(n) => CompactString::from(number_value(n).to_string()),
                _ => return Err(self.unexpected("property name")),
            };
            self.pos += 1;
            self.expect(Punct::Colon, "`:`")?;
            let value = self.assignment()?;
            members.push((key, value));
            if !self.eat(Punct::Comma) {
                self.expect(Punct::RBrace, "`,` or `}`")?;
                break;
            }
        }
        Ok(Expr::Object(members))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> String {
        parse_expression(src).unwrap().to_string()
    }

    #[test]
    fn test_paths() {
        assert_eq!(parse("book.title"), "book.title");
        assert_eq!(parse("books[$index].title"), "books[$index].title");
    }

    #[test]
    fn test_precedence() {
        assert_eq!(parse("1 + 2 * 3"), "(1 + (2 * 3))");
        assert_eq!(parse("a || b && c"), "(a || (b && c))");
        assert_eq!(parse("a - b - c"), "((a - b) - c)");
        assert_eq!(parse("!a == b"), "(!a == b)");
        assert_eq!(parse("(1 + 2) * 3"), "((1 + 2) * 3)");
    }

    #[test]
    fn test_literals() {
        assert_eq!(parse("[1, 'two', null]"), "[1, 'two', null]");
        assert_eq!(
            parse("{title: 'X', 'page count': 3}"),
            "{title: 'X', page count: 3}"
        );
        assert_eq!(parse("[]"), "[]");
        assert_eq!(parse("{}"), "{}");
        assert_eq!(parse("[1, 2,]"), "[1, 2]");
    }

    #[test]
    fn test_assignment_and_sequence() {
        assert_eq!(parse("count = 0"), "count = 0");
        assert_eq!(parse("a = b = 1"), "a = b = 1");
        assert_eq!(parse("a = 1; b = a + 1;"), "a = 1; b = (a + 1)");
        assert_eq!(parse("ok ? 'yes' : 'no'"), "(ok ? 'yes' : 'no')");
    }

    #[test]
    fn test_empty_is_null() {
        assert_eq!(parse_expression("").unwrap(), Expr::Literal(Value::Null));
        assert_eq!(parse_expression(" ; ").unwrap(), Expr::Literal(Value::Null));
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            parse_expression("1 = 2"),
            Err(EvalError::InvalidAssignment(_))
        ));
        assert!(matches!(
            parse_expression("Book.get()"),
            Err(EvalError::Syntax { offset: 8, .. })
        ));
        assert!(matches!(
            parse_expression("a b"),
            Err(EvalError::Syntax { offset: 2, .. })
        ));
        assert!(matches!(
            parse_expression("a."),
            Err(EvalError::Syntax { .. })
        ));
        assert!(matches!(
            parse_expression("[1, 2"),
            Err(EvalError::Syntax { .. })
        ));
    }

    #[test]
    fn test_nesting_limit() {
        let deep = "(".repeat(50_000) + "1" + &")".repeat(50_000);
        assert!(matches!(
            parse_expression(&deep),
            Err(EvalError::Syntax { offset, .. }) if offset == MAX_DEPTH
        ));
        let shallow = "(".repeat(30) + "1" + &")".repeat(30);
        assert_eq!(parse(&shallow), "1");

        let negations = "!".repeat(50_000) + "ok";
        assert!(matches!(
            parse_expression(&negations),
            Err(EvalError::Syntax { .. })
        ));
        let sum = vec!["1"; 10_000].join(" + ");
        assert!(matches!(
            parse_expression(&sum),
            Err(EvalError::Syntax { .. })
        ));
        let path = "book".to_string() + &".next".repeat(10_000);
        assert!(matches!(
            parse_expression(&path),
            Err(EvalError::Syntax { .. })
        ));
        assert_eq!(parse("a[b[c[0]]].d.e"), "a[b[c[0]]].d.e");
    }
}
