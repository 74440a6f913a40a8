//! Expression tokenizer.

use compact_str::CompactString;
use frieze_carton::{is_identifier_part, is_identifier_start};
use frieze_relief::{EvalError, EvalResult};

/// A token with its byte offset in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number(f64),
    String(String),
    Ident(CompactString),
    Punct(Punct),
    Eof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Punct {
    Dot,
    Comma,
    Colon,
    Semi,
    Question,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Assign,
    Not,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Lt,
    LtEq,
    Gt,
    GtEq,
    EqEq,
    NotEq,
    AndAnd,
    OrOr,
}

/// Split `src` into tokens. The last token is always [`TokenKind::Eof`].
pub fn tokenize(src: &str) -> EvalResult<Vec<Token>> {
    Lexer {
        src,
        bytes: src.as_bytes(),
        index: 0,
    }
    .run()
}

struct Lexer<'a> {
    src: &'a str,
    bytes: &'a [u8],
    index: usize,
}

impl Lexer<'_> {
    fn run(mut self) -> EvalResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace();
            let start = self.index;
            let Some(&c) = self.bytes.get(self.index) else {
                tokens.push(Token {
                    kind: TokenKind::Eof,
                    start,
                });
                return Ok(tokens);
            };

            let kind = if c.is_ascii_digit()
                || (c == b'.' && self.peek(1).is_some_and(|n| n.is_ascii_digit()))
            {
                self.number()?
            } else if c == b'"' || c == b'\'' {
                self.string(c)?
            } else if is_identifier_start(c) {
                self.ident()
            } else {
                TokenKind::Punct(self.punct(c)?)
            };
            tokens.push(Token { kind, start });
        }
    }

    fn peek(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.index + ahead).copied()
    }

    fn skip_whitespace(&mut self) {
        while self
            .bytes
            .get(self.index)
            .is_some_and(|c| c.is_ascii_whitespace())
        {
            self.index += 1;
        }
    }

    fn number(&mut self) -> EvalResult<TokenKind> {
        let start = self.index;
        while self.peek(0).is_some_and(|c| c.is_ascii_digit()) {
            self.index += 1;
        }
        if self.peek(0) == Some(b'.') && self.peek(1).is_some_and(|c| c.is_ascii_digit()) {
            self.index += 1;
            while self.peek(0).is_some_and(|c| c.is_ascii_digit()) {
                self.index += 1;
            }
        }
        if matches!(self.peek(0), Some(b'e' | b'E')) {
            let sign = usize::from(matches!(self.peek(1), Some(b'+' | b'-')));
            if self.peek(1 + sign).is_some_and(|c| c.is_ascii_digit()) {
                self.index += 1 + sign;
                while self.peek(0).is_some_and(|c| c.is_ascii_digit()) {
                    self.index += 1;
                }
            }
        }
        self.src[start..self.index]
            .parse::<f64>()
            .map(TokenKind::Number)
            .map_err(|_| EvalError::syntax(start, "invalid number"))
    }

    fn string(&mut self, quote: u8) -> EvalResult<TokenKind> {
        let start = self.index;
        self.index += 1;
        let mut out = String::new();
        let mut chars = self.src[self.index..].char_indices();
        while let Some((offset, c)) = chars.next() {
            match c {
                c if c as u32 == u32::from(quote) => {
                    self.index += offset + 1;
                    return Ok(TokenKind::String(out));
                }
                '\\' => match chars.next() {
                    Some((_, 'n')) => out.push('\n'),
                    Some((_, 't')) => out.push('\t'),
                    Some((_, 'r')) => out.push('\r'),
                    Some((_, other)) => out.push(other),
                    None => break,
                },
                c => out.push(c),
            }
        }
        Err(EvalError::syntax(start, "unterminated string"))
    }

    fn ident(&mut self) -> TokenKind {
        let start = self.index;
        while self.peek(0).is_some_and(is_identifier_part) {
            self.index += 1;
        }
        TokenKind::Ident(CompactString::new(&self.src[start..self.index]))
    }

    fn punct(&mut self, c: u8) -> EvalResult<Punct> {
        let next = self.peek(1);
        let (punct, len) = match (c, next) {
            (b'=', Some(b'=')) => {
                // `===` reads as `==`
                let len = if self.peek(2) == Some(b'=') { 3 } else { 2 };
                (Punct::EqEq, len)
            }
            (b'!', Some(b'=')) => {
                let len = if self.peek(2) == Some(b'=') { 3 } else { 2 };
                (Punct::NotEq, len)
            }
            (b'<', Some(b'=')) => (Punct::LtEq, 2),
            (b'>', Some(b'=')) => (Punct::GtEq, 2),
            (b'&', Some(b'&')) => (Punct::AndAnd, 2),
            (b'|', Some(b'|')) => (Punct::OrOr, 2),
            (b'.', _) => (Punct::Dot, 1),
            (b',', _) => (Punct::Comma, 1),
            (b':', _) => (Punct::Colon, 1),
            (b';', _) => (Punct::Semi, 1),
            (b'?', _) => (Punct::Question, 1),
            (b'(', _) => (Punct::LParen, 1),
            (b')', _) => (Punct::RParen, 1),
            (b'[', _) => (Punct::LBracket, 1),
            (b']', _) => (Punct::RBracket, 1),
            (b'{', _) => (Punct::LBrace, 1),
            (b'}', _) => (Punct::RBrace, 1),
            (b'=', _) => (Punct::Assign, 1),
            (b'!', _) => (Punct::Not, 1),
            (b'+', _) => (Punct::Plus, 1),
            (b'-', _) => (Punct::Minus, 1),
            (b'*', _) => (Punct::Star, 1),
            (b'/', _) => (Punct::Slash, 1),
            (b'%', _) => (Punct::Percent, 1),
            (b'<', _) => (Punct::Lt, 1),
            (b'>', _) => (Punct::Gt, 1),
            _ => {
                let ch = self.src[self.index..].chars().next().unwrap_or('?');
                return Err(EvalError::syntax(
                    self.index,
                    format!("unexpected character `{ch}`"),
                ));
            }
        };
        self.index += len;
        Ok(punct)
    }
}
