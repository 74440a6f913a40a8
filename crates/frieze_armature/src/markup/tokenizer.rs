//! HTML tokenizer.
//!
//! A byte-oriented state machine in the style of htmlparser2. It reports
//! byte ranges of the source through [`Callbacks`] and never allocates.

use super::error::ErrorCode;

/// Bytes the state machine branches on
pub mod char_codes {
    pub const EXCLAMATION_MARK: u8 = b'!';
    pub const DOUBLE_QUOTE: u8 = b'"';
    pub const SINGLE_QUOTE: u8 = b'\'';
    pub const DASH: u8 = b'-';
    pub const SLASH: u8 = b'/';
    pub const LT: u8 = b'<';
    pub const EQ: u8 = b'=';
    pub const GT: u8 = b'>';
    pub const QUESTION_MARK: u8 = b'?';
}

use char_codes::*;

/// Tokenizer states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Text,

    // Tags
    BeforeTagName,
    InTagName,
    InSelfClosingTag,
    BeforeClosingTagName,
    InClosingTagName,
    AfterClosingTagName,

    // Attributes
    BeforeAttrName,
    InAttrName,
    AfterAttrName,
    BeforeAttrValue,
    /// Inside a value; the quote decides what ends it
    InAttrValue(QuoteType),

    // Declarations and processing instructions are skipped
    BeforeDeclaration,
    InDeclaration,

    // Comments
    BeforeComment,
    InComment,
}

/// How an attribute value was written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteType {
    NoValue,
    Unquoted,
    Single,
    Double,
}

impl QuoteType {
    /// Whether `c` closes a value written this way
    #[inline]
    fn closes(self, c: u8) -> bool {
        match self {
            QuoteType::Double => c == DOUBLE_QUOTE,
            QuoteType::Single => c == SINGLE_QUOTE,
            QuoteType::Unquoted => c == GT || is_whitespace(c),
            QuoteType::NoValue => true,
        }
    }
}

/// Tokenizer callbacks
pub trait Callbacks {
    fn on_text(&mut self, start: usize, end: usize);

    fn on_open_tag_name(&mut self, start: usize, end: usize);
    fn on_open_tag_end(&mut self, end: usize);
    fn on_self_closing_tag(&mut self, end: usize);
    fn on_close_tag(&mut self, start: usize, end: usize);

    fn on_attrib_name(&mut self, start: usize, end: usize);
    fn on_attrib_data(&mut self, start: usize, end: usize);
    fn on_attrib_end(&mut self, quote: QuoteType, end: usize);

    fn on_comment(&mut self, start: usize, end: usize);

    fn on_end(&mut self);
    fn on_error(&mut self, code: ErrorCode, index: usize);
}

#[inline]
fn is_whitespace(c: u8) -> bool {
    c.is_ascii_whitespace()
}

/// Bytes that end a tag or attribute name
#[inline]
fn is_end_of_tag_section(c: u8) -> bool {
    c == SLASH || c == GT || is_whitespace(c)
}

/// HTML tokenizer
pub struct Tokenizer<'a, C: Callbacks> {
    /// Input source
    input: &'a [u8],
    /// Current state
    state: State,
    /// Buffer start position
    section_start: usize,
    /// Current index
    index: usize,
    /// Callbacks
    callbacks: C,
}

impl<'a, C: Callbacks> Tokenizer<'a, C> {
    /// Create a new tokenizer
    pub fn new(input: &'a str, callbacks: C) -> Self {
        Self {
            input: input.as_bytes(),
            state: State::Text,
            section_start: 0,
            index: 0,
            callbacks,
        }
    }

    /// Give back the callbacks once tokenizing is done
    pub fn into_callbacks(self) -> C {
        self.callbacks
    }

    /// Tokenize the input
    pub fn tokenize(&mut self) {
        while self.index < self.input.len() {
            self.step(self.input[self.index]);
            self.index += 1;
        }

        // Handle remaining content
        self.cleanup();
        self.callbacks.on_end();
    }

    fn step(&mut self, c: u8) {
        match self.state {
            State::Text => self.state_text(c),
            State::BeforeTagName => self.state_before_tag_name(c),
            State::InTagName => self.state_in_tag_name(c),
            State::InSelfClosingTag => self.state_in_self_closing_tag(c),
            State::BeforeClosingTagName => self.state_before_closing_tag_name(c),
            State::InClosingTagName => self.state_in_closing_tag_name(c),
            State::AfterClosingTagName => self.state_after_closing_tag_name(c),
            State::BeforeAttrName => self.state_before_attr_name(c),
            State::InAttrName => self.state_in_attr_name(c),
            State::AfterAttrName => self.state_after_attr_name(c),
            State::BeforeAttrValue => self.state_before_attr_value(c),
            State::InAttrValue(quote) => self.state_in_attr_value(quote, c),
            State::BeforeDeclaration => self.state_before_declaration(c),
            State::InDeclaration => self.state_in_declaration(c),
            State::BeforeComment => self.state_before_comment(c),
            State::InComment => self.state_in_comment(c),
        }
    }

    /// Switch to `state` with a section starting at `start`
    #[inline]
    fn enter(&mut self, state: State, start: usize) {
        self.state = state;
        self.section_start = start;
    }

    /// Start a section at the current byte
    #[inline]
    fn enter_here(&mut self, state: State) {
        self.enter(state, self.index);
    }

    /// Start a section after the current byte
    #[inline]
    fn enter_after(&mut self, state: State) {
        self.enter(state, self.index + 1);
    }

    /// Switch to `state` and feed it the current byte again
    #[inline]
    fn reconsume(&mut self, state: State, c: u8) {
        self.state = state;
        self.step(c);
    }

    fn cleanup(&mut self) {
        match self.state {
            State::Text | State::BeforeTagName => {
                if self.section_start < self.index {
                    self.callbacks.on_text(self.section_start, self.index);
                }
            }
            State::BeforeComment | State::InComment => {
                self.callbacks.on_error(ErrorCode::EofInComment, self.index);
                let start = self.section_start.min(self.index);
                self.callbacks.on_comment(start, self.index);
            }
            State::BeforeDeclaration | State::InDeclaration => {}
            // every other state is inside a tag
            _ => self.callbacks.on_error(ErrorCode::EofInTag, self.index),
        }
    }

    // ========== State handlers ==========

    fn state_text(&mut self, c: u8) {
        if c != LT {
            return;
        }
        if self.index > self.section_start {
            self.callbacks.on_text(self.section_start, self.index);
        }
        self.enter_here(State::BeforeTagName);
    }

    fn state_before_tag_name(&mut self, c: u8) {
        match c {
            EXCLAMATION_MARK => self.enter_after(State::BeforeDeclaration),
            QUESTION_MARK => self.state = State::InDeclaration,
            SLASH => self.state = State::BeforeClosingTagName,
            _ if c.is_ascii_alphabetic() => self.enter_here(State::InTagName),
            // a lone `<` is text; the section still starts at it
            _ => self.reconsume(State::Text, c),
        }
    }

    fn state_in_tag_name(&mut self, c: u8) {
        if is_end_of_tag_section(c) {
            self.callbacks.on_open_tag_name(self.section_start, self.index);
            self.section_start = self.index;
            self.reconsume(State::BeforeAttrName, c);
        }
    }

    fn state_in_self_closing_tag(&mut self, c: u8) {
        if c == GT {
            self.callbacks.on_self_closing_tag(self.index);
            self.enter_after(State::Text);
        } else if !is_whitespace(c) {
            self.reconsume(State::BeforeAttrName, c);
        }
    }

    fn state_before_closing_tag_name(&mut self, c: u8) {
        match c {
            GT => {
                self.callbacks.on_error(ErrorCode::MissingEndTagName, self.index);
                self.enter_after(State::Text);
            }
            _ if is_whitespace(c) => {}
            _ => self.enter_here(State::InClosingTagName),
        }
    }

    fn state_in_closing_tag_name(&mut self, c: u8) {
        if c == GT || is_whitespace(c) {
            self.callbacks.on_close_tag(self.section_start, self.index);
            let next = if c == GT {
                State::Text
            } else {
                State::AfterClosingTagName
            };
            self.enter_after(next);
        }
    }

    fn state_after_closing_tag_name(&mut self, c: u8) {
        if c == GT {
            self.enter_after(State::Text);
        }
    }

    fn state_before_attr_name(&mut self, c: u8) {
        match c {
            GT => {
                self.callbacks.on_open_tag_end(self.index);
                self.enter_after(State::Text);
            }
            SLASH => self.state = State::InSelfClosingTag,
            _ if is_whitespace(c) => {}
            _ => self.enter_here(State::InAttrName),
        }
    }

    fn state_in_attr_name(&mut self, c: u8) {
        if c == EQ || is_end_of_tag_section(c) {
            self.callbacks.on_attrib_name(self.section_start, self.index);
            self.section_start = self.index;
            self.reconsume(State::AfterAttrName, c);
        }
    }

    fn state_after_attr_name(&mut self, c: u8) {
        match c {
            EQ => self.state = State::BeforeAttrValue,
            _ if is_whitespace(c) => {}
            _ => {
                self.callbacks.on_attrib_end(QuoteType::NoValue, self.index);
                if c == SLASH || c == GT {
                    self.reconsume(State::BeforeAttrName, c);
                } else {
                    self.enter_here(State::InAttrName);
                }
            }
        }
    }

    fn state_before_attr_value(&mut self, c: u8) {
        match c {
            DOUBLE_QUOTE => self.enter_after(State::InAttrValue(QuoteType::Double)),
            SINGLE_QUOTE => self.enter_after(State::InAttrValue(QuoteType::Single)),
            _ if is_whitespace(c) => {}
            _ => {
                self.section_start = self.index;
                self.reconsume(State::InAttrValue(QuoteType::Unquoted), c);
            }
        }
    }

    fn state_in_attr_value(&mut self, quote: QuoteType, c: u8) {
        if !quote.closes(c) {
            return;
        }
        if self.section_start < self.index {
            self.callbacks.on_attrib_data(self.section_start, self.index);
        }
        self.callbacks.on_attrib_end(quote, self.index);
        self.enter_after(State::BeforeAttrName);
        // the byte that ends an unquoted value also belongs to the tag
        if quote == QuoteType::Unquoted {
            self.step(c);
        }
    }

    fn state_before_declaration(&mut self, c: u8) {
        if c == DASH {
            self.enter_after(State::BeforeComment);
        } else {
            self.reconsume(State::InDeclaration, c);
        }
    }

    fn state_in_declaration(&mut self, c: u8) {
        if c == GT {
            self.enter_after(State::Text);
        }
    }

    fn state_before_comment(&mut self, c: u8) {
        if c == DASH {
            self.enter_after(State::InComment);
        } else {
            self.reconsume(State::InDeclaration, c);
        }
    }

    fn state_in_comment(&mut self, c: u8) {
        if self.input[self.index..].starts_with(b"-->") {
            self.callbacks.on_comment(self.section_start, self.index);
            self.index += 2;
            self.enter_after(State::Text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder<'s> {
        source: &'s str,
        events: Vec<String>,
    }

    impl Callbacks for Recorder<'_> {
        fn on_text(&mut self, start: usize, end: usize) {
            self.events.push(format!("text {:?}", &self.source[start..end]));
        }
        fn on_open_tag_name(&mut self, start: usize, end: usize) {
            self.events.push(format!("open {}", &self.source[start..end]));
        }
        fn on_open_tag_end(&mut self, _end: usize) {
            self.events.push("open-end".to_string());
        }
        fn on_self_closing_tag(&mut self, _end: usize) {
            self.events.push("self-close".to_string());
        }
        fn on_close_tag(&mut self, start: usize, end: usize) {
            self.events.push(format!("close {}", &self.source[start..end]));
        }
        fn on_attrib_name(&mut self, start: usize, end: usize) {
            self.events.push(format!("attr {}", &self.source[start..end]));
        }
        fn on_attrib_data(&mut self, start: usize, end: usize) {
            self.events.push(format!("data {:?}", &self.source[start..end]));
        }
        fn on_attrib_end(&mut self, quote: QuoteType, _end: usize) {
            self.events.push(format!("attr-end {quote:?}"));
        }
        fn on_comment(&mut self, start: usize, end: usize) {
            self.events.push(format!("comment {:?}", &self.source[start..end]));
        }
        fn on_end(&mut self) {
            self.events.push("end".to_string());
        }
        fn on_error(&mut self, code: ErrorCode, index: usize) {
            self.events.push(format!("error {code:?}@{index}"));
        }
    }

    fn events(source: &str) -> Vec<String> {
        let mut tokenizer = Tokenizer::new(
            source,
            Recorder {
                source,
                events: Vec::new(),
            },
        );
        tokenizer.tokenize();
        tokenizer.into_callbacks().events
    }

    #[test]
    fn test_element_with_attributes() {
        assert_eq!(
            events(r#"<li ng-repeat="b in books" hidden class=x>hi</li>"#),
            vec![
                "open li",
                "attr ng-repeat",
                "data \"b in books\"",
                "attr-end Double",
                "attr hidden",
                "attr-end NoValue",
                "attr class",
                "data \"x\"",
                "attr-end Unquoted",
                "open-end",
                "text \"hi\"",
                "close li",
                "end",
            ]
        );
    }

    #[test]
    fn test_self_closing_and_comment() {
        assert_eq!(
            events("<br/><!-- note -->a < b"),
            vec![
                "open br",
                "self-close",
                "comment \" note \"",
                "text \"a \"",
                "text \"< b\"",
                "end",
            ]
        );
    }

    #[test]
    fn test_doctype_is_skipped() {
        assert_eq!(
            events("<!DOCTYPE html><p></p>"),
            vec!["open p", "open-end", "close p", "end"]
        );
    }

    #[test]
    fn test_eof_errors() {
        assert_eq!(
            events("<div class=\"x"),
            vec!["open div", "attr class", "error EofInTag@13", "end"]
        );
        assert_eq!(
            events("<!-- open"),
            vec!["error EofInComment@9", "comment \" open\"", "end"]
        );
        assert_eq!(events("</>"), vec!["error MissingEndTagName@2", "end"]);
    }

    #[test]
    fn test_tag_end_is_read_twice() {
        // the byte ending a name or unquoted value also closes the tag
        assert_eq!(
            events("<input disabled/><a x=1></a ><?xml?>"),
            vec![
                "open input",
                "attr disabled",
                "attr-end NoValue",
                "self-close",
                "open a",
                "attr x",
                "data \"1\"",
                "attr-end Unquoted",
                "open-end",
                "close a",
                "end",
            ]
        );
    }
}
