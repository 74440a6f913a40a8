//! Markup parser.
//!
//! Drives the tokenizer and builds a [`Document`] whose root is a fragment
//! holding the top-level nodes of the source.

use std::borrow::Cow;

use frieze_carton::{is_void_tag, CompactString};
use frieze_fresco::{Document, NodeId, NodeKind};
use frieze_relief::{RenderOptions, WhitespaceStrategy};

use super::error::{ErrorCode, MarkupError};
use super::tokenizer::{Callbacks, QuoteType, Tokenizer};

/// Deepest element nesting the parser builds.
///
/// Elements opened below this depth are attached to the deepest open element
/// instead, and a [`ErrorCode::NestingTooDeep`] error is reported once.
pub const MAX_ELEMENT_DEPTH: usize = 512;

/// Parser context for building the document
struct Parser<'a> {
    /// Source code
    source: &'a str,
    /// Whitespace handling
    whitespace: WhitespaceStrategy,
    /// Keep comment nodes
    comments: bool,
    /// Document under construction
    doc: Document,
    /// Fragment holding the top-level nodes
    root: NodeId,
    /// Open elements
    stack: Vec<OpenElement>,
    /// Elements opened past `MAX_ELEMENT_DEPTH` and not yet closed
    overflow: usize,
    /// Element whose start tag is being read
    current_element: Option<CurrentElement>,
    /// Attribute being read
    current_attr: Option<CurrentAttribute>,
    /// Errors collected during parsing
    errors: Vec<MarkupError>,
    /// Newline positions for calculating line/column
    newlines: Vec<usize>,
}

struct OpenElement {
    id: NodeId,
    tag: CompactString,
    start: usize,
}

struct CurrentElement {
    id: NodeId,
    tag: CompactString,
    start: usize,
    is_self_closing: bool,
}

struct CurrentAttribute {
    name: CompactString,
    value_start: Option<usize>,
    value_end: Option<usize>,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str, options: &RenderOptions) -> Self {
        let mut doc = Document::new();
        let root = doc.create_fragment();
        doc.set_root(root);
        let newlines = source
            .bytes()
            .enumerate()
            .filter(|(_, b)| *b == b'\n')
            .map(|(i, _)| i)
            .collect();

        Self {
            source,
            whitespace: options.whitespace,
            comments: options.comments,
            doc,
            root,
            stack: Vec::new(),
            overflow: 0,
            current_element: None,
            current_attr: None,
            errors: Vec::new(),
            newlines,
        }
    }

    fn parse(self) -> (Document, Vec<MarkupError>) {
        let source = self.source;
        let mut tokenizer = Tokenizer::new(source, self);
        tokenizer.tokenize();
        let mut parser = tokenizer.into_callbacks();

        parser.handle_unclosed_elements();
        if parser.whitespace == WhitespaceStrategy::Condense {
            let root = parser.root;
            condense_whitespace(&mut parser.doc, root);
        }
        (parser.doc, parser.errors)
    }

    /// Get source slice
    fn get_source(&self, start: usize, end: usize) -> &'a str {
        &self.source[start..end]
    }

    fn error(&mut self, code: ErrorCode, offset: usize) {
        let line = match self.newlines.binary_search(&offset) {
            Ok(i) | Err(i) => i + 1,
        };
        let column = if line == 1 {
            offset + 1
        } else {
            offset - self.newlines[line - 2]
        };
        self.errors
            .push(MarkupError::new(code, offset, line, column));
    }

    /// Parent for new nodes (stack top or root)
    fn current_parent(&self) -> NodeId {
        self.stack.last().map_or(self.root, |open| open.id)
    }

    fn add_child(&mut self, child: NodeId) {
        let parent = self.current_parent();
        // Only fails on a cycle, which a freshly created node cannot form.
        let _ = self.doc.append_child(parent, child);
    }

    fn handle_unclosed_elements(&mut self) {
        while let Some(open) = self.stack.pop() {
            self.error(ErrorCode::UnclosedElement, open.start);
        }
    }

    fn on_text_impl(&mut self, start: usize, end: usize) {
        if start >= end {
            return;
        }
        let text = decode_entities(self.get_source(start, end));

        // Adjacent text runs (split around a stray `<`) share one node.
        let parent = self.current_parent();
        if let Some(&last) = self.doc.children(parent).last() {
            if let Some(node) = self.doc.get_mut(last) {
                if let NodeKind::Text(content) = &mut node.kind {
                    content.push_str(&text);
                    return;
                }
            }
        }
        let node = self.doc.create_text(text.as_ref());
        self.add_child(node);
    }

    fn on_open_tag_name_impl(&mut self, start: usize, end: usize) {
        let tag = CompactString::from(self.get_source(start, end));
        let id = self.doc.create_element(tag.clone());
        self.current_element = Some(CurrentElement {
            id,
            tag,
            // Include `<`
            start: start - 1,
            is_self_closing: false,
        });
    }

    fn on_open_tag_end_impl(&mut self) {
        let Some(current) = self.current_element.take() else {
            return;
        };
        self.add_child(current.id);
        if current.is_self_closing || is_void_tag(&current.tag) {
            return;
        }
        if self.stack.len() >= MAX_ELEMENT_DEPTH {
            if self.overflow == 0 {
                self.error(ErrorCode::NestingTooDeep, current.start);
            }
            self.overflow += 1;
        } else {
            self.stack.push(OpenElement {
                id: current.id,
                tag: current.tag,
                start: current.start,
            });
        }
    }

    fn on_close_tag_impl(&mut self, start: usize, end: usize) {
        // the innermost open elements are the flattened ones
        if self.overflow > 0 {
            self.overflow -= 1;
            return;
        }
        let tag = self.get_source(start, end);

        let Some(i) = self
            .stack
            .iter()
            .rposition(|open| open.tag.eq_ignore_ascii_case(tag))
        else {
            // Include `</`
            self.error(ErrorCode::UnexpectedClosingTag, start - 2);
            return;
        };

        // Elements opened after the match were never closed.
        let unclosed: Vec<usize> = self.stack.drain(i..).skip(1).map(|open| open.start).collect();
        for offset in unclosed {
            self.error(ErrorCode::UnclosedElement, offset);
        }
    }

    fn on_attrib_name_impl(&mut self, start: usize, end: usize) {
        self.current_attr = Some(CurrentAttribute {
            name: CompactString::from(self.get_source(start, end)),
            value_start: None,
            value_end: None,
        });
    }

    fn on_attrib_data_impl(&mut self, start: usize, end: usize) {
        if let Some(attr) = self.current_attr.as_mut() {
            attr.value_start.get_or_insert(start);
            attr.value_end = Some(end);
        }
    }

    fn on_attrib_end_impl(&mut self, _quote: QuoteType) {
        let (Some(attr), Some(element)) = (self.current_attr.take(), &self.current_element) else {
            return;
        };
        let id = element.id;
        let value = match (attr.value_start, attr.value_end) {
            (Some(start), Some(end)) => decode_entities(self.get_source(start, end)),
            _ => Cow::Borrowed(""),
        };
        // The first occurrence of a duplicated attribute wins.
        if self.doc.attr(id, &attr.name).is_none() {
            let _ = self.doc.set_attr(id, &attr.name, value.as_ref());
        }
    }

    fn on_comment_impl(&mut self, start: usize, end: usize) {
        if !self.comments {
            return;
        }
        let node = self.doc.create_comment(self.get_source(start, end));
        self.add_child(node);
    }
}

impl Callbacks for Parser<'_> {
    fn on_text(&mut self, start: usize, end: usize) {
        self.on_text_impl(start, end);
    }

    fn on_open_tag_name(&mut self, start: usize, end: usize) {
        self.on_open_tag_name_impl(start, end);
    }

    fn on_open_tag_end(&mut self, _end: usize) {
        self.on_open_tag_end_impl();
    }

    fn on_self_closing_tag(&mut self, _end: usize) {
        if let Some(ref mut current) = self.current_element {
            current.is_self_closing = true;
        }
        self.on_open_tag_end_impl();
    }

    fn on_close_tag(&mut self, start: usize, end: usize) {
        self.on_close_tag_impl(start, end);
    }

    fn on_attrib_name(&mut self, start: usize, end: usize) {
        self.on_attrib_name_impl(start, end);
    }

    fn on_attrib_data(&mut self, start: usize, end: usize) {
        self.on_attrib_data_impl(start, end);
    }

    fn on_attrib_end(&mut self, quote: QuoteType, _end: usize) {
        self.on_attrib_end_impl(quote);
    }

    fn on_comment(&mut self, start: usize, end: usize) {
        self.on_comment_impl(start, end);
    }

    fn on_end(&mut self) {}

    fn on_error(&mut self, code: ErrorCode, index: usize) {
        self.error(code, index);
    }
}

/// Decode the character references the markup grammar knows about.
///
/// Unknown references are kept verbatim.
fn decode_entities(raw: &str) -> Cow<'_, str> {
    if !raw.contains('&') {
        return Cow::Borrowed(raw);
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let decoded = rest.find(';').and_then(|semi| {
            let ch = match &rest[1..semi] {
                "amp" => '&',
                "lt" => '<',
                "gt" => '>',
                "quot" => '"',
                "apos" => '\'',
                "nbsp" => '\u{a0}',
                name => {
                    let code = match name.strip_prefix('#')? {
                        hex if hex.starts_with(['x', 'X']) => {
                            u32::from_str_radix(&hex[1..], 16).ok()?
                        }
                        dec => dec.parse().ok()?,
                    };
                    char::from_u32(code)?
                }
            };
            Some((ch, semi))
        });
        match decoded {
            Some((ch, semi)) => {
                out.push(ch);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Drop or shrink whitespace-only text between elements.
///
/// Whitespace containing a newline is indentation and is removed; other runs
/// collapse to a single space. Content of `<pre>` is left alone.
fn condense_whitespace(doc: &mut Document, parent: NodeId) {
    let children: Vec<NodeId> = doc.children(parent).to_vec();
    for child in children {
        let action = match doc.get(child).map(|node| &node.kind) {
            Some(NodeKind::Text(text)) if text.chars().all(char::is_whitespace) => {
                if text.contains('\n') {
                    WhitespaceAction::Remove
                } else {
                    WhitespaceAction::Condense
                }
            }
            Some(NodeKind::Element(data)) if !data.tag.eq_ignore_ascii_case("pre") => {
                WhitespaceAction::Recurse
            }
            _ => WhitespaceAction::Keep,
        };

        match action {
            WhitespaceAction::Remove => {
                let _ = doc.remove(child);
            }
            WhitespaceAction::Condense => {
                let _ = doc.set_text(child, " ");
            }
            WhitespaceAction::Recurse => condense_whitespace(doc, child),
            WhitespaceAction::Keep => {}
        }
    }
}

/// Action to take for a child during condensing
enum WhitespaceAction {
    Keep,
    Remove,
    Condense,
    Recurse,
}

/// Parse markup, collecting errors instead of stopping at the first one.
pub fn parse_markup(source: &str, options: &RenderOptions) -> (Document, Vec<MarkupError>) {
    Parser::new(source, options).parse()
}

/// Parse markup, failing on the first error.
pub fn parse_document(source: &str, options: &RenderOptions) -> Result<Document, MarkupError> {
    let (doc, mut errors) = parse_markup(source, options);
    if errors.is_empty() {
        Ok(doc)
    } else {
        Err(errors.remove(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn html(source: &str) -> String {
        let doc = parse_document(source, &RenderOptions::default()).unwrap();
        doc.to_html(doc.root().unwrap())
    }

    #[test]
    fn test_parse_simple_element() {
        let doc = parse_document("<div></div>", &RenderOptions::default()).unwrap();
        let root = doc.root().unwrap();
        assert_eq!(doc.children(root).len(), 1);
        assert_eq!(doc.tag(doc.children(root)[0]), Some("div"));
    }

    #[test]
    fn test_attributes_keep_order() {
        assert_eq!(
            html(r#"<ul><li ng-repeat="book in books" class='item' hidden data-x=1></li></ul>"#),
            r#"<ul><li ng-repeat="book in books" class="item" hidden="" data-x="1"></li></ul>"#
        );
    }

    #[test]
    fn test_duplicate_attribute_first_wins() {
        assert_eq!(html(r#"<p id="a" id="b"></p>"#), r#"<p id="a"></p>"#);
    }

    #[test]
    fn test_void_and_self_closing() {
        assert_eq!(
            html("<p>a<br>b<img src=x /><span/>c</p>"),
            r#"<p>a<br>b<img src="x"><span></span>c</p>"#
        );
    }

    #[test]
    fn test_entities() {
        let doc = parse_document(
            r#"<p title="&quot;x&quot; &amp; y">&lt;b&gt; &#39;q&#39; &#x41; &bogus;</p>"#,
            &RenderOptions::default(),
        )
        .unwrap();
        let p = doc.children(doc.root().unwrap())[0];
        assert_eq!(doc.attr(p, "title"), Some("\"x\" & y"));
        assert_eq!(doc.text_content(p), "<b> 'q' A &bogus;");
    }

    #[test]
    fn test_stray_lt_stays_in_one_text_node() {
        let doc = parse_document("<p>a < b</p>", &RenderOptions::default()).unwrap();
        let p = doc.children(doc.root().unwrap())[0];
        assert_eq!(doc.children(p).len(), 1);
        assert_eq!(doc.text_content(p), "a < b");
    }

    #[test]
    fn test_condense_whitespace() {
        assert_eq!(
            html("<ul>\n  <li>a</li>\n  <li>b</li> <li> c </li>\n</ul>\n"),
            "<ul><li>a</li><li>b</li> <li> c </li></ul>"
        );
        assert_eq!(html("<pre>\n  x\n</pre>"), "<pre>\n  x\n</pre>");
    }

    #[test]
    fn test_preserve_whitespace_and_drop_comments() {
        let options = RenderOptions {
            whitespace: WhitespaceStrategy::Preserve,
            comments: false,
            ..RenderOptions::default()
        };
        let doc = parse_document("<ul>\n<!-- x --><li></li>\n</ul>", &options).unwrap();
        assert_eq!(
            doc.to_html(doc.root().unwrap()),
            "<ul>\n<li></li>\n</ul>"
        );
    }

    #[test]
    fn test_comments_kept_by_default() {
        assert_eq!(html("<div><!-- note --></div>"), "<div><!-- note --></div>");
    }

    #[test]
    fn test_unexpected_closing_tag() {
        let (doc, errors) = parse_markup("<div></span></div>", &RenderOptions::default());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, ErrorCode::UnexpectedClosingTag);
        assert_eq!(errors[0].offset, 5);
        assert_eq!(errors[0].to_string(), "Invalid end tag. at 1:6");
        assert_eq!(doc.to_html(doc.root().unwrap()), "<div></div>");
    }

    #[test]
    fn test_unclosed_elements() {
        let (doc, errors) = parse_markup("<div>\n  <p>text</div>", &RenderOptions::default());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, ErrorCode::UnclosedElement);
        assert_eq!((errors[0].line, errors[0].column), (2, 3));
        assert_eq!(doc.to_html(doc.root().unwrap()), "<div><p>text</p></div>");

        let err = parse_document("<section>", &RenderOptions::default()).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnclosedElement);
        assert_eq!(err.offset, 0);
    }

    #[test]
    fn test_closing_tag_is_case_insensitive() {
        assert_eq!(html("<DIV>x</div>"), "<DIV>x</DIV>");
    }

    #[test]
    fn test_deep_nesting_is_flattened() {
        let depth = 50_000;
        let source = "<b>".repeat(depth) + "x" + &"</b>".repeat(depth);
        let (doc, errors) = parse_markup(&source, &RenderOptions::default());

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, ErrorCode::NestingTooDeep);
        assert_eq!(errors[0].offset, MAX_ELEMENT_DEPTH * "<b>".len());
        let html = doc.to_html(doc.root().unwrap());
        assert_eq!(html.matches("<b>").count(), depth);
        assert!(html.ends_with(&"</b>".repeat(MAX_ELEMENT_DEPTH)));

        let err = parse_document(&source, &RenderOptions::default()).unwrap_err();
        assert_eq!(err.code, ErrorCode::NestingTooDeep);
    }

    #[test]
    fn test_nesting_at_limit_is_kept() {
        let source = "<i>".repeat(MAX_ELEMENT_DEPTH) + &"</i>".repeat(MAX_ELEMENT_DEPTH);
        assert_eq!(html(&source), source);
    }
}
