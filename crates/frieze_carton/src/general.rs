//! General-purpose helpers shared across crates.

/// Check whether `s` is a single identifier: `[A-Za-z_$][A-Za-z0-9_$]*`.
///
/// Loop variables of a repeat expression and scope variable names must pass
/// this check.
#[inline]
pub fn is_simple_identifier(s: &str) -> bool {
    let mut bytes = s.bytes();
    match bytes.next() {
        Some(b) if is_identifier_start(b) => bytes.all(is_identifier_part),
        _ => false,
    }
}

/// First byte of an identifier.
#[inline]
pub const fn is_identifier_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$'
}

/// Any subsequent byte of an identifier.
#[inline]
pub const fn is_identifier_part(b: u8) -> bool {
    is_identifier_start(b) || b.is_ascii_digit()
}

/// Escape text for use inside an HTML text node.
pub fn escape_html_text(s: &str) -> String {
    escape(s, false)
}

/// Escape text for use inside a double-quoted HTML attribute value.
pub fn escape_html_attr(s: &str) -> String {
    escape(s, true)
}

fn escape(s: &str, quote: bool) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if quote => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_identifier() {
        assert!(is_simple_identifier("book"));
        assert!(is_simple_identifier("$index"));
        assert!(is_simple_identifier("_item2"));
        assert!(!is_simple_identifier(""));
        assert!(!is_simple_identifier("2item"));
        assert!(!is_simple_identifier("a.b"));
        assert!(!is_simple_identifier("(item, i)"));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape_html_text("a < b & c"), "a &lt; b &amp; c");
        assert_eq!(escape_html_text("\"q\""), "\"q\"");
        assert_eq!(escape_html_attr("\"q\""), "&quot;q&quot;");
    }
}
