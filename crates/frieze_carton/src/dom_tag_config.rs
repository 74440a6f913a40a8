//! HTML tag classification.

use phf::phf_set;

/// Elements that never have children or a closing tag.
pub static VOID_TAGS: phf::Set<&'static str> = phf_set! {
    "area", "base", "br", "col", "embed", "hr", "img", "input",
    "link", "meta", "param", "source", "track", "wbr",
};

/// Check whether `tag` is a void element (case-insensitive).
#[inline]
pub fn is_void_tag(tag: &str) -> bool {
    if tag.bytes().any(|b| b.is_ascii_uppercase()) {
        VOID_TAGS.contains(tag.to_ascii_lowercase().as_str())
    } else {
        VOID_TAGS.contains(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_void_tags() {
        assert!(is_void_tag("br"));
        assert!(is_void_tag("IMG"));
        assert!(!is_void_tag("div"));
        assert!(!is_void_tag("li"));
    }
}
