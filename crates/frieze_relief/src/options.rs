//! Render options.

use frieze_carton::CompactString;
use serde::{Deserialize, Serialize};

/// Attribute stamped on every element the repeat directive generates.
pub const DEFAULT_INDEX_ATTRIBUTE: &str = "ng-index";

/// Options shared by the markup parser, the template compiler and the list
/// reconciler. Loaded from the `render` section of `frieze.config.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
    /// Attribute holding a repeated element's position.
    pub index_attribute: CompactString,
    /// How whitespace-only text is treated when parsing markup.
    pub whitespace: WhitespaceStrategy,
    /// Keep comments from the source markup.
    pub comments: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            index_attribute: CompactString::new(DEFAULT_INDEX_ATTRIBUTE),
            whitespace: WhitespaceStrategy::Condense,
            comments: true,
        }
    }
}

/// Whitespace handling strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WhitespaceStrategy {
    /// Drop whitespace-only text between tags and collapse runs elsewhere
    #[default]
    Condense,
    /// Keep text exactly as written
    Preserve,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config() {
        let options: RenderOptions =
            serde_json::from_str(r#"{"indexAttribute": "data-index"}"#).unwrap();
        assert_eq!(options.index_attribute, "data-index");
        assert_eq!(options.whitespace, WhitespaceStrategy::Condense);
        assert!(options.comments);
    }

    #[test]
    fn test_whitespace_names() {
        let options: RenderOptions =
            serde_json::from_str(r#"{"whitespace": "preserve", "comments": false}"#).unwrap();
        assert_eq!(options.whitespace, WhitespaceStrategy::Preserve);
        assert!(!options.comments);
    }
}
