//! Configuration file loading for frieze.
//!
//! Reads `frieze.config.json` from the current working directory, or from
//! an explicit path. Missing files mean defaults; unreadable or malformed
//! files are reported as warnings and also fall back to defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

use frieze_relief::RenderOptions;

/// Default file name looked up in the working directory.
pub const CONFIG_FILE: &str = "frieze.config.json";

/// Top-level frieze configuration.
#[derive(Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FriezeConfig {
    /// JSON Schema reference (for editor autocompletion).
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Options for parsing, compiling and rendering templates.
    #[serde(default)]
    pub render: RenderOptions,
}

/// Parse configuration text.
pub fn parse_config(content: &str) -> Result<FriezeConfig, serde_json::Error> {
    serde_json::from_str(content)
}

/// Load the configuration at `path`, or `frieze.config.json` in the current
/// directory when `path` is `None`.
pub fn load_config(path: Option<&Path>) -> FriezeConfig {
    let explicit = path.is_some();
    let config_path = path.map(Path::to_path_buf).unwrap_or_else(|| {
        std::env::current_dir()
            .unwrap_or_default()
            .join(CONFIG_FILE)
    });

    if !config_path.exists() {
        if explicit {
            warn!(path = %config_path.display(), "config file not found, using defaults");
        }
        return FriezeConfig::default();
    }

    read_config(&config_path)
}

fn read_config(config_path: &Path) -> FriezeConfig {
    match std::fs::read_to_string(config_path) {
        Ok(content) => match parse_config(&content) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %config_path.display(), error = %e, "failed to parse config");
                FriezeConfig::default()
            }
        },
        Err(e) => {
            warn!(path = %config_path.display(), error = %e, "failed to read config");
            FriezeConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frieze_relief::WhitespaceStrategy;

    #[test]
    fn test_full_config() {
        let config = parse_config(
            r#"{
              "$schema": "./frieze.schema.json",
              "render": { "indexAttribute": "data-i", "whitespace": "preserve", "comments": false }
            }"#,
        )
        .unwrap();
        assert_eq!(config.schema.as_deref(), Some("./frieze.schema.json"));
        assert_eq!(config.render.index_attribute, "data-i");
        assert_eq!(config.render.whitespace, WhitespaceStrategy::Preserve);
        assert!(!config.render.comments);
    }

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(parse_config("{}").unwrap(), FriezeConfig::default());
    }

    #[test]
    fn test_unknown_section_is_rejected() {
        assert!(parse_config(r#"{ "check": {} }"#).is_err());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let path = std::env::temp_dir().join("frieze-config-test-missing.json");
        assert_eq!(load_config(Some(&path)), FriezeConfig::default());
    }

    #[test]
    fn test_malformed_file_falls_back() {
        let path = std::env::temp_dir().join(format!(
            "frieze-config-test-malformed-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, "{ render: ").unwrap();
        let config = load_config(Some(&path));
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config, FriezeConfig::default());
    }
}
