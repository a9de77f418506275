// Feature configuration file loaders

use crate::{ConfigError, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tombola_log::debug;

/// Supported feature file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Toml,
}

impl FileFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(FileFormat::Json),
            "toml" => Some(FileFormat::Toml),
            _ => None,
        }
    }
}

/// Reads raw feature configuration into the JSON value model used by the
/// registry. TOML documents are converted so both formats normalize the same way.
pub struct FeatureLoader {
    format: FileFormat,
}

impl FeatureLoader {
    pub fn new(format: FileFormat) -> Self {
        Self { format }
    }

    /// Pick the format from the file extension
    pub fn auto(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| {
                ConfigError::UnsupportedFormat(format!("{} has no extension", path.display()))
            })?;

        let format = FileFormat::from_extension(ext)
            .ok_or_else(|| ConfigError::UnsupportedFormat(ext.to_string()))?;

        Ok(Self::new(format))
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }

    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<Value> {
        let path = path.as_ref();
        debug!(target: "tombola::config", "reading {}", path.display());
        let content = fs::read_to_string(path)?;

        self.parse(&content)
    }

    pub fn parse(&self, content: &str) -> Result<Value> {
        match self.format {
            FileFormat::Json => serde_json::from_str(content)
                .map_err(|e| ConfigError::ParseError(format!("JSON parse error: {}", e))),
            FileFormat::Toml => {
                let table: toml::Table = toml::from_str(content)
                    .map_err(|e| ConfigError::ParseError(format!("TOML parse error: {}", e)))?;
                serde_json::to_value(table).map_err(|e| {
                    ConfigError::ParseError(format!("TOML to JSON conversion error: {}", e))
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_keeps_order() {
        let loader = FeatureLoader::new(FileFormat::Json);
        let value = loader
            .parse(r#"{"zeta": true, "alpha": {"b": 20, "a": 80}}"#)
            .unwrap();

        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
        let variants: Vec<&String> = value["alpha"].as_object().unwrap().keys().collect();
        assert_eq!(variants, vec!["b", "a"]);
    }

    #[test]
    fn test_parse_toml() {
        let loader = FeatureLoader::new(FileFormat::Toml);
        let value = loader
            .parse(
                r#"
                new_checkout = true
                dark_mode = 25
                button_color = ["red", "green"]

                [pricing]
                control = 50
                discount = 50
                "#,
            )
            .unwrap();

        assert_eq!(value["new_checkout"], serde_json::json!(true));
        assert_eq!(value["dark_mode"], serde_json::json!(25));
        assert_eq!(value["button_color"][1], serde_json::json!("green"));
        assert_eq!(value["pricing"]["discount"], serde_json::json!(50));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            FeatureLoader::new(FileFormat::Json).parse("{not json"),
            Err(ConfigError::ParseError(_))
        ));
        assert!(matches!(
            FeatureLoader::new(FileFormat::Toml).parse("= nope"),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_unreadable_file_is_io_error() {
        let result = FeatureLoader::new(FileFormat::Json).load_file("/nonexistent/features.json");
        match result {
            Err(ConfigError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            other => panic!("expected Io error, got {:?}", other),
        }
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(FileFormat::from_extension("JSON"), Some(FileFormat::Json));
        assert_eq!(FileFormat::from_extension("toml"), Some(FileFormat::Toml));
        assert_eq!(FileFormat::from_extension("yaml"), None);

        assert_eq!(FeatureLoader::auto("features.toml").unwrap().format(), FileFormat::Toml);
        assert!(matches!(
            FeatureLoader::auto("features"),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }
}
