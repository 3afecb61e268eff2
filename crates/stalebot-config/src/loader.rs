//! Loading configuration documents from disk

use crate::{ConfigError, ConfigValidator, StaleConfig};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Default config location, relative to the repository checkout
pub const DEFAULT_CONFIG_PATH: &str = ".github/stale.yml";

/// Syntax of a configuration document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.yml` / `.yaml`
    Yaml,
    /// `.toml`
    Toml,
    /// `.json`
    Json,
}

impl ConfigFormat {
    /// Pick a format from the file extension (YAML when unknown)
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ConfigFormat::Toml,
            Some(ext) if ext.eq_ignore_ascii_case("json") => ConfigFormat::Json,
            _ => ConfigFormat::Yaml,
        }
    }

    /// Parse a document into an untyped value tree
    pub fn parse(&self, text: &str) -> Result<Value, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        let value = match self {
            ConfigFormat::Yaml => serde_yaml::from_str(text)?,
            ConfigFormat::Toml => toml::from_str(text)?,
            ConfigFormat::Json => serde_json::from_str(text)?,
        };
        Ok(value)
    }
}

/// Values supplied on the command line that replace global config keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CliOverrides {
    /// Replaces `daysUntilStale`
    pub days_until_stale: Option<u64>,
    /// Replaces `daysUntilClose`
    pub days_until_close: Option<u64>,
}

impl CliOverrides {
    /// Write the overrides into a raw document before validation
    pub fn apply(&self, document: &mut Value) {
        if self.days_until_stale.is_none() && self.days_until_close.is_none() {
            return;
        }
        if document.is_null() {
            *document = Value::Object(serde_json::Map::new());
        }
        if let Value::Object(map) = document {
            if let Some(days) = self.days_until_stale {
                map.insert("daysUntilStale".to_string(), Value::from(days));
            }
            if let Some(days) = self.days_until_close {
                map.insert("daysUntilClose".to_string(), Value::from(days));
            }
        }
    }
}

/// The raw text of a configuration file, kept for error annotations
#[derive(Debug, Clone)]
pub struct ConfigSource {
    /// Where the text came from
    pub path: PathBuf,
    /// File contents (empty when the file does not exist)
    pub text: String,
}

impl ConfigSource {
    /// Read a config file; a missing file is treated as empty
    pub fn read(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!("No config file at {}, using defaults", path.display());
                String::new()
            }
            Err(source) => return Err(ConfigError::Read { path, source }),
        };
        Ok(Self { path, text })
    }

    /// Wrap in-memory text (the path only selects the format)
    pub fn from_text(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    /// Parse, apply overrides, validate and resolve defaults
    pub fn resolve(&self, overrides: &CliOverrides) -> Result<StaleConfig, ConfigError> {
        let mut document = ConfigFormat::from_path(&self.path).parse(&self.text)?;
        overrides.apply(&mut document);
        ConfigValidator::default().validate(&document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("a/stale.yml")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("stale.TOML")), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("stale.json")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path(Path::new("stale")), ConfigFormat::Yaml);
    }

    #[test]
    fn test_overrides_replace_document_values() {
        let source = ConfigSource::from_text("stale.yml", "daysUntilStale: 10\n");
        let overrides = CliOverrides {
            days_until_stale: Some(2),
            days_until_close: Some(1),
        };
        let config = source.resolve(&overrides).unwrap();
        assert_eq!(config.global.days_until_stale, 2);
        assert_eq!(config.global.days_until_close.days(), Some(1));
    }

    #[test]
    fn test_overrides_on_empty_document() {
        let source = ConfigSource::from_text("stale.yml", "");
        let overrides = CliOverrides {
            days_until_stale: Some(5),
            days_until_close: None,
        };
        let config = source.resolve(&overrides).unwrap();
        assert_eq!(config.global.days_until_stale, 5);
    }

    #[test]
    fn test_yaml_syntax_error() {
        let source = ConfigSource::from_text("stale.yml", "daysUntilStale: [1, 2\n");
        assert!(matches!(
            source.resolve(&CliOverrides::default()),
            Err(ConfigError::Yaml(_))
        ));
    }
}
