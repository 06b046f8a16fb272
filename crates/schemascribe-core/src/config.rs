//! Configuration schema (schemascribe.toml)

use serde::{Deserialize, Serialize};

/// Default minimum confidence for implicit relationships
pub const DEFAULT_IMPLICIT_THRESHOLD: f64 = 0.7;

/// What to do when no strategy yields a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptySchemaPolicy {
    /// Return an empty schema plus a warning diagnostic
    Allow,

    /// Fail the parse
    Error,
}

impl Default for EmptySchemaPolicy {
    fn default() -> Self {
        Self::Allow
    }
}

/// Parser settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Run the pairwise similarity detector
    pub implicit_relationships: bool,

    /// Minimum score for an implicit relationship, in [0, 1]
    pub implicit_threshold: f64,

    /// Turn field-level FK references into explicit relationships
    pub promote_references: bool,

    /// Behavior when nothing could be extracted
    pub empty_schema: EmptySchemaPolicy,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            implicit_relationships: true,
            implicit_threshold: DEFAULT_IMPLICIT_THRESHOLD,
            promote_references: true,
            empty_schema: EmptySchemaPolicy::default(),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    /// Parser settings
    #[serde(default)]
    pub parser: ParserConfig,
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Self::from_toml(&contents)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.parser.implicit_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::InvalidValue(format!(
                "parser.implicit_threshold must be within [0, 1], got {}",
                threshold
            )));
        }
        Ok(())
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}
