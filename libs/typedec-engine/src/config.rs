use serde::Deserialize;

use crate::error::DecodeError;

/// Root configuration, parsed from TOML. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub registry: RegistryConfig,

    #[serde(default)]
    pub logical: LogicalConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistryConfig {
    /// Type names to leave unregistered (`"duration"`, `"udt"`, ...).
    /// Decoding them fails with `UnsupportedType`.
    #[serde(default)]
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogicalConfig {
    /// chrono format string for rendering `date` values.
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

impl Default for LogicalConfig {
    fn default() -> Self {
        Self { date_format: default_date_format() }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self, DecodeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| DecodeError::Config(format!("{path}: {e}")))?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(toml_str: &str) -> Result<Self, DecodeError> {
        toml::from_str(toml_str).map_err(|e| DecodeError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config = EngineConfig::parse("").unwrap();
        assert!(config.registry.exclude.is_empty());
        assert_eq!(config.logical.date_format, "%Y-%m-%d");
    }

    #[test]
    fn parses_sections() {
        let config = EngineConfig::parse(
            r#"
            [registry]
            exclude = ["duration", "udt"]

            [logical]
            date_format = "%d.%m.%Y"
            "#,
        )
        .unwrap();
        assert_eq!(config.registry.exclude, vec!["duration", "udt"]);
        assert_eq!(config.logical.date_format, "%d.%m.%Y");
    }

    #[test]
    fn bad_toml_is_config_error() {
        let err = EngineConfig::parse("[registry\nexclude = 1").unwrap_err();
        assert!(matches!(err, DecodeError::Config(_)));
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = EngineConfig::load("/nonexistent/typedec.toml").unwrap_err();
        assert!(err.to_string().starts_with("config error: /nonexistent/typedec.toml: "));
    }
}
