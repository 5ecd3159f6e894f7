//! Configuration types for docguard.
//!
//! Configuration is loaded once, tier minimums are applied, and the result is
//! shared read-only with the analyzer and the rule constructors.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration for docguard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tier whose minimums the rest of the configuration must meet
    /// (`bronze`, `silver`, `gold` or `platinum`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,

    /// Analyzer configuration.
    pub analyzer: AnalyzerConfig,

    /// `header` rule.
    pub header: HeaderConfig,

    /// `copyright` rule.
    pub copyright: CopyrightConfig,

    /// `doculint` rule.
    pub doculint: DoculintConfig,

    /// `todo` rule.
    pub todo: TodoConfig,

    /// `why` rule.
    pub why: ToggleConfig,

    /// `barenolint` rule.
    pub barenolint: ToggleConfig,
}

/// Source format of a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML (`docguard.yaml`, `.docguard.yaml`).
    Yaml,
    /// TOML (`docguard.toml`).
    Toml,
}

impl ConfigFormat {
    /// Picks the format from a file extension; anything but `.toml` is YAML.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::Toml,
            _ => Self::Yaml,
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a YAML or TOML file and applies tier
    /// minimums.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if it
    /// deviates from its tier's minimums.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content, ConfigFormat::from_path(path))
    }

    /// Parses configuration and applies tier minimums.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is invalid or deviates from its
    /// tier's minimums.
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        let mut config: Self = match format {
            ConfigFormat::Yaml if content.trim().is_empty() => Self::default(),
            ConfigFormat::Yaml => serde_yaml::from_str(content).map_err(|e| ConfigError::Parse {
                message: e.to_string(),
            })?,
            ConfigFormat::Toml => toml::from_str(content).map_err(|e| ConfigError::Parse {
                message: e.to_string(),
            })?,
        };
        config.apply_tier()?;
        Ok(config)
    }

    /// Parses YAML configuration.
    ///
    /// # Errors
    ///
    /// See [`Config::parse`].
    pub fn parse_yaml(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, ConfigFormat::Yaml)
    }

    /// Parses TOML configuration.
    ///
    /// # Errors
    ///
    /// See [`Config::parse`].
    pub fn parse_toml(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, ConfigFormat::Toml)
    }

    /// Checks if a rule is enabled. Unknown rules are enabled.
    #[must_use]
    pub fn is_rule_enabled(&self, rule_name: &str) -> bool {
        self.toggle(rule_name).map_or(true, |(enabled, _)| enabled)
    }

    /// Whether a rule reports warnings instead of errors.
    #[must_use]
    pub fn rule_warns(&self, rule_name: &str) -> bool {
        self.toggle(rule_name).is_some_and(|(_, warn)| warn)
    }

    fn toggle(&self, rule_name: &str) -> Option<(bool, bool)> {
        Some(match rule_name {
            "header" => (self.header.enabled, self.header.warn),
            "copyright" => (self.copyright.enabled, self.copyright.warn),
            "doculint" => (self.doculint.enabled, self.doculint.warn),
            "todo" => (self.todo.enabled, self.todo.warn),
            "why" => (self.why.enabled, self.why.warn),
            "barenolint" => (self.barenolint.enabled, self.barenolint.warn),
            _ => return None,
        })
    }
}

/// Analyzer-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Root directory to analyze (default: current directory).
    pub root: PathBuf,

    /// Glob patterns to exclude from analysis.
    pub exclude: Vec<String>,

    /// Build tags satisfied in addition to the host platform tags.
    pub build_tags: Vec<String>,

    /// Whether to respect .gitignore files.
    pub respect_gitignore: bool,

    /// Maximum number of packages analyzed in parallel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallelism: Option<usize>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            exclude: vec!["**/vendor/**".to_string(), "**/testdata/**".to_string()],
            build_tags: Vec::new(),
            respect_gitignore: true,
            parallelism: None,
        }
    }
}

/// Configuration of the `header` rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderConfig {
    /// Whether the rule runs.
    pub enabled: bool,
    /// Report warnings instead of errors.
    pub warn: bool,
    /// Fields required in the file header, in reporting order.
    pub fields: Vec<String>,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            warn: false,
            fields: vec!["Description".to_string()],
        }
    }
}

/// Configuration of the `copyright` rule.
///
/// With neither `text` nor `pattern` set the rule has nothing to check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CopyrightConfig {
    /// Whether the rule runs.
    pub enabled: bool,
    /// Report warnings instead of errors.
    pub warn: bool,
    /// Literal copyright line.
    pub text: String,
    /// Copyright regular expression; takes precedence over `text`.
    pub pattern: String,
}

impl Default for CopyrightConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            warn: false,
            text: String::new(),
            pattern: String::new(),
        }
    }
}

/// Configuration of the `doculint` rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct DoculintConfig {
    /// Whether the rule runs.
    pub enabled: bool,
    /// Report warnings instead of errors.
    pub warn: bool,
    /// Functions spanning fewer lines need no doc comment.
    pub min_fun_len: usize,
    /// Validate package comments and names.
    pub validate_packages: bool,
    /// Validate function comments.
    pub validate_functions: bool,
    /// Validate variable comments.
    pub validate_variables: bool,
    /// Validate constant comments.
    pub validate_constants: bool,
    /// Validate type comments.
    pub validate_types: bool,
    /// Validate package comments of `main` packages too.
    pub force_main_package: bool,
}

impl Default for DoculintConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            warn: false,
            min_fun_len: 10,
            validate_packages: true,
            validate_functions: true,
            validate_variables: true,
            validate_constants: true,
            validate_types: true,
            force_main_package: false,
        }
    }
}

/// Configuration of the `todo` rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TodoConfig {
    /// Whether the rule runs.
    pub enabled: bool,
    /// Report warnings instead of errors.
    pub warn: bool,
    /// Require the `[TICKET-1]` part of a TODO.
    pub require_ticket: bool,
}

impl Default for TodoConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            warn: false,
            require_ticket: false,
        }
    }
}

/// Configuration of a rule without options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToggleConfig {
    /// Whether the rule runs.
    pub enabled: bool,
    /// Report warnings instead of errors.
    pub warn: bool,
}

impl Default for ToggleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            warn: false,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// The configuration is less strict than its tier allows.
    #[error("deviation detected from {tier} tier minimum defaults in {field}, {message}")]
    TierDeviation {
        /// Tier name.
        tier: String,
        /// Offending field path.
        field: &'static str,
        /// What the field must satisfy.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_everything() {
        let config = Config::default();
        for rule in ["header", "copyright", "doculint", "todo", "why", "barenolint"] {
            assert!(config.is_rule_enabled(rule), "{rule}");
            assert!(!config.rule_warns(rule), "{rule}");
        }
        assert_eq!(config.doculint.min_fun_len, 10);
        assert_eq!(config.header.fields, vec!["Description"]);
        assert!(config.analyzer.respect_gitignore);
    }

    #[test]
    fn unknown_rules_are_enabled() {
        assert!(Config::default().is_rule_enabled("errorlint"));
        assert!(!Config::default().rule_warns("errorlint"));
    }

    #[test]
    fn parse_yaml_partial_sections() {
        let config = Config::parse_yaml(
            r"
doculint:
  min_fun_len: 5
  validate_types: false
todo:
  warn: true
analyzer:
  build_tags: [integration]
",
        )
        .unwrap();

        assert_eq!(config.doculint.min_fun_len, 5);
        assert!(!config.doculint.validate_types);
        assert!(config.doculint.validate_functions);
        assert!(config.rule_warns("todo"));
        assert!(config.is_rule_enabled("todo"));
        assert_eq!(config.analyzer.build_tags, vec!["integration"]);
    }

    #[test]
    fn parse_toml() {
        let config = Config::parse_toml(
            r#"
[copyright]
pattern = "^Copyright 20.*$"

[why]
enabled = false
"#,
        )
        .unwrap();

        assert_eq!(config.copyright.pattern, "^Copyright 20.*$");
        assert!(!config.is_rule_enabled("why"));
    }

    #[test]
    fn empty_yaml_is_default() {
        assert_eq!(Config::parse_yaml("  \n").unwrap(), Config::default());
    }

    #[test]
    fn invalid_content_is_a_parse_error() {
        let err = Config::parse_yaml("doculint: [").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        let err = Config::parse_toml("doculint = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn format_from_path() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("docguard.toml")),
            ConfigFormat::Toml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new(".docguard.yaml")),
            ConfigFormat::Yaml
        );
    }

    #[test]
    fn from_file_missing_is_io_error() {
        let err = Config::from_file(Path::new("/nonexistent/docguard.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
