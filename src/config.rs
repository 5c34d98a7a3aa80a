//! Engine configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! the base layer; a user file only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [source]
//! posts = "posts.json"      # Post array, relative to the working directory
//!
//! [search]
//! mode = "scored"           # "scored" (weighted) or "simple" (load order)
//! debounce_ms = 300         # Quiet period before a typed search runs
//!
//! [search.weights]
//! title = 10
//! excerpt = 5
//! tags = 4
//! category = 3
//! content = 2
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::query::{SearchMode, SearchSettings, SearchWeights};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Upper bound for the debounce window. Anything longer reads as a hang.
const MAX_DEBOUNCE_MS: u64 = 10_000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Engine configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Where the post array comes from.
    pub source: SourceConfig,
    /// Search mode, weights, and input debounce.
    pub search: SearchConfig,
}

impl AppConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.posts.trim().is_empty() {
            return Err(ConfigError::Validation(
                "source.posts must not be empty".into(),
            ));
        }
        if self.search.debounce_ms == 0 || self.search.debounce_ms > MAX_DEBOUNCE_MS {
            return Err(ConfigError::Validation(format!(
                "search.debounce_ms must be 1-{MAX_DEBOUNCE_MS}"
            )));
        }
        let w = &self.search.weights;
        for (name, value) in [
            ("title", w.title),
            ("excerpt", w.excerpt),
            ("tags", w.tags),
            ("category", w.category),
            ("content", w.content),
        ] {
            if value == 0 {
                return Err(ConfigError::Validation(format!(
                    "search.weights.{name} must be greater than zero"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    /// Path to the JSON post array.
    pub posts: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            posts: "posts.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    pub mode: SearchMode,
    /// Milliseconds of input quiet before a search runs.
    pub debounce_ms: u64,
    pub weights: SearchWeights,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            mode: SearchMode::default(),
            debounce_ms: 300,
            weights: SearchWeights::default(),
        }
    }
}

impl SearchConfig {
    pub fn settings(&self) -> SearchSettings {
        SearchSettings {
            mode: self.mode,
            weights: self.weights,
        }
    }

    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer that user overrides are merged onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(AppConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<AppConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: AppConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from the file at `path`, falling back to defaults when absent.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# post-index configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Post source
# ---------------------------------------------------------------------------
[source]
# JSON array of posts. Relative paths resolve against the working directory.
posts = "posts.json"

# ---------------------------------------------------------------------------
# Search
# ---------------------------------------------------------------------------
[search]
# "scored": rank by weighted field matches, highest first.
# "simple": keep every match in load order.
mode = "scored"

# Quiet period (milliseconds) after the last keystroke before a search runs.
# Must be between 1 and 10000.
debounce_ms = 300

# Points a post earns when the term appears in each field. A field counts
# once no matter how often the term appears. All weights must be > 0.
[search.weights]
title = 10
excerpt = 5
tags = 4
category = 3
content = 2
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = AppConfig::default();
        assert_eq!(config.source.posts, "posts.json");
        assert_eq!(config.search.mode, SearchMode::Scored);
        assert_eq!(config.search.debounce_ms, 300);
        assert_eq!(config.search.weights, SearchWeights::default());
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[search.weights]
title = 20
"#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.search.weights.title, 20);
        // Default values preserved
        assert_eq!(config.search.weights.excerpt, 5);
        assert_eq!(config.search.debounce_ms, 300);
        assert_eq!(config.source.posts, "posts.json");
    }

    #[test]
    fn parse_simple_mode() {
        let config: AppConfig = toml::from_str("[search]\nmode = \"simple\"").unwrap();
        assert_eq!(config.search.mode, SearchMode::Simple);
        assert_eq!(config.search.settings().mode, SearchMode::Simple);
    }

    #[test]
    fn unknown_mode_rejected() {
        let result: Result<AppConfig, _> = toml::from_str("[search]\nmode = \"fuzzy\"");
        assert!(result.is_err());
    }

    #[test]
    fn debounce_window_from_ms() {
        let config = SearchConfig {
            debounce_ms: 150,
            ..Default::default()
        };
        assert_eq!(config.debounce_window(), Duration::from_millis(150));
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("config.toml")).unwrap();
        assert_eq!(config.search.debounce_ms, 300);
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(
            &path,
            r#"
[source]
posts = "data/posts.json"

[search]
debounce_ms = 500
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.source.posts, "data/posts.json");
        assert_eq!(config.search.debounce_ms, 500);
        // Unspecified values should be defaults
        assert_eq!(config.search.mode, SearchMode::Scored);
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "this is not valid toml [[[").unwrap();

        let result = load_config(&path);
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[search]\ndebounce_ms = 0\n").unwrap();

        let result = load_config(&path);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str(r#"debounce_ms = 300"#).unwrap();
        let overlay: toml::Value = toml::from_str(r#"debounce_ms = 100"#).unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("debounce_ms").unwrap().as_integer(), Some(100));
    }

    #[test]
    fn merge_toml_deep_nested() {
        let base = stock_defaults_value();
        let overlay: toml::Value = toml::from_str(
            r#"
[search.weights]
content = 7
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let weights = merged.get("search").unwrap().get("weights").unwrap();
        assert_eq!(weights.get("content").unwrap().as_integer(), Some(7));
        assert_eq!(weights.get("title").unwrap().as_integer(), Some(10));
    }

    // =========================================================================
    // Unknown key rejection tests
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let result: Result<AppConfig, _> = toml::from_str("[search]\ndebounce = 300\n");
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<AppConfig, _> = toml::from_str("[serch]\nmode = \"simple\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_weight_rejected() {
        let result: Result<AppConfig, _> = toml::from_str("[search.weights]\nauthor = 1\n");
        assert!(result.is_err());
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_debounce_bounds() {
        let mut config = AppConfig::default();
        config.search.debounce_ms = MAX_DEBOUNCE_MS;
        assert!(config.validate().is_ok());

        config.search.debounce_ms = MAX_DEBOUNCE_MS + 1;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("debounce_ms"));
    }

    #[test]
    fn validate_zero_weight() {
        let mut config = AppConfig::default();
        config.search.weights.tags = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("search.weights.tags"));
    }

    #[test]
    fn validate_empty_posts_path() {
        let mut config = AppConfig::default();
        config.source.posts = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn resolve_config_rejects_invalid_values() {
        let base = stock_defaults_value();
        let overlay: toml::Value = toml::from_str("[search.weights]\ntitle = 0\n").unwrap();
        let result = resolve_config(base, Some(overlay));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // stock_config_toml tests
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: AppConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config.source.posts, "posts.json");
        assert_eq!(config.search.mode, SearchMode::Scored);
        assert_eq!(config.search.debounce_ms, 300);
        assert_eq!(config.search.weights, SearchWeights::default());
    }

    #[test]
    fn stock_config_toml_contains_all_sections() {
        let content = stock_config_toml();
        assert!(content.contains("[source]"));
        assert!(content.contains("[search]"));
        assert!(content.contains("[search.weights]"));
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let val = stock_defaults_value();
        assert!(val.is_table());
        assert!(val.get("source").is_some());
        assert!(val.get("search").is_some());
    }
}
