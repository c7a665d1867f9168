//! Configuration management for Cloak.
//!
//! TOML-based configuration with environment-variable overrides
//! (`CLOAK_*`) and validation. All thresholds and policies the engine
//! uses are passed in explicitly; nothing is read from global state at
//! processing time.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use cloak::config::EngineConfig;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut config = EngineConfig::from_file("cloak.toml")?;
//! config.apply_env_overrides()?;
//! config.validate()?;
//! # Ok(())
//! # }
//! ```

use crate::domain::{CloakError, Result};
use crate::transform::ParseFailurePolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub detection: DetectionConfig,
    pub transform: TransformConfig,
    pub audit: AuditConfig,
    pub logging: LoggingConfig,
}

impl EngineConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            CloakError::Configuration(format!(
                "Failed to read config {}: {e}",
                path.as_ref().display()
            ))
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `CLOAK_*` environment-variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("CLOAK_DETECTION_THRESHOLD") {
            self.detection.threshold = val.parse().map_err(|_| {
                CloakError::Configuration(format!("Invalid CLOAK_DETECTION_THRESHOLD: {val}"))
            })?;
        }
        if let Ok(val) = std::env::var("CLOAK_PATTERN_LIBRARY") {
            self.detection.pattern_library = Some(PathBuf::from(val));
        }
        if let Ok(val) = std::env::var("CLOAK_ON_PARSE_FAILURE") {
            self.transform.on_parse_failure = match val.to_lowercase().as_str() {
                "pass_through" => ParseFailurePolicy::PassThrough,
                "strict" => ParseFailurePolicy::Strict,
                _ => {
                    return Err(CloakError::Configuration(format!(
                        "Invalid CLOAK_ON_PARSE_FAILURE: {val}"
                    )))
                }
            };
        }
        if let Ok(val) = std::env::var("CLOAK_SEED") {
            self.transform.seed = Some(val.parse().map_err(|_| {
                CloakError::Configuration(format!("Invalid CLOAK_SEED: {val}"))
            })?);
        }
        if let Ok(val) = std::env::var("CLOAK_AUDIT_ENABLED") {
            self.audit.enabled = val.parse().map_err(|_| {
                CloakError::Configuration(format!("Invalid CLOAK_AUDIT_ENABLED: {val}"))
            })?;
        }
        if let Ok(val) = std::env::var("CLOAK_AUDIT_LOG_PATH") {
            self.audit.log_path = PathBuf::from(val);
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.detection.threshold) {
            return Err(CloakError::Configuration(format!(
                "detection.threshold must be within [0, 1], got {}",
                self.detection.threshold
            )));
        }
        if self.detection.sample_size == 0 {
            return Err(CloakError::Configuration(
                "detection.sample_size must be positive".to_string(),
            ));
        }
        if let Some(ref path) = self.detection.pattern_library {
            if !path.exists() {
                return Err(CloakError::Configuration(format!(
                    "Pattern library file not found: {}",
                    path.display()
                )));
            }
            if path.extension().and_then(|s| s.to_str()) != Some("toml") {
                return Err(CloakError::Configuration(format!(
                    "Pattern library must be a TOML file: {}",
                    path.display()
                )));
            }
        }
        if !(1..=3).contains(&self.transform.generalization_level) {
            return Err(CloakError::Configuration(format!(
                "transform.generalization_level must be 1, 2, or 3, got {}",
                self.transform.generalization_level
            )));
        }
        if self.transform.bucket_size <= 0.0 {
            return Err(CloakError::Configuration(
                "transform.bucket_size must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Starter TOML written by `cloak init`
    pub fn template() -> &'static str {
        r#"# Cloak configuration

[detection]
# Minimum confidence for a column to count as PII
threshold = 0.5
# Non-null values sampled per column
sample_size = 100
# Optional external pattern catalog (TOML); the built-in catalog is
# used when unset
# pattern_library = "patterns/pii_patterns.toml"

[transform]
# pass_through: unparseable generalization input is returned unchanged
# strict: unparseable input aborts the run
on_parse_failure = "pass_through"
# Date generalization level: 1 = year, 2 = month-year, 3 = quarter
generalization_level = 1
# Bucket width for numeric generalization
bucket_size = 10.0
# Fixed RNG seed for reproducible substitution (unset = random)
# seed = 42

[audit]
enabled = true
log_path = "./audit/runs.log"
json_format = true

[logging]
level = "info"
json = false
# file_path = "./logs/cloak.log"
"#
    }
}

/// Detection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Minimum confidence for a column to count as PII
    pub threshold: f64,
    /// Non-null values sampled per column
    pub sample_size: usize,
    /// External pattern catalog; built-in catalog when unset
    pub pattern_library: Option<PathBuf>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            sample_size: 100,
            pattern_library: None,
        }
    }
}

/// Transform settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    pub on_parse_failure: ParseFailurePolicy,
    pub generalization_level: u8,
    pub bucket_size: f64,
    /// Fixed RNG seed for reproducible substitution
    pub seed: Option<u64>,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            on_parse_failure: ParseFailurePolicy::PassThrough,
            generalization_level: 1,
            bucket_size: 10.0,
            seed: None,
        }
    }
}

/// Audit logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub enabled: bool,
    pub log_path: PathBuf,
    pub json_format: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_path: PathBuf::from("./audit/runs.log"),
            json_format: true,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// JSON console output instead of pretty
    pub json: bool,
    /// Optional log file (daily rotation)
    pub file_path: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.detection.threshold, 0.5);
        assert_eq!(config.detection.sample_size, 100);
        assert_eq!(
            config.transform.on_parse_failure,
            ParseFailurePolicy::PassThrough
        );
        assert!(config.audit.enabled);
    }

    #[test]
    fn test_template_parses_and_validates() {
        let config = EngineConfig::from_toml(EngineConfig::template()).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = EngineConfig::from_toml(
            r#"
            [detection]
            threshold = 0.7
            "#,
        )
        .unwrap();
        assert_eq!(config.detection.threshold, 0.7);
        assert_eq!(config.detection.sample_size, 100);
    }

    #[test]
    fn test_threshold_out_of_range_rejected() {
        let mut config = EngineConfig::default();
        config.detection.threshold = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_generalization_level_rejected() {
        let mut config = EngineConfig::default();
        config.transform.generalization_level = 7;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_pattern_library_rejected() {
        let mut config = EngineConfig::default();
        config.detection.pattern_library = Some(PathBuf::from("/nonexistent/patterns.toml"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_strict_policy_from_toml() {
        let config = EngineConfig::from_toml(
            r#"
            [transform]
            on_parse_failure = "strict"
            "#,
        )
        .unwrap();
        assert_eq!(config.transform.on_parse_failure, ParseFailurePolicy::Strict);
    }
}
