//! Detect command implementation
//!
//! This module implements the `detect` command for scanning a dataset
//! and printing a PII detection report.

use crate::config::EngineConfig;
use crate::detection::{DatasetDetector, PatternRegistry};
use crate::domain::{Row, Schema};
use anyhow::Context;
use clap::Args;
use std::path::Path;
use std::sync::Arc;

/// Arguments for the detect command
#[derive(Args, Debug)]
pub struct DetectArgs {
    /// Path to a JSON file containing an array of row objects
    pub input: String,

    /// Print the report as JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Override the pattern library file
    #[arg(long)]
    pub patterns: Option<String>,
}

impl DetectArgs {
    /// Execute the detect command
    pub fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(input = %self.input, "Starting detect command");

        let mut config = load_engine_config(config_path)?;
        if let Some(ref patterns) = self.patterns {
            config.detection.pattern_library = Some(patterns.into());
        }

        let rows = load_rows(&self.input)?;
        let schema = Schema::infer(&rows, config.detection.sample_size);

        let registry = build_registry(&config)?;
        let detector = DatasetDetector::with_registry(Arc::new(registry));
        let report = detector.detect(&rows, &schema);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(if report.has_pii { 1 } else { 0 });
        }

        println!("🔍 Detection Report: {}", self.input);
        println!();
        println!("  Records scanned: {}", rows.len());
        println!("  Columns scanned: {}", schema.len());
        println!("  PII detected: {}", if report.has_pii { "yes" } else { "no" });
        println!("  Risk level: {:?}", report.risk_level);
        println!();

        if !report.findings.is_empty() {
            println!("  Findings:");
            for finding in &report.findings {
                println!(
                    "    - {} [{}] confidence {:.2}, {} matching values (e.g. {})",
                    finding.column,
                    finding.category.label(),
                    finding.confidence,
                    finding.match_count,
                    finding.sample_value_masked
                );
            }
            println!();
        }

        if !report.recommendations.is_empty() {
            println!("  Recommendations:");
            for rec in &report.recommendations {
                println!("    - {rec}");
            }
            println!();
        }

        Ok(if report.has_pii { 1 } else { 0 })
    }
}

/// Load engine configuration, falling back to defaults when the file
/// does not exist
pub(crate) fn load_engine_config(config_path: &str) -> anyhow::Result<EngineConfig> {
    let mut config = if Path::new(config_path).exists() {
        EngineConfig::from_file(config_path)
            .with_context(|| format!("Failed to load config {config_path}"))?
    } else {
        tracing::debug!(config_path = %config_path, "Config file not found, using defaults");
        EngineConfig::default()
    };
    config.apply_env_overrides()?;
    config.validate()?;
    Ok(config)
}

/// Read a JSON array of row objects
pub(crate) fn load_rows(path: &str) -> anyhow::Result<Vec<Row>> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))?;
    let rows: Vec<Row> =
        serde_json::from_str(&content).with_context(|| format!("Failed to parse {path}"))?;
    Ok(rows)
}

/// Build the pattern registry from configuration
pub(crate) fn build_registry(config: &EngineConfig) -> anyhow::Result<PatternRegistry> {
    let mut registry = match config.detection.pattern_library {
        Some(ref path) => PatternRegistry::from_file(path)
            .with_context(|| format!("Failed to load pattern library {}", path.display()))?,
        None => PatternRegistry::default_patterns()?,
    };
    registry.set_detection_threshold(config.detection.threshold);
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_detect_args_defaults() {
        let args = DetectArgs {
            input: "rows.json".to_string(),
            json: false,
            patterns: None,
        };
        assert!(!args.json);
        assert!(args.patterns.is_none());
    }

    #[test]
    fn test_load_rows_valid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"email": "a@b.com"}}, {{"email": "c@d.com"}}]"#).unwrap();
        let rows = load_rows(file.path().to_str().unwrap()).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_load_rows_missing_file() {
        assert!(load_rows("/nonexistent/rows.json").is_err());
    }

    #[test]
    fn test_load_engine_config_missing_file_uses_defaults() {
        let config = load_engine_config("/nonexistent/cloak.toml").unwrap();
        assert_eq!(config.detection.threshold, 0.5);
    }
}
