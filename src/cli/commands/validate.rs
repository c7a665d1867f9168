//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Cloak configuration file.

use crate::config::EngineConfig;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let mut config = match EngineConfig::from_file(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        if let Err(e) = config.apply_env_overrides() {
            println!("❌ Invalid environment override");
            println!("   Error: {e}");
            return Ok(2);
        }

        match config.validate() {
            Ok(_) => {
                println!("✅ Configuration is valid");
                println!();
                println!("Configuration Summary:");
                println!("  Detection Threshold: {}", config.detection.threshold);
                println!("  Sample Size: {}", config.detection.sample_size);
                println!(
                    "  Pattern Library: {}",
                    config
                        .detection
                        .pattern_library
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "built-in".to_string())
                );
                println!(
                    "  Parse Failure Policy: {:?}",
                    config.transform.on_parse_failure
                );
                println!(
                    "  Generalization Level: {}",
                    config.transform.generalization_level
                );
                println!("  Bucket Size: {}", config.transform.bucket_size);
                println!("  Audit Enabled: {}", config.audit.enabled);
                println!("  Audit Log: {}", config.audit.log_path.display());
                println!("  Log Level: {}", config.logging.level);
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                Ok(2) // Configuration error exit code
            }
        }
    }
}
