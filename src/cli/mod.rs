//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Cloak using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Cloak - PII detection and anonymization for tabular data
#[derive(Parser, Debug)]
#[command(name = "cloak")]
#[command(version, about, long_about = None)]
#[command(author = "Cloak Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "cloak.toml", env = "CLOAK_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "CLOAK_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a dataset for PII and print a detection report
    Detect(commands::detect::DetectArgs),

    /// Apply a privacy decision (include / exclude / anonymize) to a dataset
    Process(commands::process::ProcessArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
