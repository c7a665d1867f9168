// Cloak - PII Detection and Anonymization Engine
// Copyright (c) 2025 Cloak Contributors
// Licensed under the MIT License

use clap::Parser;
use cloak::cli::{Cli, Commands};
use cloak::config::LoggingConfig;
use cloak::logging::init_logging;
use std::process;

fn main() {
    // Load environment variables from .env file if present
    // This is optional - if .env doesn't exist, it's silently ignored
    let _ = dotenvy::dotenv();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Console-only logging for the CLI; file logging is a config concern
    let logging_config = LoggingConfig {
        level: cli.log_level.clone().unwrap_or_else(|| "info".to_string()),
        json: false,
        file_path: None,
    };
    let _guard = match init_logging(&logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(5);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Cloak - PII Detection and Anonymization Engine"
    );

    // Execute command and get exit code
    let exit_code = match execute_command(&cli) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            5 // Fatal error exit code
        }
    };

    process::exit(exit_code);
}

/// Execute the CLI command
fn execute_command(cli: &Cli) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Detect(args) => args.execute(&cli.config),
        Commands::Process(args) => args.execute(&cli.config),
        Commands::ValidateConfig(args) => args.execute(&cli.config),
        Commands::Init(args) => args.execute(),
    }
}
