// Cloak - PII Detection and Anonymization Engine
// Copyright (c) 2025 Cloak Contributors
// Licensed under the MIT License

//! # Cloak - PII Detection and Anonymization
//!
//! Cloak scans tabular datasets for personally identifiable information
//! and rewrites them according to a user decision: keep the data as-is,
//! drop the affected columns, or anonymize them in place.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Detecting** PII columns by combining column-name keywords with
//!   regex matches over sampled values
//! - **Transforming** values with masking, substitution, encryption,
//!   hashing, and generalization techniques
//! - **Orchestrating** include / exclude / anonymize decisions with
//!   per-column overrides and an optional reversal lookup table
//! - **Auditing** every processing run without logging plaintext PII
//!
//! ## Architecture
//!
//! Cloak follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`detection`] - Pattern catalog, column classifier, dataset detector
//! - [`transform`] - Anonymization technique library
//! - [`pipeline`] - Applier and decision orchestrator
//! - [`audit`] - Append-only processing-run log
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cloak::detection::DatasetDetector;
//! use cloak::domain::{Row, Schema};
//! use cloak::pipeline::{Decision, DecisionOrchestrator, DecisionRequest};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let rows: Vec<Row> = serde_json::from_str(r#"[{"email": "jane@example.com"}]"#)?;
//!     let schema = Schema::infer(&rows, 100);
//!
//!     let detector = DatasetDetector::new()?;
//!     let report = detector.detect(&rows, &schema);
//!
//!     let request = DecisionRequest {
//!         decision: Decision::Anonymize,
//!         anonymization: None,
//!         overridden_columns: vec![],
//!     };
//!     let result = DecisionOrchestrator::new().process(rows, schema, &report, &request)?;
//!
//!     println!("Anonymized {} columns", result.columns_anonymized.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Cloak uses the [`domain::CloakError`] type for all errors:
//!
//! ```rust,no_run
//! use cloak::domain::CloakError;
//!
//! fn example() -> Result<(), CloakError> {
//!     // Errors are automatically converted using the ? operator
//!     let config = cloak::config::EngineConfig::from_file("cloak.toml")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! Cloak uses structured logging with the `tracing` crate. Detection and
//! transformation log column names and counts only, never cell values:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!("Starting scan");
//! warn!(column = "email", "Column kept by user override");
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod detection;
pub mod domain;
pub mod logging;
pub mod pipeline;
pub mod transform;
