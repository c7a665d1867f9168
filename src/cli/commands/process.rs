//! Process command implementation
//!
//! This module implements the `process` command: scan a dataset, apply
//! the requested privacy decision, and write the processing result.

use crate::audit::RunLogger;
use crate::cli::commands::detect::{build_registry, load_engine_config, load_rows};
use crate::detection::DatasetDetector;
use crate::domain::Schema;
use crate::pipeline::{
    AnonymizationRequest, ApplyOptions, Decision, DecisionOrchestrator, DecisionRequest,
};
use crate::transform::EncryptionKey;
use crate::{log_error_with_context, log_run_complete, log_run_start};
use anyhow::Context;
use clap::Args;
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

/// Arguments for the process command
#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Path to a JSON file containing an array of row objects
    pub input: String,

    /// Privacy decision: include, exclude, or anonymize
    #[arg(short, long)]
    pub decision: String,

    /// Column to keep unchanged despite detection (repeatable)
    #[arg(long = "override", value_name = "COLUMN")]
    pub overridden: Vec<String>,

    /// Restrict anonymization to these columns (repeatable)
    #[arg(long = "column", value_name = "COLUMN")]
    pub columns: Vec<String>,

    /// Technique assignment as column=technique_id (repeatable)
    #[arg(long = "technique", value_name = "COLUMN=ID")]
    pub techniques: Vec<String>,

    /// Column whose values key the lookup table
    #[arg(long)]
    pub unique_id: Option<String>,

    /// Write the lookup table to this file (requires --unique-id)
    #[arg(long, value_name = "FILE")]
    pub lookup: Option<String>,

    /// Write the processed rows to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<String>,

    /// Fixed RNG seed for reproducible substitution
    #[arg(long)]
    pub seed: Option<u64>,

    /// Encryption secret for the encrypt_aes technique
    #[arg(long, env = "CLOAK_ENCRYPTION_KEY", hide_env_values = true)]
    pub encryption_key: Option<String>,
}

impl ProcessArgs {
    /// Execute the process command
    pub fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let started = Instant::now();
        tracing::info!(input = %self.input, decision = %self.decision, "Starting process command");

        let decision = match Decision::from_str(&self.decision) {
            Ok(d) => d,
            Err(e) => {
                eprintln!("❌ {e}");
                return Ok(2);
            }
        };

        let config = load_engine_config(config_path)?;
        let rows = load_rows(&self.input)?;
        let schema = Schema::infer(&rows, config.detection.sample_size);
        let record_count = rows.len();
        log_run_start!(self.decision, record_count);

        let registry = build_registry(&config)?;
        let detector = DatasetDetector::with_registry(Arc::new(registry));
        let report = detector.detect(&rows, &schema);

        let methods = match parse_technique_assignments(&self.techniques) {
            Ok(m) => m,
            Err(e) => {
                eprintln!("❌ {e}");
                return Ok(2);
            }
        };

        let request = DecisionRequest {
            decision,
            anonymization: Some(AnonymizationRequest {
                fields_to_anonymize: self.columns.clone(),
                anonymization_methods: methods,
                unique_identifier: self.unique_id.clone(),
                requires_lookup_file: self.lookup.is_some(),
            }),
            overridden_columns: self.overridden.clone(),
        };

        let options = ApplyOptions {
            unique_identifier: self.unique_id.clone(),
            build_lookup: self.lookup.is_some(),
            seed: self.seed.or(config.transform.seed),
            key: self.encryption_key.as_deref().map(EncryptionKey::new),
            generalization_level: config.transform.generalization_level,
            bucket_size: config.transform.bucket_size,
            on_parse_failure: config.transform.on_parse_failure,
        };

        let orchestrator = DecisionOrchestrator::with_options(options);
        let result = match orchestrator.process(rows, schema, &report, &request) {
            Ok(r) => r,
            Err(e) => {
                log_error_with_context!(&e, "processing run aborted");
                eprintln!("❌ Processing failed: {e}");
                return Ok(1);
            }
        };

        if config.audit.enabled {
            let logger = RunLogger::new(
                config.audit.log_path.clone(),
                config.audit.json_format,
                true,
            )?;
            logger.log_run(decision, &report, &result)?;
        }

        if let Some(ref lookup_path) = self.lookup {
            match result.lookup_table {
                Some(ref table) => {
                    let json = serde_json::to_string_pretty(table)?;
                    std::fs::write(lookup_path, json)
                        .with_context(|| format!("Failed to write lookup table {lookup_path}"))?;
                    println!("🔑 Lookup table written to {lookup_path}");
                }
                None => {
                    eprintln!("⚠️  No lookup table was produced (set --unique-id)");
                }
            }
        }

        let data_json = serde_json::to_string_pretty(&result.data)?;
        match self.output {
            Some(ref output_path) => {
                std::fs::write(output_path, data_json)
                    .with_context(|| format!("Failed to write output {output_path}"))?;
                println!("✅ Processed data written to {output_path}");
            }
            None => println!("{data_json}"),
        }

        println!();
        println!("📊 Processing Summary:");
        println!("  Decision: {}", self.decision);
        println!("  Records: {} -> {}", record_count, result.record_count);
        println!(
            "  Columns: {} -> {}",
            result.details.columns_before, result.details.columns_after
        );
        if !result.columns_removed.is_empty() {
            println!("  Removed: {:?}", result.columns_removed);
        }
        if !result.columns_anonymized.is_empty() {
            println!("  Anonymized: {:?}", result.columns_anonymized);
        }
        for warning in &result.details.warnings {
            println!("  ⚠️  {warning}");
        }

        log_run_complete!(result.record_count, started.elapsed());
        Ok(0)
    }
}

/// Parse repeated `column=technique_id` assignments
fn parse_technique_assignments(raw: &[String]) -> anyhow::Result<BTreeMap<String, String>> {
    let mut methods = BTreeMap::new();
    for assignment in raw {
        let (column, technique) = assignment.split_once('=').with_context(|| {
            format!("Invalid technique assignment '{assignment}', expected column=technique_id")
        })?;
        methods.insert(column.trim().to_string(), technique.trim().to_string());
    }
    Ok(methods)
}
