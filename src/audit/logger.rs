//! Audit logger for processing runs
//!
//! Appends one JSON (or plain-text) line per processing run. Entries
//! carry column names and counts only; raw cell values never reach the
//! audit log.

use crate::detection::report::DetectionReport;
use crate::domain::{CloakError, Result};
use crate::pipeline::orchestrator::Decision;
use crate::pipeline::result::ProcessingResult;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// One audit log line
#[derive(Debug, Serialize)]
struct RunLogEntry {
    timestamp: String,
    decision: Decision,
    risk_level: crate::detection::report::RiskLevel,
    records_before: usize,
    records_after: usize,
    columns_before: usize,
    columns_after: usize,
    columns_removed: Vec<String>,
    columns_anonymized: Vec<String>,
    lookup_table_built: bool,
    warnings: Vec<String>,
    /// Fingerprint of the affected column set, lets runs over the same
    /// dataset shape be correlated without naming every column
    affected_fingerprint: String,
}

/// Append-only run logger
pub struct RunLogger {
    log_path: PathBuf,
    json_format: bool,
    enabled: bool,
}

impl RunLogger {
    /// Create a run logger, ensuring the parent directory exists
    pub fn new(log_path: PathBuf, json_format: bool, enabled: bool) -> Result<Self> {
        if enabled {
            if let Some(parent) = log_path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    CloakError::Audit(format!(
                        "Failed to create audit log directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }
        Ok(Self {
            log_path,
            json_format,
            enabled,
        })
    }

    /// Record one processing run
    pub fn log_run(
        &self,
        decision: Decision,
        report: &DetectionReport,
        result: &ProcessingResult,
    ) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let entry = RunLogEntry {
            timestamp: result.details.timestamp.to_rfc3339(),
            decision,
            risk_level: report.risk_level,
            records_before: result.details.records_before,
            records_after: result.details.records_after,
            columns_before: result.details.columns_before,
            columns_after: result.details.columns_after,
            columns_removed: result.columns_removed.clone(),
            columns_anonymized: result.columns_anonymized.clone(),
            lookup_table_built: result.lookup_table.is_some(),
            warnings: result.details.warnings.clone(),
            affected_fingerprint: fingerprint(report),
        };

        self.write_entry(&entry)
    }

    fn write_entry(&self, entry: &RunLogEntry) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| {
                CloakError::Audit(format!(
                    "Failed to open audit log {}: {e}",
                    self.log_path.display()
                ))
            })?;

        if self.json_format {
            let line = serde_json::to_string(entry)
                .map_err(|e| CloakError::Audit(format!("Failed to serialize audit entry: {e}")))?;
            writeln!(file, "{line}")
                .map_err(|e| CloakError::Audit(format!("Failed to write audit entry: {e}")))?;
        } else {
            writeln!(
                file,
                "[{}] decision={:?} risk={:?} records={}->{} columns={}->{}",
                entry.timestamp,
                entry.decision,
                entry.risk_level,
                entry.records_before,
                entry.records_after,
                entry.columns_before,
                entry.columns_after
            )
            .map_err(|e| CloakError::Audit(format!("Failed to write audit entry: {e}")))?;
        }
        Ok(())
    }
}

fn fingerprint(report: &DetectionReport) -> String {
    let mut hasher = Sha256::new();
    for column in &report.affected_columns {
        hasher.update(column.as_bytes());
        hasher.update([0]);
    }
    let digest = hasher.finalize();
    format!("{digest:x}")[..16].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::report::{PiiCategory, PiiFinding};
    use crate::domain::Schema;
    use crate::pipeline::result::ProcessingDetails;
    use tempfile::tempdir;

    fn report() -> DetectionReport {
        DetectionReport::from_findings(vec![PiiFinding {
            category: PiiCategory::Email,
            column: "email".to_string(),
            confidence: 0.9,
            sample_value_masked: "j***m".to_string(),
            match_count: 4,
        }])
    }

    fn result() -> ProcessingResult {
        ProcessingResult {
            data: vec![],
            schema: Schema::default(),
            record_count: 0,
            columns_removed: vec!["email".to_string()],
            columns_anonymized: vec![],
            lookup_table: None,
            details: ProcessingDetails {
                columns_before: 3,
                columns_after: 2,
                records_before: 10,
                records_after: 10,
                timestamp: chrono::Utc::now(),
                warnings: vec![],
            },
        }
    }

    #[test]
    fn test_log_run_writes_json_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("runs.log");
        let logger = RunLogger::new(path.clone(), true, true).unwrap();

        logger.log_run(Decision::Exclude, &report(), &result()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"decision\":\"exclude\""));
        assert!(content.contains("\"columns_removed\":[\"email\"]"));
    }

    #[test]
    fn test_disabled_logger_writes_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("runs.log");
        let logger = RunLogger::new(path.clone(), true, false).unwrap();

        logger.log_run(Decision::Include, &report(), &result()).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_plain_text_format() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("runs.log");
        let logger = RunLogger::new(path.clone(), false, true).unwrap();

        logger.log_run(Decision::Exclude, &report(), &result()).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("decision=Exclude"));
        assert!(content.contains("records=10->10"));
    }

    #[test]
    fn test_fingerprint_is_stable() {
        assert_eq!(fingerprint(&report()), fingerprint(&report()));
        assert_eq!(fingerprint(&report()).len(), 16);
    }
}
