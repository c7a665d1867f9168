//! Dataset detector
//!
//! Runs the column classifier across every schema column and aggregates
//! the results into a [`DetectionReport`]. Detection is side-effect free
//! and never fails: absence of matches simply yields "not PII".

use crate::detection::classifier::{ColumnClassifier, MAX_SAMPLE_VALUES};
use crate::detection::patterns::PatternRegistry;
use crate::detection::report::{DetectionReport, PiiFinding};
use crate::domain::{value_to_string, Row, Schema};
use crate::transform::mask::mask_partial;
use std::sync::Arc;

/// Dataset-level PII detector
pub struct DatasetDetector {
    registry: Arc<PatternRegistry>,
    classifier: ColumnClassifier,
}

impl DatasetDetector {
    /// Create a detector with the built-in pattern catalog
    pub fn new() -> crate::domain::Result<Self> {
        Ok(Self::with_registry(Arc::new(
            PatternRegistry::default_patterns()?,
        )))
    }

    /// Create a detector over a custom registry
    pub fn with_registry(registry: Arc<PatternRegistry>) -> Self {
        let classifier = ColumnClassifier::new(Arc::clone(&registry));
        Self {
            registry,
            classifier,
        }
    }

    /// Scan every schema column and build a detection report
    ///
    /// Up to 100 non-null values are sampled per column. Columns are
    /// independent; nothing here mutates shared state, so wide schemas
    /// can be fanned out across threads by the caller if needed.
    pub fn detect(&self, rows: &[Row], schema: &Schema) -> DetectionReport {
        let mut findings = Vec::new();

        for column in &schema.columns {
            let samples = sample_column(rows, &column.name, MAX_SAMPLE_VALUES);
            let classification = self.classifier.classify(&column.name, &samples);

            let Some(category) = classification.category else {
                continue;
            };
            if classification.confidence < self.registry.detection_threshold() {
                continue;
            }

            let sample_value_masked = samples
                .first()
                .map(|s| mask_partial(s))
                .unwrap_or_default();

            tracing::debug!(
                column = %column.name,
                category = category.label(),
                confidence = classification.confidence,
                "Column classified as PII"
            );

            findings.push(PiiFinding {
                category,
                column: column.name.clone(),
                confidence: classification.confidence,
                sample_value_masked,
                match_count: classification.match_count,
            });
        }

        let report = DetectionReport::from_findings(findings);
        tracing::info!(
            columns = schema.len(),
            affected = report.affected_columns.len(),
            risk = ?report.risk_level,
            "Dataset scan complete"
        );
        report
    }
}

/// Extract up to `limit` non-null values of a column as strings
fn sample_column(rows: &[Row], column: &str, limit: usize) -> Vec<String> {
    rows.iter()
        .filter_map(|row| row.get(column))
        .filter(|v| !v.is_null())
        .take(limit)
        .map(value_to_string)
        .collect()
}
