//! Decision orchestrator
//!
//! Single entry point that turns a user decision (include / exclude /
//! anonymize), a set of override columns, and a detection report into a
//! final dataset, schema, and optional lookup table. Always returns a
//! complete [`ProcessingResult`] or a fatal error; never partial data.

use crate::detection::report::DetectionReport;
use crate::domain::{CloakError, Result, Row, Schema};
use crate::pipeline::applier::{AnonymizationApplier, ApplyOptions};
use crate::pipeline::result::{ProcessingDetails, ProcessingResult};
use crate::transform::Technique;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

/// Number of transformed rows used to refresh schema samples
const SAMPLE_REFRESH_ROWS: usize = 5;

/// Terminal user decision over detected PII
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Keep data unchanged; an explicit warning artifact is emitted
    Include,
    /// Remove detected columns from rows and schema
    Exclude,
    /// Rewrite detected columns with anonymization techniques
    Anonymize,
}

impl FromStr for Decision {
    type Err = CloakError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "include" => Ok(Self::Include),
            "exclude" => Ok(Self::Exclude),
            "anonymize" => Ok(Self::Anonymize),
            other => Err(CloakError::InvalidDecision(other.to_string())),
        }
    }
}

/// Anonymization details supplied by the UI/API layer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnonymizationRequest {
    /// Columns the user chose to anonymize; empty means all effective columns
    pub fields_to_anonymize: Vec<String>,
    /// Column -> technique id; empty falls back to category defaults
    pub anonymization_methods: BTreeMap<String, String>,
    /// Column whose values key the reversal lookup table
    pub unique_identifier: Option<String>,
    /// Whether to build the reversal lookup table
    pub requires_lookup_file: bool,
}

/// Full decision input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionRequest {
    pub decision: Decision,
    #[serde(default)]
    pub anonymization: Option<AnonymizationRequest>,
    /// Columns the user marked as false positives; never touched,
    /// whether or not they were actually detected
    #[serde(default)]
    pub overridden_columns: Vec<String>,
}

/// Decision orchestrator
///
/// Holds only run options; all data flows through [`process`](Self::process)
/// as values, so one orchestrator can serve concurrent invocations.
pub struct DecisionOrchestrator {
    options: ApplyOptions,
}

impl DecisionOrchestrator {
    /// Orchestrator with default apply options
    pub fn new() -> Self {
        Self {
            options: ApplyOptions::new(),
        }
    }

    /// Orchestrator with explicit apply options (seed, key material,
    /// generalization parameters, parse-failure policy)
    pub fn with_options(options: ApplyOptions) -> Self {
        Self { options }
    }

    /// Execute a decision over a detected dataset
    pub fn process(
        &self,
        rows: Vec<Row>,
        schema: Schema,
        report: &DetectionReport,
        request: &DecisionRequest,
    ) -> Result<ProcessingResult> {
        let records_before = rows.len();
        let columns_before = schema.len();

        let overridden: BTreeSet<&String> = request.overridden_columns.iter().collect();
        let effective: BTreeSet<String> = report
            .affected_columns
            .iter()
            .filter(|c| !overridden.contains(c))
            .cloned()
            .collect();

        tracing::info!(
            decision = ?request.decision,
            detected = report.affected_columns.len(),
            overridden = request.overridden_columns.len(),
            effective = effective.len(),
            "Processing decision"
        );

        let mut warnings = Vec::new();

        // Every detected column overridden: nothing to do for any decision
        if effective.is_empty() && report.has_pii {
            warnings.push(
                "All detected PII columns were overridden as false positives; data returned unchanged"
                    .to_string(),
            );
            return Ok(self.finish(
                rows,
                schema,
                Vec::new(),
                Vec::new(),
                None,
                records_before,
                columns_before,
                warnings,
            ));
        }

        match request.decision {
            Decision::Include => {
                if !effective.is_empty() {
                    warnings.push(format!(
                        "PII columns included without anonymization: {}",
                        effective.iter().cloned().collect::<Vec<_>>().join(", ")
                    ));
                }
                Ok(self.finish(
                    rows,
                    schema,
                    Vec::new(),
                    Vec::new(),
                    None,
                    records_before,
                    columns_before,
                    warnings,
                ))
            }
            Decision::Exclude => {
                let removed: Vec<String> = effective.iter().cloned().collect();
                let mut schema = schema;
                schema.remove_columns(&removed);
                let rows: Vec<Row> = rows
                    .into_iter()
                    .map(|mut row| {
                        for column in &removed {
                            row.remove(column);
                        }
                        row
                    })
                    .collect();
                Ok(self.finish(
                    rows,
                    schema,
                    removed,
                    Vec::new(),
                    None,
                    records_before,
                    columns_before,
                    warnings,
                ))
            }
            Decision::Anonymize => self.anonymize(
                rows,
                schema,
                report,
                request,
                &effective,
                records_before,
                columns_before,
                warnings,
            ),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn anonymize(
        &self,
        rows: Vec<Row>,
        mut schema: Schema,
        report: &DetectionReport,
        request: &DecisionRequest,
        effective: &BTreeSet<String>,
        records_before: usize,
        columns_before: usize,
        warnings: Vec<String>,
    ) -> Result<ProcessingResult> {
        let anonymization = request.anonymization.clone().unwrap_or_default();
        let techniques = build_technique_map(report, &anonymization, effective)?;

        let mut options = self.options.clone();
        options.unique_identifier = anonymization.unique_identifier.clone();
        options.build_lookup = anonymization.requires_lookup_file;

        let applier = AnonymizationApplier::new(options);
        let applied = applier.apply_to_dataset(&rows, &techniques)?;

        // Downstream consumers must never see pre-anonymization samples
        schema.refresh_samples(&applied.rows, SAMPLE_REFRESH_ROWS);

        let anonymized: Vec<String> = techniques.keys().cloned().collect();
        Ok(self.finish(
            applied.rows,
            schema,
            Vec::new(),
            anonymized,
            applied.lookup,
            records_before,
            columns_before,
            warnings,
        ))
    }

    #[allow(clippy::too_many_arguments)]
    fn finish(
        &self,
        data: Vec<Row>,
        schema: Schema,
        columns_removed: Vec<String>,
        columns_anonymized: Vec<String>,
        lookup_table: Option<crate::pipeline::result::LookupTable>,
        records_before: usize,
        columns_before: usize,
        warnings: Vec<String>,
    ) -> ProcessingResult {
        let details = ProcessingDetails {
            columns_before,
            columns_after: schema.len(),
            records_before,
            records_after: data.len(),
            timestamp: Utc::now(),
            warnings,
        };
        ProcessingResult {
            record_count: data.len(),
            data,
            schema,
            columns_removed,
            columns_anonymized,
            lookup_table,
            details,
        }
    }
}

impl Default for DecisionOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve the per-column technique map for an anonymize decision
///
/// Every supplied technique id is validated before any data mutation.
/// Each effective column then gets its explicitly assigned technique,
/// or the default technique for its highest-confidence detected
/// category when no assignment exists; a partial method map never
/// leaves a detected column in plaintext. A non-empty
/// `fields_to_anonymize` restricts the scope to the listed columns.
fn build_technique_map(
    report: &DetectionReport,
    request: &AnonymizationRequest,
    effective: &BTreeSet<String>,
) -> Result<BTreeMap<String, Technique>> {
    let mut assigned = BTreeMap::new();
    for (column, id) in &request.anonymization_methods {
        assigned.insert(column.as_str(), Technique::parse(id)?);
    }

    let mut techniques = BTreeMap::new();
    for column in effective {
        if !request.fields_to_anonymize.is_empty()
            && !request.fields_to_anonymize.contains(column)
        {
            continue;
        }
        if let Some(technique) = assigned.get(column.as_str()) {
            techniques.insert(column.clone(), *technique);
            continue;
        }
        let best = report
            .findings_for(column)
            .into_iter()
            .max_by(|a, b| a.confidence.total_cmp(&b.confidence));
        if let Some(finding) = best {
            techniques.insert(column.clone(), Technique::default_for(finding.category));
        }
    }
    Ok(techniques)
}
