//! Processing result models
//!
//! [`ProcessingResult`] is the auditable artifact of a run: the final
//! data and schema plus before/after counts computed from the actual
//! transformed structures, never estimated.

use crate::domain::{Row, Schema};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Original/anonymized pair for one cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupEntry {
    pub original: String,
    pub anonymized: String,
}

/// Reversal map keyed by record identifier, then column
///
/// Built only when reversibility is requested and a unique identifier
/// column is supplied. Created fresh per run; storage and retention are
/// the caller's responsibility.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LookupTable {
    entries: BTreeMap<String, BTreeMap<String, LookupEntry>>,
}

impl LookupTable {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one transformed cell
    pub fn insert(
        &mut self,
        record_id: impl Into<String>,
        column: impl Into<String>,
        original: impl Into<String>,
        anonymized: impl Into<String>,
    ) {
        self.entries.entry(record_id.into()).or_default().insert(
            column.into(),
            LookupEntry {
                original: original.into(),
                anonymized: anonymized.into(),
            },
        );
    }

    /// Entry for a record/column pair
    pub fn get(&self, record_id: &str, column: &str) -> Option<&LookupEntry> {
        self.entries.get(record_id)?.get(column)
    }

    /// Number of records with at least one entry
    pub fn record_count(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over records
    pub fn records(&self) -> impl Iterator<Item = (&String, &BTreeMap<String, LookupEntry>)> {
        self.entries.iter()
    }
}

/// Before/after accounting for one processing run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingDetails {
    pub columns_before: usize,
    pub columns_after: usize,
    pub records_before: usize,
    pub records_after: usize,
    pub timestamp: DateTime<Utc>,
    /// Explicit warning artifacts (e.g. PII included unchanged)
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// Final output of the decision orchestrator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingResult {
    /// Transformed rows
    pub data: Vec<Row>,
    /// Schema after column removal and sample refresh
    pub schema: Schema,
    /// Number of rows in `data`
    pub record_count: usize,
    /// Columns dropped by an exclude decision
    pub columns_removed: Vec<String>,
    /// Columns rewritten by an anonymize decision
    pub columns_anonymized: Vec<String>,
    /// Reversal map, present only when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookup_table: Option<LookupTable>,
    /// Audit accounting
    pub details: ProcessingDetails,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_table_insert_get() {
        let mut table = LookupTable::new();
        table.insert("rec-1", "email", "a@b.com", "x@y.com");
        table.insert("rec-1", "name", "Jane Doe", "Alex Porter");
        table.insert("rec-2", "email", "c@d.com", "z@w.com");

        assert_eq!(table.record_count(), 2);
        let entry = table.get("rec-1", "email").unwrap();
        assert_eq!(entry.original, "a@b.com");
        assert_eq!(entry.anonymized, "x@y.com");
        assert!(table.get("rec-3", "email").is_none());
    }

    #[test]
    fn test_lookup_table_serializes_flat() {
        let mut table = LookupTable::new();
        table.insert("rec-1", "email", "a@b.com", "x@y.com");
        let json = serde_json::to_value(&table).unwrap();
        assert!(json.get("rec-1").is_some());
    }
}
