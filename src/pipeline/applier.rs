//! Anonymization applier
//!
//! Applies a per-column technique map across a dataset with
//! value-mapping consistency: within one run, the same original value
//! in the same column is anonymized exactly once and the result reused,
//! so one real-world entity never ends up with several synthetic
//! identities. Optionally records every transformed cell in a reversal
//! lookup table keyed by a caller-supplied record identifier.

use crate::domain::{value_to_string, Result, Row};
use crate::pipeline::result::LookupTable;
use crate::transform::{EncryptionKey, ParseFailurePolicy, Technique, TransformContext};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Options for one applier run
#[derive(Debug, Clone, Default)]
pub struct ApplyOptions {
    /// Column whose values key the lookup table
    pub unique_identifier: Option<String>,
    /// Build a reversal lookup table (requires `unique_identifier`)
    pub build_lookup: bool,
    /// RNG seed for substitution techniques; random when absent
    pub seed: Option<u64>,
    /// Key material for `encrypt_aes`
    pub key: Option<EncryptionKey>,
    /// Date generalization level (1/2/3)
    pub generalization_level: u8,
    /// Bucket width for numeric generalization
    pub bucket_size: f64,
    /// Recovery policy for unparseable generalization input
    pub on_parse_failure: ParseFailurePolicy,
}

impl ApplyOptions {
    /// Defaults: no lookup, random seed, year granularity, bucket 10
    pub fn new() -> Self {
        Self {
            unique_identifier: None,
            build_lookup: false,
            seed: None,
            key: None,
            generalization_level: 1,
            bucket_size: 10.0,
            on_parse_failure: ParseFailurePolicy::PassThrough,
        }
    }
}

/// Output of a full applier run
#[derive(Debug, Clone)]
pub struct Applied {
    pub rows: Vec<Row>,
    pub lookup: Option<LookupTable>,
}

/// One previewed cell: original, replacement, and the technique used
#[derive(Debug, Clone, Serialize)]
pub struct PreviewCell {
    pub column: String,
    pub original: String,
    pub anonymized: String,
    pub technique: &'static str,
}

/// Preview of one row's transformed cells
#[derive(Debug, Clone, Serialize)]
pub struct PreviewRow {
    pub cells: Vec<PreviewCell>,
}

/// Column-consistent anonymization applier
pub struct AnonymizationApplier {
    options: ApplyOptions,
}

impl AnonymizationApplier {
    /// Create an applier with the given options
    pub fn new(options: ApplyOptions) -> Self {
        Self { options }
    }

    /// Anonymize every mapped column across all rows
    ///
    /// Cells with no value (absent key or JSON null) pass through
    /// untouched and are never recorded in the lookup table.
    pub fn apply_to_dataset(
        &self,
        rows: &[Row],
        techniques: &BTreeMap<String, Technique>,
    ) -> Result<Applied> {
        let mut run = ApplyRun::new(&self.options);
        let build_lookup =
            self.options.build_lookup && self.options.unique_identifier.is_some();
        let mut lookup = build_lookup.then(LookupTable::new);

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let record_id = self
                .options
                .unique_identifier
                .as_ref()
                .and_then(|col| row.get(col))
                .filter(|v| !v.is_null())
                .map(value_to_string);

            let mut new_row = row.clone();
            for (column, technique) in techniques {
                let Some(value) = row.get(column).filter(|v| !v.is_null()) else {
                    continue;
                };
                let original = value_to_string(value);
                let anonymized = run.transform(column, *technique, &original)?;

                if let (Some(table), Some(id)) = (lookup.as_mut(), record_id.as_ref()) {
                    table.insert(id.clone(), column.clone(), original.clone(), anonymized.clone());
                }
                new_row.insert(column.clone(), Value::String(anonymized));
            }
            out.push(new_row);
        }

        Ok(Applied { rows: out, lookup })
    }

    /// Anonymize only the first `limit` rows without mutating the input,
    /// returning per-cell before/after pairs for user confirmation
    pub fn preview(
        &self,
        rows: &[Row],
        techniques: &BTreeMap<String, Technique>,
        limit: usize,
    ) -> Result<Vec<PreviewRow>> {
        let mut run = ApplyRun::new(&self.options);
        let mut preview = Vec::new();

        for row in rows.iter().take(limit) {
            let mut cells = Vec::new();
            for (column, technique) in techniques {
                let Some(value) = row.get(column).filter(|v| !v.is_null()) else {
                    continue;
                };
                let original = value_to_string(value);
                let anonymized = run.transform(column, *technique, &original)?;
                cells.push(PreviewCell {
                    column: column.clone(),
                    original,
                    anonymized,
                    technique: technique.id(),
                });
            }
            preview.push(PreviewRow { cells });
        }

        Ok(preview)
    }
}

/// Per-run state: the seeded RNG and the per-column consistency memo
struct ApplyRun<'a> {
    options: &'a ApplyOptions,
    rng: StdRng,
    memo: HashMap<(String, String), String>,
}

impl<'a> ApplyRun<'a> {
    fn new(options: &'a ApplyOptions) -> Self {
        let seed = options.seed.unwrap_or_else(|| rand::thread_rng().gen());
        Self {
            options,
            rng: StdRng::seed_from_u64(seed),
            memo: HashMap::new(),
        }
    }

    fn transform(&mut self, column: &str, technique: Technique, original: &str) -> Result<String> {
        let memo_key = (column.to_string(), original.to_string());
        if let Some(done) = self.memo.get(&memo_key) {
            return Ok(done.clone());
        }

        let mut ctx = TransformContext::new(column)
            .with_generalization_level(self.options.generalization_level)
            .with_bucket_size(self.options.bucket_size)
            .with_parse_failure(self.options.on_parse_failure);
        if let Some(key) = self.options.key.as_ref() {
            ctx = ctx.with_key(key);
        }

        let anonymized = technique.apply(original, &ctx, &mut self.rng)?;
        self.memo.insert(memo_key, anonymized.clone());
        Ok(anonymized)
    }
}
