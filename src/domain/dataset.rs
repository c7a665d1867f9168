//! Tabular dataset model
//!
//! Rows are JSON objects (column name -> scalar), the shape the engine
//! receives from the surrounding ingestion layer. The schema is an
//! ordered list of column descriptors; every key that detection or
//! transformation touches must exist in it. Missing keys and JSON null
//! are "no value", never PII evidence.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single dataset row: column name -> scalar value
pub type Row = serde_json::Map<String, Value>;

/// Declared type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Text,
    Number,
    Boolean,
    Date,
    Email,
    Url,
    Unknown,
}

impl Default for ColumnType {
    fn default() -> Self {
        Self::Unknown
    }
}

/// Schema entry for one column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSchema {
    /// Column name as it appears in row objects
    pub name: String,

    /// Declared type
    #[serde(default)]
    pub column_type: ColumnType,

    /// Whether the column may hold nulls
    #[serde(default = "default_nullable")]
    pub nullable: bool,

    /// A few representative values, refreshed after anonymization so
    /// downstream consumers never see pre-anonymization samples
    #[serde(default)]
    pub sample_values: Vec<String>,
}

fn default_nullable() -> bool {
    true
}

impl ColumnSchema {
    /// Create a schema entry with no samples
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: true,
            sample_values: Vec::new(),
        }
    }
}

/// Ordered dataset schema
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    pub columns: Vec<ColumnSchema>,
}

impl Schema {
    /// Create a schema from column descriptors
    pub fn new(columns: Vec<ColumnSchema>) -> Self {
        Self { columns }
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the schema has no columns
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Look up a column by name
    pub fn get(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Whether a column exists
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Column names in schema order
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Remove the named columns, preserving the order of the rest
    pub fn remove_columns(&mut self, names: &[String]) {
        self.columns.retain(|c| !names.contains(&c.name));
    }

    /// Refresh sample values from the first `n` rows
    ///
    /// Nulls and absent keys are skipped; values are rendered as strings.
    pub fn refresh_samples(&mut self, rows: &[Row], n: usize) {
        for column in &mut self.columns {
            column.sample_values = rows
                .iter()
                .take(n)
                .filter_map(|row| row.get(&column.name))
                .filter(|v| !v.is_null())
                .map(value_to_string)
                .collect();
        }
    }

    /// Infer a schema from raw rows
    ///
    /// Column order follows first appearance across rows. Types are
    /// guessed from the first non-null value; `sample_n` values are
    /// captured per column.
    pub fn infer(rows: &[Row], sample_n: usize) -> Self {
        let mut columns: Vec<ColumnSchema> = Vec::new();

        for row in rows {
            for name in row.keys() {
                if !columns.iter().any(|c| &c.name == name) {
                    columns.push(ColumnSchema::new(name.clone(), ColumnType::Unknown));
                }
            }
        }

        for column in &mut columns {
            let mut saw_null = false;
            for row in rows {
                match row.get(&column.name) {
                    Some(v) if !v.is_null() => {
                        if column.column_type == ColumnType::Unknown {
                            column.column_type = guess_type(v);
                        }
                        if column.sample_values.len() < sample_n {
                            column.sample_values.push(value_to_string(v));
                        }
                    }
                    _ => saw_null = true,
                }
            }
            column.nullable = saw_null;
        }

        Self { columns }
    }
}

/// Render a JSON scalar as the string the classifier and transforms see
///
/// Mixed-type columns (numbers stored as strings and vice versa) are
/// evaluated as strings for pattern purposes.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn guess_type(value: &Value) -> ColumnType {
    match value {
        Value::Number(_) => ColumnType::Number,
        Value::Bool(_) => ColumnType::Boolean,
        Value::String(s) => {
            if s.contains('@') && s.contains('.') {
                ColumnType::Email
            } else if s.starts_with("http://") || s.starts_with("https://") {
                ColumnType::Url
            } else if chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok() {
                ColumnType::Date
            } else {
                ColumnType::Text
            }
        }
        _ => ColumnType::Unknown,
    }
}
