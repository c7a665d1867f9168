//! Pattern catalog for PII detection
//!
//! The catalog is pure data: per-category value regexes, evidence
//! weights, column-name keywords, and a global exclusion word list.
//! A default catalog is embedded at build time; deployments can point
//! the detection config at an external TOML file for domain-specific
//! tuning without recompiling.

use crate::detection::report::PiiCategory;
use crate::domain::{CloakError, Result};
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Raw per-category definition from TOML
#[derive(Debug, Clone, Deserialize)]
struct CategoryDefinition {
    #[serde(default)]
    patterns: Vec<String>,
    value_threshold: f64,
    value_weight: f64,
    #[serde(default)]
    keywords: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct Settings {
    detection_threshold: f64,
    name_keyword_weight: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct Exclusions {
    #[serde(default)]
    words: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    settings: Settings,
    #[serde(default)]
    exclusions: Exclusions,
    categories: HashMap<String, CategoryDefinition>,
}

/// Compiled per-category pattern set
#[derive(Debug, Clone)]
pub struct CategoryPatterns {
    /// Category this entry detects
    pub category: PiiCategory,
    /// Compiled value regexes
    pub regexes: Vec<Regex>,
    /// Minimum fraction of sampled values that must match before value
    /// evidence counts (lower for highly specific formats like SSN)
    pub value_threshold: f64,
    /// Weight added when value evidence is present
    pub value_weight: f64,
    /// Lower-case column-name keywords
    pub keywords: Vec<String>,
}

impl CategoryPatterns {
    /// Whether the value matches any regex for this category
    pub fn matches(&self, value: &str) -> bool {
        self.regexes.iter().any(|r| r.is_match(value))
    }

    /// Whether the lower-cased column name carries a keyword
    pub fn name_matches(&self, column_lower: &str) -> bool {
        self.keywords.iter().any(|k| column_lower.contains(k))
    }
}

/// Compiled pattern registry, read-only and shareable across invocations
#[derive(Debug)]
pub struct PatternRegistry {
    categories: Vec<CategoryPatterns>,
    exclusion_words: Vec<String>,
    detection_threshold: f64,
    name_keyword_weight: f64,
}

impl PatternRegistry {
    /// Load a registry from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            CloakError::Pattern(format!(
                "Failed to read pattern catalog {}: {e}",
                path.as_ref().display()
            ))
        })?;
        Self::from_toml(&content)
    }

    /// Parse a registry from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        let catalog: CatalogFile = toml::from_str(content)
            .map_err(|e| CloakError::Pattern(format!("Failed to parse pattern catalog: {e}")))?;

        let mut categories = Vec::new();
        // Iterate in declared tie-break order, not TOML map order
        for category in PiiCategory::ALL {
            let Some(def) = catalog.categories.get(category.key()) else {
                continue;
            };
            if !(0.0..=1.0).contains(&def.value_threshold)
                || !(0.0..=1.0).contains(&def.value_weight)
            {
                return Err(CloakError::Pattern(format!(
                    "Weights for category '{}' must be within [0, 1]",
                    category.key()
                )));
            }

            let mut regexes = Vec::new();
            for pattern in &def.patterns {
                let regex = Regex::new(pattern).map_err(|e| {
                    CloakError::Pattern(format!(
                        "Invalid regex in category '{}': {pattern}: {e}",
                        category.key()
                    ))
                })?;
                regexes.push(regex);
            }

            categories.push(CategoryPatterns {
                category,
                regexes,
                value_threshold: def.value_threshold,
                value_weight: def.value_weight,
                keywords: def.keywords.iter().map(|k| k.to_lowercase()).collect(),
            });
        }

        for key in catalog.categories.keys() {
            if PiiCategory::from_key(key).is_none() {
                return Err(CloakError::Pattern(format!("Unknown PII category: {key}")));
            }
        }

        Ok(Self {
            categories,
            exclusion_words: catalog
                .exclusions
                .words
                .iter()
                .map(|w| w.to_lowercase())
                .collect(),
            detection_threshold: catalog.settings.detection_threshold,
            name_keyword_weight: catalog.settings.name_keyword_weight,
        })
    }

    /// Built-in default catalog
    pub fn default_patterns() -> Result<Self> {
        let default_toml = include_str!("../../patterns/pii_patterns.toml");
        Self::from_toml(default_toml)
    }

    /// All category pattern sets in tie-break order
    pub fn categories(&self) -> &[CategoryPatterns] {
        &self.categories
    }

    /// Pattern set for one category
    pub fn for_category(&self, category: PiiCategory) -> Option<&CategoryPatterns> {
        self.categories.iter().find(|c| c.category == category)
    }

    /// Whether the lower-cased column name contains an exclusion word
    pub fn is_excluded_name(&self, column_lower: &str) -> bool {
        self.exclusion_words.iter().any(|w| column_lower.contains(w))
    }

    /// Exclusion vocabulary (also used to reject descriptive values in
    /// the structural name heuristic)
    pub fn exclusion_words(&self) -> &[String] {
        &self.exclusion_words
    }

    /// Minimum confidence for a column to count as PII
    pub fn detection_threshold(&self) -> f64 {
        self.detection_threshold
    }

    /// Override the catalog's detection threshold
    pub fn set_detection_threshold(&mut self, threshold: f64) {
        self.detection_threshold = threshold.clamp(0.0, 1.0);
    }

    /// Weight added by a column-name keyword match
    pub fn name_keyword_weight(&self) -> f64 {
        self.name_keyword_weight
    }
}
