//! Detection report models
//!
//! The [`DetectionReport`] is the dataset-level artifact produced by the
//! detector and consumed by the decision orchestrator. A column appears
//! in `affected_columns` iff it has at least one finding at or above the
//! detection threshold.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Recognized PII categories
///
/// Ordered most-specific first; the classifier uses this order to break
/// exact confidence ties so reports stay stable across runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PiiCategory {
    /// Social Security Numbers
    Ssn,
    /// Payment card numbers
    CreditCard,
    /// Email addresses
    Email,
    /// IP addresses
    IpAddress,
    /// Telephone numbers
    Phone,
    /// Dates of birth
    DateOfBirth,
    /// Street addresses
    Address,
    /// Person names
    Name,
}

impl PiiCategory {
    /// All categories in tie-break order
    pub const ALL: [PiiCategory; 8] = [
        Self::Ssn,
        Self::CreditCard,
        Self::Email,
        Self::IpAddress,
        Self::Phone,
        Self::DateOfBirth,
        Self::Address,
        Self::Name,
    ];

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ssn => "SSN",
            Self::CreditCard => "CREDIT_CARD",
            Self::Email => "EMAIL",
            Self::IpAddress => "IP_ADDRESS",
            Self::Phone => "PHONE",
            Self::DateOfBirth => "DATE_OF_BIRTH",
            Self::Address => "ADDRESS",
            Self::Name => "PERSON",
        }
    }

    /// Catalog key used in the pattern TOML
    pub fn key(&self) -> &'static str {
        match self {
            Self::Ssn => "ssn",
            Self::CreditCard => "credit_card",
            Self::Email => "email",
            Self::IpAddress => "ip_address",
            Self::Phone => "phone",
            Self::DateOfBirth => "date_of_birth",
            Self::Address => "address",
            Self::Name => "name",
        }
    }

    /// Parse a catalog key
    pub fn from_key(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == s)
    }
}

/// Dataset-level risk classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Derive the risk level from the categories present
    ///
    /// `High` for direct identifiers (SSN, credit card), `Medium` for
    /// strong quasi-identifiers, `Low` otherwise.
    pub fn from_categories<'a, I: IntoIterator<Item = &'a PiiCategory>>(categories: I) -> Self {
        let mut level = RiskLevel::Low;
        for category in categories {
            match category {
                PiiCategory::Ssn | PiiCategory::CreditCard => return RiskLevel::High,
                PiiCategory::Email
                | PiiCategory::Phone
                | PiiCategory::Address
                | PiiCategory::DateOfBirth => level = RiskLevel::Medium,
                _ => {}
            }
        }
        level
    }
}

/// One detected PII column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PiiFinding {
    /// Detected category
    pub category: PiiCategory,
    /// Column name
    pub column: String,
    /// Confidence score in [0, 1]
    pub confidence: f64,
    /// Masked example value (never the raw value)
    pub sample_value_masked: String,
    /// Number of sampled values that matched the category pattern
    pub match_count: usize,
}

/// Dataset-level detection report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionReport {
    /// Whether any PII was detected
    pub has_pii: bool,
    /// Per-column findings
    pub findings: Vec<PiiFinding>,
    /// Union of all findings' columns
    pub affected_columns: BTreeSet<String>,
    /// Derived risk level
    pub risk_level: RiskLevel,
    /// Fixed-form recommendations generated from the categories present
    pub recommendations: Vec<String>,
}

impl DetectionReport {
    /// Build a report from per-column findings
    pub fn from_findings(findings: Vec<PiiFinding>) -> Self {
        let affected_columns: BTreeSet<String> =
            findings.iter().map(|f| f.column.clone()).collect();

        let categories: BTreeSet<PiiCategory> = findings.iter().map(|f| f.category).collect();
        let risk_level = RiskLevel::from_categories(categories.iter());
        let recommendations = Self::recommendations_for(&categories);

        Self {
            has_pii: !findings.is_empty(),
            findings,
            affected_columns,
            risk_level,
            recommendations,
        }
    }

    /// Findings for a specific column
    pub fn findings_for(&self, column: &str) -> Vec<&PiiFinding> {
        self.findings.iter().filter(|f| f.column == column).collect()
    }

    fn recommendations_for(categories: &BTreeSet<PiiCategory>) -> Vec<String> {
        let mut recommendations = Vec::new();
        for category in categories {
            let text = match category {
                PiiCategory::Ssn => {
                    "SSN columns should be excluded or irreversibly hashed before analysis"
                }
                PiiCategory::CreditCard => {
                    "Credit card columns should be excluded or masked; retain at most the last 4 digits"
                }
                PiiCategory::Email => {
                    "Email columns can be hashed to preserve join keys without exposing addresses"
                }
                PiiCategory::Phone => "Phone columns should be masked or substituted",
                PiiCategory::IpAddress => "IP address columns should be masked or generalized",
                PiiCategory::DateOfBirth => {
                    "Date-of-birth columns should be generalized to year or quarter"
                }
                PiiCategory::Address => {
                    "Address columns should be generalized or substituted with synthetic addresses"
                }
                PiiCategory::Name => "Name columns should be substituted with synthetic names",
            };
            recommendations.push(text.to_string());
        }
        if !categories.is_empty() {
            recommendations
                .push("Review detected columns and mark any false positives before processing".to_string());
        }
        recommendations
    }
}
