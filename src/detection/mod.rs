//! PII detection
//!
//! The detection pipeline is pure computation over `(rows, schema)`:
//! - **Pattern catalog** ([`patterns::PatternRegistry`]): TOML-defined
//!   regexes, keywords, weights, and exclusion vocabulary
//! - **Column classifier** ([`classifier::ColumnClassifier`]): name and
//!   value evidence combined into a confidence score
//! - **Dataset detector** ([`detector::DatasetDetector`]): per-column
//!   classification aggregated into a [`DetectionReport`]

pub mod classifier;
pub mod detector;
pub mod patterns;
pub mod report;

pub use classifier::{Classification, ColumnClassifier};
pub use detector::DatasetDetector;
pub use patterns::PatternRegistry;
pub use report::{DetectionReport, PiiCategory, PiiFinding, RiskLevel};
