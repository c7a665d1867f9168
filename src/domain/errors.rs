//! Domain error types
//!
//! All errors are domain-specific and don't expose third-party types.
//! The two fatal kinds (`UnsupportedTechnique`, `InvalidDecision`) abort
//! a processing run before or instead of returning partial data;
//! everything else is ambient (configuration, I/O, crypto).

use thiserror::Error;

/// Result alias used throughout the engine
pub type Result<T> = std::result::Result<T, CloakError>;

/// Main Cloak error type
#[derive(Debug, Error)]
pub enum CloakError {
    /// An anonymization technique id not present in the catalog was requested.
    ///
    /// Fatal: the run is aborted rather than silently skipping the column,
    /// which would produce a false sense of anonymization.
    #[error("Unsupported anonymization technique: {0}")]
    UnsupportedTechnique(String),

    /// A processing decision outside `include` / `exclude` / `anonymize`.
    ///
    /// Fatal: raised during input validation, before any data mutation.
    #[error("Invalid processing decision: {0}")]
    InvalidDecision(String),

    /// A technique could not parse its input under strict parse-failure policy.
    ///
    /// Only raised when [`ParseFailurePolicy::Strict`] is configured; the
    /// default pass-through policy recovers locally instead.
    ///
    /// [`ParseFailurePolicy::Strict`]: crate::transform::ParseFailurePolicy::Strict
    #[error("Malformed value in column '{column}': {reason}")]
    MalformedValue { column: String, reason: String },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Pattern catalog errors (invalid regex, unknown category, bad TOML)
    #[error("Pattern catalog error: {0}")]
    Pattern(String),

    /// Encryption/decryption errors
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Audit logging errors
    #[error("Audit error: {0}")]
    Audit(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for CloakError {
    fn from(err: std::io::Error) -> Self {
        CloakError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CloakError {
    fn from(err: serde_json::Error) -> Self {
        CloakError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for CloakError {
    fn from(err: toml::de::Error) -> Self {
        CloakError::Configuration(format!("TOML parse error: {err}"))
    }
}
