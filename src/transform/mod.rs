//! Transform library
//!
//! A fixed catalog of anonymization techniques, each a pure function
//! `(value, context) -> value` plus metadata describing reversibility
//! and format/length preservation. Techniques are a closed enum
//! resolved through a static match; string ids only exist at the API
//! boundary, where [`Technique::parse`] is the single place an
//! [`UnsupportedTechnique`] error can arise.
//!
//! [`UnsupportedTechnique`]: crate::domain::CloakError::UnsupportedTechnique

pub mod encrypt;
pub mod generalize;
pub mod hash;
pub mod mask;
pub mod substitute;

pub use encrypt::{decrypt_value, encrypt_value, EncryptionKey};
pub use generalize::DateGranularity;

use crate::detection::report::PiiCategory;
use crate::domain::{CloakError, Result};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// What to do when a generalization technique cannot parse its input
///
/// The default passes the original value through unchanged and logs a
/// warning; `Strict` aborts the run with
/// [`CloakError::MalformedValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseFailurePolicy {
    #[default]
    PassThrough,
    Strict,
}

/// Broad technique classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TechniqueCategory {
    Masking,
    Substitution,
    Encryption,
    Generalization,
}

/// Immutable catalog metadata for a technique
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechniqueMetadata {
    pub id: &'static str,
    pub category: TechniqueCategory,
    pub preserves_format: bool,
    pub preserves_length: bool,
    pub reversible: bool,
}

/// Anonymization technique catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Technique {
    MaskPartial,
    MaskFull,
    SubstituteFake,
    SubstituteRandom,
    EncryptAes,
    HashSha256,
    GeneralizeDate,
    GeneralizeNumeric,
}

impl Technique {
    /// All techniques in the catalog
    pub const ALL: [Technique; 8] = [
        Self::MaskPartial,
        Self::MaskFull,
        Self::SubstituteFake,
        Self::SubstituteRandom,
        Self::EncryptAes,
        Self::HashSha256,
        Self::GeneralizeDate,
        Self::GeneralizeNumeric,
    ];

    /// Stable string id used across the API boundary
    pub fn id(&self) -> &'static str {
        self.metadata().id
    }

    /// Resolve an external string id
    ///
    /// Unknown ids are fatal: the run aborts instead of silently
    /// skipping a column.
    pub fn parse(id: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.id() == id)
            .ok_or_else(|| CloakError::UnsupportedTechnique(id.to_string()))
    }

    /// Catalog metadata
    pub fn metadata(&self) -> TechniqueMetadata {
        match self {
            Self::MaskPartial => TechniqueMetadata {
                id: "mask_partial",
                category: TechniqueCategory::Masking,
                preserves_format: false,
                preserves_length: true,
                reversible: false,
            },
            Self::MaskFull => TechniqueMetadata {
                id: "mask_full",
                category: TechniqueCategory::Masking,
                preserves_format: false,
                preserves_length: true,
                reversible: false,
            },
            Self::SubstituteFake => TechniqueMetadata {
                id: "substitute_fake",
                category: TechniqueCategory::Substitution,
                preserves_format: false,
                preserves_length: false,
                reversible: false,
            },
            Self::SubstituteRandom => TechniqueMetadata {
                id: "substitute_random",
                category: TechniqueCategory::Substitution,
                preserves_format: true,
                preserves_length: true,
                reversible: false,
            },
            Self::EncryptAes => TechniqueMetadata {
                id: "encrypt_aes",
                category: TechniqueCategory::Encryption,
                preserves_format: false,
                preserves_length: false,
                reversible: true,
            },
            Self::HashSha256 => TechniqueMetadata {
                id: "hash_sha256",
                category: TechniqueCategory::Encryption,
                preserves_format: false,
                preserves_length: false,
                reversible: false,
            },
            Self::GeneralizeDate => TechniqueMetadata {
                id: "generalize_date",
                category: TechniqueCategory::Generalization,
                preserves_format: false,
                preserves_length: false,
                reversible: false,
            },
            Self::GeneralizeNumeric => TechniqueMetadata {
                id: "generalize_numeric",
                category: TechniqueCategory::Generalization,
                preserves_format: false,
                preserves_length: false,
                reversible: false,
            },
        }
    }

    /// Basic technique applied when the caller supplies no per-field map
    pub fn default_for(category: PiiCategory) -> Self {
        match category {
            PiiCategory::Email | PiiCategory::Name | PiiCategory::Phone | PiiCategory::Address => {
                Self::SubstituteFake
            }
            PiiCategory::Ssn => Self::MaskFull,
            PiiCategory::CreditCard | PiiCategory::IpAddress => Self::MaskPartial,
            PiiCategory::DateOfBirth => Self::GeneralizeDate,
        }
    }

    /// Apply the technique to a single value
    ///
    /// The RNG is caller-owned so substitution stays seedable for
    /// deterministic tests.
    pub fn apply(&self, value: &str, ctx: &TransformContext<'_>, rng: &mut StdRng) -> Result<String> {
        match self {
            Self::MaskPartial => Ok(mask::mask_partial(value)),
            Self::MaskFull => Ok(mask::mask_full(value)),
            Self::SubstituteFake => Ok(substitute::substitute_fake(value, rng)),
            Self::SubstituteRandom => {
                Ok(substitute::substitute_random(value, ctx.preserve_format, rng))
            }
            Self::EncryptAes => {
                let key = ctx.key.ok_or_else(|| {
                    CloakError::Encryption("encrypt_aes requires key material".to_string())
                })?;
                encrypt::encrypt_value(key, value)
            }
            Self::HashSha256 => Ok(hash::hash_sha256(value)),
            Self::GeneralizeDate => {
                let granularity = DateGranularity::from_level(ctx.generalization_level);
                match generalize::generalize_date(value, granularity) {
                    Some(out) => Ok(out),
                    None => recover(ctx, value, "not a recognized date format"),
                }
            }
            Self::GeneralizeNumeric => match generalize::generalize_numeric(value, ctx.bucket_size)
            {
                Some(out) => Ok(out),
                None => recover(ctx, value, "not a numeric value"),
            },
        }
    }
}

impl std::fmt::Display for Technique {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Per-column context passed into [`Technique::apply`]
#[derive(Debug, Clone)]
pub struct TransformContext<'a> {
    /// Column being transformed, used in logs and errors
    pub column: &'a str,
    /// Date generalization level (1 = year, 2 = month-year, 3 = quarter)
    pub generalization_level: u8,
    /// Bucket width for numeric generalization
    pub bucket_size: f64,
    /// Preserve letter/digit layout in `substitute_random`
    pub preserve_format: bool,
    /// Key material for `encrypt_aes`
    pub key: Option<&'a EncryptionKey>,
    /// Recovery policy for unparseable generalization input
    pub on_parse_failure: ParseFailurePolicy,
}

impl<'a> TransformContext<'a> {
    /// Context with defaults: year granularity, bucket 10, format
    /// preservation on, pass-through recovery
    pub fn new(column: &'a str) -> Self {
        Self {
            column,
            generalization_level: 1,
            bucket_size: 10.0,
            preserve_format: true,
            key: None,
            on_parse_failure: ParseFailurePolicy::PassThrough,
        }
    }

    /// Set the date generalization level
    pub fn with_generalization_level(mut self, level: u8) -> Self {
        self.generalization_level = level;
        self
    }

    /// Set the numeric bucket width
    pub fn with_bucket_size(mut self, size: f64) -> Self {
        self.bucket_size = size;
        self
    }

    /// Set encryption key material
    pub fn with_key(mut self, key: &'a EncryptionKey) -> Self {
        self.key = Some(key);
        self
    }

    /// Set the parse-failure policy
    pub fn with_parse_failure(mut self, policy: ParseFailurePolicy) -> Self {
        self.on_parse_failure = policy;
        self
    }
}

fn recover(ctx: &TransformContext<'_>, value: &str, reason: &str) -> Result<String> {
    match ctx.on_parse_failure {
        ParseFailurePolicy::PassThrough => {
            // Log the column, never the value
            tracing::warn!(
                column = %ctx.column,
                reason,
                "Value could not be parsed; passing through unchanged"
            );
            Ok(value.to_string())
        }
        ParseFailurePolicy::Strict => Err(CloakError::MalformedValue {
            column: ctx.column.to_string(),
            reason: reason.to_string(),
        }),
    }
}
