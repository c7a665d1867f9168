//! Irreversible hashing
//!
//! Identical inputs always produce identical digests, so hashed columns
//! remain usable as join keys without revealing the raw value.

use sha2::{Digest, Sha256};

/// SHA-256 digest of a value as 64 lowercase hex characters
pub fn hash_sha256(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    format!("{:x}", hasher.finalize())
}
