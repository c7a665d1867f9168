//! Reversible encryption
//!
//! AES-256-GCM keyed by material derived from a caller-supplied secret.
//! The raw secret is never used as the cipher key; it is stretched
//! through SHA-256 first. Each encrypted value carries its random
//! 96-bit nonce alongside the ciphertext (`base64(nonce).base64(ct)`),
//! so decryption needs only the original secret.

use crate::domain::{CloakError, Result};
use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rand::RngCore;
use secrecy::{ExposeSecret, SecretString};

/// Caller-supplied key material for the `encrypt_aes` technique
#[derive(Clone)]
pub struct EncryptionKey {
    secret: SecretString,
}

impl EncryptionKey {
    /// Wrap a caller-supplied secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: SecretString::new(secret.into()),
        }
    }

    /// Derive the 256-bit cipher key from the secret
    fn cipher_key(&self) -> [u8; 32] {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(self.secret.expose_secret().as_bytes());
        hasher.finalize().into()
    }
}

impl std::fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("EncryptionKey(redacted)")
    }
}

/// Encrypt a value, returning `base64(nonce).base64(ciphertext)`
pub fn encrypt_value(key: &EncryptionKey, plaintext: &str) -> Result<String> {
    let cipher = Aes256Gcm::new_from_slice(&key.cipher_key())
        .map_err(|e| CloakError::Encryption(format!("Invalid key: {e}")))?;

    let mut nonce_bytes = [0u8; 12];
    rand::thread_rng().fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext.as_bytes())
        .map_err(|_| CloakError::Encryption("AEAD encryption failed".to_string()))?;

    Ok(format!(
        "{}.{}",
        BASE64.encode(nonce_bytes),
        BASE64.encode(ciphertext)
    ))
}

/// Decrypt a value produced by [`encrypt_value`]
pub fn decrypt_value(key: &EncryptionKey, encoded: &str) -> Result<String> {
    let (nonce_b64, ct_b64) = encoded
        .split_once('.')
        .ok_or_else(|| CloakError::Encryption("Malformed ciphertext envelope".to_string()))?;

    let nonce_bytes = BASE64
        .decode(nonce_b64)
        .map_err(|e| CloakError::Encryption(format!("Invalid nonce encoding: {e}")))?;
    if nonce_bytes.len() != 12 {
        return Err(CloakError::Encryption("Nonce must be 96 bits".to_string()));
    }
    let ciphertext = BASE64
        .decode(ct_b64)
        .map_err(|e| CloakError::Encryption(format!("Invalid ciphertext encoding: {e}")))?;

    let cipher = Aes256Gcm::new_from_slice(&key.cipher_key())
        .map_err(|e| CloakError::Encryption(format!("Invalid key: {e}")))?;

    let plaintext = cipher
        .decrypt(Nonce::from_slice(&nonce_bytes), ciphertext.as_slice())
        .map_err(|_| CloakError::Encryption("AEAD decryption failed".to_string()))?;

    String::from_utf8(plaintext)
        .map_err(|e| CloakError::Encryption(format!("Decrypted value is not UTF-8: {e}")))
}
