//! # Hashing and Token Utilities
//!
//! Keyed one-way hashing of secrets and random token generation.
//!
//! Secrets are only ever stored as HMAC-SHA256 digests keyed by the
//! process-wide hashing secret. The same input and key always produce the
//! same digest, so verification recomputes and compares.

use hmac::{Hmac, Mac};
use rand::Rng;
use serde_json::Value;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::errors::{HelperError, HelperResult};

type HmacSha256 = Hmac<Sha256>;

/// Alphabet used for random tokens
pub const TOKEN_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Keyed secret hasher
#[derive(Clone)]
pub struct SecretHasher {
    key: Vec<u8>,
}

impl std::fmt::Debug for SecretHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretHasher").finish_non_exhaustive()
    }
}

impl SecretHasher {
    /// Create a hasher keyed by `key`
    pub fn new(key: impl Into<Vec<u8>>) -> Self {
        Self { key: key.into() }
    }

    /// Hash a secret into a lower-case hex digest
    pub fn hash(&self, secret: &str) -> HelperResult<String> {
        if secret.is_empty() {
            return Err(HelperError::EmptyInput);
        }

        let mut mac = HmacSha256::new_from_slice(&self.key).map_err(|_| HelperError::InvalidKey)?;
        mac.update(secret.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Hash an untyped value, accepting only non-empty strings
    pub fn hash_value(&self, value: &Value) -> HelperResult<String> {
        match value {
            Value::String(secret) => self.hash(secret),
            _ => Err(HelperError::NotText),
        }
    }

    /// Recompute the digest of `secret` and compare it to `digest`
    pub fn verify(&self, secret: &str, digest: &str) -> bool {
        match self.hash(secret) {
            Ok(computed) => constant_time_str_eq(&computed, digest),
            Err(_) => false,
        }
    }
}

/// Generate a random token of `length` characters from [`TOKEN_ALPHABET`]
///
/// Returns `None` for a zero length.
pub fn create_random_string(length: usize) -> Option<String> {
    if length == 0 {
        return None;
    }

    let mut rng = rand::thread_rng();
    let token = (0..length)
        .map(|_| TOKEN_ALPHABET[rng.gen_range(0..TOKEN_ALPHABET.len())] as char)
        .collect();

    Some(token)
}

/// Constant-time comparison of two strings
pub fn constant_time_str_eq(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
