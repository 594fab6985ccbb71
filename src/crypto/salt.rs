// file: src/crypto/salt.rs
// version: 1.0.0
// guid: 1492c0d6-9972-4379-9362-f7566a5ead48

//! Salt generation for crypt-style password hashes

use super::sha_crypt::SALT_LEN;
use crate::error::{ProviderError, Result};
use rand::rngs::OsRng;
use rand::RngCore;

/// Characters a generated salt is drawn from
pub const SALT_ALPHABET: &[u8; 62] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Bytes at or above this value are rejected to keep the draw uniform
const REJECTION_BOUND: u8 = 248;

/// Generate a 12 character alphanumeric salt from the operating system CSPRNG
pub fn generate_salt() -> Result<String> {
    generate_salt_with(&mut OsRng)
}

pub(crate) fn generate_salt_with<R: RngCore + ?Sized>(rng: &mut R) -> Result<String> {
    let mut salt = String::with_capacity(SALT_LEN);
    let mut buf = [0u8; 32];

    while salt.len() < SALT_LEN {
        rng.try_fill_bytes(&mut buf)
            .map_err(|e| ProviderError::entropy(format!("random source unavailable: {}", e)))?;

        for &byte in buf.iter().filter(|&&b| b < REJECTION_BOUND) {
            salt.push(SALT_ALPHABET[usize::from(byte) % SALT_ALPHABET.len()] as char);
            if salt.len() == SALT_LEN {
                break;
            }
        }
    }

    Ok(salt)
}
