// file: src/crypto/sha_crypt.rs
// version: 1.0.0
// guid: 4d4efeb5-6f17-4edc-8336-038d0cd333ec

//! SHA-512 based crypt(3) password hashing (`$6$` scheme).
//!
//! Produces strings of the form `$6$rounds=<r>$<salt>$<digest>` that can be
//! written straight into an `/etc/shadow` password field or any other system
//! expecting glibc-compatible SHA-512 crypt hashes.

use crate::error::{ProviderError, Result};
use sha2::{Digest, Sha512};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Smallest round count accepted when hashing
pub const MIN_ROUNDS: u32 = 5000;

/// Largest round count the crypt primitive accepts
pub const MAX_ROUNDS: u32 = 999_999_999;

/// Required salt length, in characters
pub const SALT_LEN: usize = 12;

/// Round count implied by a hash without a `rounds=` segment
const IMPLICIT_ROUNDS: u32 = 5000;

/// Lower bound accepted when verifying foreign hashes
const VERIFY_MIN_ROUNDS: u32 = 1000;

/// Salt bytes beyond this are ignored by the primitive
const MAX_SALT_BYTES: usize = 16;

const SCHEME_PREFIX: &str = "$6$";
const ROUNDS_PREFIX: &str = "rounds=";
const DIGEST_ENCODED_LEN: usize = 86;

const CRYPT_ALPHABET: &[u8; 64] =
    b"./0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Byte order in which the final digest is emitted, three bytes per group
const ENCODE_ORDER: [(usize, usize, usize); 21] = [
    (0, 21, 42),
    (22, 43, 1),
    (44, 2, 23),
    (3, 24, 45),
    (25, 46, 4),
    (47, 5, 26),
    (6, 27, 48),
    (28, 49, 7),
    (50, 8, 29),
    (9, 30, 51),
    (31, 52, 10),
    (53, 11, 32),
    (12, 33, 54),
    (34, 55, 13),
    (56, 14, 35),
    (15, 36, 57),
    (37, 58, 16),
    (59, 17, 38),
    (18, 39, 60),
    (40, 61, 19),
    (62, 20, 41),
];

/// A parsed `$6$` crypt string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CryptHash {
    pub rounds: u32,
    pub salt: String,
    pub digest: String,
}

impl fmt::Display for CryptHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}${}${}",
            SCHEME_PREFIX, ROUNDS_PREFIX, self.rounds, self.salt, self.digest
        )
    }
}

impl FromStr for CryptHash {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self> {
        let rest = s
            .strip_prefix(SCHEME_PREFIX)
            .ok_or_else(|| ProviderError::hashing("unsupported hash scheme, expected $6$"))?;

        let mut parts = rest.split('$');
        let first = parts
            .next()
            .ok_or_else(|| ProviderError::hashing("missing salt in crypt hash"))?;

        let (rounds, salt) = match first.strip_prefix(ROUNDS_PREFIX) {
            Some(rounds) => {
                let rounds = rounds.parse::<u32>().map_err(|_| {
                    ProviderError::hashing(format!("invalid rounds value in crypt hash: {}", rounds))
                })?;
                let salt = parts
                    .next()
                    .ok_or_else(|| ProviderError::hashing("missing salt in crypt hash"))?;
                (rounds, salt)
            }
            None => (IMPLICIT_ROUNDS, first),
        };

        let digest = parts
            .next()
            .ok_or_else(|| ProviderError::hashing("missing digest in crypt hash"))?;

        if parts.next().is_some() {
            return Err(ProviderError::hashing("unexpected trailing fields in crypt hash"));
        }

        if digest.len() != DIGEST_ENCODED_LEN || !digest.bytes().all(|b| CRYPT_ALPHABET.contains(&b)) {
            return Err(ProviderError::hashing("malformed digest in crypt hash"));
        }

        Ok(Self {
            rounds,
            salt: salt.to_string(),
            digest: digest.to_string(),
        })
    }
}

/// Hash a password with SHA-512 crypt.
///
/// The salt must be exactly [`SALT_LEN`] printable ASCII characters without
/// `$` or `:`, and `rounds` must lie in `MIN_ROUNDS..=MAX_ROUNDS`. The same
/// inputs always yield the same string.
pub fn hash_password(password: &str, salt: &str, rounds: u32) -> Result<String> {
    validate_salt(salt)?;
    validate_rounds(rounds, MIN_ROUNDS)?;

    debug!(rounds, "Computing SHA-512 crypt hash");
    let digest = sha512_crypt_digest(password.as_bytes(), salt.as_bytes(), rounds);

    Ok(CryptHash {
        rounds,
        salt: salt.to_string(),
        digest: encode_digest(&digest),
    }
    .to_string())
}

/// Check a password against an encoded `$6$` hash
pub fn verify_password(password: &str, encoded: &str) -> Result<bool> {
    let parsed: CryptHash = encoded.parse()?;
    validate_rounds(parsed.rounds, VERIFY_MIN_ROUNDS)?;

    let digest = sha512_crypt_digest(password.as_bytes(), parsed.salt.as_bytes(), parsed.rounds);
    let computed = encode_digest(&digest);

    Ok(secure_compare(computed.as_bytes(), parsed.digest.as_bytes()))
}

fn validate_salt(salt: &str) -> Result<()> {
    let len = salt.chars().count();
    if len != SALT_LEN {
        return Err(ProviderError::invalid_salt(format!(
            "salt must be exactly {} characters, got {}",
            SALT_LEN, len
        )));
    }

    if !salt.chars().all(|c| c.is_ascii_graphic() && c != '$' && c != ':') {
        return Err(ProviderError::invalid_salt(
            "salt may only contain printable ASCII characters other than '$' and ':'",
        ));
    }

    Ok(())
}

fn validate_rounds(rounds: u32, min: u32) -> Result<()> {
    if !(min..=MAX_ROUNDS).contains(&rounds) {
        return Err(ProviderError::hashing(format!(
            "rounds must be between {} and {}, got {}",
            min, MAX_ROUNDS, rounds
        )));
    }
    Ok(())
}

/// The SHA-512 crypt digest core
fn sha512_crypt_digest(password: &[u8], salt: &[u8], rounds: u32) -> [u8; 64] {
    let salt = &salt[..salt.len().min(MAX_SALT_BYTES)];
    let plen = password.len();

    // Digest B
    let mut alt_ctx = Sha512::new();
    alt_ctx.update(password);
    alt_ctx.update(salt);
    alt_ctx.update(password);
    let alt = alt_ctx.finalize();

    // Digest A
    let mut ctx = Sha512::new();
    ctx.update(password);
    ctx.update(salt);
    let mut remaining = plen;
    while remaining > 64 {
        ctx.update(alt.as_slice());
        remaining -= 64;
    }
    ctx.update(&alt[..remaining]);

    let mut bits = plen;
    while bits > 0 {
        if bits & 1 != 0 {
            ctx.update(alt.as_slice());
        } else {
            ctx.update(password);
        }
        bits >>= 1;
    }
    let mut current = ctx.finalize();

    // Byte sequence P
    let mut dp_ctx = Sha512::new();
    for _ in 0..plen {
        dp_ctx.update(password);
    }
    let p_bytes = repeat_to_len(dp_ctx.finalize().as_slice(), plen);

    // Byte sequence S
    let mut ds_ctx = Sha512::new();
    for _ in 0..(16 + current[0] as usize) {
        ds_ctx.update(salt);
    }
    let s_bytes = repeat_to_len(ds_ctx.finalize().as_slice(), salt.len());

    for i in 0..rounds {
        let mut round = Sha512::new();
        if i & 1 != 0 {
            round.update(&p_bytes);
        } else {
            round.update(current.as_slice());
        }
        if i % 3 != 0 {
            round.update(&s_bytes);
        }
        if i % 7 != 0 {
            round.update(&p_bytes);
        }
        if i & 1 != 0 {
            round.update(current.as_slice());
        } else {
            round.update(&p_bytes);
        }
        current = round.finalize();
    }

    let mut out = [0u8; 64];
    out.copy_from_slice(current.as_slice());
    out
}

fn repeat_to_len(block: &[u8], len: usize) -> Vec<u8> {
    block.iter().copied().cycle().take(len).collect()
}

fn encode_digest(digest: &[u8; 64]) -> String {
    let mut out = String::with_capacity(DIGEST_ENCODED_LEN);
    for &(b2, b1, b0) in ENCODE_ORDER.iter() {
        push_b64(&mut out, digest[b2], digest[b1], digest[b0], 4);
    }
    push_b64(&mut out, 0, 0, digest[63], 2);
    out
}

fn push_b64(out: &mut String, b2: u8, b1: u8, b0: u8, count: usize) {
    let mut word = (u32::from(b2) << 16) | (u32::from(b1) << 8) | u32::from(b0);
    for _ in 0..count {
        out.push(CRYPT_ALPHABET[(word & 0x3f) as usize] as char);
        word >>= 6;
    }
}

/// Constant-time comparison for sensitive data
fn secure_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (byte_a, byte_b) in a.iter().zip(b.iter()) {
        result |= byte_a ^ byte_b;
    }

    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digest_of(password: &str, salt: &str, rounds: u32) -> String {
        encode_digest(&sha512_crypt_digest(password.as_bytes(), salt.as_bytes(), rounds))
    }

    #[test]
    fn test_reference_vector_default_rounds() {
        assert_eq!(
            digest_of("Hello world!", "saltstring", 5000),
            "svn8UoSVapNtMuq1ukKS4tPQd8iKwSMHWjl/O817G3uBnIFNjnQJuesI68u4OTLiBFdcbYEdFCoEOfaS35inz1"
        );
    }

    #[test]
    fn test_reference_vector_explicit_rounds() {
        // salt is truncated to its first 16 bytes
        assert_eq!(
            digest_of("Hello world!", "saltstringsaltstring", 10000),
            "OW1/O6BYHV6BcXZu8QVeXbDWra3Oeqh0sbHbbMCVNSnCM/UrjmM0Dp8vOuZeHBy/YTBmSK6H9qs/y3RnOaw5v."
        );
        assert_eq!(
            digest_of("This is just a test", "toolongsaltstring", 5000),
            "lQ8jolhgVRVhY4b5pZKaysCLi0QBxGoNeKQzQ3glMhwllF7oGDZxUhx1yxdYcz/e1JSbq3y6JMxxl8audkUEm0"
        );
    }

    #[test]
    fn test_hash_is_deterministic() {
        let first = hash_password("p@ss", "abcdefghijkl", 5000).unwrap();
        let second = hash_password("p@ss", "abcdefghijkl", 5000).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_hash_layout() {
        let hash = hash_password("p@ss", "abcdefghijkl", 5000).unwrap();
        assert!(hash.starts_with("$6$rounds=5000$abcdefghijkl$"));
        assert_eq!(hash.len(), "$6$rounds=5000$abcdefghijkl$".len() + DIGEST_ENCODED_LEN);
    }

    #[test]
    fn test_hash_is_sensitive_to_each_input() {
        let base = hash_password("p@ss", "abcdefghijkl", 5000).unwrap();
        let other_password = hash_password("p@sS", "abcdefghijkl", 5000).unwrap();
        let other_salt = hash_password("p@ss", "abcdefghijkm", 5000).unwrap();
        let other_rounds = hash_password("p@ss", "abcdefghijkl", 5001).unwrap();

        let base_digest = base.parse::<CryptHash>().unwrap().digest;
        for other in [&other_password, &other_salt, &other_rounds] {
            assert_ne!(&base, other);
            assert_ne!(base_digest, other.parse::<CryptHash>().unwrap().digest);
        }
    }

    #[test]
    fn test_empty_and_long_passwords() {
        let empty = hash_password("", "abcdefghijkl", 5000).unwrap();
        assert!(verify_password("", &empty).unwrap());

        let long = "x".repeat(200);
        let hash = hash_password(&long, "abcdefghijkl", 5000).unwrap();
        assert!(verify_password(&long, &hash).unwrap());
        assert!(!verify_password(&"x".repeat(199), &hash).unwrap());
    }

    #[test]
    fn test_format_round_trip() {
        let hash = hash_password("p@ss", "Zy09AbCdEfGh", 6000).unwrap();
        let parsed: CryptHash = hash.parse().unwrap();

        assert_eq!(parsed.rounds, 6000);
        assert_eq!(parsed.salt, "Zy09AbCdEfGh");
        assert_eq!(parsed.to_string(), hash);
    }

    #[test]
    fn test_parse_without_rounds_segment() {
        let parsed: CryptHash = "$6$saltstring$svn8UoSVapNtMuq1ukKS4tPQd8iKwSMHWjl/O817G3uBnIFNjnQJuesI68u4OTLiBFdcbYEdFCoEOfaS35inz1"
            .parse()
            .unwrap();
        assert_eq!(parsed.rounds, 5000);
        assert_eq!(parsed.salt, "saltstring");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!("$5$rounds=5000$abc$def".parse::<CryptHash>().is_err());
        assert!("$6$rounds=abc$abcdefghijkl$xyz".parse::<CryptHash>().is_err());
        assert!("$6$rounds=5000$abcdefghijkl".parse::<CryptHash>().is_err());
        assert!("$6$rounds=5000$abcdefghijkl$short".parse::<CryptHash>().is_err());
        assert!("plain-text".parse::<CryptHash>().is_err());
    }

    #[test]
    fn test_verify_password() {
        let hash = hash_password("correct horse", "abcdefghijkl", 5000).unwrap();
        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("wrong horse", &hash).unwrap());
    }

    #[test]
    fn test_verify_reference_hash() {
        assert!(verify_password(
            "Hello world!",
            "$6$saltstring$svn8UoSVapNtMuq1ukKS4tPQd8iKwSMHWjl/O817G3uBnIFNjnQJuesI68u4OTLiBFdcbYEdFCoEOfaS35inz1"
        )
        .unwrap());
    }

    #[test]
    fn test_invalid_salt() {
        for salt in ["short", "thirteenchars", "", "abc$efghijkl", "abc:efghijkl", "abc efghijkl"] {
            let err = hash_password("p@ss", salt, 5000).unwrap_err();
            assert!(matches!(err, ProviderError::InvalidSaltError(_)), "salt {:?}", salt);
        }
    }

    #[test]
    fn test_invalid_rounds() {
        let err = hash_password("p@ss", "abcdefghijkl", 4999).unwrap_err();
        assert!(matches!(err, ProviderError::HashingError(_)));

        let err = hash_password("p@ss", "abcdefghijkl", MAX_ROUNDS + 1).unwrap_err();
        assert!(matches!(err, ProviderError::HashingError(_)));
    }

    #[test]
    fn test_errors_never_echo_password() {
        let err = hash_password("super-secret-value", "bad", 5000).unwrap_err();
        assert!(!err.to_string().contains("super-secret-value"));

        let err = hash_password("super-secret-value", "abcdefghijkl", 1).unwrap_err();
        assert!(!err.to_string().contains("super-secret-value"));
    }

    #[test]
    fn test_concurrent_hashing() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| hash_password("p@ss", "abcdefghijkl", 5000).unwrap()))
            .collect();
        let results: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(results.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_secure_compare() {
        assert!(secure_compare(b"hello", b"hello"));
        assert!(!secure_compare(b"hello", b"world"));
        assert!(!secure_compare(b"hello", b"hello123"));
    }
}
