// file: src/crypto/mod.rs
// version: 1.0.0
// guid: 5d953686-7ee4-4523-9ce0-ddadfe36bd45

//! Password hashing for the web password hash resource

pub mod salt;
pub mod sha_crypt;

pub use salt::generate_salt;
pub use sha_crypt::{hash_password, verify_password, CryptHash, MAX_ROUNDS, MIN_ROUNDS, SALT_LEN};
