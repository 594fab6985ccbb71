// file: src/lib.rs
// version: 1.0.0
// guid: 9dd8e85a-2c40-4af9-b96a-abab207a3bd5

//! # Pexip Infinity provider core
//!
//! The locally owned logic behind the Pexip Infinity provider: validation of
//! manager bootstrap configuration and SHA-512 crypt hashing for the
//! `infinity_web_password_hash` resource, with typed resource handlers and a
//! small operator CLI on top.
//!
//! The remote management API, its HTTP SDK and the plugin protocol are
//! external collaborators and are not implemented here.

pub mod cli;
pub mod config;
pub mod crypto;
pub mod error;
pub mod logging;
pub mod resources;
pub mod utils;

pub use error::{ProviderError, Result, ValidationFailure};

/// Version information for the provider
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
