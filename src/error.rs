// file: src/error.rs
// version: 1.0.1
// guid: c392de94-0882-4c0a-b1f2-ec4ba9ad56d1

use std::fmt;
use thiserror::Error;

/// Result type alias for the provider
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Error types for the Pexip Infinity provider core
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error(transparent)]
    ValidationError(#[from] ValidationFailure),

    #[error("Invalid salt: {0}")]
    InvalidSaltError(String),

    #[error("Entropy error: {0}")]
    EntropyError(String),

    #[error("Hashing error: {0}")]
    HashingError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

impl ProviderError {
    /// Create a new invalid salt error
    pub fn invalid_salt(msg: impl Into<String>) -> Self {
        Self::InvalidSaltError(msg.into())
    }

    /// Create a new entropy error
    pub fn entropy(msg: impl Into<String>) -> Self {
        Self::EntropyError(msg.into())
    }

    /// Create a new hashing error
    pub fn hashing(msg: impl Into<String>) -> Self {
        Self::HashingError(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

/// Every violation found while validating a configuration, in check order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    violations: Vec<String>,
}

impl ValidationFailure {
    /// Wrap violations collected in check order
    pub fn new(violations: Vec<String>) -> Self {
        Self { violations }
    }

    /// The violation messages, in check order
    pub fn violations(&self) -> &[String] {
        &self.violations
    }

    /// Number of violations
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed: {}", self.violations.join("; "))
    }
}

impl std::error::Error for ValidationFailure {}
