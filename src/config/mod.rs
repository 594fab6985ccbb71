// file: src/config/mod.rs
// version: 2.0.0
// guid: a1b2c3d4-e5f6-7a8b-9c0d-1e2f3a4b5c6d

//! Configuration module for the Pexip Infinity provider
//!
//! Handles loading and validation of manager bootstrap configuration.

pub mod loader;
pub mod manager;

pub use loader::{ConfigFormat, ConfigLoader};
pub use manager::ManagerBootstrapConfig;
