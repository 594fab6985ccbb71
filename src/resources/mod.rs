// file: src/resources/mod.rs
// version: 1.0.0
// guid: a2851007-0416-4524-a3e0-9f801d280e38

//! Resource and data source handlers built on the validation and hashing core

pub mod manager_config;
pub mod web_password_hash;

pub use manager_config::{FileConfigSource, ManagerConfigDataSource, ManagerConfigSource, StaticConfigSource};
pub use web_password_hash::{
    ChangeKind, WebPasswordHashPlan, WebPasswordHashResource, WebPasswordHashState, DEFAULT_ROUNDS,
};
