// file: src/cli/commands.rs
// version: 2.0.0
// guid: g7h8i9j0-k1l2-3456-7890-123456ghijkl

//! Command implementations for the CLI

use crate::{
    crypto::{generate_salt, verify_password},
    error::ProviderError,
    resources::{FileConfigSource, ManagerConfigDataSource, WebPasswordHashPlan, WebPasswordHashResource},
    Result,
};
use tracing::{info, warn};

/// Validate a manager bootstrap configuration file
pub async fn validate_config_command(config_path: &str) -> Result<()> {
    info!("Validating manager bootstrap configuration: {}", config_path);

    let data_source = ManagerConfigDataSource::new(FileConfigSource::new(config_path));
    let config = data_source.read()?;

    println!("configuration valid: {}", config.hostname);
    Ok(())
}

/// Print a fresh salt
pub async fn generate_salt_command() -> Result<()> {
    println!("{}", generate_salt()?);
    Ok(())
}

/// Hash the password held in `password_env`
pub async fn hash_password_command(
    password_env: &str,
    salt: Option<String>,
    rounds: Option<u32>,
    json_output: bool,
) -> Result<()> {
    let password = read_password(password_env)?;

    let mut plan = WebPasswordHashPlan::new(password);
    plan.salt = salt;
    plan.rounds = rounds;

    let state = WebPasswordHashResource::new().create(&plan)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        println!("{}", state.hash);
    }
    Ok(())
}

/// Check the password held in `password_env` against an encoded hash
pub async fn verify_password_command(password_env: &str, hash: &str) -> Result<()> {
    let password = read_password(password_env)?;

    if verify_password(&password, hash)? {
        println!("password matches");
        Ok(())
    } else {
        warn!("Password verification failed");
        Err(ProviderError::hashing("password does not match the supplied hash"))
    }
}

fn read_password(password_env: &str) -> Result<String> {
    std::env::var(password_env)
        .map_err(|_| ProviderError::config(format!("environment variable {} is not set", password_env)))
}
