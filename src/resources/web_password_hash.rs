// file: src/resources/web_password_hash.rs
// version: 1.0.1
// guid: bb0dcdc9-3862-4d09-9d42-87eb1c421fa0

//! The `infinity_web_password_hash` resource.
//!
//! The salt doubles as the resource identifier: it is generated once when the
//! plan leaves it unset and stays fixed until the plan names a different one.
//! Password or round changes recompute the hash in place.

use crate::crypto::{generate_salt, hash_password, verify_password, CryptHash};
use crate::error::{ProviderError, Result, ValidationFailure};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};
use validator::Validate;

/// Round count used when the plan does not set one
pub const DEFAULT_ROUNDS: u32 = 5000;

/// Desired configuration of a web password hash
#[derive(Clone, Deserialize, Validate)]
pub struct WebPasswordHashPlan {
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,

    #[validate(length(equal = 12, message = "salt must be exactly 12 characters"))]
    #[serde(default)]
    pub salt: Option<String>,

    #[validate(range(min = 5000, message = "rounds must be at least 5000"))]
    #[serde(default)]
    pub rounds: Option<u32>,
}

impl WebPasswordHashPlan {
    /// Plan with only a password; salt and rounds use their defaults
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
            salt: None,
            rounds: None,
        }
    }

    /// Pin the salt instead of generating one
    pub fn with_salt(mut self, salt: impl Into<String>) -> Self {
        self.salt = Some(salt.into());
        self
    }

    /// Override the default round count
    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = Some(rounds);
        self
    }

    fn resolved_rounds(&self) -> u32 {
        self.rounds.unwrap_or(DEFAULT_ROUNDS)
    }

    fn check(&self) -> Result<()> {
        self.validate().map_err(|errors| {
            let mut violations: Vec<String> = errors
                .field_errors()
                .into_iter()
                .flat_map(|(field, errs)| {
                    errs.iter()
                        .map(|e| match &e.message {
                            Some(message) => message.to_string(),
                            None => format!("{}: {}", field, e.code),
                        })
                        .collect::<Vec<_>>()
                })
                .collect();
            violations.sort();
            ProviderError::from(ValidationFailure::new(violations))
        })
    }
}

impl fmt::Debug for WebPasswordHashPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebPasswordHashPlan")
            .field("password", &"********")
            .field("salt", &self.salt)
            .field("rounds", &self.rounds)
            .finish()
    }
}

/// Persisted state of a web password hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebPasswordHashState {
    pub id: String,
    pub salt: String,
    pub rounds: u32,
    pub hash: String,
}

/// What applying a plan to existing state requires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// State already matches the plan
    NoOp,
    /// Hash must be recomputed with the existing salt; the id is kept
    Recompute,
    /// Salt changed, so the resource gets a new id
    Replace,
}

/// Lifecycle handlers for the web password hash resource
#[derive(Debug, Default, Clone, Copy)]
pub struct WebPasswordHashResource;

impl WebPasswordHashResource {
    pub fn new() -> Self {
        Self
    }

    /// Create the resource, generating a salt if the plan has none
    pub fn create(&self, plan: &WebPasswordHashPlan) -> Result<WebPasswordHashState> {
        plan.check()?;

        let salt = match &plan.salt {
            Some(salt) => salt.clone(),
            None => {
                debug!("No salt planned, generating one");
                generate_salt()?
            }
        };

        let state = compute_state(&plan.password, salt, plan.resolved_rounds())?;
        info!(id = %state.id, rounds = state.rounds, "Created web password hash");
        Ok(state)
    }

    /// Decide how a plan relates to existing state
    pub fn plan_change(&self, state: &WebPasswordHashState, plan: &WebPasswordHashPlan) -> Result<ChangeKind> {
        plan.check()?;

        if let Some(salt) = &plan.salt {
            if salt != &state.salt {
                return Ok(ChangeKind::Replace);
            }
        }

        if plan.resolved_rounds() != state.rounds {
            return Ok(ChangeKind::Recompute);
        }

        if verify_password(&plan.password, &state.hash)? {
            Ok(ChangeKind::NoOp)
        } else {
            Ok(ChangeKind::Recompute)
        }
    }

    /// Apply a plan to existing state
    pub fn update(&self, state: &WebPasswordHashState, plan: &WebPasswordHashPlan) -> Result<WebPasswordHashState> {
        match self.plan_change(state, plan)? {
            ChangeKind::NoOp => Ok(state.clone()),
            ChangeKind::Recompute => {
                let updated = compute_state(&plan.password, state.salt.clone(), plan.resolved_rounds())?;
                info!(id = %updated.id, rounds = updated.rounds, "Recomputed web password hash");
                Ok(updated)
            }
            ChangeKind::Replace => {
                let replacement = self.create(plan)?;
                info!(old_id = %state.id, new_id = %replacement.id, "Replaced web password hash");
                Ok(replacement)
            }
        }
    }

    /// Check that stored state is still self-consistent
    pub fn read(&self, state: &WebPasswordHashState) -> Result<WebPasswordHashState> {
        let parsed: CryptHash = state.hash.parse()?;

        if parsed.salt != state.salt || parsed.rounds != state.rounds || state.id != state.salt {
            return Err(ProviderError::hashing(format!(
                "stored hash for {} does not match its recorded salt and rounds",
                state.id
            )));
        }

        Ok(state.clone())
    }

    /// Remove the resource. Nothing exists remotely, so this only drops state.
    pub fn delete(&self, state: WebPasswordHashState) -> Result<()> {
        info!(id = %state.id, "Deleted web password hash");
        Ok(())
    }

    /// Import is unsupported because the password cannot be recovered
    pub fn import(&self, id: &str) -> Result<WebPasswordHashState> {
        Err(ProviderError::config(format!(
            "web password hash {} cannot be imported: the password is not recoverable",
            id
        )))
    }
}

fn compute_state(password: &str, salt: String, rounds: u32) -> Result<WebPasswordHashState> {
    let hash = hash_password(password, &salt, rounds)?;
    Ok(WebPasswordHashState {
        id: salt.clone(),
        salt,
        rounds,
        hash,
    })
}
