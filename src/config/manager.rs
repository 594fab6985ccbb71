// file: src/config/manager.rs
// version: 1.1.0
// guid: b903e998-c5dc-4f07-9b84-d3ea6f374351

//! Manager bootstrap configuration and its validation

use crate::error::ValidationFailure;
use crate::utils::mailbox::parse_mailbox;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use tracing::{debug, warn};

const REDACTED: &str = "********";

/// Network, credential and contact settings used to bring up a management node
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerBootstrapConfig {
    /// Management node hostname
    #[serde(default)]
    pub hostname: String,
    /// DNS domain of the management node
    #[serde(default)]
    pub domain: String,
    /// Management node IP address
    #[serde(default)]
    pub ip: String,
    /// Network mask
    #[serde(default)]
    pub mask: String,
    /// Default gateway
    #[serde(default)]
    pub gw: String,
    /// DNS server
    #[serde(default)]
    pub dns: String,
    /// NTP server
    #[serde(default)]
    pub ntp: String,
    /// Web administration user
    #[serde(default)]
    pub user: String,
    /// Web administration password
    #[serde(default)]
    pub pass: String,
    /// OS administrator password
    #[serde(default)]
    pub admin_password: String,
    /// Send crash reports to the vendor
    #[serde(default)]
    pub error_reports: bool,
    /// Share usage analytics with the vendor
    #[serde(default)]
    pub enable_analytics: bool,
    /// RFC 5322 mailbox of the operator contact
    #[serde(default)]
    pub contact_email_address: String,
}

impl ManagerBootstrapConfig {
    /// Validate the configuration, reporting every violation at once
    pub fn validate(&self) -> Result<(), ValidationFailure> {
        let mut violations = Vec::new();

        for (value, label) in [
            (&self.hostname, "hostname"),
            (&self.domain, "domain"),
            (&self.dns, "DNS server"),
            (&self.ntp, "NTP server"),
            (&self.user, "user"),
            (&self.pass, "password"),
            (&self.admin_password, "admin password"),
        ] {
            if value.is_empty() {
                violations.push(format!("{} is required", label));
            }
        }

        for (value, label) in [
            (&self.ip, "IP address"),
            (&self.mask, "mask"),
            (&self.gw, "gateway"),
        ] {
            if value.is_empty() {
                violations.push(format!("{} is required", label));
            } else if value.parse::<IpAddr>().is_err() {
                violations.push(format!("invalid {}: {}", label, value));
            }
        }

        if self.contact_email_address.is_empty() {
            violations.push("contact email address is required".to_string());
        } else {
            match parse_mailbox(&self.contact_email_address) {
                Ok(mailbox) => debug!(
                    contact = %mailbox.address,
                    display_name = mailbox.name.is_some(),
                    "Contact email address parsed"
                ),
                Err(e) => violations.push(format!(
                    "invalid contact email address '{}': {}",
                    self.contact_email_address, e
                )),
            }
        }

        if violations.is_empty() {
            debug!(hostname = %self.hostname, "Manager bootstrap configuration is valid");
            Ok(())
        } else {
            debug!(count = violations.len(), "Manager bootstrap configuration has violations");
            Err(ValidationFailure::new(violations))
        }
    }

    /// Copy with secret fields masked, for diagnostics
    pub fn redacted(&self) -> Self {
        let mask = |secret: &str| {
            if secret.is_empty() {
                String::new()
            } else {
                REDACTED.to_string()
            }
        };

        Self {
            pass: mask(&self.pass),
            admin_password: mask(&self.admin_password),
            ..self.clone()
        }
    }
}

impl fmt::Debug for ManagerBootstrapConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redacted = self.redacted();
        f.debug_struct("ManagerBootstrapConfig")
            .field("hostname", &self.hostname)
            .field("domain", &self.domain)
            .field("ip", &self.ip)
            .field("mask", &self.mask)
            .field("gw", &self.gw)
            .field("dns", &self.dns)
            .field("ntp", &self.ntp)
            .field("user", &self.user)
            .field("pass", &redacted.pass)
            .field("admin_password", &redacted.admin_password)
            .field("error_reports", &self.error_reports)
            .field("enable_analytics", &self.enable_analytics)
            .field("contact_email_address", &self.contact_email_address)
            .finish()
    }
}

/// JSON dump with secrets masked. Falls back to `{}` if serialization fails.
impl fmt::Display for ManagerBootstrapConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(&self.redacted()) {
            Ok(json) => f.write_str(&json),
            Err(e) => {
                warn!("Failed to serialize manager bootstrap configuration: {}", e);
                f.write_str("{}")
            }
        }
    }
}
