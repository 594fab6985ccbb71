// file: src/config/loader.rs
// version: 2.1.0
// guid: d4e5f6g7-h8i9-0123-4567-890123defghi

//! Configuration file loading and environment variable substitution

use super::ManagerBootstrapConfig;
use crate::error::ProviderError;
use crate::Result;
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Pick the format from a file extension, defaulting to YAML
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path.as_ref().extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ConfigFormat::Json,
            _ => ConfigFormat::Yaml,
        }
    }
}

/// Configuration loader with environment variable substitution
pub struct ConfigLoader {
    env_vars: HashMap<String, String>,
}

impl ConfigLoader {
    /// Create a new config loader
    pub fn new() -> Self {
        Self {
            env_vars: std::env::vars().collect(),
        }
    }

    /// Load manager bootstrap configuration from a YAML or JSON file.
    ///
    /// The result is not validated; callers decide when to validate.
    pub fn load_manager_config<P: AsRef<Path>>(&self, path: P) -> Result<ManagerBootstrapConfig> {
        let path = path.as_ref();
        debug!("Loading manager bootstrap configuration from {}", path.display());

        let content = fs::read_to_string(path).map_err(|e| {
            ProviderError::config(format!(
                "Failed to read manager config file {}: {}",
                path.display(),
                e
            ))
        })?;

        self.parse_manager_config(&content, ConfigFormat::from_path(path))
    }

    /// Parse manager bootstrap configuration from in-memory content.
    ///
    /// `${VAR}` references are expanded inside string values after the
    /// document is parsed, so substituted text is never read as syntax.
    pub fn parse_manager_config(&self, content: &str, format: ConfigFormat) -> Result<ManagerBootstrapConfig> {
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| ProviderError::config(format!("Invalid regex pattern: {}", e)))?;
        let mut missing_vars = Vec::new();

        let config = match format {
            ConfigFormat::Yaml => {
                let mut value: serde_yaml::Value = serde_yaml::from_str(content)?;
                self.expand_yaml_value(&re, &mut value, &mut missing_vars);
                check_missing(&missing_vars)?;
                serde_yaml::from_value(value)?
            }
            ConfigFormat::Json => {
                let mut value: serde_json::Value = serde_json::from_str(content)?;
                self.expand_json_value(&re, &mut value, &mut missing_vars);
                check_missing(&missing_vars)?;
                serde_json::from_value(value)?
            }
        };
        Ok(config)
    }

    fn expand_yaml_value(&self, re: &Regex, value: &mut serde_yaml::Value, missing_vars: &mut Vec<String>) {
        match value {
            serde_yaml::Value::String(text) => {
                let expanded = self.expand_env_vars(re, text, missing_vars);
                *text = expanded;
            }
            serde_yaml::Value::Sequence(items) => {
                for item in items {
                    self.expand_yaml_value(re, item, missing_vars);
                }
            }
            serde_yaml::Value::Mapping(map) => {
                for item in map.values_mut() {
                    self.expand_yaml_value(re, item, missing_vars);
                }
            }
            serde_yaml::Value::Tagged(tagged) => self.expand_yaml_value(re, &mut tagged.value, missing_vars),
            _ => {}
        }
    }

    fn expand_json_value(&self, re: &Regex, value: &mut serde_json::Value, missing_vars: &mut Vec<String>) {
        match value {
            serde_json::Value::String(text) => {
                let expanded = self.expand_env_vars(re, text, missing_vars);
                *text = expanded;
            }
            serde_json::Value::Array(items) => {
                for item in items {
                    self.expand_json_value(re, item, missing_vars);
                }
            }
            serde_json::Value::Object(map) => {
                for item in map.values_mut() {
                    self.expand_json_value(re, item, missing_vars);
                }
            }
            _ => {}
        }
    }

    /// Expand environment variables in a single string value
    fn expand_env_vars(&self, re: &Regex, text: &str, missing_vars: &mut Vec<String>) -> String {
        re.replace_all(text, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            match self.env_vars.get(var_name) {
                Some(value) => value.clone(),
                None => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    String::new()
                }
            }
        })
        .into_owned()
    }

    /// Set environment variable for substitution
    pub fn set_env_var(&mut self, key: String, value: String) {
        self.env_vars.insert(key, value);
    }
}

fn check_missing(missing_vars: &[String]) -> Result<()> {
    if missing_vars.is_empty() {
        return Ok(());
    }
    Err(ProviderError::config(format!(
        "Missing environment variables: {}",
        missing_vars.join(", ")
    )))
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
