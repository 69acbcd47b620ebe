//! Domain types and validators for monstack configuration.
//!
//! Pure functions only, no I/O.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::assemble::StackSettings;
use crate::domain::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

/// Environment variable that redirects the config file.
pub const CONFIG_ENV: &str = "MONSTACK_CONFIG";

pub const VALID_CONFIG_KEYS: &[&str] = &[
    "grafana.admin_password",
    "docker.install_url",
    "deploy.output_dir",
];

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.monstack/config.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MonstackConfig {
    pub grafana: GrafanaConfig,
    pub docker: DockerConfig,
    pub deploy: DeployConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrafanaConfig {
    /// Initial Grafana admin password.
    pub admin_password: String,
}

impl Default for GrafanaConfig {
    fn default() -> Self {
        Self {
            admin_password: StackSettings::default().grafana_admin_password,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DockerConfig {
    /// Convenience install script fetched when Docker is missing.
    pub install_url: String,
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self {
            install_url: "https://get.docker.com".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    /// Directory the artifacts are written to.
    pub output_dir: String,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            output_dir: ".".to_string(),
        }
    }
}

impl MonstackConfig {
    #[must_use]
    pub fn stack_settings(&self) -> StackSettings {
        StackSettings {
            grafana_admin_password: self.grafana.admin_password.clone(),
        }
    }

    /// Current value of a whitelisted key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        match key {
            "grafana.admin_password" => Some(&self.grafana.admin_password),
            "docker.install_url" => Some(&self.docker.install_url),
            "deploy.output_dir" => Some(&self.deploy.output_dir),
            _ => None,
        }
    }

    /// Validate and assign a whitelisted key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value invalid.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        validate_config_key(key)?;
        validate_config_value(key, value)?;
        let slot = match key {
            "grafana.admin_password" => &mut self.grafana.admin_password,
            "docker.install_url" => &mut self.docker.install_url,
            _ => &mut self.deploy.output_dir,
        };
        *slot = value.to_string();
        Ok(())
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a configuration key against the whitelist.
///
/// # Errors
///
/// Returns an error if the key is not in the allowed list.
pub fn validate_config_key(key: &str) -> Result<()> {
    if !VALID_CONFIG_KEYS.contains(&key) {
        return Err(ConfigError::UnknownKey {
            key: key.to_string(),
            valid: VALID_CONFIG_KEYS.join(", "),
        }
        .into());
    }
    Ok(())
}

/// Validates a configuration value for the given key.
///
/// # Errors
///
/// Returns an error if the value is not valid for the key.
pub fn validate_config_value(key: &str, value: &str) -> Result<()> {
    let hint = match key {
        "grafana.admin_password" if value.is_empty() || value.contains(char::is_whitespace) => {
            Some("Password must be non-empty and contain no whitespace")
        }
        "docker.install_url" if !value.starts_with("https://") => {
            Some("Install URL must use https://")
        }
        "deploy.output_dir" if value.trim().is_empty() => Some("Output directory must not be empty"),
        _ => None,
    };
    match hint {
        Some(hint) => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            hint: hint.to_string(),
        }
        .into()),
        None => Ok(()),
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
