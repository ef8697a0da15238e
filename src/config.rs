//! Datasheet Core Configuration
//!
//! Names of the role and permission that carry special meaning, and the
//! month the academic year starts in. Loaded from JSON; every field has a
//! default so an empty object is a valid configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::observability::{log_event_with_fields, Event};

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid JSON for this schema
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// Parsed values are out of range
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Core configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasheetConfig {
    /// Role whose holders are scoped to assigned schools (default: "auditor")
    #[serde(default = "default_auditor_role")]
    pub auditor_role: String,

    /// Permission granting every baseline operation
    /// (default: "administer datasheet entities")
    #[serde(default = "default_admin_permission")]
    pub admin_permission: String,

    /// First month of the academic year, 1..=12 (default: 9)
    #[serde(default = "default_start_month")]
    pub academic_year_start_month: u32,
}

fn default_auditor_role() -> String {
    "auditor".to_string()
}

fn default_admin_permission() -> String {
    "administer datasheet entities".to_string()
}

fn default_start_month() -> u32 {
    9
}

impl Default for DatasheetConfig {
    fn default() -> Self {
        Self {
            auditor_role: default_auditor_role(),
            admin_permission: default_admin_permission(),
            academic_year_start_month: default_start_month(),
        }
    }
}

impl DatasheetConfig {
    /// Parses and validates a JSON config string
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a JSON config file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let config = Self::from_json_str(&contents)?;

        let path_str = path.display().to_string();
        log_event_with_fields(Event::ConfigLoaded, &[("path", path_str.as_str())]);

        Ok(config)
    }

    /// Checks value ranges
    pub fn validate(&self) -> ConfigResult<()> {
        if self.auditor_role.trim().is_empty() {
            return Err(ConfigError::Invalid("auditor_role must not be empty".to_string()));
        }
        if self.admin_permission.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "admin_permission must not be empty".to_string(),
            ));
        }
        if !(1..=12).contains(&self.academic_year_start_month) {
            return Err(ConfigError::Invalid(format!(
                "academic_year_start_month must be 1..=12, got {}",
                self.academic_year_start_month
            )));
        }
        Ok(())
    }
}
