//! Configuration management for civicdispatch.
//!
//! Loaded from TOML. Every section has defaults so an empty file is a valid
//! (if fleet-less) configuration.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub dispatch: DispatchConfig,
    pub units: Vec<UnitSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Fallback filter when `RUST_LOG` is unset
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Entries retained by each activity log before the oldest are dropped
    pub audit_log_capacity: usize,
    /// Pending requests buffered by the dispatch worker
    pub worker_queue_depth: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            audit_log_capacity: 500,
            worker_queue_depth: 64,
        }
    }
}

/// A unit to register at startup.
///
/// `kind` is kept as text here; the domain crate turns it into a typed unit.
/// Type-specific fields that do not apply to `kind` are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitSpec {
    pub id: String,
    pub kind: String,
    pub location: String,
    #[serde(default)]
    pub water_capacity: Option<i64>,
    #[serde(default)]
    pub medical_tier: Option<String>,
    #[serde(default)]
    pub patrol_zone: Option<String>,
    #[serde(default)]
    pub officer_count: Option<u32>,
    #[serde(default)]
    pub protection_level: Option<String>,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<()> {
        if self.dispatch.audit_log_capacity == 0 {
            return Err(Error::Config(
                "dispatch.audit_log_capacity must be greater than 0".to_string(),
            ));
        }
        if self.dispatch.worker_queue_depth == 0 {
            return Err(Error::Config(
                "dispatch.worker_queue_depth must be greater than 0".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for unit in &self.units {
            if !seen.insert(unit.id.as_str()) {
                return Err(Error::Config(format!("duplicate unit id {}", unit.id)));
            }
        }
        Ok(())
    }
}
