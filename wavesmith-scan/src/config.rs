//! Serializable scan configuration.
//!
//! Stored as a TOML file. Every field has a default so a partial file
//! (or none at all) still yields a usable configuration.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

fn default_account_balance() -> f64 {
    10_000.0
}

fn default_risk_fraction() -> f64 {
    0.01
}

fn default_min_score() -> f64 {
    0.0
}

/// Configuration for one batch scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Account balance used for position sizing.
    #[serde(default = "default_account_balance")]
    pub account_balance: f64,

    /// Fraction of the account risked per trade.
    #[serde(default = "default_risk_fraction")]
    pub risk_fraction: f64,

    /// Signals scoring below this are dropped from the report.
    #[serde(default = "default_min_score")]
    pub min_score: f64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            account_balance: default_account_balance(),
            risk_fraction: default_risk_fraction(),
            min_score: default_min_score(),
        }
    }
}

impl ScanConfig {
    /// Load a configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read scan config {}", path.display()))?;
        Self::from_toml(&content)
    }

    /// Parse a configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("parse scan config TOML")
    }

    /// Serialize the configuration to TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("serialize scan config")
    }
}
