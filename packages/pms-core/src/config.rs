//! Defaults for the outer layers, read from a TOML file.
//!
//! The engine takes every parameter explicitly; this file only supplies the
//! values the CLI fills in when the caller leaves them out.

use crate::provider::{DEFAULT_BENCHMARK_CURRENT_LEVEL, DEFAULT_BENCHMARK_PREVIOUS_LEVEL};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// User-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PmsConfig {
    /// Period-matched risk-free rate (decimal)
    pub risk_free_rate: f64,
    /// Expected market return (decimal)
    pub market_return: f64,
    /// Portfolio beta when none is supplied
    pub beta: f64,
    /// Volatility estimate (decimal) when none is supplied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volatility: Option<f64>,
    /// Benchmark index level at the end of the window
    pub benchmark_current_level: f64,
    /// Benchmark index level at the start of the window
    pub benchmark_previous_level: f64,
    /// Days between billing dates
    pub billing_cycle_days: u32,
    /// Snapshot file used by `pms evaluate`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_path: Option<PathBuf>,
}

impl Default for PmsConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.05,
            market_return: 0.12,
            beta: 1.0,
            volatility: None,
            benchmark_current_level: DEFAULT_BENCHMARK_CURRENT_LEVEL,
            benchmark_previous_level: DEFAULT_BENCHMARK_PREVIOUS_LEVEL,
            billing_cycle_days: 30,
            snapshot_path: None,
        }
    }
}

impl PmsConfig {
    /// Get the default config file path.
    ///
    /// `PMS_CONFIG_FILE` wins; otherwise `<config dir>/pms/config.toml`.
    pub fn default_path() -> PathBuf {
        if let Ok(path) = env::var("PMS_CONFIG_FILE") {
            return PathBuf::from(path);
        }

        directories::ProjectDirs::from("", "", "pms")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("pms.toml"))
    }

    /// Load the config from the default path.
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::default_path())
    }

    /// Load the config from a specific path. A missing file yields defaults.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }
}
