//! Configuration loading and management.
//!
//! Configuration is loaded from multiple sources with the following precedence
//! (highest to lowest):
//!
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. `.query-cost.toml` in current directory
//! 4. `~/.config/query-cost/config.toml`
//! 5. Default values
//!
//! # Configuration File Format
//!
//! ```toml
//! [estimator]
//! compute_size = "LARGE"       # X-SMALL .. 4X-LARGE
//! unit_price = 2.0             # price per throughput unit
//!
//! [caution]
//! max_throughput_units = 0.5
//! max_complexity = 15
//!
//! [stats]
//! file = "catalog.yaml"        # or .json / .toml
//! url = "http://localhost:8080"
//! timeout_secs = 30
//!
//! [retry]
//! max_retries = 3
//! initial_delay_ms = 1000
//! max_delay_ms = 30000
//! backoff_factor = 2.0
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Description |
//! |----------|-------------|
//! | `QUERY_COST_COMPUTE_SIZE` | Compute size label |
//! | `QUERY_COST_UNIT_PRICE` | Price per throughput unit |
//! | `QUERY_COST_STATS_FILE` | Table statistics catalog file |
//! | `QUERY_COST_STATS_URL` | Table statistics service base URL |

use std::{
    env, fs,
    path::{Path, PathBuf}
};

use serde::Deserialize;
use tracing::debug;

use crate::{
    error::{AppResult, config_error},
    estimator::CautionThresholds
};

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub estimator: EstimatorConfig,
    #[serde(default)]
    pub caution:   CautionThresholds,
    #[serde(default)]
    pub stats:     StatsConfig,
    #[serde(default)]
    pub retry:     RetryConfig
}

/// Estimator defaults
#[derive(Debug, Clone, Deserialize)]
pub struct EstimatorConfig {
    pub compute_size: Option<String>,
    #[serde(default = "default_unit_price")]
    pub unit_price:   f64
}

fn default_unit_price() -> f64 {
    2.0
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            compute_size: None,
            unit_price:   default_unit_price()
        }
    }
}

/// Table statistics collaborator configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StatsConfig {
    pub file:         Option<PathBuf>,
    pub url:          Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            file:         None,
            url:          None,
            timeout_secs: default_timeout_secs()
        }
    }
}

/// Retry configuration for remote statistics requests
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    pub max_retries:      u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms:     u64,
    pub backoff_factor:   f64
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries:      3,
            initial_delay_ms: 1000,
            max_delay_ms:     30000,
            backoff_factor:   2.0
        }
    }
}

impl Config {
    /// Load configuration from file and environment
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables
    /// 2. Config file in current directory (.query-cost.toml)
    /// 3. Config file in home directory (~/.config/query-cost/config.toml)
    /// 4. Default values
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(home) = env::var_os("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("query-cost")
                .join("config.toml");
            if home_config.exists() {
                config = Self::from_file(&home_config)?;
            }
        }

        // Local file replaces the home file entirely
        let local_config = PathBuf::from(".query-cost.toml");
        if local_config.exists() {
            config = Self::from_file(&local_config)?;
        }

        config.apply_env()?;
        Ok(config)
    }

    /// Parse a single TOML configuration file
    pub fn from_file(path: &Path) -> AppResult<Self> {
        debug!(path = %path.display(), "loading config file");
        let content = fs::read_to_string(path)
            .map_err(|e| config_error(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> AppResult<Self> {
        toml::from_str(content).map_err(|e| config_error(format!("Invalid config file: {}", e)))
    }

    fn apply_env(&mut self) -> AppResult<()> {
        if let Ok(size) = env::var("QUERY_COST_COMPUTE_SIZE") {
            self.estimator.compute_size = Some(size);
        }

        if let Ok(price) = env::var("QUERY_COST_UNIT_PRICE") {
            self.estimator.unit_price = price.trim().parse().map_err(|_| {
                config_error(format!("Invalid QUERY_COST_UNIT_PRICE: '{}'", price))
            })?;
        }

        if let Ok(file) = env::var("QUERY_COST_STATS_FILE") {
            self.stats.file = Some(PathBuf::from(file));
        }

        if let Ok(url) = env::var("QUERY_COST_STATS_URL") {
            self.stats.url = Some(url);
        }

        Ok(())
    }
}
