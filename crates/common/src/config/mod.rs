//! Configuration management for the citemetrics engine
//!
//! Supports loading configuration from:
//! - Environment variables (prefixed with APP__)
//! - Configuration files (config.toml, config.yaml)
//! - Default values

use crate::errors::{AnalysisError, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Community detection configuration
    #[serde(default)]
    pub clustering: ClusteringConfig,

    /// Scoring configuration
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClusteringConfig {
    /// Modularity resolution (higher = more, smaller communities)
    #[serde(default = "default_resolution")]
    pub resolution: f64,

    /// Seed for node visitation order; fixes a (graph, resolution,
    /// seed) triple to one reproducible partition
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Hard bound on aggregation passes; exceeding it reports
    /// non-convergence (0 disables clustering outright)
    #[serde(default = "default_max_aggregation_passes")]
    pub max_aggregation_passes: u32,

    /// Minimum quality-function gain for a node move to be accepted
    #[serde(default = "default_min_gain")]
    pub min_gain: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScoringConfig {
    /// Communities below this size are statistically unreliable and
    /// score against the corpus-wide potential instead
    #[serde(default = "default_min_community_size")]
    pub min_community_size: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level (debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default = "default_json_logging")]
    pub json_logging: bool,

    /// Service name for tracing
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

// Default value functions
fn default_resolution() -> f64 { 1.0 }
fn default_seed() -> u64 { 42 }
fn default_max_aggregation_passes() -> u32 { 16 }
fn default_min_gain() -> f64 { 1e-9 }
fn default_min_community_size() -> usize { 2 }
fn default_log_level() -> String { "info".to_string() }
fn default_json_logging() -> bool { true }
fn default_service_name() -> String { "citemetrics".to_string() }

impl AppConfig {
    /// Load configuration from environment and files
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Load base config file
            .add_source(File::with_name("config/default").required(false))
            // Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            // Load local overrides
            .add_source(File::with_name("config/local").required(false))
            // Load from environment variables with APP__ prefix
            // e.g., APP__CLUSTERING__RESOLUTION=1.5
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a specific TOML file
    pub fn from_file(path: &str) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject parameter combinations the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if !(self.clustering.resolution > 0.0) {
            return Err(AnalysisError::Configuration {
                message: format!(
                    "clustering.resolution must be positive, got {}",
                    self.clustering.resolution
                ),
            });
        }
        if self.clustering.min_gain < 0.0 {
            return Err(AnalysisError::Configuration {
                message: format!(
                    "clustering.min_gain must be non-negative, got {}",
                    self.clustering.min_gain
                ),
            });
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            clustering: ClusteringConfig::default(),
            scoring: ScoringConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            resolution: default_resolution(),
            seed: default_seed(),
            max_aggregation_passes: default_max_aggregation_passes(),
            min_gain: default_min_gain(),
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            min_community_size: default_min_community_size(),
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logging: default_json_logging(),
            service_name: default_service_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.clustering.resolution, 1.0);
        assert_eq!(config.clustering.seed, 42);
        assert_eq!(config.clustering.max_aggregation_passes, 16);
        assert_eq!(config.scoring.min_community_size, 2);
    }

    #[test]
    fn test_default_config_validates() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_resolution() {
        let mut config = AppConfig::default();
        config.clustering.resolution = 0.0;
        assert!(config.validate().is_err());

        config.clustering.resolution = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_negative_min_gain() {
        let mut config = AppConfig::default();
        config.clustering.min_gain = -1e-6;
        assert!(config.validate().is_err());
    }
}
