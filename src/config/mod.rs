//! Configuration loading and validation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::calculate::{default_side_cutover, AggregateOptions, DEFAULT_CONFIDENCE_Z};
use crate::models::TournamentCategory;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Aggregation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsConfig {
    /// First date with recorded stadium sides
    #[serde(default = "default_side_cutover")]
    pub side_cutover: NaiveDate,

    /// Normal quantile for the part confidence score (1.96 = 95%)
    #[serde(default = "default_confidence_z")]
    pub confidence_z: f64,

    /// Parts with fewer matches are hidden from part listings
    #[serde(default = "default_min_part_matches")]
    pub min_part_matches: u32,
}

fn default_confidence_z() -> f64 {
    DEFAULT_CONFIDENCE_Z
}

fn default_min_part_matches() -> u32 {
    1
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            side_cutover: default_side_cutover(),
            confidence_z: default_confidence_z(),
            min_part_matches: default_min_part_matches(),
        }
    }
}

impl StatsConfig {
    /// Aggregation options for one run.
    pub fn aggregate_options(&self, category: Option<TournamentCategory>) -> AggregateOptions {
        AggregateOptions {
            category,
            side_cutover: self.side_cutover,
            confidence_z: self.confidence_z,
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub stats: StatsConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            stats: StatsConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.stats.confidence_z.is_finite() && self.stats.confidence_z > 0.0) {
            return Err(ConfigError::ValidationError(
                "Confidence z must be a positive number".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.stats.confidence_z, 1.96);
        assert_eq!(config.stats.side_cutover, default_side_cutover());
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_config_validation_ok() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_bad_z() {
        let mut config = AppConfig::default();
        config.stats.confidence_z = 0.0;
        assert!(config.validate().is_err());

        config.stats.confidence_z = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_str = r#"
            data_dir = "/srv/bey"

            [stats]
            side_cutover = "2025-09-01"
        "#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/srv/bey"));
        assert_eq!(
            config.stats.side_cutover,
            NaiveDate::from_ymd_opt(2025, 9, 1).unwrap()
        );
        assert_eq!(config.stats.confidence_z, 1.96);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_aggregate_options_from_stats_config() {
        let stats = StatsConfig {
            confidence_z: 2.576,
            ..Default::default()
        };
        let options = stats.aggregate_options(Some(TournamentCategory::Ranked));

        assert_eq!(options.category, Some(TournamentCategory::Ranked));
        assert_eq!(options.confidence_z, 2.576);
        assert_eq!(options.side_cutover, stats.side_cutover);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = AppConfig::load_or_default(Path::new("/nonexistent/bey-stats.toml")).unwrap();
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();

        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.data_dir, parsed.data_dir);
        assert_eq!(config.stats.side_cutover, parsed.stats.side_cutover);
    }
}
