//! Configuration management for the nutrient calculation server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with NMP__ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Reference table snapshot
    pub reference_data: ReferenceDataConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReferenceDataConfig {
    /// JSON file holding every reference table
    pub path: String,

    /// Refuse to start when a Kelowna range table is not sorted ascending
    pub strict_range_order: bool,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("NMP__ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("reference_data.path", "data/reference.json")?
            .set_default("reference_data.strict_range_order", false)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (NMP__ prefix)
            .add_source(
                Environment::with_prefix("NMP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for ReferenceDataConfig {
    fn default() -> Self {
        Self {
            path: "data/reference.json".to_string(),
            strict_range_order: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server: ServerConfig::default(),
            reference_data: ReferenceDataConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_load_without_files() {
        let config = Config::load().unwrap();
        assert!(!config.server.host.is_empty());
        assert!(!config.reference_data.path.is_empty());
    }

    #[test]
    fn test_default_reference_settings() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.reference_data.path, "data/reference.json");
        assert!(!config.reference_data.strict_range_order);
    }
}
