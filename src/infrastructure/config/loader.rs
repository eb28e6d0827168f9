use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use thiserror::Error;

use crate::domain::models::config::Config;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidLogRotation(String),

    #[error("Database path cannot be empty")]
    EmptyDatabasePath,

    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    #[error("Invalid cache TTL: {0}s. Must be at least 1 second")]
    InvalidCacheTtl(u64),

    #[error("Invalid soilgrids timeout: {0}s. Must be at least 1 second")]
    InvalidFetchTimeout(u64),

    #[error("Invalid max_concurrent_fetches: {0}. Must be at least 1")]
    InvalidFetchConcurrency(usize),

    #[error("Invalid buffer_degrees: {0}. Must be positive")]
    InvalidBuffer(f64),

    #[error("Invalid placeholder_ndvi: {0}. Must be between -1 and 1")]
    InvalidNdvi(f64),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .cropwise/config.yaml (project config)
    /// 3. .cropwise/local.yaml (local overrides, optional)
    /// 4. Environment variables (CROPWISE_* prefix, `__` between sections)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".cropwise/config.yaml"))
            .merge(Yaml::file(".cropwise/local.yaml"))
            .merge(Env::prefixed("CROPWISE_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load from `path` when given, otherwise from the standard locations.
    pub fn load_optional(path: Option<&std::path::Path>) -> Result<Config> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Self::load(),
        }
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.database.path.is_empty() {
            return Err(ConfigError::EmptyDatabasePath);
        }

        if config.database.max_connections == 0 {
            return Err(ConfigError::InvalidMaxConnections(
                config.database.max_connections,
            ));
        }

        if config.cache.default_ttl_secs == 0 {
            return Err(ConfigError::InvalidCacheTtl(config.cache.default_ttl_secs));
        }

        if config.soilgrids.base_url.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "soilgrids base_url cannot be empty".to_string(),
            ));
        }

        if config.soilgrids.timeout_secs == 0 {
            return Err(ConfigError::InvalidFetchTimeout(config.soilgrids.timeout_secs));
        }

        if config.soilgrids.max_concurrent_fetches == 0 {
            return Err(ConfigError::InvalidFetchConcurrency(
                config.soilgrids.max_concurrent_fetches,
            ));
        }

        let buffer = config.soil.buffer_degrees;
        if !buffer.is_finite() || buffer <= 0.0 {
            return Err(ConfigError::InvalidBuffer(buffer));
        }

        let ndvi = config.soil.placeholder_ndvi;
        if !(-1.0..=1.0).contains(&ndvi) {
            return Err(ConfigError::InvalidNdvi(ndvi));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidLogRotation(config.logging.rotation.clone()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.database.path, ".cropwise/cache.db");
        assert_eq!(config.cache.default_ttl_secs, 86_400);
        assert_eq!(config.soilgrids.base_url, "https://maps.isric.org/mapserv");
        assert!((config.soil.buffer_degrees - 0.01).abs() < f64::EPSILON);
        assert_eq!(config.logging.level, "info");
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r"
server:
  port: 9100
database:
  path: /custom/cache.db
  max_connections: 2
cache:
  default_ttl_secs: 600
soilgrids:
  timeout_secs: 15
  archive_dir: /tmp/rasters
logging:
  level: debug
  format: pretty
";

        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");

        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.database.path, "/custom/cache.db");
        assert_eq!(config.database.max_connections, 2);
        assert_eq!(config.cache.default_ttl_secs, 600);
        assert!(config.cache.single_flight);
        assert_eq!(config.soilgrids.timeout_secs, 15);
        assert_eq!(config.soilgrids.archive_dir.as_deref(), Some("/tmp/rasters"));
        assert_eq!(config.logging.format, "pretty");

        ConfigLoader::validate(&config).expect("Parsed config should be valid");
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "invalid".to_string();

        match ConfigLoader::validate(&config).unwrap_err() {
            ConfigError::InvalidLogLevel(level) => assert_eq!(level, "invalid"),
            other => panic!("Expected InvalidLogLevel error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_invalid_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();

        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidLogFormat(_)
        ));
    }

    #[test]
    fn test_validate_empty_database_path() {
        let mut config = Config::default();
        config.database.path = String::new();

        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::EmptyDatabasePath
        ));
    }

    #[test]
    fn test_validate_zero_values() {
        let mut config = Config::default();
        config.database.max_connections = 0;
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidMaxConnections(0)
        ));

        let mut config = Config::default();
        config.cache.default_ttl_secs = 0;
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidCacheTtl(0)
        ));

        let mut config = Config::default();
        config.soilgrids.timeout_secs = 0;
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidFetchTimeout(0)
        ));

        let mut config = Config::default();
        config.soilgrids.max_concurrent_fetches = 0;
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidFetchConcurrency(0)
        ));
    }

    #[test]
    fn test_validate_soil_settings() {
        let mut config = Config::default();
        config.soil.buffer_degrees = 0.0;
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidBuffer(_)
        ));

        let mut config = Config::default();
        config.soil.placeholder_ndvi = 1.5;
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidNdvi(_)
        ));
    }

    #[test]
    fn test_env_override() {
        temp_env::with_vars(
            [
                ("CROPWISE_SERVER__PORT", Some("9001")),
                ("CROPWISE_CACHE__DEFAULT_TTL_SECS", Some("120")),
                ("CROPWISE_LOGGING__LEVEL", Some("debug")),
            ],
            || {
                let config = ConfigLoader::load().expect("env config should load");
                assert_eq!(config.server.port, 9001);
                assert_eq!(config.cache.default_ttl_secs, 120);
                assert_eq!(config.logging.level, "debug");
            },
        );
    }

    #[test]
    fn test_env_override_is_validated() {
        temp_env::with_var("CROPWISE_SOILGRIDS__TIMEOUT_SECS", Some("0"), || {
            assert!(ConfigLoader::load().is_err());
        });
    }

    #[test]
    fn test_hierarchical_merging() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut base_file = NamedTempFile::new().unwrap();
        writeln!(
            base_file,
            "server:\n  port: 8100\nlogging:\n  level: info\n  format: json"
        )
        .unwrap();
        base_file.flush().unwrap();

        let mut override_file = NamedTempFile::new().unwrap();
        writeln!(override_file, "server:\n  port: 8200\nlogging:\n  level: debug").unwrap();
        override_file.flush().unwrap();

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(base_file.path()))
            .merge(Yaml::file(override_file.path()))
            .extract()
            .unwrap();

        assert_eq!(config.server.port, 8200, "Override should win");
        assert_eq!(config.logging.level, "debug", "Override should win for nested fields");
        assert_eq!(config.logging.format, "json", "Base value should persist when not overridden");
    }

    #[test]
    fn test_load_from_file() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "database:\n  path: /var/lib/cropwise/cache.db\nsoil:\n  buffer_degrees: 0.05").unwrap();
        file.flush().unwrap();

        let config = ConfigLoader::load_optional(Some(file.path())).unwrap();
        assert_eq!(config.database.path, "/var/lib/cropwise/cache.db");
        assert!((config.soil.buffer_degrees - 0.05).abs() < f64::EPSILON);
    }
}
