use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main configuration structure for cropwise
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Response cache configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Soil coverage service configuration
    #[serde(default)]
    pub soilgrids: SoilGridsConfig,

    /// Soil aggregation configuration
    #[serde(default)]
    pub soil: SoilConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Whether to allow cross-origin requests
    #[serde(default = "default_true")]
    pub enable_cors: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    8000
}

const fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            enable_cors: default_true(),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseConfig {
    /// Path to `SQLite` database file
    #[serde(default = "default_database_path")]
    pub path: String,

    /// Maximum number of database connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_path() -> String {
    ".cropwise/cache.db".to_string()
}

const fn default_max_connections() -> u32 {
    5
}

impl DatabaseConfig {
    /// sqlx connection URL for the configured path.
    pub fn url(&self) -> String {
        format!("sqlite:{}", self.path)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// Response cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CacheConfig {
    /// Age after which cached responses are ignored, in seconds
    #[serde(default = "default_ttl_secs")]
    pub default_ttl_secs: u64,

    /// Collapse concurrent computations for the same fingerprint
    #[serde(default = "default_true")]
    pub single_flight: bool,
}

const fn default_ttl_secs() -> u64 {
    24 * 3600
}

impl CacheConfig {
    pub const fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl_secs: default_ttl_secs(),
            single_flight: default_true(),
        }
    }
}

/// Soil coverage (WCS) service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SoilGridsConfig {
    /// Base URL of the map server
    #[serde(default = "default_soilgrids_url")]
    pub base_url: String,

    /// Map file selected with the `map` query parameter
    #[serde(default = "default_map_file")]
    pub map_file: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_fetch_timeout")]
    pub timeout_secs: u64,

    /// Maximum simultaneous outbound coverage requests
    #[serde(default = "default_max_concurrent_fetches")]
    pub max_concurrent_fetches: usize,

    /// Directory where raw rasters are archived, if set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive_dir: Option<String>,
}

fn default_soilgrids_url() -> String {
    "https://maps.isric.org/mapserv".to_string()
}

fn default_map_file() -> String {
    "/map/soilgrids.map".to_string()
}

const fn default_fetch_timeout() -> u64 {
    60
}

const fn default_max_concurrent_fetches() -> usize {
    4
}

impl Default for SoilGridsConfig {
    fn default() -> Self {
        Self {
            base_url: default_soilgrids_url(),
            map_file: default_map_file(),
            timeout_secs: default_fetch_timeout(),
            max_concurrent_fetches: default_max_concurrent_fetches(),
            archive_dir: None,
        }
    }
}

/// Soil aggregation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SoilConfig {
    /// Half-width of the bounding box around a point, in degrees
    #[serde(default = "default_buffer_degrees")]
    pub buffer_degrees: f64,

    /// NDVI reported until a vegetation index source is wired in
    #[serde(default = "default_placeholder_ndvi")]
    pub placeholder_ndvi: f64,
}

const fn default_buffer_degrees() -> f64 {
    0.01
}

const fn default_placeholder_ndvi() -> f64 {
    0.51
}

impl Default for SoilConfig {
    fn default() -> Self {
        Self {
            buffer_degrees: default_buffer_degrees(),
            placeholder_ndvi: default_placeholder_ndvi(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files (stdout only when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<String>,

    /// Rotation for file logs: daily, hourly or never
    #[serde(default = "default_rotation")]
    pub rotation: String,

    /// Log to the console (stderr) in addition to any log file
    #[serde(default = "default_true")]
    pub enable_console: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
            enable_console: default_true(),
        }
    }
}
