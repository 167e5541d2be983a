//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::chains::Chain;
use crate::dashboard::Selection;
use crate::timeline::Granularity;
use crate::tokenguard::{TokenGuardConfig as ClientConfig, DEFAULT_ENDPOINT};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tokenguard: TokenGuardConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// TokenGuard API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGuardConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Transport timeout in seconds; unset means no timeout
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

impl Default for TokenGuardConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            request_timeout_secs: None,
        }
    }
}

impl TokenGuardConfig {
    /// Client settings derived from this section
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            endpoint: self.endpoint.clone(),
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
        }
    }
}

/// Initial dashboard selection
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_chain_from")]
    pub chain_from: Chain,

    #[serde(default = "default_chain_to")]
    pub chain_to: Chain,

    #[serde(default)]
    pub granularity: Granularity,
}

fn default_chain_from() -> Chain {
    Chain::Ethereum
}

fn default_chain_to() -> Chain {
    Chain::Solana
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            chain_from: default_chain_from(),
            chain_to: default_chain_to(),
            granularity: Granularity::default(),
        }
    }
}

impl DashboardConfig {
    pub fn selection(&self) -> Selection {
        Selection::new(self.chain_from, self.chain_to)
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub cors_origins: Vec<String>,

    #[serde(default = "default_max_ws_connections")]
    pub max_ws_connections: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8090
}

fn default_max_ws_connections() -> usize {
    1000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            max_ws_connections: default_max_ws_connections(),
        }
    }
}

impl ApiConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("growthdash").join("config.toml")),
            Some(PathBuf::from("/etc/growthdash/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_first(&config_paths)
    }

    /// Load the first readable candidate, falling back to defaults
    fn load_first(config_paths: &[PathBuf]) -> Self {
        for path in config_paths {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // TokenGuard overrides
        if let Some(endpoint) = var("GROWTHDASH_TOKENGUARD_URL") {
            self.tokenguard.endpoint = endpoint;
        }
        if let Some(secs) = var("GROWTHDASH_REQUEST_TIMEOUT_SECS").and_then(|s| s.parse().ok()) {
            self.tokenguard.request_timeout_secs = Some(secs);
        }

        // Dashboard overrides
        match var("GROWTHDASH_CHAIN_FROM").map(|s| s.parse::<Chain>()) {
            Some(Ok(chain)) => self.dashboard.chain_from = chain,
            Some(Err(e)) => tracing::warn!("Ignoring GROWTHDASH_CHAIN_FROM: {}", e),
            None => {}
        }
        match var("GROWTHDASH_CHAIN_TO").map(|s| s.parse::<Chain>()) {
            Some(Ok(chain)) => self.dashboard.chain_to = chain,
            Some(Err(e)) => tracing::warn!("Ignoring GROWTHDASH_CHAIN_TO: {}", e),
            None => {}
        }
        if let Some(raw) = var("GROWTHDASH_GRANULARITY") {
            match raw.parse::<u32>().ok().map(Granularity::try_from) {
                Some(Ok(granularity)) => self.dashboard.granularity = granularity,
                _ => tracing::warn!("Ignoring GROWTHDASH_GRANULARITY: {}", raw),
            }
        }

        // API overrides
        if let Some(host) = var("GROWTHDASH_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = var("GROWTHDASH_API_PORT").and_then(|s| s.parse().ok()) {
            self.api.port = port;
        }

        // Logging overrides
        if let Some(level) = var("GROWTHDASH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("GROWTHDASH_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Growthdash Configuration
#
# Environment variables override these settings:
# - GROWTHDASH_TOKENGUARD_URL
# - GROWTHDASH_REQUEST_TIMEOUT_SECS
# - GROWTHDASH_CHAIN_FROM
# - GROWTHDASH_CHAIN_TO
# - GROWTHDASH_GRANULARITY
# - GROWTHDASH_API_HOST
# - GROWTHDASH_API_PORT
# - GROWTHDASH_LOG_LEVEL
# - GROWTHDASH_LOG_FORMAT

[tokenguard]
# Growth index timeline endpoint
endpoint = "https://api.tokenguard.io/db-api/growth-index/basic-timeline-data"

# Optional transport timeout in seconds (unset = no timeout)
# request_timeout_secs = 30

[dashboard]
# Chains compared on startup
chain_from = "ethereum"
chain_to = "solana"

# Weeks per displayed point: 1, 2 or 4
granularity = 1

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 8090

# Allowed CORS origins (empty = any)
cors_origins = []

# Maximum concurrent WebSocket connections
max_ws_connections = 1000

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
