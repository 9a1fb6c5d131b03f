//! Configuration management for paydesk
//!
//! Configuration is read from a YAML file and then overridden from the
//! environment, so one binary serves every deployment.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use error::ConfigError;

// ==================== Configuration Types ====================

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Versioned prefix for the JSON API
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
    /// Allow cross-origin requests from any origin
    #[serde(default = "default_true")]
    pub cors_enable: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            api_prefix: default_api_prefix(),
            cors_enable: true,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_api_prefix() -> String {
    "/api/v1".to_string()
}

fn default_true() -> bool {
    true
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Connection URL, e.g. `sqlite://paydesk.db?mode=rwc`
    #[serde(default = "default_database_url")]
    pub url: String,
    /// Upper bound of pooled connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Create the tables on startup when they are missing
    #[serde(default = "default_true")]
    pub create_schema: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            create_schema: true,
        }
    }
}

fn default_database_url() -> String {
    "sqlite://paydesk.db?mode=rwc".to_string()
}

fn default_max_connections() -> u32 {
    5
}

/// What the transaction import does with a row that has no amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MissingAmountPolicy {
    /// Store 0
    #[default]
    Zero,
    /// Skip the row with a diagnostic
    Reject,
}

impl std::str::FromStr for MissingAmountPolicy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "zero" => Ok(MissingAmountPolicy::Zero),
            "reject" => Ok(MissingAmountPolicy::Reject),
            _ => Err(format!("Invalid missing amount policy: {}", s)),
        }
    }
}

impl std::fmt::Display for MissingAmountPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingAmountPolicy::Zero => write!(f, "zero"),
            MissingAmountPolicy::Reject => write!(f, "reject"),
        }
    }
}

/// CSV seeding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Directory holding the CSV files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_clients_file")]
    pub clients_file: String,
    #[serde(default = "default_transactions_file")]
    pub transactions_file: String,
    #[serde(default = "default_bills_file")]
    pub bills_file: String,
    /// Handling of transaction rows without an amount
    #[serde(default)]
    pub missing_amount: MissingAmountPolicy,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            clients_file: default_clients_file(),
            transactions_file: default_transactions_file(),
            bills_file: default_bills_file(),
            missing_amount: MissingAmountPolicy::default(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_clients_file() -> String {
    "01_clients.csv".to_string()
}

fn default_transactions_file() -> String {
    "02_transaction.csv".to_string()
}

fn default_bills_file() -> String {
    "03_bills.csv".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub seed: SeedConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file, then apply environment overrides
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            path: path.display().to_string(),
            source,
        })?;

        let mut config = Self::from_yaml(&content).map_err(|e| ConfigError::InvalidYaml {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`Config::load`], but a missing file yields the defaults
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            return Self::load(path);
        }

        log::warn!("Config file {} not found, using defaults", path.display());
        let mut config = Config::default();
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse YAML content. An empty document yields the defaults.
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        serde_yaml::from_str(content)
    }

    /// Override connection and server settings from `PAYDESK_*` variables
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("PAYDESK_DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(host) = lookup("PAYDESK_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PAYDESK_PORT") {
            self.server.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                field: "PAYDESK_PORT".to_string(),
                reason: format!("'{}' is not a port number", port),
            })?;
        }
        if let Some(dir) = lookup("PAYDESK_DATA_DIR") {
            self.seed.data_dir = PathBuf::from(dir);
        }
        if let Some(level) = lookup("PAYDESK_LOG") {
            self.logging.level = level;
        }
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        let prefix = &self.server.api_prefix;
        if !prefix.starts_with('/') || prefix.ends_with('/') {
            return Err(ConfigError::InvalidValue {
                field: "server.api_prefix".to_string(),
                reason: "Prefix must start with '/' and must not end with '/'".to_string(),
            });
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                field: "database.max_connections".to_string(),
                reason: "Must be at least 1".to_string(),
            });
        }

        if self.database.url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "database.url".to_string(),
                reason: "A connection URL is required".to_string(),
            });
        }

        Ok(())
    }

    /// Full path of the clients CSV file
    pub fn clients_path(&self) -> PathBuf {
        self.seed.data_dir.join(&self.seed.clients_file)
    }

    /// Full path of the transactions CSV file
    pub fn transactions_path(&self) -> PathBuf {
        self.seed.data_dir.join(&self.seed.transactions_file)
    }

    /// Full path of the bills CSV file
    pub fn bills_path(&self) -> PathBuf {
        self.seed.data_dir.join(&self.seed.bills_file)
    }
}
