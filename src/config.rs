use serde::Deserialize;
use std::fmt::{Debug, Formatter};
use std::fs;
use std::num::ParseIntError;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_SPOT_PRICE_URL: &str = "https://api.coinbase.com/v2/prices/spot";
pub const DEFAULT_POLL_INTERVAL_SEC: u64 = 15;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),

    #[error("POSTGRES_PORT must be a port number, got {value:?}")]
    InvalidPort {
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("poll_interval_sec must be greater than zero")]
    InvalidInterval,

    #[error("failed to read config file {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
}

/// What the driver loop does with an iteration that failed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop the loop and hand the error to the caller.
    #[default]
    Abort,
    /// Log the error and poll again on the next tick.
    Continue,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub spot_price_url: String,
    pub poll_interval_sec: u64,
    pub on_failure: FailurePolicy,
    #[serde(skip)]
    pub database: DatabaseConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            spot_price_url: DEFAULT_SPOT_PRICE_URL.to_string(),
            poll_interval_sec: DEFAULT_POLL_INTERVAL_SEC,
            on_failure: FailurePolicy::Abort,
            database: DatabaseConfig::default(),
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let toml_str = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&toml_str)
    }

    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(toml_str)?;
        if config.poll_interval_sec == 0 {
            return Err(ConfigError::InvalidInterval);
        }

        Ok(config)
    }

    /// Reads the optional settings file, then the database settings from the
    /// process environment. A missing settings file means defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            Self::default()
        };
        config.database = DatabaseConfig::from_env()?;

        Ok(config)
    }

    pub fn poll_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.poll_interval_sec)
    }
}

#[derive(Clone, Default, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub name: String,
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));

        let user = require("POSTGRES_USER")?;
        let password = require("POSTGRES_PASSWORD")?;
        let host = require("POSTGRES_HOST")?;
        let port_str = require("POSTGRES_PORT")?;
        let name = require("POSTGRES_NAME")?;

        let port = port_str
            .trim()
            .parse::<u16>()
            .map_err(|source| ConfigError::InvalidPort {
                value: port_str.clone(),
                source,
            })?;

        Ok(Self {
            user,
            password,
            host,
            port,
            name,
        })
    }

    /// Credentials and database name are percent-encoded.
    pub fn url(&self) -> String {
        format!(
            "postgresql://{}:{}@{}:{}/{}",
            urlencoding::encode(&self.user),
            urlencoding::encode(&self.password),
            self.host,
            self.port,
            urlencoding::encode(&self.name)
        )
    }
}

impl Debug for DatabaseConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("user", &self.user)
            .field("password", &"***")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .finish()
    }
}
