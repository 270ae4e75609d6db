//! Application configuration.
//!
//! # Responsibility
//! - Load settings from a TOML file and apply `MYPROJECTS_*` environment
//!   overrides on top.
//! - Validate values the core depends on (log level, port).
//!
//! # Invariants
//! - Missing keys fall back to `Config::default()`; a missing file is an
//!   error.
//! - Environment overrides win over file values.

use crate::logging::{default_log_level, normalize_level};
use crate::repo::project_repo::PROJECTS_COLLECTION;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const ENV_LOG_LEVEL: &str = "MYPROJECTS_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "MYPROJECTS_LOG_DIR";
pub const ENV_DB_PATH: &str = "MYPROJECTS_DB_PATH";
pub const ENV_API_PORT: &str = "MYPROJECTS_API_PORT";

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    InvalidValue {
        key: &'static str,
        message: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse config `{}`: {source}", path.display())
            }
            Self::InvalidValue { key, message } => write!(f, "invalid `{key}`: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::InvalidValue { .. } => None,
        }
    }
}

/// Top-level settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub version: String,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute directory for rolling log files; logging stays off when unset.
    pub log_dir: Option<PathBuf>,
    pub jwt_secret: String,
    pub admin_secret: String,
    pub api: ApiConfig,
    pub database: DatabaseConfig,
}

/// Settings consumed by the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub port: u16,
    pub secret_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite file path.
    pub path: PathBuf,
    pub collection: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            log_level: default_log_level().to_string(),
            log_dir: None,
            jwt_secret: String::new(),
            admin_secret: String::new(),
            api: ApiConfig::default(),
            database: DatabaseConfig::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            secret_key: String::new(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("myprojects.db"),
            collection: PROJECTS_COLLECTION.to_string(),
        }
    }
}

impl Config {
    /// Loads `path`, applies process environment overrides and validates.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Applies overrides from `lookup`, keyed by the `ENV_*` names.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.log_level = level;
        }
        if let Some(dir) = lookup(ENV_LOG_DIR) {
            self.log_dir = Some(PathBuf::from(dir));
        }
        if let Some(path) = lookup(ENV_DB_PATH) {
            self.database.path = PathBuf::from(path);
        }
        if let Some(port) = lookup(ENV_API_PORT) {
            self.api.port = port.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_API_PORT,
                message: format!("`{port}` is not a TCP port"),
            })?;
        }
        Ok(())
    }

    /// Normalizes and checks values the core relies on.
    pub fn validate(&mut self) -> ConfigResult<()> {
        self.log_level = normalize_level(&self.log_level)
            .map_err(|message| ConfigError::InvalidValue {
                key: "log_level",
                message,
            })?
            .to_string();

        if self.database.collection.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "database.collection",
                message: "collection name cannot be empty".to_string(),
            });
        }

        Ok(())
    }
}
