use crate::error::{Result, SwdocsError};
use crate::store::sqlite::SqliteOptions;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILENAME: &str = "config.json";
const DB_FILENAME: &str = "swdocs.db";

pub const HOME_ENV: &str = "SWDOCS_HOME";
pub const DB_ENV: &str = "SWDOCS_DB";
pub const HOST_ENV: &str = "SWDOCS_HOST";
pub const PORT_ENV: &str = "SWDOCS_PORT";
pub const LOG_LEVEL_ENV: &str = "SWDOCS_LOGLEVEL";

pub const KEYS: &[&str] = &[
    "db-path",
    "host",
    "port",
    "log-level",
    "read-pool-size",
    "busy-timeout-ms",
    "write-wait-ms",
];

/// Where swdocs keeps its config file and, by default, its database.
#[derive(Debug, Clone)]
pub struct SwdocsPaths {
    pub home: PathBuf,
}

impl SwdocsPaths {
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    /// `SWDOCS_HOME` if set, otherwise the platform data directory.
    pub fn resolve() -> Result<Self> {
        if let Some(home) = env::var_os(HOME_ENV) {
            return Ok(Self::new(home));
        }
        let dirs = ProjectDirs::from("com", "swdocs", "swdocs").ok_or_else(|| {
            SwdocsError::Api(format!(
                "Could not determine a data directory; set {}",
                HOME_ENV
            ))
        })?;
        Ok(Self::new(dirs.data_dir()))
    }

    pub fn default_db_path(&self) -> PathBuf {
        self.home.join(DB_FILENAME)
    }
}

/// Configuration for swdocs, stored in `<home>/config.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SwdocsConfig {
    /// Database file; defaults to `<home>/swdocs.db`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// A `tracing` filter directive, e.g. "warn" or "swdocs=debug"
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_read_pool_size")]
    pub read_pool_size: usize,

    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,

    /// How long a write may queue for the write gate before failing
    #[serde(default = "default_write_wait_ms")]
    pub write_wait_ms: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_read_pool_size() -> usize {
    4
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

fn default_write_wait_ms() -> u64 {
    5000
}

impl Default for SwdocsConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            read_pool_size: default_read_pool_size(),
            busy_timeout_ms: default_busy_timeout_ms(),
            write_wait_ms: default_write_wait_ms(),
        }
    }
}

impl SwdocsConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        serde_json::from_str(&content).map_err(SwdocsError::Serialization)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let content = serde_json::to_string_pretty(self).map_err(SwdocsError::Serialization)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    /// Overlay `SWDOCS_*` environment variables on top of the file values.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(db) = lookup(DB_ENV) {
            self.db_path = Some(PathBuf::from(db));
        }
        if let Some(host) = lookup(HOST_ENV) {
            self.host = host;
        }
        if let Some(port) = lookup(PORT_ENV) {
            self.set("port", &port).map_err(SwdocsError::Api)?;
        }
        if let Some(level) = lookup(LOG_LEVEL_ENV) {
            self.log_level = level;
        }
        Ok(self)
    }

    pub fn db_path(&self, paths: &SwdocsPaths) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| paths.default_db_path())
    }

    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn sqlite_options(&self, paths: &SwdocsPaths) -> SqliteOptions {
        SqliteOptions::new(self.db_path(paths))
            .with_read_pool_size(self.read_pool_size)
            .with_busy_timeout(Duration::from_millis(self.busy_timeout_ms))
            .with_write_wait(Duration::from_millis(self.write_wait_ms))
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "db-path" => Some(
                self.db_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(default)".to_string()),
            ),
            "host" => Some(self.host.clone()),
            "port" => Some(self.port.to_string()),
            "log-level" => Some(self.log_level.clone()),
            "read-pool-size" => Some(self.read_pool_size.to_string()),
            "busy-timeout-ms" => Some(self.busy_timeout_ms.to_string()),
            "write-wait-ms" => Some(self.write_wait_ms.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        match key {
            "db-path" => self.db_path = Some(PathBuf::from(value)),
            "host" => self.host = value.to_string(),
            "port" => self.port = parse_number(key, value)?,
            "log-level" => self.log_level = value.to_string(),
            "read-pool-size" => {
                let size: usize = parse_number(key, value)?;
                if size == 0 {
                    return Err("read-pool-size must be at least 1".to_string());
                }
                self.read_pool_size = size;
            }
            "busy-timeout-ms" => self.busy_timeout_ms = parse_number(key, value)?,
            "write-wait-ms" => self.write_wait_ms = parse_number(key, value)?,
            _ => return Err(format!("Unknown config key: {}", key)),
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> std::result::Result<T, String> {
    value
        .trim()
        .parse()
        .map_err(|_| format!("Invalid value for {}: {}", key, value))
}
