//! Configuration file support.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming the database file.
pub const DB_ENV_VAR: &str = "LOAM_DB";

/// Application configuration loaded from config file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Database file
    pub database: Option<PathBuf>,

    /// Log filter directive, e.g. `info` or `loam=debug`
    pub log: Option<String>,
}

impl Config {
    /// Load configuration from the default config file location.
    ///
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`, defaulting when it is missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Returns the path to the config file.
    ///
    /// Default: `~/.config/loam/config.toml`
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("loam")
            .join("config.toml")
    }

    /// Resolve the database file.
    ///
    /// Precedence order:
    /// 1. CLI `--db` argument
    /// 2. `LOAM_DB` environment variable
    /// 3. Config file `database` setting
    /// 4. `loam/loam.db` under the platform data directory
    pub fn database_path(&self, cli_db: Option<&Path>, env_db: Option<PathBuf>) -> PathBuf {
        cli_db
            .map(Path::to_path_buf)
            .or(env_db.filter(|p| !p.as_os_str().is_empty()))
            .or_else(|| self.database.clone())
            .unwrap_or_else(default_database_path)
    }

    /// Resolve the log filter directive.
    ///
    /// Precedence order:
    /// 1. `RUST_LOG` environment variable
    /// 2. Config file `log` setting
    /// 3. Verbosity flag count
    pub fn log_filter(&self, rust_log: Option<String>, verbose: u8) -> String {
        rust_log
            .filter(|s| !s.trim().is_empty())
            .or_else(|| self.log.clone())
            .unwrap_or_else(|| verbosity_level(verbose).to_string())
    }
}

fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("loam")
        .join("loam.db")
}

fn verbosity_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
