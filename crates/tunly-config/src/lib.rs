//! Configuration for the tunly tools.
//!
//! A TOML file at the platform config path, overlaid with `TUNLY_`
//! environment variables, and translated into `tunly_core::CoreConfig`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use tunly_core::CoreConfig;
use tunly_core::config::{
    DEFAULT_ERROR_BANNER_TTL, DEFAULT_EVENT_CHANNEL_CAPACITY, DEFAULT_LOG_CAPACITY,
    DEFAULT_TIMEOUT_SENTINEL_MS,
};

/// Environment prefix. Nested keys use a double underscore:
/// `TUNLY_CORE__LOG_CAPACITY=1000`.
pub const ENV_PREFIX: &str = "TUNLY_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct Config {
    /// Buffer sizes and timings handed to the orchestrator.
    #[serde(default)]
    pub core: CoreSection,

    /// Presentation defaults for the CLI.
    #[serde(default)]
    pub defaults: Defaults,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CoreSection {
    #[serde(default = "default_log_capacity")]
    pub log_capacity: usize,

    #[serde(default = "default_error_banner_secs")]
    pub error_banner_secs: u64,

    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,

    #[serde(default = "default_timeout_sentinel_ms")]
    pub timeout_sentinel_ms: u32,
}

impl Default for CoreSection {
    fn default() -> Self {
        Self {
            log_capacity: default_log_capacity(),
            error_banner_secs: default_error_banner_secs(),
            event_channel_capacity: default_event_channel_capacity(),
            timeout_sentinel_ms: default_timeout_sentinel_ms(),
        }
    }
}

fn default_log_capacity() -> usize {
    DEFAULT_LOG_CAPACITY
}
fn default_error_banner_secs() -> u64 {
    DEFAULT_ERROR_BANNER_TTL.as_secs()
}
fn default_event_channel_capacity() -> usize {
    DEFAULT_EVENT_CHANNEL_CAPACITY
}
fn default_timeout_sentinel_ms() -> u32 {
    DEFAULT_TIMEOUT_SENTINEL_MS
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

impl Config {
    /// Validate and translate the `[core]` section.
    pub fn to_core_config(&self) -> Result<CoreConfig, ConfigError> {
        let core = &self.core;
        if core.log_capacity == 0 {
            return Err(validation("core.log_capacity", "must be at least 1"));
        }
        if core.event_channel_capacity == 0 {
            return Err(validation("core.event_channel_capacity", "must be at least 1"));
        }
        if core.timeout_sentinel_ms == 0 {
            return Err(validation("core.timeout_sentinel_ms", "must be positive"));
        }

        Ok(CoreConfig {
            log_capacity: core.log_capacity,
            error_banner_ttl: Duration::from_secs(core.error_banner_secs),
            event_channel_capacity: core.event_channel_capacity,
            timeout_sentinel_ms: core.timeout_sentinel_ms,
        })
    }
}

fn validation(field: &str, reason: &str) -> ConfigError {
    ConfigError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "tunly", "tunly").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("tunly");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical path + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from an explicit file. A missing file yields defaults
/// (still overlaid with the environment).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, falling back to defaults on any error.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

/// Serialize config to TOML and write it to `path`, creating parents.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}
