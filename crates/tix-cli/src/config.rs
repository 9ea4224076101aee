//! Run configuration.
//!
//! Settings come from a TOML file: an explicit `--config` path, else the
//! platform config folder, else built-in defaults. A few environment
//! variables override the file so secrets can stay out of it:
//!
//! - `TIX_POSTGRES_URL`
//! - `TIX_POSTGRES_PASSWORD`
//! - `TIX_TABLE_NAME`
//!
//! Config file locations:
//! - macOS: ~/Library/Application Support/com.tix.tix/config.toml
//! - Windows: %APPDATA%/tix/tix/config/config.toml
//! - Linux: ~/.config/tix/config.toml

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tix_ingest::SourcePaths;
use tix_model::TransformOptions;
use tix_output::PostgresConfig;
use tracing::{debug, info};

const APP_QUALIFIER: &str = "com";
const APP_ORG: &str = "tix";
const APP_NAME: &str = "tix";
const CONFIG_FILENAME: &str = "config.toml";

pub const ENV_POSTGRES_URL: &str = "TIX_POSTGRES_URL";
pub const ENV_POSTGRES_PASSWORD: &str = "TIX_POSTGRES_PASSWORD";
pub const ENV_TABLE_NAME: &str = "TIX_TABLE_NAME";

/// Export files for the two source collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub tickets: PathBuf,
    pub staff: PathBuf,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            tickets: PathBuf::from("tickets.json"),
            staff: PathBuf::from("staffs.json"),
        }
    }
}

impl SourceConfig {
    pub fn paths(&self) -> SourcePaths {
        SourcePaths {
            tickets: self.tickets.clone(),
            staff: self.staff.clone(),
        }
    }
}

/// Complete run configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EtlConfig {
    pub source: SourceConfig,
    pub postgres: PostgresConfig,
    pub transform: TransformOptions,
}

/// Where the configuration was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    File(PathBuf),
    Defaults,
}

impl fmt::Display for ConfigOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Defaults => f.write_str("built-in defaults"),
        }
    }
}

impl EtlConfig {
    /// Parses a TOML document.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("parse configuration")
    }

    /// Reads a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("in config file {}", path.display()))
    }

    /// Applies environment overrides read through `lookup`.
    ///
    /// Unset and empty variables leave the file value alone.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        if let Some(url) = read(ENV_POSTGRES_URL) {
            debug!(variable = ENV_POSTGRES_URL, "postgres url overridden");
            self.postgres.url = Some(url);
        }
        if let Some(password) = read(ENV_POSTGRES_PASSWORD) {
            debug!(variable = ENV_POSTGRES_PASSWORD, "postgres password overridden");
            self.postgres.password = Some(password);
        }
        if let Some(table) = read(ENV_TABLE_NAME) {
            debug!(variable = ENV_TABLE_NAME, table = %table, "table name overridden");
            self.postgres.table = table;
        }
    }
}

/// Path of the per-user config file.
///
/// Returns `None` if the platform-specific directory cannot be determined.
pub fn user_config_path() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

/// Resolves the configuration file and reads it.
///
/// An explicit path must exist. The per-user file is optional, but when it
/// exists it must parse.
pub fn load_config(explicit: Option<&Path>) -> Result<(EtlConfig, ConfigOrigin)> {
    load_config_from(explicit, user_config_path())
}

/// [`load_config`] with the per-user location supplied by the caller.
pub fn load_config_from(
    explicit: Option<&Path>,
    user_path: Option<PathBuf>,
) -> Result<(EtlConfig, ConfigOrigin)> {
    if let Some(path) = explicit {
        if !path.is_file() {
            bail!("config file not found: {}", path.display());
        }
        let config = EtlConfig::from_file(path)?;
        info!(path = %path.display(), "loaded configuration");
        return Ok((config, ConfigOrigin::File(path.to_path_buf())));
    }
    match user_path {
        Some(path) if path.is_file() => {
            let config = EtlConfig::from_file(&path)?;
            info!(path = %path.display(), "loaded configuration");
            Ok((config, ConfigOrigin::File(path)))
        }
        Some(path) => {
            debug!(path = %path.display(), "no config file found, using defaults");
            Ok((EtlConfig::default(), ConfigOrigin::Defaults))
        }
        None => {
            debug!("could not determine config path, using defaults");
            Ok((EtlConfig::default(), ConfigOrigin::Defaults))
        }
    }
}
