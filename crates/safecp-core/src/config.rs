//! Configuration handling for safecp

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::conflict::ConflictPolicy;
use crate::error::SafeCpError;

/// Environment variable naming a config file
pub const CONFIG_ENV_VAR: &str = "SAFECP_CONFIG";

/// Smallest copy buffer we will use
pub const MIN_BUFFER_SIZE: usize = 4 * 1024;

/// Safecp configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Safecp-specific settings
    #[serde(default)]
    pub safecp: SafeCpConfig,
}

/// Core safecp settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SafeCpConfig {
    /// Ask before creating a missing destination directory
    #[serde(default = "default_true")]
    pub confirm_create: bool,

    /// Copy the source's permission bits onto new files
    #[serde(default = "default_true")]
    pub preserve_mode: bool,

    /// Mode for new files when `preserve_mode` is off
    #[serde(default = "default_file_mode")]
    pub file_mode: u32,

    /// Copy buffer size in bytes
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,

    /// How destination conflicts are answered
    #[serde(default)]
    pub on_conflict: ConflictPolicy,
}

fn default_true() -> bool {
    true
}

fn default_file_mode() -> u32 {
    0o644
}

fn default_buffer_size() -> usize {
    1024 * 1024
}

impl Default for SafeCpConfig {
    fn default() -> Self {
        Self {
            confirm_create: true,
            preserve_mode: true,
            file_mode: default_file_mode(),
            buffer_size: default_buffer_size(),
            on_conflict: ConflictPolicy::default(),
        }
    }
}

impl SafeCpConfig {
    /// Buffer size with the lower bound applied
    pub fn effective_buffer_size(&self) -> usize {
        self.buffer_size.max(MIN_BUFFER_SIZE)
    }
}

impl Config {
    /// Parse a TOML document
    pub fn from_toml(content: &str) -> Result<Self, SafeCpError> {
        toml::from_str(content).map_err(|e| SafeCpError::Config(e.to_string()))
    }

    /// Load a config file that must exist
    pub fn load(path: &Path) -> Result<Self, SafeCpError> {
        let content = fs::read_to_string(path).map_err(|e| {
            SafeCpError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content)
            .map_err(|e| SafeCpError::Config(format!("{}: {}", path.display(), e)))
    }
}

/// Default per-user config location: `<config_dir>/safecp/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("safecp").join("config.toml"))
}

/// Resolve and load configuration
///
/// Lookup order:
/// 1. An explicit path (must exist)
/// 2. Environment variable: SAFECP_CONFIG (must exist)
/// 3. `<config_dir>/safecp/config.toml`, when present
/// 4. Built-in defaults
pub fn load_config(explicit: Option<&Path>) -> Result<Config, SafeCpError> {
    if let Some(path) = explicit {
        return Config::load(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
        if !env_path.is_empty() {
            return Config::load(Path::new(&env_path));
        }
    }

    match default_config_path() {
        Some(path) if path.is_file() => Config::load(&path),
        _ => Ok(Config::default()),
    }
}
