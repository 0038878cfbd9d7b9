//! CLI configuration

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::output::OutputFormat;

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "KINDRED_CONFIG";

/// Environment variable naming the snapshot when --file is not given
pub const MEMBERS_FILE_ENV: &str = "KINDRED_MEMBERS_FILE";

/// Where an effective setting came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Env,
    File,
    Default,
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Env => write!(f, "env {}", MEMBERS_FILE_ENV),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// Get the config file path
pub fn config_file_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("kindred")
        .join("config.toml")
}

/// Configuration for the CLI
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Snapshot used when --file is not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub members_file: Option<PathBuf>,

    /// Output format used when --format is not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl Config {
    pub fn keys() -> &'static [&'static str] {
        &["members_file", "format"]
    }

    /// Load from the default location; a missing file yields the defaults
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&config_file_path())
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&config_file_path())
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)
            .with_context(|| format!("Failed to write config {}", path.display()))?;
        tracing::debug!("Saved config to {:?}", path);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "members_file" => self.members_file.as_ref().map(|p| p.display().to_string()),
            "format" => self.format.clone(),
            _ => None,
        }
    }

    /// Value a query uses for `key` when no flag overrides it
    pub fn effective(&self, key: &str) -> Option<(String, Origin)> {
        match key {
            "members_file" => std::env::var_os(MEMBERS_FILE_ENV)
                .filter(|raw| !raw.is_empty())
                .map(|raw| (PathBuf::from(raw).display().to_string(), Origin::Env))
                .or_else(|| self.get(key).map(|value| (value, Origin::File))),
            "format" => Some(
                self.get(key)
                    .map(|value| (value, Origin::File))
                    .unwrap_or_else(|| ("table".to_string(), Origin::Default)),
            ),
            _ => None,
        }
    }

    pub fn check_key(key: &str) -> anyhow::Result<()> {
        if !Self::keys().contains(&key) {
            anyhow::bail!(
                "Unknown config key: {}. Available keys: {}",
                key,
                Self::keys().join(", ")
            );
        }
        Ok(())
    }

    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "members_file" => self.members_file = Some(PathBuf::from(value)),
            "format" => {
                if !OutputFormat::is_known(value) {
                    anyhow::bail!("Unknown format '{}', expected one of: table, json", value);
                }
                self.format = Some(value.to_lowercase());
            }
            _ => Self::check_key(key)?,
        }
        Ok(())
    }
}
