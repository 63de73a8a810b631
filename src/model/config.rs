use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub install: InstallConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InstallConfig {
    #[serde(default)]
    pub extra_plugins_dir: String,
    #[serde(default)]
    pub plugin_in_moodle_dir: bool,
    pub env_file: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub log_filter: String,
}

const DEFAULTS: &str = include_str!("../../config/default.toml");

impl AppConfig {
    /// Load configuration with layering: defaults → user config.
    ///
    /// `explicit` replaces the per-user `config.toml` lookup. Keys missing from the
    /// user file keep their default values.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut merged: toml::Value = toml::from_str(DEFAULTS)?;

        let user_path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => directories::ProjectDirs::from("", "", "moodle-plugin-ci")
                .map(|dirs| dirs.config_dir().join("config.toml"))
                .filter(|path| path.exists()),
        };

        if let Some(path) = user_path.as_ref() {
            let user_str = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            let user: toml::Value = toml::from_str(&user_str)
                .with_context(|| format!("parsing config {}", path.display()))?;
            merge(&mut merged, user);
            tracing::debug!("loaded user config from {}", path.display());
        }

        let mut config: AppConfig = merged.try_into().with_context(|| match user_path {
            Some(path) => format!("invalid config {}", path.display()),
            None => "invalid default config".to_string(),
        })?;

        config.install.extra_plugins_dir = expand_tilde(&config.install.extra_plugins_dir)?;
        config.install.env_file = expand_tilde(&config.install.env_file)?;

        Ok(config)
    }

    pub fn defaults() -> Result<Self> {
        Ok(toml::from_str(DEFAULTS)?)
    }

    pub fn extra_plugins_dir(&self) -> Option<PathBuf> {
        if self.install.extra_plugins_dir.is_empty() {
            return None;
        }
        Some(PathBuf::from(&self.install.extra_plugins_dir))
    }

    pub fn env_file(&self) -> PathBuf {
        PathBuf::from(&self.install.env_file)
    }
}

/// Overlays `overlay` onto `base`, descending into tables and replacing everything else.
fn merge(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

fn expand_tilde(path: &str) -> Result<String> {
    if !path.starts_with('~') {
        return Ok(path.to_string());
    }

    let home = dirs_home().ok_or_else(|| anyhow!("cannot determine home directory"))?;
    Ok(path.replacen('~', &home.to_string_lossy(), 1))
}

fn dirs_home() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf())
}
