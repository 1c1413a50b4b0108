use crate::domain::menu::MenuOptions;
use crate::rebase::RebaseSettings;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub git_binary: String,
    pub rebase: RebaseConfig,
    pub log: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            git_binary: "git".to_string(),
            rebase: RebaseConfig::default(),
            log: LogConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RebaseConfig {
    /// Offer `Edit` (`rebase --edit-todo`) in the control menu.
    pub enable_edit_todo: bool,
    /// How long an abort waits for the interactive process after closing its editor.
    pub abort_grace_ms: u64,
}

impl Default for RebaseConfig {
    fn default() -> Self {
        Self {
            enable_edit_todo: false,
            abort_grace_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn rebase_settings(&self) -> RebaseSettings {
        RebaseSettings {
            menu: MenuOptions {
                enable_edit_todo: self.rebase.enable_edit_todo,
            },
            abort_grace: Duration::from_millis(self.rebase.abort_grace_ms),
        }
    }

    /// Loads the user config. A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        match get_config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid config in {}", path.display()))
    }
}

pub fn get_config_path() -> Option<PathBuf> {
    home::home_dir().map(|mut path| {
        path.push(".config");
        path.push("grebase");
        path.push("config.toml");
        path
    })
}
