use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Directory (relative to the working directory) holding `config.toml`.
pub const CONFIG_DIR: &str = ".pathsub";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Substitute within file names only
    #[serde(default)]
    pub basename: bool,

    /// Treat the search string as plain text
    #[serde(default)]
    pub literal: bool,

    #[serde(default)]
    pub ignore_case: bool,

    /// Log filter used when neither -q nor -v is given: "off", "error",
    /// "warn", "info", "debug" or any `EnvFilter` directive
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            basename: false,
            literal: false,
            ignore_case: false,
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load config from .pathsub/config.toml if it exists
    pub fn load() -> Result<Self> {
        if let Ok(cwd) = std::env::current_dir() {
            let config_path = cwd.join(CONFIG_DIR).join("config.toml");
            if config_path.exists() {
                return Self::load_from_path(&config_path);
            }
        }

        Ok(Self::default())
    }

    /// Load config from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Save config to a specific path
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
