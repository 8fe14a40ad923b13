use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const HOST_URL_ENV: &str = "CLIPBOARD_X_HOST_URL";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("no config directory on this system")]
    NoConfigDir,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// WebSocket endpoint of the clipboard host.
    pub host_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host_url: "ws://127.0.0.1:8787/ws".to_string(),
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    Some(dirs::config_dir()?.join("clipboard-x").join("client.toml"))
}

impl ClientConfig {
    /// Loads the user's config file, falling back to defaults, then applies
    /// `CLIPBOARD_X_HOST_URL`.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match config_path() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            _ => Self::default(),
        };
        if let Ok(url) = std::env::var(HOST_URL_ENV) {
            if !url.trim().is_empty() {
                config.host_url = url.trim().to_string();
            }
        }
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    pub fn is_first_run() -> bool {
        config_path().map_or(false, |path| !path.exists())
    }

    /// Writes the default config file unless one exists. Returns whether it
    /// wrote one. Environment overrides never reach the file.
    pub fn save_defaults_if_missing() -> Result<bool, ConfigError> {
        if !Self::is_first_run() {
            return Ok(false);
        }
        Self::default().save()?;
        Ok(true)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let path = config_path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }
}
