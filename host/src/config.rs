use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

const LISTEN_ENV: &str = "CLIPBOARD_X_LISTEN";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// The clipboard of the machine the host runs on.
    Platform,
    /// A clipboard private to the host process.
    Memory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    pub listen: SocketAddr,
    pub backend: BackendKind,
    pub image_dir: Option<PathBuf>,
    pub poll_interval_ms: u64,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([127, 0, 0, 1], 8787)),
            backend: BackendKind::Platform,
            image_dir: None,
            poll_interval_ms: 500,
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    Some(dirs::config_dir()?.join("clipboard-x").join("host.toml"))
}

/// Where clipboard images go unless configured or requested otherwise.
pub fn default_image_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("clipboard-x")
        .join("images")
}

impl HostConfig {
    /// Loads the user's config file, falling back to defaults, then applies
    /// `CLIPBOARD_X_LISTEN`.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match config_path() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            _ => Self::default(),
        };
        if let Ok(listen) = std::env::var(LISTEN_ENV) {
            config.listen = listen
                .parse()
                .map_err(|_| ConfigError::InvalidListen(listen))?;
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

    pub fn image_dir(&self) -> PathBuf {
        self.image_dir.clone().unwrap_or_else(default_image_dir)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("host.toml");
        fs::write(&path, "backend = \"memory\"\npoll_interval_ms = 50\n").unwrap();

        let config = HostConfig::load_from(&path).unwrap();
        assert_eq!(config.backend, BackendKind::Memory);
        assert_eq!(config.poll_interval(), Duration::from_millis(50));
        assert_eq!(config.listen, HostConfig::default().listen);
        assert_eq!(config.image_dir(), default_image_dir());
    }

    #[test]
    fn save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("host.toml");
        let config = HostConfig {
            listen: "127.0.0.1:9000".parse().unwrap(),
            backend: BackendKind::Memory,
            image_dir: Some(dir.path().join("images")),
            poll_interval_ms: 250,
        };
        config.save_to(&path).unwrap();
        assert_eq!(HostConfig::load_from(&path).unwrap(), config);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn listen_override_is_not_persisted() {
        let dir = tempdir().unwrap();
        std::env::set_var("XDG_CONFIG_HOME", dir.path());
        std::env::set_var(LISTEN_ENV, "127.0.0.1:9999");

        assert!(HostConfig::save_defaults_if_missing().unwrap());
        assert_eq!(
            HostConfig::load().unwrap().listen,
            "127.0.0.1:9999".parse().unwrap()
        );
        assert!(!HostConfig::save_defaults_if_missing().unwrap());

        std::env::remove_var(LISTEN_ENV);
        let saved = HostConfig::load().unwrap();
        std::env::remove_var("XDG_CONFIG_HOME");

        assert_eq!(saved, HostConfig::default());
    }

    #[test]
    fn bad_backend_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("host.toml");
        fs::write(&path, "backend = \"x11\"\n").unwrap();
        assert!(matches!(
            HostConfig::load_from(&path),
            Err(ConfigError::Parse(_))
        ));
    }
}
