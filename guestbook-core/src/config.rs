use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{GuestbookError, Result};

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000";
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 30;

/// Settings for the guestbook client, read from ~/.guestbook/config.toml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GuestbookConfig {
    /// Base URL of the guestbook server
    pub endpoint: String,
    /// Seconds between automatic refreshes in `watch`
    pub refresh_interval_secs: u64,
    /// Skip TLS certificate verification
    pub insecure: bool,
}

impl Default for GuestbookConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            insecure: false,
        }
    }
}

impl GuestbookConfig {
    /// Load from the default location, falling back to defaults when the file
    /// does not exist. A file that exists but does not parse is an error.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| GuestbookError::invalid_config(path, e.message()))?;

        if config.refresh_interval_secs == 0 {
            return Err(GuestbookError::invalid_config(
                path,
                "refresh_interval_secs must be at least 1",
            ));
        }

        Ok(config)
    }

    /// Get config file path: ~/.guestbook/config.toml
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".guestbook/config.toml")
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    /// Apply command-line overrides on top of file values
    pub fn with_overrides(mut self, endpoint: Option<String>, insecure: bool) -> Self {
        if let Some(endpoint) = endpoint {
            self.endpoint = endpoint;
        }
        self.insecure |= insecure;
        self
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| GuestbookError::invalid_config(Self::config_path(), e.to_string()))
    }

    /// Write to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = GuestbookConfig::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, GuestbookConfig::default());
        assert_eq!(config.endpoint, "http://127.0.0.1:5000");
        assert_eq!(config.refresh_interval(), Duration::from_secs(30));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "endpoint = \"https://guestbook.example\"\n").unwrap();

        let config = GuestbookConfig::load_from(&path).unwrap();
        assert_eq!(config.endpoint, "https://guestbook.example");
        assert_eq!(config.refresh_interval_secs, 30);
        assert!(!config.insecure);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "endpoint = [").unwrap();

        let err = GuestbookConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, GuestbookError::InvalidConfig { .. }));
    }

    #[test]
    fn unknown_keys_and_zero_interval_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        fs::write(&path, "endpont = \"http://x\"\n").unwrap();
        assert!(GuestbookConfig::load_from(&path).is_err());

        fs::write(&path, "refresh_interval_secs = 0\n").unwrap();
        assert!(GuestbookConfig::load_from(&path).is_err());
    }

    #[test]
    fn overrides_win_over_file() {
        let config = GuestbookConfig::default()
            .with_overrides(Some("http://other:8080".into()), true);
        assert_eq!(config.endpoint, "http://other:8080");
        assert!(config.insecure);

        let unchanged = GuestbookConfig::default().with_overrides(None, false);
        assert_eq!(unchanged, GuestbookConfig::default());
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/config.toml");
        let config = GuestbookConfig {
            endpoint: "http://box:5000".into(),
            refresh_interval_secs: 5,
            insecure: true,
        };

        config.save_to(&path).unwrap();
        assert_eq!(GuestbookConfig::load_from(&path).unwrap(), config);
    }
}
