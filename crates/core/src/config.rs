//! Configuration loading
//!
//! Settings come from `hams.toml` in the platform config directory; every
//! field has a default so the file is optional.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use serde::Deserialize;

use crate::error::{Error, Result};

const CONFIG_FILE: &str = "hams.toml";
const DATABASE_FILE: &str = "hams.db";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HamsConfig {
    /// Explicit database location; defaults to the platform data directory
    pub database_path: Option<PathBuf>,
    /// How long to wait on a contended writer lock before reporting a
    /// retryable conflict
    pub busy_timeout_ms: u64,
}

impl Default for HamsConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            busy_timeout_ms: 5000,
        }
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("edu", "bu", "hams")
        .ok_or_else(|| Error::Config("could not determine platform directories".into()))
}

impl HamsConfig {
    /// Load configuration from the platform config directory, falling back
    /// to defaults when no file exists.
    pub fn load() -> Result<Self> {
        let path = project_dirs()?.config_dir().join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(&path)?;
        Self::from_toml(&raw)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| Error::Config(e.to_string()))
    }

    /// Resolve the database path, creating the data directory if needed
    pub fn database_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.database_path {
            return Ok(path.clone());
        }

        let dirs = project_dirs()?;
        std::fs::create_dir_all(dirs.data_dir())?;
        Ok(dirs.data_dir().join(DATABASE_FILE))
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HamsConfig::default();
        assert!(config.database_path.is_none());
        assert_eq!(config.busy_timeout(), Duration::from_millis(5000));
    }

    #[test]
    fn test_from_toml() {
        let config = HamsConfig::from_toml(
            r#"
            database_path = "/tmp/hams-test.db"
            busy_timeout_ms = 250
            "#,
        )
        .unwrap();

        assert_eq!(
            config.database_path.as_deref(),
            Some(std::path::Path::new("/tmp/hams-test.db"))
        );
        assert_eq!(config.busy_timeout(), Duration::from_millis(250));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = HamsConfig::from_toml("busy_timeout_ms = 100").unwrap();
        assert!(config.database_path.is_none());
        assert_eq!(config.busy_timeout_ms, 100);
    }

    #[test]
    fn test_invalid_toml_is_a_config_error() {
        let err = HamsConfig::from_toml("busy_timeout_ms = \"soon\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
