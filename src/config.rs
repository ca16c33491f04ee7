//! Configuration handling for the TUI

use crate::identity::DEFAULT_LOGIN_NAME;
use crate::submission::DEFAULT_SUBMIT_DELAY;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that overrides `data_dir`
pub const DATA_DIR_ENV: &str = "ENQUIRY_DATA_DIR";

/// Log filter used when neither `RUST_LOG` nor the config sets one
pub const DEFAULT_LOG_FILTER: &str = "enquiry_tui=info";

/// User configuration for the TUI
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TuiConfig {
    /// Directory holding `storage.json` and the log file
    pub data_dir: Option<PathBuf>,
    /// Duration of the simulated submission
    pub submit_delay_ms: Option<u64>,
    /// Name given to users who log in without signing up
    pub login_display_name: Option<String>,
    /// Tracing filter when `RUST_LOG` is unset
    pub log_filter: Option<String>,
}

impl TuiConfig {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("com", "ruhil", "enquiry-tui")
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from the user's config directory
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from `path`; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => {
                return Err(err).with_context(|| format!("Failed to read {}", path.display()))
            }
        };
        serde_json::from_str(&content)
            .with_context(|| format!("Malformed config file {}", path.display()))
    }

    /// Resolve the data directory, honouring [`DATA_DIR_ENV`]
    pub fn data_dir(&self) -> Result<PathBuf> {
        self.data_dir_with(std::env::var_os(DATA_DIR_ENV))
    }

    fn data_dir_with(&self, env_override: Option<OsString>) -> Result<PathBuf> {
        if let Some(dir) = env_override.filter(|dir| !dir.is_empty()) {
            return Ok(PathBuf::from(dir));
        }
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        Self::project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .context("Could not determine a data directory; set ENQUIRY_DATA_DIR")
    }

    pub fn submit_delay(&self) -> Duration {
        self.submit_delay_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_SUBMIT_DELAY)
    }

    pub fn login_display_name(&self) -> &str {
        self.login_display_name
            .as_deref()
            .unwrap_or(DEFAULT_LOGIN_NAME)
    }

    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = TuiConfig::default();
        assert!(config.data_dir.is_none());
        assert_eq!(config.submit_delay(), Duration::from_millis(2000));
        assert_eq!(config.login_display_name(), "John Doe");
        assert_eq!(config.log_filter(), "enquiry_tui=info");
    }

    #[test]
    fn test_serialization() {
        let config = TuiConfig {
            data_dir: Some(PathBuf::from("/tmp/enquiry")),
            submit_delay_ms: Some(250),
            login_display_name: Some("Guest".to_string()),
            log_filter: Some("enquiry_tui=debug".to_string()),
        };

        let json = serde_json::to_string(&config).unwrap();
        let parsed: TuiConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.data_dir, Some(PathBuf::from("/tmp/enquiry")));
        assert_eq!(parsed.submit_delay(), Duration::from_millis(250));
        assert_eq!(parsed.login_display_name(), "Guest");
        assert_eq!(parsed.log_filter(), "enquiry_tui=debug");
    }

    #[test]
    fn test_deserialize_with_extra_fields() {
        // Should ignore unknown fields
        let json = r#"{"submit_delay_ms": 10, "theme": "dark"}"#;
        let parsed: TuiConfig = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.submit_delay_ms, Some(10));
    }

    #[test]
    fn test_load_from_missing_file_returns_default() {
        let dir = TempDir::new().unwrap();
        let config = TuiConfig::load_from(&dir.path().join("config.json")).unwrap();
        assert!(config.submit_delay_ms.is_none());
    }

    #[test]
    fn test_load_from_malformed_file_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let err = TuiConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Malformed config file"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"login_display_name": "Applicant"}"#).unwrap();

        let config = TuiConfig::load_from(&path).unwrap();
        assert_eq!(config.login_display_name(), "Applicant");
    }

    #[test]
    fn test_env_override_beats_config() {
        let config = TuiConfig {
            data_dir: Some(PathBuf::from("/from/config")),
            ..Default::default()
        };
        assert_eq!(
            config.data_dir_with(Some(OsString::from("/from/env"))).unwrap(),
            PathBuf::from("/from/env")
        );
        assert_eq!(
            config.data_dir_with(None).unwrap(),
            PathBuf::from("/from/config")
        );
        assert_eq!(
            config.data_dir_with(Some(OsString::new())).unwrap(),
            PathBuf::from("/from/config")
        );
    }
}
