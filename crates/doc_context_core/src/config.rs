//! Persisted command settings and store connection config.
//!
//! # Responsibility
//! - Load/save the togglable command options as JSON.
//! - Resolve store connection parameters from the environment.
//!
//! # Invariants
//! - Missing settings fields fall back to defaults.
//! - A missing settings file is not an error.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default tab throttle window in milliseconds.
pub const DEFAULT_TAB_THROTTLE_WINDOW_MS: u64 = 1000;
/// Default API endpoint of a locally running host.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:6806";
/// Environment variable overriding the API endpoint.
pub const API_URL_ENV: &str = "SIYUAN_API_URL";
/// Environment variable carrying the API token.
pub const API_TOKEN_ENV: &str = "SIYUAN_TOKEN";

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// User-togglable command options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PluginSettings {
    /// Registers the go-to-parent and go-to-child commands.
    pub enable_parent_child_shortcuts: bool,
    /// Registers the previous/next sibling commands.
    pub enable_sibling_shortcuts: bool,
    /// Closes the previous tab when navigations arrive in quick succession.
    pub enable_tab_throttle: bool,
    /// Throttle window in milliseconds.
    pub tab_throttle_window_ms: u64,
}

impl Default for PluginSettings {
    fn default() -> Self {
        Self {
            enable_parent_child_shortcuts: true,
            enable_sibling_shortcuts: true,
            enable_tab_throttle: true,
            tab_throttle_window_ms: DEFAULT_TAB_THROTTLE_WINDOW_MS,
        }
    }
}

impl PluginSettings {
    /// Loads settings from `path`, returning defaults when the file is absent.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::debug!(
                    "event=settings_load module=config status=default path={}",
                    path.display()
                );
                return Ok(Self::default());
            }
            Err(err) => return Err(SettingsError::Io(path.to_path_buf(), err)),
        };
        let settings = serde_json::from_str(&raw)
            .map_err(|err| SettingsError::Parse(path.to_path_buf(), err))?;
        log::debug!(
            "event=settings_load module=config status=ok path={}",
            path.display()
        );
        Ok(settings)
    }

    /// Writes settings as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|err| SettingsError::Io(parent.to_path_buf(), err))?;
        }
        let raw = serde_json::to_string_pretty(self)
            .map_err(|err| SettingsError::Parse(path.to_path_buf(), err))?;
        std::fs::write(path, raw).map_err(|err| SettingsError::Io(path.to_path_buf(), err))
    }

    pub fn tab_throttle_window(&self) -> Duration {
        Duration::from_millis(self.tab_throttle_window_ms)
    }
}

/// Settings load/save errors.
#[derive(Debug)]
pub enum SettingsError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, serde_json::Error),
}

impl Display for SettingsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(path, err) => write!(f, "settings io error at `{}`: {err}", path.display()),
            Self::Parse(path, err) => {
                write!(f, "settings at `{}` are not valid: {err}", path.display())
            }
        }
    }
}

impl Error for SettingsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(_, err) => Some(err),
            Self::Parse(_, err) => Some(err),
        }
    }
}

/// Connection parameters for the HTTP store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            token: None,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl StoreConfig {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.filter(|value| !value.trim().is_empty()),
            ..Self::default()
        }
    }

    /// Reads `SIYUAN_API_URL` and `SIYUAN_TOKEN`, falling back to defaults.
    pub fn from_env() -> Self {
        let base_url = std::env::var(API_URL_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self::new(base_url, std::env::var(API_TOKEN_ENV).ok())
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{PluginSettings, SettingsError, StoreConfig, DEFAULT_TAB_THROTTLE_WINDOW_MS};
    use std::time::Duration;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let settings =
            PluginSettings::load(&dir.path().join("absent.json")).expect("defaults expected");
        assert_eq!(settings, PluginSettings::default());
        assert_eq!(settings.tab_throttle_window_ms, DEFAULT_TAB_THROTTLE_WINDOW_MS);
    }

    #[test]
    fn partial_file_fills_missing_fields() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"enableSiblingShortcuts": false, "tabThrottleWindowMs": 250}"#)
            .expect("write settings");

        let settings = PluginSettings::load(&path).expect("settings should load");
        assert!(!settings.enable_sibling_shortcuts);
        assert!(settings.enable_parent_child_shortcuts);
        assert!(settings.enable_tab_throttle);
        assert_eq!(settings.tab_throttle_window(), Duration::from_millis(250));
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("settings.json");
        let settings = PluginSettings {
            enable_tab_throttle: false,
            tab_throttle_window_ms: 400,
            ..PluginSettings::default()
        };
        settings.save(&path).expect("save settings");
        assert_eq!(PluginSettings::load(&path).expect("reload"), settings);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not json").expect("write settings");
        let err = PluginSettings::load(&path).expect_err("malformed settings must fail");
        assert!(matches!(err, SettingsError::Parse(..)));
    }

    #[test]
    fn blank_token_is_treated_as_absent() {
        let config = StoreConfig::new("http://localhost:6806", Some("  ".to_string()));
        assert_eq!(config.token, None);
    }

    #[test]
    fn from_env_reads_url_and_token() {
        std::env::set_var(super::API_URL_ENV, "http://10.0.0.2:6806");
        std::env::set_var(super::API_TOKEN_ENV, "abc");
        let config = StoreConfig::from_env();
        std::env::remove_var(super::API_URL_ENV);
        std::env::remove_var(super::API_TOKEN_ENV);

        assert_eq!(config.base_url, "http://10.0.0.2:6806");
        assert_eq!(config.token.as_deref(), Some("abc"));
        assert_eq!(config.timeout, Duration::from_secs(10));
    }
}
