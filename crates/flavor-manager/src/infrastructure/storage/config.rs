//! TOML-based host configuration for the `flavor` binary.
//!
//! Reads and writes `HostConfig` to the platform-appropriate config file:
//! - Windows:  `%APPDATA%\Flavor\config.toml`
//! - Linux:    `~/.config/flavor/config.toml`
//! - macOS:    `~/Library/Application Support/Flavor/config.toml`
//!
//! ```toml
//! [host]
//! log_level = "info"
//! store_path = "/srv/flavor/flags.json"
//!
//! [session]
//! user_id = "gm"
//!
//! [settings]
//! allow_custom_html = false
//!
//! [[users]]
//! id = "gm"
//! name = "Game Master"
//! privileged = true
//! ```
//!
//! Every section is optional; missing fields use the `default_*` helpers
//! below so a first run works without any file on disk.

use std::path::{Path, PathBuf};

use flavor_core::{UserIdentity, MODULE_ID};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::infrastructure::session::{Session, StaticUserDirectory};
use crate::infrastructure::settings::{StaticWorldSettings, ALLOW_CUSTOM_HTML};

/// Error type for host configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// `session.user_id` names nobody in `[[users]]`.
    #[error("session user {0:?} is not listed under [[users]]")]
    UnknownSessionUser(String),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level host configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HostConfig {
    #[serde(default)]
    pub host: HostSection,
    #[serde(default)]
    pub session: SessionSection,
    #[serde(default)]
    pub settings: SettingsSection,
    #[serde(default = "default_users")]
    pub users: Vec<UserEntry>,
}

/// Process-level settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HostSection {
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Location of the JSON flag store.  Defaults to `flags.json` beside the
    /// config file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_path: Option<PathBuf>,
}

/// The acting user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionSection {
    #[serde(default = "default_user_id")]
    pub user_id: String,
}

/// World settings under the module namespace.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SettingsSection {
    #[serde(default)]
    pub allow_custom_html: bool,
}

/// One known user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserEntry {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub privileged: bool,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_user_id() -> String {
    "local".to_string()
}
fn default_users() -> Vec<UserEntry> {
    vec![UserEntry {
        id: default_user_id(),
        name: "Local User".to_string(),
        privileged: false,
    }]
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            host: HostSection::default(),
            session: SessionSection::default(),
            settings: SettingsSection::default(),
            users: default_users(),
        }
    }
}

impl Default for HostSection {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            store_path: None,
        }
    }
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            user_id: default_user_id(),
        }
    }
}

impl From<&UserEntry> for UserIdentity {
    fn from(entry: &UserEntry) -> Self {
        let name = if entry.name.is_empty() {
            entry.id.clone()
        } else {
            entry.name.clone()
        };
        UserIdentity::new(entry.id.as_str(), name, entry.privileged)
    }
}

impl HostConfig {
    /// Builds the acting session from `[session]`, optionally overridden.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownSessionUser`] if the user is not in the
    /// roster.
    pub fn session(&self, user_override: Option<&str>) -> Result<Session, ConfigError> {
        let user_id = user_override.unwrap_or(&self.session.user_id);
        self.users
            .iter()
            .find(|u| u.id == user_id)
            .map(|u| Session::new(UserIdentity::from(u)))
            .ok_or_else(|| ConfigError::UnknownSessionUser(user_id.to_string()))
    }

    /// The roster as a user directory.
    pub fn directory(&self) -> StaticUserDirectory {
        StaticUserDirectory::from_users(self.users.iter().map(UserIdentity::from))
    }

    /// World settings under the module namespace.
    pub fn world_settings(&self) -> StaticWorldSettings {
        StaticWorldSettings::new().with(
            MODULE_ID,
            ALLOW_CUSTOM_HTML,
            self.settings.allow_custom_html,
        )
    }

    /// Resolves the flag store location relative to `config_path`.
    pub fn store_path(&self, config_path: &Path) -> PathBuf {
        match &self.host.store_path {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => config_path
                .parent()
                .map_or_else(|| path.clone(), |dir| dir.join(path)),
            None => config_path
                .parent()
                .map_or_else(|| PathBuf::from("flags.json"), |dir| dir.join("flags.json")),
        }
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the default config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads `HostConfig` from `path`, returning `HostConfig::default()` if the
/// file does not yet exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: &Path) -> Result<HostConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HostConfig::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Persists `config` to `path`, creating the directory if needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config(path: &Path, config: &HostConfig) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolves the platform config base directory including the `Flavor`
/// subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("Flavor"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("flavor"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("Flavor")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::session::UserDirectory;
    use crate::infrastructure::settings::WorldSettings;
    use flavor_core::UserId;
    use uuid::Uuid;

    #[test]
    fn test_default_config_has_local_session_user() {
        let cfg = HostConfig::default();
        let session = cfg.session(None).expect("default session user is in roster");
        assert_eq!(session.user_id().as_str(), "local");
        assert!(!session.user().is_privileged());
    }

    #[test]
    fn test_default_disallows_custom_html() {
        let settings = HostConfig::default().world_settings();
        assert_eq!(settings.get_bool(MODULE_ID, ALLOW_CUSTOM_HTML), Some(false));
    }

    #[test]
    fn test_deserialize_empty_toml_uses_defaults() {
        let cfg: HostConfig = toml::from_str("").expect("deserialize empty");
        assert_eq!(cfg, HostConfig::default());
    }

    #[test]
    fn test_deserialize_roster_and_session() {
        // Arrange
        let toml_str = r#"
[session]
user_id = "gm"

[settings]
allow_custom_html = true

[[users]]
id = "gm"
name = "Game Master"
privileged = true

[[users]]
id = "p1"
"#;

        // Act
        let cfg: HostConfig = toml::from_str(toml_str).expect("deserialize");

        // Assert
        let session = cfg.session(None).unwrap();
        assert!(session.user().is_privileged());
        let p1 = cfg.directory().lookup_user(&UserId::new("p1")).unwrap();
        assert_eq!(p1.name, "p1", "missing name falls back to the id");
        assert!(!p1.privileged);
        assert!(cfg.settings.allow_custom_html);
    }

    #[test]
    fn test_session_override_must_be_in_roster() {
        let cfg = HostConfig::default();
        let result = cfg.session(Some("ghost"));
        assert!(matches!(result, Err(ConfigError::UnknownSessionUser(id)) if id == "ghost"));
    }

    #[test]
    fn test_store_path_defaults_beside_config_file() {
        let cfg = HostConfig::default();
        let path = cfg.store_path(Path::new("/etc/flavor/config.toml"));
        assert_eq!(path, PathBuf::from("/etc/flavor/flags.json"));
    }

    #[test]
    fn test_relative_store_path_is_resolved_against_config_dir() {
        let mut cfg = HostConfig::default();
        cfg.host.store_path = Some(PathBuf::from("data/flags.json"));
        let path = cfg.store_path(Path::new("/etc/flavor/config.toml"));
        assert_eq!(path, PathBuf::from("/etc/flavor/data/flags.json"));
    }

    #[test]
    fn test_deserialize_invalid_toml_returns_parse_error() {
        let result: Result<HostConfig, toml::de::Error> = toml::from_str("[[[ not valid toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_returns_default_when_file_absent() {
        let path = PathBuf::from("/nonexistent/path/that/cannot/exist/config.toml");
        assert_eq!(load_config(&path).unwrap(), HostConfig::default());
    }

    #[test]
    fn test_save_and_load_config_round_trip_via_temp_dir() {
        // Arrange
        let dir = std::env::temp_dir().join(format!("flavor_test_{}", Uuid::new_v4()));
        let path = dir.join("config.toml");
        let mut cfg = HostConfig::default();
        cfg.host.log_level = "debug".to_string();
        cfg.settings.allow_custom_html = true;

        // Act
        save_config(&path, &cfg).unwrap();
        let loaded = load_config(&path).unwrap();

        // Assert
        assert_eq!(loaded, cfg);

        // Cleanup
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_config_file_path_ends_with_config_toml() {
        if let Ok(path) = config_file_path() {
            assert!(path.ends_with("config.toml"), "got {path:?}");
        }
    }
}
