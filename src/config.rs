//! Layered configuration for TaskDeck.
//!
//! Settings come from `taskdeck.toml`, then environment variables, then CLI
//! flags, each layer overriding the one before it.
//!
//! # Configuration File Format
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:5000"
//! timeout_secs = 30
//!
//! [storage]
//! dir = "/home/me/.local/share/taskdeck"
//!
//! [notifications]
//! default_duration_ms = 3000
//! max_active = 50
//!
//! [claims]
//! subject = ["http://schemas.xmlsoap.org/ws/2005/05/identity/claims/nameidentifier", "sub"]
//! name = ["http://schemas.xmlsoap.org/ws/2005/05/identity/claims/name"]
//! roles = ["http://schemas.microsoft.com/ws/2008/06/identity/claims/role"]
//!
//! [logging]
//! level = "warn"
//! json = false
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::token::ClaimKeys;

pub const CONFIG_FILE_NAME: &str = "taskdeck.toml";

pub const ENV_API_URL: &str = "TASKDECK_API_URL";
pub const ENV_DATA_DIR: &str = "TASKDECK_DATA_DIR";
pub const ENV_TIMEOUT_SECS: &str = "TASKDECK_TIMEOUT_SECS";

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSection {
    /// Origin of the REST backend; endpoint paths are appended to it
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request transport timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Where persisted session state lives.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageSection {
    /// Data directory (defaults to the platform data dir + `taskdeck`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationsSection {
    #[serde(default = "default_duration_ms")]
    pub default_duration_ms: u64,
    /// Oldest notifications are dropped beyond this many
    #[serde(default = "default_max_active")]
    pub max_active: usize,
}

fn default_duration_ms() -> u64 {
    3000
}

fn default_max_active() -> usize {
    50
}

impl Default for NotificationsSection {
    fn default() -> Self {
        Self {
            default_duration_ms: default_duration_ms(),
            max_active: default_max_active(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSection {
    /// Filter directive used when `TASKDECK_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// The complete taskdeck.toml structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskdeckToml {
    #[serde(default)]
    pub api: ApiSection,
    #[serde(default)]
    pub storage: StorageSection,
    #[serde(default)]
    pub notifications: NotificationsSection,
    /// Wire claim keys for each session field
    #[serde(default)]
    pub claims: ClaimKeys,
    #[serde(default)]
    pub logging: LoggingSection,
}

impl TaskdeckToml {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse taskdeck.toml")
    }

    /// Load `path`, or defaults if it does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize taskdeck.toml")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Validate the configuration and return any warnings.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if !(self.api.base_url.starts_with("http://") || self.api.base_url.starts_with("https://"))
        {
            warnings.push(format!(
                "api.base_url '{}' should start with http:// or https://",
                self.api.base_url
            ));
        }
        if self.api.timeout_secs == 0 {
            warnings.push("api.timeout_secs is 0: every request will time out".to_string());
        }
        if self.notifications.max_active == 0 {
            warnings.push("notifications.max_active is 0: no notification will be kept".to_string());
        }
        for (field, keys) in [
            ("subject", &self.claims.subject),
            ("name", &self.claims.name),
            ("roles", &self.claims.roles),
        ] {
            if keys.is_empty() {
                warnings.push(format!(
                    "claims.{field} is empty: sessions can never be restored from a token"
                ));
            }
        }

        warnings
    }
}

/// Values supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub api_url: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

/// Resolved configuration.
///
/// It merges settings from:
/// 1. taskdeck.toml
/// 2. Environment variables
/// 3. CLI arguments
#[derive(Debug, Clone)]
pub struct TaskdeckConfig {
    /// Where the config file was (or would be) read from
    pub config_path: PathBuf,
    /// Effective settings after all overrides
    pub toml: TaskdeckToml,
}

impl TaskdeckConfig {
    /// Resolve configuration against the process environment.
    pub fn load(overrides: &CliOverrides) -> Result<Self> {
        Self::load_with_env(overrides, |name| std::env::var(name).ok())
    }

    /// Resolve configuration with an explicit environment lookup.
    pub fn load_with_env(
        overrides: &CliOverrides,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let env_data_dir = env(ENV_DATA_DIR).filter(|v| !v.is_empty()).map(PathBuf::from);
        let config_path = match &overrides.config {
            Some(path) => path.clone(),
            None => overrides
                .data_dir
                .clone()
                .or_else(|| env_data_dir.clone())
                .unwrap_or_else(default_data_dir)
                .join(CONFIG_FILE_NAME),
        };

        let mut toml = TaskdeckToml::load_or_default(&config_path)?;

        if let Some(url) = env(ENV_API_URL).filter(|v| !v.is_empty()) {
            toml.api.base_url = url;
        }
        if let Some(raw) = env(ENV_TIMEOUT_SECS).filter(|v| !v.is_empty()) {
            toml.api.timeout_secs = raw
                .parse()
                .with_context(|| format!("{ENV_TIMEOUT_SECS} must be a whole number, got '{raw}'"))?;
        }
        if let Some(dir) = env_data_dir {
            toml.storage.dir = Some(dir);
        }

        if let Some(url) = &overrides.api_url {
            toml.api.base_url = url.clone();
        }
        if let Some(dir) = &overrides.data_dir {
            toml.storage.dir = Some(dir.clone());
        }

        Ok(Self { config_path, toml })
    }

    pub fn base_url(&self) -> &str {
        self.toml.api.base_url.trim_end_matches('/')
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.toml.api.timeout_secs)
    }

    /// Directory holding persisted session state.
    pub fn data_dir(&self) -> PathBuf {
        self.toml.storage.dir.clone().unwrap_or_else(default_data_dir)
    }

    pub fn default_notification_duration(&self) -> Duration {
        Duration::from_millis(self.toml.notifications.default_duration_ms)
    }

    pub fn claim_keys(&self) -> &ClaimKeys {
        &self.toml.claims
    }

    /// Validate configuration and return warnings.
    pub fn validate(&self) -> Vec<String> {
        self.toml.validate()
    }
}

/// Platform data directory for TaskDeck, or `./.taskdeck` when the platform has none.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("taskdeck"))
        .unwrap_or_else(|| PathBuf::from(".taskdeck"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_parse_empty_uses_defaults() {
        let toml = TaskdeckToml::parse("").unwrap();
        assert_eq!(toml.api.base_url, "http://localhost:5000");
        assert_eq!(toml.api.timeout_secs, 30);
        assert_eq!(toml.notifications.default_duration_ms, 3000);
        assert_eq!(toml.notifications.max_active, 50);
        assert_eq!(toml.logging.level, "warn");
        assert_eq!(toml.claims, ClaimKeys::default());
    }

    #[test]
    fn test_parse_partial_sections() {
        let content = r#"
[api]
timeout_secs = 5

[claims]
subject = ["uid"]
"#;
        let toml = TaskdeckToml::parse(content).unwrap();
        assert_eq!(toml.api.timeout_secs, 5);
        assert_eq!(toml.api.base_url, "http://localhost:5000");
        assert_eq!(toml.claims.subject, vec!["uid"]);
        // Untouched claim fields keep their defaults
        assert_eq!(toml.claims.roles, ClaimKeys::default().roles);
    }

    #[test]
    fn test_parse_rejects_bad_types() {
        let err = TaskdeckToml::parse("[api]\ntimeout_secs = \"soon\"").unwrap_err();
        assert!(err.to_string().contains("taskdeck.toml"));
    }

    #[test]
    fn test_validate_defaults_are_clean() {
        assert!(TaskdeckToml::default().validate().is_empty());
    }

    #[test]
    fn test_validate_reports_each_problem() {
        let mut toml = TaskdeckToml::default();
        toml.api.base_url = "localhost:5000".into();
        toml.api.timeout_secs = 0;
        toml.claims.roles.clear();
        let warnings = toml.validate();
        assert_eq!(warnings.len(), 3);
        assert!(warnings.iter().any(|w| w.contains("base_url")));
        assert!(warnings.iter().any(|w| w.contains("timeout_secs")));
        assert!(warnings.iter().any(|w| w.contains("claims.roles")));
    }

    #[test]
    fn test_load_and_save() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        let mut toml = TaskdeckToml::default();
        toml.api.base_url = "https://deck.example.com".into();
        toml.notifications.max_active = 7;
        toml.save(&path).unwrap();

        let loaded = TaskdeckToml::load(&path).unwrap();
        assert_eq!(loaded, toml);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempdir().unwrap();
        let toml = TaskdeckToml::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(toml, TaskdeckToml::default());
    }

    #[test]
    fn test_config_file_found_in_data_dir() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[api]\nbase_url = \"http://file:1\"\n",
        )
        .unwrap();

        let overrides = CliOverrides {
            data_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        let config = TaskdeckConfig::load_with_env(&overrides, env_of(&[])).unwrap();
        assert_eq!(config.base_url(), "http://file:1");
        assert_eq!(config.data_dir(), dir.path());
    }

    #[test]
    fn test_env_overrides_file_and_cli_overrides_env() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[api]\nbase_url = \"http://file:1\"\ntimeout_secs = 9\n").unwrap();

        let env = env_of(&[(ENV_API_URL, "http://env:2"), (ENV_TIMEOUT_SECS, "12")]);
        let mut overrides = CliOverrides {
            config: Some(path.clone()),
            ..Default::default()
        };
        let config = TaskdeckConfig::load_with_env(&overrides, &env).unwrap();
        assert_eq!(config.base_url(), "http://env:2");
        assert_eq!(config.timeout(), Duration::from_secs(12));

        overrides.api_url = Some("http://cli:3/".into());
        let config = TaskdeckConfig::load_with_env(&overrides, &env).unwrap();
        assert_eq!(config.base_url(), "http://cli:3");
        assert_eq!(config.config_path, path);
    }

    #[test]
    fn test_env_data_dir_locates_config() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[notifications]\nmax_active = 3\n",
        )
        .unwrap();
        let data_dir = dir.path().to_string_lossy().to_string();
        let config = TaskdeckConfig::load_with_env(
            &CliOverrides::default(),
            env_of(&[(ENV_DATA_DIR, data_dir.as_str())]),
        )
        .unwrap();
        assert_eq!(config.toml.notifications.max_active, 3);
        assert_eq!(config.data_dir(), dir.path());
    }

    #[test]
    fn test_invalid_timeout_env_is_an_error() {
        let dir = tempdir().unwrap();
        let overrides = CliOverrides {
            data_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        let err =
            TaskdeckConfig::load_with_env(&overrides, env_of(&[(ENV_TIMEOUT_SECS, "never")]))
                .unwrap_err();
        assert!(err.to_string().contains(ENV_TIMEOUT_SECS));
    }
}
