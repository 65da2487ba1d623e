//! Top-level application configuration.
//!
//! Configuration is stored in `<root>/config.yaml` and includes:
//! - Script endpoint and CSV export locations
//! - Resync delay after writes
//! - Category order policy
//! - Access allow-list and the identity attached to access-log events
//!
//! Admin credentials are never read from the file, only from
//! `DIGIHUB_ADMIN_ID` / `DIGIHUB_ADMIN_PW`.

use std::env;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::error::{HubError, Result};
use crate::order::OrderPolicy;
use crate::paths::hub_root;

/// Config keys accepted by `config get` / `config set`
pub const CONFIG_KEYS: &[&str] = &[
    "remote.endpoint",
    "remote.csv_url",
    "remote.source",
    "remote.timeout",
    "sync.refresh_delay_ms",
    "order.policy",
    "access.allowed_domain",
    "user.email",
];

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub remote: RemoteConfig,

    #[serde(default)]
    pub sync: SyncConfig,

    #[serde(default)]
    pub order: OrderConfig,

    #[serde(default)]
    pub access: AccessConfig,

    #[serde(default)]
    pub user: UserConfig,
}

/// Where the asset list is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListSource {
    #[default]
    Script,
    Csv,
}

impl fmt::Display for ListSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListSource::Script => write!(f, "script"),
            ListSource::Csv => write!(f, "csv"),
        }
    }
}

impl FromStr for ListSource {
    type Err = HubError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "script" => Ok(ListSource::Script),
            "csv" => Ok(ListSource::Csv),
            _ => Err(HubError::Config(format!(
                "unknown source '{s}', expected 'script' or 'csv'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Apps Script web-app URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Public CSV export of the asset sheet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csv_url: Option<String>,

    #[serde(default)]
    pub source: ListSource,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_remote_timeout")]
    pub timeout: u64,
}

fn default_remote_timeout() -> u64 {
    30
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            csv_url: None,
            source: ListSource::default(),
            timeout: default_remote_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Wait before re-reading the list after a write (default: 2000)
    #[serde(default = "default_refresh_delay_ms")]
    pub refresh_delay_ms: u64,
}

fn default_refresh_delay_ms() -> u64 {
    2000
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            refresh_delay_ms: default_refresh_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderConfig {
    #[serde(default)]
    pub policy: OrderPolicy,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccessConfig {
    /// Email suffix every user must match, e.g. "@example.com"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_domain: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Admin id/password pair taken from the environment
pub struct AdminCredentials {
    pub id: String,
    pub password: SecretString,
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("id", &self.id)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> PathBuf {
        hub_root().join("config.yaml")
    }

    /// Load configuration from file, or return default if not found
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            HubError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config at {}: {}", path.display(), e),
            ))
        })?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(&path, content).map_err(|e| {
            HubError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to write config at {}: {}", path.display(), e),
            ))
        })?;

        Ok(())
    }

    /// Get the script endpoint from environment variable or config
    pub fn endpoint(&self) -> Option<String> {
        if let Ok(url) = env::var("DIGIHUB_ENDPOINT")
            && !url.is_empty()
        {
            return Some(url);
        }

        self.remote.endpoint.clone()
    }

    /// Admin credentials, if both environment variables are set
    pub fn admin_credentials(&self) -> Option<AdminCredentials> {
        let id = env::var("DIGIHUB_ADMIN_ID").ok().filter(|v| !v.is_empty())?;
        let password = env::var("DIGIHUB_ADMIN_PW").ok().filter(|v| !v.is_empty())?;
        Some(AdminCredentials {
            id,
            password: SecretString::from(password),
        })
    }

    pub fn refresh_delay(&self) -> Duration {
        Duration::from_millis(self.sync.refresh_delay_ms)
    }

    /// Read a value by dot-notation key
    pub fn get_value(&self, key: &str) -> Result<Option<String>> {
        let value = match key {
            "remote.endpoint" => self.remote.endpoint.clone(),
            "remote.csv_url" => self.remote.csv_url.clone(),
            "remote.source" => Some(self.remote.source.to_string()),
            "remote.timeout" => Some(self.remote.timeout.to_string()),
            "sync.refresh_delay_ms" => Some(self.sync.refresh_delay_ms.to_string()),
            "order.policy" => Some(self.order.policy.to_string()),
            "access.allowed_domain" => self.access.allowed_domain.clone(),
            "user.email" => self.user.email.clone(),
            _ => return Err(unknown_key_error(key)),
        };
        Ok(value)
    }

    /// Set a value by dot-notation key
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "remote.endpoint" => {
                url::Url::parse(value)?;
                self.remote.endpoint = Some(value.to_string());
            }
            "remote.csv_url" => {
                url::Url::parse(value)?;
                self.remote.csv_url = Some(value.to_string());
            }
            "remote.source" => self.remote.source = value.parse()?,
            "remote.timeout" => {
                let timeout = parse_number(key, value)?;
                if timeout == 0 {
                    return Err(HubError::Config(
                        "'remote.timeout' must be at least 1 second".to_string(),
                    ));
                }
                self.remote.timeout = timeout;
            }
            "sync.refresh_delay_ms" => self.sync.refresh_delay_ms = parse_number(key, value)?,
            "order.policy" => self.order.policy = value.parse()?,
            "access.allowed_domain" => self.access.allowed_domain = Some(value.to_string()),
            "user.email" => self.user.email = Some(value.to_string()),
            _ => return Err(unknown_key_error(key)),
        }
        Ok(())
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64> {
    value
        .parse()
        .map_err(|_| HubError::Config(format!("'{key}' expects a whole number, got '{value}'")))
}

/// Error for a key outside `CONFIG_KEYS`, suggesting dot notation for underscore spellings
fn unknown_key_error(key: &str) -> HubError {
    if !key.contains('.')
        && let Some(pos) = key.find('_')
    {
        let dot_version = format!("{}.{}", &key[..pos], &key[pos + 1..]);
        return HubError::Config(format!(
            "invalid config key '{key}'. Use dot notation: '{dot_version}'"
        ));
    }

    HubError::Config(format!(
        "unknown config key '{key}'. Valid keys: {}",
        CONFIG_KEYS.join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.remote.endpoint.is_none());
        assert_eq!(config.remote.source, ListSource::Script);
        assert_eq!(config.remote.timeout, 30);
        assert_eq!(config.sync.refresh_delay_ms, 2000);
        assert_eq!(config.order.policy, OrderPolicy::Lenient);
    }

    #[test]
    fn test_config_partial_yaml_uses_defaults() {
        let yaml = r#"
remote:
  endpoint: https://script.example.com/exec
sync:
  refresh_delay_ms: 1500
"#;

        let config: Config = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(
            config.remote.endpoint.as_deref(),
            Some("https://script.example.com/exec")
        );
        assert_eq!(config.remote.timeout, 30);
        assert_eq!(config.refresh_delay(), Duration::from_millis(1500));
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.set_value("remote.source", "csv").unwrap();
        config.set_value("order.policy", "complete").unwrap();
        config.set_value("user.email", "kim@example.com").unwrap();

        let yaml = serde_yaml_ng::to_string(&config).unwrap();
        let parsed: Config = serde_yaml_ng::from_str(&yaml).unwrap();

        assert_eq!(parsed.remote.source, ListSource::Csv);
        assert_eq!(parsed.order.policy, OrderPolicy::Complete);
        assert_eq!(parsed.user.email.as_deref(), Some("kim@example.com"));
    }

    #[test]
    fn test_set_value_rejects_bad_input() {
        let mut config = Config::default();
        assert!(config.set_value("remote.endpoint", "not a url").is_err());
        assert!(config.set_value("remote.timeout", "soon").is_err());
        assert!(config.set_value("remote.source", "ftp").is_err());
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let mut config = Config::default();
        let err = config.set_value("remote.timeout", "0").unwrap_err().to_string();
        assert!(err.contains("at least 1 second"));
        assert_eq!(config.remote.timeout, 30);

        config.set_value("remote.timeout", "5").unwrap();
        assert_eq!(config.remote.timeout, 5);
    }

    #[test]
    fn test_unknown_keys() {
        let config = Config::default();
        assert_eq!(config.get_value("user.email").unwrap(), None);

        let err = config.get_value("user_email").unwrap_err().to_string();
        assert!(err.contains("invalid config key"));
        assert!(err.contains("user.email"));

        let err = config.get_value("nope.key").unwrap_err().to_string();
        assert!(err.contains("unknown config key"));
    }

    #[test]
    fn test_admin_credentials_debug_is_redacted() {
        let creds = AdminCredentials {
            id: "admin".to_string(),
            password: SecretString::from("hunter2".to_string()),
        };
        let debug = format!("{creds:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("hunter2"));
    }
}
