//! Access tiers for the current user.
//!
//! A [`Session`] is loaded once per invocation and handed to the commands
//! that need it. The admin tier is granted by checking an id/password pair
//! against the credentials in the environment.

use std::fmt;
use std::fs;
use std::path::Path;

use jiff::Timestamp;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{HubError, Result};
use crate::paths::session_path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Anonymous,
    Admin,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Anonymous => write!(f, "anonymous"),
            Tier::Admin => write!(f, "admin"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub tier: Tier,
    /// RFC 3339 time the admin tier was granted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub since: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Load the session from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&session_path())
    }

    /// Missing or unreadable session files count as anonymous
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::anonymous());
        }
        let content = fs::read_to_string(path)?;
        match serde_json::from_str(&content) {
            Ok(session) => Ok(session),
            Err(e) => {
                warn!(path = %path.display(), "discarding unreadable session: {e}");
                Ok(Self::anonymous())
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&session_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Remove the stored session. Returns whether one existed.
    pub fn clear() -> Result<bool> {
        Self::clear_at(&session_path())
    }

    pub fn clear_at(path: &Path) -> Result<bool> {
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(path)?;
        Ok(true)
    }

    pub fn is_admin(&self) -> bool {
        self.tier == Tier::Admin
    }

    /// Fail unless the session holds the admin tier
    pub fn require_admin(&self) -> Result<()> {
        if self.is_admin() {
            return Ok(());
        }
        Err(HubError::Unauthorized(
            "admin login required. Run: digihub login <id>".to_string(),
        ))
    }
}

/// Check an id/password pair against the configured admin credentials
pub fn login(id: &str, password: &SecretString, config: &Config) -> Result<Session> {
    let creds = config.admin_credentials().ok_or_else(|| {
        HubError::Config(
            "admin login is disabled. Set DIGIHUB_ADMIN_ID and DIGIHUB_ADMIN_PW".to_string(),
        )
    })?;

    if id.trim() != creds.id || password.expose_secret() != creds.password.expose_secret() {
        warn!("admin login rejected");
        return Err(HubError::Unauthorized("wrong id or password".to_string()));
    }

    info!("admin login accepted");
    Ok(Session {
        tier: Tier::Admin,
        since: Some(Timestamp::now().to_string()),
    })
}

/// Whether `email` passes the optional domain allow-list
pub fn check_allowed_email(email: &str, allowed_domain: Option<&str>) -> bool {
    let Some(domain) = allowed_domain.map(str::trim).filter(|d| !d.is_empty()) else {
        return true;
    };
    email
        .trim()
        .to_lowercase()
        .ends_with(&domain.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    fn set_admin_env() {
        // SAFETY: We use #[serial] to ensure single-threaded access
        unsafe {
            std::env::set_var("DIGIHUB_ADMIN_ID", "admin");
            std::env::set_var("DIGIHUB_ADMIN_PW", "s3cret");
        }
    }

    fn clear_admin_env() {
        // SAFETY: We use #[serial] to ensure single-threaded access
        unsafe {
            std::env::remove_var("DIGIHUB_ADMIN_ID");
            std::env::remove_var("DIGIHUB_ADMIN_PW");
        }
    }

    #[test]
    #[serial]
    fn test_login_with_matching_credentials() {
        set_admin_env();
        let session = login("admin", &secret("s3cret"), &Config::default()).unwrap();
        assert!(session.is_admin());
        assert!(session.since.is_some());
        clear_admin_env();
    }

    #[test]
    #[serial]
    fn test_login_rejects_wrong_password() {
        set_admin_env();
        let result = login("admin", &secret("guess"), &Config::default());
        assert!(matches!(result, Err(HubError::Unauthorized(_))));
        clear_admin_env();
    }

    #[test]
    #[serial]
    fn test_login_disabled_without_env() {
        clear_admin_env();
        let result = login("admin", &secret("s3cret"), &Config::default());
        assert!(matches!(result, Err(HubError::Config(_))));
    }

    #[test]
    fn test_require_admin() {
        assert!(matches!(
            Session::anonymous().require_admin(),
            Err(HubError::Unauthorized(_))
        ));
        let admin = Session {
            tier: Tier::Admin,
            since: None,
        };
        assert!(admin.require_admin().is_ok());
    }

    #[test]
    fn test_session_file_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");

        assert_eq!(Session::load_from(&path).unwrap(), Session::anonymous());

        let admin = Session {
            tier: Tier::Admin,
            since: Some("2025-01-01T09:00:00Z".to_string()),
        };
        admin.save_to(&path).unwrap();
        assert_eq!(Session::load_from(&path).unwrap(), admin);

        assert!(Session::clear_at(&path).unwrap());
        assert!(!Session::load_from(&path).unwrap().is_admin());
    }

    #[test]
    fn test_garbage_session_is_anonymous() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{ admin: true").unwrap();
        assert!(!Session::load_from(&path).unwrap().is_admin());
    }

    #[test]
    fn test_check_allowed_email() {
        assert!(check_allowed_email("anyone@gmail.com", None));
        assert!(check_allowed_email("anyone@gmail.com", Some("  ")));
        assert!(check_allowed_email("Kim@Example.COM", Some("@example.com")));
        assert!(!check_allowed_email("kim@evil.com", Some("@example.com")));
    }
}
