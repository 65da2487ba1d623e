use std::path::PathBuf;

use directories::ProjectDirs;

/// Returns the root digihub directory path.
///
/// Resolution order:
/// 1. `DIGIHUB_ROOT` environment variable (if set)
/// 2. Per-user config directory (e.g. `~/.config/digihub`)
/// 3. Current working directory + `.digihub`
pub fn hub_root() -> PathBuf {
    if let Ok(root) = std::env::var("DIGIHUB_ROOT") {
        return PathBuf::from(root);
    }

    ProjectDirs::from("", "", "digihub")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".digihub"))
}

/// Returns the path to the favorites file.
pub fn favorites_path() -> PathBuf {
    hub_root().join("favorites.json")
}

/// Returns the path to the session file.
pub fn session_path() -> PathBuf {
    hub_root().join("session.json")
}

/// Returns the path to the locally edited category order draft.
pub fn order_draft_path() -> PathBuf {
    hub_root().join("order.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_hub_root_with_env_var() {
        // SAFETY: We use #[serial] to ensure single-threaded access
        unsafe { std::env::set_var("DIGIHUB_ROOT", "/custom/path/.digihub") };
        assert_eq!(hub_root(), PathBuf::from("/custom/path/.digihub"));
        assert_eq!(
            favorites_path(),
            PathBuf::from("/custom/path/.digihub/favorites.json")
        );
        unsafe { std::env::remove_var("DIGIHUB_ROOT") };
    }

    #[test]
    #[serial]
    fn test_hub_root_default_is_not_empty() {
        // SAFETY: We use #[serial] to ensure single-threaded access
        unsafe { std::env::remove_var("DIGIHUB_ROOT") };
        let root = hub_root();
        assert!(root.to_string_lossy().contains("digihub"));
    }
}
