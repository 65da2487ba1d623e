//! Locally persisted set of favorite asset ids.
//!
//! The set lives in a single JSON array file. It is read once when the store
//! is opened and rewritten in full on every toggle. There is no remote
//! counterpart.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{HubError, Result};
use crate::paths::favorites_path;

pub struct FavoritesStore {
    path: PathBuf,
    ids: BTreeSet<String>,
}

impl FavoritesStore {
    /// Open the store at the default location
    pub fn open() -> Result<Self> {
        Self::open_at(favorites_path())
    }

    /// Open the store backed by `path`. A missing file is an empty set.
    pub fn open_at(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let ids = read_ids(&path)?;
        debug!(count = ids.len(), path = %path.display(), "favorites loaded");
        Ok(Self { path, ids })
    }

    /// Flip membership of `id` and persist. Returns the new membership.
    pub fn toggle(&mut self, id: &str) -> Result<bool> {
        let id = id.trim();
        if id.is_empty() {
            return Err(HubError::Validation("asset id cannot be empty".to_string()));
        }

        let now_favorite = if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        };
        self.persist()?;
        Ok(now_favorite)
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn list(&self) -> &BTreeSet<String> {
        &self.ids
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string(&self.ids)?;
        fs::write(&self.path, content).map_err(|e| {
            HubError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to write favorites at {}: {}", self.path.display(), e),
            ))
        })
    }
}

fn read_ids(path: &Path) -> Result<BTreeSet<String>> {
    if !path.exists() {
        return Ok(BTreeSet::new());
    }

    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(BTreeSet::new());
    }

    // Older files may hold numeric ids
    let values: Vec<serde_json::Value> = match serde_json::from_str(&content) {
        Ok(values) => values,
        Err(e) => {
            warn!(path = %path.display(), "ignoring unreadable favorites file: {e}");
            return Ok(BTreeSet::new());
        }
    };

    Ok(values
        .into_iter()
        .filter_map(|value| match value {
            serde_json::Value::String(s) => Some(s),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .filter(|id| !id.trim().is_empty())
        .collect())
}
