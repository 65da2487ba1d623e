//! List synchronization against the remote store.
//!
//! A [`Synchronizer`] holds the last successfully fetched snapshot of a list
//! and replaces it wholesale on every successful refresh. Failed refreshes are
//! logged and leave the snapshot untouched: a stale list is always preferred
//! over an empty one.
//!
//! Concurrent refreshes are allowed and are not sequenced. Whichever response
//! completes last is the one that sticks, even if it was issued first.

pub mod parse;

use std::sync::Arc;
use std::time::Duration;

use jiff::Timestamp;
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::error::Result;
use crate::remote::{ReadAction, RemoteStore};
use crate::types::{Asset, Fields, Idea};

pub use parse::{newest_first, parse_rows};

/// A list entity kept in sync with the remote store
pub trait Record: Clone + Send + Sync + 'static {
    /// Read action that returns the full list
    const READ: ReadAction;

    fn from_fields(fields: &Fields) -> Option<Self>;

    fn id(&self) -> &str;
}

impl Record for Asset {
    const READ: ReadAction = ReadAction::Assets;

    fn from_fields(fields: &Fields) -> Option<Self> {
        Asset::from_fields(fields)
    }

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Idea {
    const READ: ReadAction = ReadAction::Ideas;

    fn from_fields(fields: &Fields) -> Option<Self> {
        Idea::from_fields(fields)
    }

    fn id(&self) -> &str {
        &self.id
    }
}

/// Decode a list body, drop malformed rows, and order newest first
pub fn decode_list<T: Record>(body: &str) -> Result<Vec<T>> {
    let mut items: Vec<T> = parse_rows(body)?
        .iter()
        .filter_map(T::from_fields)
        .collect();
    sort_newest_first(&mut items);
    Ok(items)
}

/// Sort by numeric id, descending, non-numeric ids last. Ties keep their source order.
pub fn sort_newest_first<T: Record>(items: &mut [T]) {
    items.sort_by(|a, b| newest_first(a.id(), b.id()));
}

/// Result of a refresh attempt
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    /// The snapshot was replaced
    Updated { count: usize },
    /// The read failed; the previous snapshot is still in place
    Stale { reason: String },
}

impl RefreshOutcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, RefreshOutcome::Updated { .. })
    }
}

struct Snapshot<T> {
    items: Vec<T>,
    fetched_at: Option<Timestamp>,
}

/// Local cache of a remote list
pub struct Synchronizer<T: Record, S: RemoteStore> {
    store: Arc<S>,
    state: RwLock<Snapshot<T>>,
}

impl<T: Record, S: RemoteStore> Synchronizer<T, S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            state: RwLock::new(Snapshot {
                items: Vec::new(),
                fetched_at: None,
            }),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Copy of the current list, newest first
    pub fn snapshot(&self) -> Vec<T> {
        self.state.read().items.clone()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.state.read().items.iter().any(|item| item.id() == id)
    }

    /// When the current snapshot was fetched, if ever
    pub fn fetched_at(&self) -> Option<Timestamp> {
        self.state.read().fetched_at
    }

    /// Pull the remote list and replace the local snapshot.
    ///
    /// Never fails from the caller's point of view; a failed read is logged
    /// and reported as [`RefreshOutcome::Stale`].
    pub async fn refresh(&self) -> RefreshOutcome {
        let read = T::READ;
        let fetched = match self.store.read(read).await {
            Ok(body) => decode_list::<T>(&body),
            Err(e) => Err(e),
        };

        match fetched {
            Ok(items) => {
                let count = items.len();
                let mut state = self.state.write();
                state.items = items;
                state.fetched_at = Some(Timestamp::now());
                debug!(%read, count, "list refreshed");
                RefreshOutcome::Updated { count }
            }
            Err(e) => {
                warn!(%read, "refresh failed, keeping last snapshot: {e}");
                RefreshOutcome::Stale {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Apply a local change ahead of the remote store confirming it.
    ///
    /// Returns the snapshot as it was before the change, for [`Self::restore`].
    pub fn apply_optimistic(&self, change: impl FnOnce(&mut Vec<T>)) -> Vec<T> {
        let mut state = self.state.write();
        let previous = state.items.clone();
        change(&mut state.items);
        sort_newest_first(&mut state.items);
        previous
    }

    /// Roll back to a snapshot taken by [`Self::apply_optimistic`]
    pub fn restore(&self, previous: Vec<T>) {
        self.state.write().items = previous;
    }

    /// Wait out the store's propagation delay, then refresh
    pub async fn refresh_after(&self, delay: Duration) -> RefreshOutcome {
        tokio::time::sleep(delay).await;
        self.refresh().await
    }
}
