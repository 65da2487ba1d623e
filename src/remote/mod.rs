//! Access to the spreadsheet-backed remote store.
//!
//! The store is exposed two ways: a script endpoint taking query-string
//! actions (GET) and form-encoded actions (POST), and a public CSV export of
//! the asset sheet. Neither offers transactional guarantees, and writes take a
//! few seconds to show up in reads.

pub mod apps_script;

use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

use jiff::Timestamp;

use crate::error::Result;

pub use apps_script::AppsScriptStore;

/// Read requests understood by the remote store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadAction {
    Assets,
    Ideas,
    Logs,
    Order,
}

impl ReadAction {
    /// Query parameter selecting this read on the script endpoint
    pub fn query_pair(&self) -> (&'static str, &'static str) {
        match self {
            ReadAction::Assets => ("action", "read"),
            ReadAction::Ideas => ("type", "IDEAS"),
            ReadAction::Logs => ("action", "getLogs"),
            ReadAction::Order => ("action", "getOrder"),
        }
    }
}

impl fmt::Display for ReadAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (_, value) = self.query_pair();
        f.write_str(value)
    }
}

/// Write actions accepted by the script endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteAction {
    Create,
    Update,
    Delete,
    SaveOrder,
    CreateIdea,
    DeleteIdea,
    Log,
}

impl WriteAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            WriteAction::Create => "create",
            WriteAction::Update => "update",
            WriteAction::Delete => "delete",
            WriteAction::SaveOrder => "saveOrder",
            WriteAction::CreateIdea => "CREATE_IDEA",
            WriteAction::DeleteIdea => "DELETE_IDEA",
            WriteAction::Log => "log",
        }
    }
}

impl fmt::Display for WriteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Form body of a write, in field order. The `action` field is added by the store.
pub type FormFields = Vec<(&'static str, String)>;

/// Acknowledgement of a write the store accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteAck {
    pub action: WriteAction,
    pub status: u16,
}

/// Common interface for spreadsheet stores
pub trait RemoteStore: Send + Sync {
    /// Fetch the raw body for a read action
    fn read(&self, action: ReadAction) -> impl std::future::Future<Output = Result<String>> + Send;

    /// Submit a form-encoded write
    fn write(
        &self,
        action: WriteAction,
        fields: FormFields,
    ) -> impl std::future::Future<Output = Result<WriteAck>> + Send;
}

/// Produces strictly increasing millisecond timestamps for the `t` query
/// parameter, so two reads issued within the same millisecond still bypass
/// intermediate caches.
#[derive(Debug, Default)]
pub struct CacheBuster {
    last: AtomicI64,
}

impl CacheBuster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> i64 {
        let now = Timestamp::now().as_millisecond();
        let mut current = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(current + 1);
            match self.last.compare_exchange_weak(
                current,
                candidate,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return candidate,
                Err(actual) => current = actual,
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_action_query_pairs() {
        assert_eq!(ReadAction::Assets.query_pair(), ("action", "read"));
        assert_eq!(ReadAction::Logs.query_pair(), ("action", "getLogs"));
        assert_eq!(ReadAction::Order.query_pair(), ("action", "getOrder"));
        assert_eq!(ReadAction::Ideas.query_pair(), ("type", "IDEAS"));
    }

    #[test]
    fn test_write_action_wire_names() {
        assert_eq!(WriteAction::SaveOrder.to_string(), "saveOrder");
        assert_eq!(WriteAction::CreateIdea.to_string(), "CREATE_IDEA");
        assert_eq!(WriteAction::DeleteIdea.to_string(), "DELETE_IDEA");
    }

    #[test]
    fn test_cache_buster_strictly_increases() {
        let buster = CacheBuster::new();
        let mut previous = buster.next();
        for _ in 0..1000 {
            let next = buster.next();
            assert!(next > previous);
            previous = next;
        }
    }
}
