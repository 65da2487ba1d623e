pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod favorites;
pub mod filter;
pub mod order;
pub mod paths;
pub mod remote;
pub mod session;
pub mod submit;
pub mod sync;
pub mod types;

pub use config::Config;
pub use error::{HubError, Result};
pub use favorites::FavoritesStore;
pub use filter::{CategoryGroup, filter_assets, group_by_category};
pub use order::{Direction, OrderPolicy};
pub use remote::{AppsScriptStore, ReadAction, RemoteStore, WriteAck, WriteAction};
pub use session::{Session, Tier};
pub use submit::{Mutation, Submitter};
pub use sync::{RefreshOutcome, Synchronizer};
pub use types::{Asset, AssetType, Category, Idea, LogEntry};
