//! Category order: which type groups the ALL view shows, and in what sequence.
//!
//! The remote store keeps the order as one comma-separated scalar such as
//! `DOC,SOFTWARE,WEB_TOOL,WEBSITE`. The literal `DEFAULT`, or anything without
//! a separator, means "use [`DEFAULT_ORDER`]". Admin edits are staged in a
//! local draft file before being pushed.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{HubError, Result};
use crate::remote::{ReadAction, RemoteStore, WriteAck};
use crate::submit::{Mutation, Submitter};
use crate::types::{AssetType, DEFAULT_ORDER};

const SEPARATOR: char = ',';

/// How to treat a stored order that is partial or repeats categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderPolicy {
    /// Show only the categories named, first occurrence wins
    #[default]
    Lenient,
    /// As lenient, then append missing categories in default order
    Complete,
}

impl fmt::Display for OrderPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderPolicy::Lenient => write!(f, "lenient"),
            OrderPolicy::Complete => write!(f, "complete"),
        }
    }
}

impl FromStr for OrderPolicy {
    type Err = HubError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "lenient" => Ok(OrderPolicy::Lenient),
            "complete" => Ok(OrderPolicy::Complete),
            _ => Err(HubError::Config(format!(
                "unknown order policy '{s}', expected 'lenient' or 'complete'"
            ))),
        }
    }
}

/// Turn the stored scalar into a category sequence
pub fn parse_order(text: &str, policy: OrderPolicy) -> Vec<AssetType> {
    // The script may hand the scalar back JSON-quoted
    let text = text.trim().trim_matches('"').trim();

    if text.is_empty() || text.eq_ignore_ascii_case("DEFAULT") || !text.contains(SEPARATOR) {
        return DEFAULT_ORDER.to_vec();
    }

    let mut seen = BTreeSet::new();
    let mut order = Vec::new();
    for token in text.split(SEPARATOR).map(str::trim).filter(|t| !t.is_empty()) {
        match token.parse::<AssetType>() {
            Ok(t) => {
                if seen.insert(t) {
                    order.push(t);
                }
            }
            Err(_) => warn!(token, "ignoring unknown category in stored order"),
        }
    }

    if order.is_empty() {
        return DEFAULT_ORDER.to_vec();
    }

    if policy == OrderPolicy::Complete {
        order.extend(DEFAULT_ORDER.iter().filter(|t| !seen.contains(*t)));
    }
    order
}

/// Serialized form sent with `saveOrder`
pub fn join_order(order: &[AssetType]) -> String {
    order
        .iter()
        .map(AssetType::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

/// Fetch the stored order, falling back to the default on any failure
pub async fn load<S: RemoteStore>(store: &S, policy: OrderPolicy) -> Vec<AssetType> {
    match store.read(ReadAction::Order).await {
        Ok(text) => {
            let order = parse_order(&text, policy);
            debug!(order = %join_order(&order), "category order loaded");
            order
        }
        Err(e) => {
            warn!("failed to load category order, using default: {e}");
            DEFAULT_ORDER.to_vec()
        }
    }
}

/// Push an order to the remote store
pub async fn save<S: RemoteStore>(
    submitter: &Submitter<S>,
    order: &[AssetType],
) -> Result<WriteAck> {
    submitter.submit(&Mutation::SaveOrder(order.to_vec())).await
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl FromStr for Direction {
    type Err = HubError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            _ => Err(HubError::InvalidDirection(s.to_string())),
        }
    }
}

/// Swap the entry at `index` with its neighbor in `direction`.
///
/// Moving the first entry up or the last entry down returns the order
/// unchanged. An index past the end is an error.
pub fn move_item(
    order: &[AssetType],
    index: usize,
    direction: Direction,
) -> Result<Vec<AssetType>> {
    if index >= order.len() {
        return Err(HubError::OrderIndexOutOfRange {
            index,
            len: order.len(),
        });
    }

    let mut moved = order.to_vec();
    match direction {
        Direction::Up if index > 0 => moved.swap(index - 1, index),
        Direction::Down if index + 1 < order.len() => moved.swap(index, index + 1),
        _ => {}
    }
    Ok(moved)
}

/// Read the locally staged order, if any
pub fn load_draft(path: &Path) -> Result<Option<Vec<AssetType>>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let order: Vec<AssetType> = serde_json::from_str(&content)?;
    Ok(Some(order))
}

pub fn save_draft(path: &Path, order: &[AssetType]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string(order)?)?;
    Ok(())
}

/// Drop the staged order. Returns whether one existed.
pub fn clear_draft(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    fs::remove_file(path)?;
    Ok(true)
}
