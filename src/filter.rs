//! Filtering and grouping of the synchronized asset list.
//!
//! Matching is a plain case-insensitive substring test against the title or
//! the description. Lists are small (tens to low hundreds of rows), so the
//! result is recomputed in full on every change.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::types::{Asset, AssetType, Category};

/// Case-insensitive substring match on title or description
pub fn matches_query(asset: &Asset, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    asset.title.to_lowercase().contains(&needle)
        || asset.description.to_lowercase().contains(&needle)
}

/// Visible subset for a query, category, and favorites set.
///
/// Input order is preserved. Assets without a title never match.
pub fn filter_assets(
    items: &[Asset],
    query: &str,
    category: Category,
    favorites: &BTreeSet<String>,
) -> Vec<Asset> {
    items
        .iter()
        .filter(|asset| asset.is_valid())
        .filter(|asset| matches_query(asset, query))
        .filter(|asset| match category {
            Category::All => true,
            Category::Favorite => favorites.contains(&asset.id),
            Category::Type(t) => asset.asset_type == Some(t),
        })
        .cloned()
        .collect()
}

/// One section of the grouped ALL view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryGroup {
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    pub label: &'static str,
    pub items: Vec<Asset>,
}

/// Group the ALL view by type, in `order`, skipping empty groups.
///
/// Each type is rendered at most once even if `order` repeats it.
pub fn group_by_category(
    items: &[Asset],
    query: &str,
    order: &[AssetType],
    favorites: &BTreeSet<String>,
) -> Vec<CategoryGroup> {
    let mut seen = BTreeSet::new();

    order
        .iter()
        .filter(|t| seen.insert(**t))
        .filter_map(|t| {
            let group = filter_assets(items, query, Category::Type(*t), favorites);
            if group.is_empty() {
                None
            } else {
                Some(CategoryGroup {
                    asset_type: *t,
                    label: t.label(),
                    items: group,
                })
            }
        })
        .collect()
}
