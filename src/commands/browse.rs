//! `ls`: the searchable asset directory.
//!
//! The ALL view is grouped by category in the stored order; every other
//! category is a flat list.

use std::sync::Arc;

use owo_colors::OwoColorize;
use serde_json::json;
use tracing::warn;

use super::{CommandOutput, format_asset_line, open_store};
use crate::cli::OutputOptions;
use crate::config::Config;
use crate::error::{HubError, Result};
use crate::favorites::FavoritesStore;
use crate::filter::{filter_assets, group_by_category};
use crate::order;
use crate::remote::AppsScriptStore;
use crate::session::{Session, check_allowed_email};
use crate::submit::{Mutation, Submitter};
use crate::sync::{RefreshOutcome, Synchronizer};
use crate::types::{Asset, Category};

const VISIT_ACT: &str = "main page visit";

/// List assets matching a query within a category
pub async fn cmd_ls(
    query: Option<&str>,
    category: Category,
    output: OutputOptions,
) -> Result<()> {
    let config = Config::load()?;
    let session = Session::load()?;

    if let Some(email) = config.user.email.as_deref()
        && !check_allowed_email(email, config.access.allowed_domain.as_deref())
    {
        return Err(HubError::Unauthorized(format!(
            "{email} is not on the allowed domain"
        )));
    }

    let store = open_store(&config)?;
    let favorites = FavoritesStore::open()?;
    let sync: Synchronizer<Asset, AppsScriptStore> = Synchronizer::new(store.clone());

    let (refresh, category_order, ()) = tokio::join!(
        sync.refresh(),
        order::load(store.as_ref(), config.order.policy),
        record_visit(&config, &session, store.clone()),
    );

    let query = query.unwrap_or("").trim();
    let items = sync.snapshot();
    let stale = match &refresh {
        RefreshOutcome::Stale { reason } => Some(reason.clone()),
        RefreshOutcome::Updated { .. } => None,
    };
    let fetched_at = sync.fetched_at().map(|t| t.to_string());

    if category == Category::All {
        let groups = group_by_category(&items, query, &category_order, favorites.list());
        let count: usize = groups.iter().map(|g| g.items.len()).sum();

        return CommandOutput::new(json!({
            "category": category.to_string(),
            "query": query,
            "count": count,
            "stale": stale,
            "fetched_at": fetched_at,
            "groups": groups,
        }))
        .with_text_fn(|| {
            let mut text = String::new();
            for group in &groups {
                text.push_str(&format!(
                    "{} {}\n",
                    group.label.cyan().bold(),
                    format!("({})", group.items.len()).dimmed()
                ));
                for asset in &group.items {
                    text.push_str(&format_asset_line(asset, favorites.is_favorite(&asset.id)));
                    text.push('\n');
                }
                text.push('\n');
            }
            text.push_str(&footer(count, stale.as_deref()));
            text
        })
        .print(output);
    }

    let visible = filter_assets(&items, query, category, favorites.list());
    let count = visible.len();

    CommandOutput::new(json!({
        "category": category.to_string(),
        "query": query,
        "count": count,
        "stale": stale,
        "fetched_at": fetched_at,
        "items": visible,
    }))
    .with_text_fn(|| {
        let mut text = format!("{}\n", category.to_string().cyan().bold());
        for asset in &visible {
            text.push_str(&format_asset_line(asset, favorites.is_favorite(&asset.id)));
            text.push('\n');
        }
        text.push('\n');
        text.push_str(&footer(count, stale.as_deref()));
        text
    })
    .print(output)
}

fn footer(count: usize, stale: Option<&str>) -> String {
    match stale {
        Some(reason) => format!(
            "{} asset(s) {}",
            count,
            format!("(could not refresh: {reason})").yellow()
        ),
        None => format!("{count} asset(s)"),
    }
}

/// Append an access-log event for non-admin users with a configured email
async fn record_visit(config: &Config, session: &Session, store: Arc<AppsScriptStore>) {
    let Some(email) = config.user.email.as_deref() else {
        return;
    };
    if session.is_admin() {
        return;
    }

    let submitter = Submitter::new(store, config.refresh_delay());
    let event = Mutation::Log {
        user: email.to_string(),
        act: VISIT_ACT.to_string(),
    };
    if let Err(e) = submitter.submit(&event).await {
        warn!("failed to record visit: {e}");
    }
}
