//! Category order commands.
//!
//! Edits are staged in a local draft seeded from the remote order, and only
//! reach the remote store on `order save`.

use owo_colors::OwoColorize;
use serde_json::json;

use super::{CommandOutput, open_store};
use crate::cli::OutputOptions;
use crate::config::Config;
use crate::error::{HubError, Result};
use crate::order::{self, Direction, clear_draft, load_draft, move_item, save_draft};
use crate::paths::order_draft_path;
use crate::session::Session;
use crate::submit::Submitter;
use crate::types::AssetType;

fn format_order(order: &[AssetType]) -> String {
    order
        .iter()
        .enumerate()
        .map(|(i, t)| {
            format!(
                "{}  {:<10} {}",
                i.to_string().dimmed(),
                t.as_str(),
                t.label().dimmed()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// The staged draft if there is one, else the remote order
async fn current_order(config: &Config) -> Result<(Vec<AssetType>, &'static str)> {
    if let Some(draft) = load_draft(&order_draft_path())? {
        return Ok((draft, "draft"));
    }
    let store = open_store(config)?;
    Ok((order::load(store.as_ref(), config.order.policy).await, "remote"))
}

pub async fn cmd_order_show(output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let (current, source) = current_order(&config).await?;

    CommandOutput::new(json!({
        "order": current,
        "source": source,
    }))
    .with_text_fn(|| {
        let mut text = format_order(&current);
        if source == "draft" {
            text.push_str(&format!(
                "\n{}",
                "(unsaved draft; run `digihub order save` to publish)".dimmed()
            ));
        }
        text
    })
    .print(output)
}

pub async fn cmd_order_move(
    index: usize,
    direction: Direction,
    output: OutputOptions,
) -> Result<()> {
    let config = Config::load()?;
    Session::load()?.require_admin()?;

    let (current, _) = current_order(&config).await?;
    let moved = move_item(&current, index, direction)?;
    save_draft(&order_draft_path(), &moved)?;

    CommandOutput::new(json!({
        "order": moved,
        "changed": moved != current,
    }))
    .with_text_fn(|| format_order(&moved))
    .print(output)
}

pub async fn cmd_order_save(output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    Session::load()?.require_admin()?;

    let path = order_draft_path();
    let draft = load_draft(&path)?.ok_or_else(|| {
        HubError::Validation("no staged order. Use `digihub order move` first".to_string())
    })?;

    let submitter = Submitter::new(open_store(&config)?, config.refresh_delay());
    let ack = order::save(&submitter, &draft).await?;
    clear_draft(&path)?;

    CommandOutput::new(json!({
        "order": draft,
        "status": ack.status,
    }))
    .with_text(format!(
        "Saved order: {}",
        order::join_order(&draft).cyan()
    ))
    .print(output)
}

pub fn cmd_order_reset(output: OutputOptions) -> Result<()> {
    let discarded = clear_draft(&order_draft_path())?;

    CommandOutput::new(json!({ "discarded": discarded }))
        .with_text(if discarded {
            "Discarded staged order".to_string()
        } else {
            "No staged order".dimmed().to_string()
        })
        .print(output)
}
