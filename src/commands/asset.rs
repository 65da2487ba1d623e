//! Admin asset management: `asset add`, `asset edit`, `asset rm`.

use owo_colors::OwoColorize;
use serde_json::json;

use super::{CommandOutput, open_store, stale_note};
use crate::cli::OutputOptions;
use crate::config::Config;
use crate::error::Result;
use crate::remote::AppsScriptStore;
use crate::session::Session;
use crate::submit::{Mutation, Submitted, Submitter};
use crate::sync::Synchronizer;
use crate::types::{Asset, AssetDraft, AssetType};

/// Form fields shared by `asset add` and `asset edit`
#[derive(Debug, Clone, Default)]
pub struct AssetArgs {
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub asset_type: AssetType,
}

impl From<AssetArgs> for AssetDraft {
    fn from(args: AssetArgs) -> Self {
        AssetDraft {
            title: args.title,
            description: args.description.unwrap_or_default(),
            asset_type: args.asset_type,
            url: args.url,
        }
    }
}

pub async fn cmd_asset_add(args: AssetArgs, output: OutputOptions) -> Result<()> {
    let title = args.title.trim().to_string();
    let mutation = Mutation::CreateAsset(args.into());
    let submitted = run(&mutation).await?;

    CommandOutput::new(json!({
        "action": "created",
        "title": title,
        "status": submitted.ack.status,
        "refreshed": submitted.refresh.is_updated(),
    }))
    .with_text_fn(|| {
        let mut text = format!("Created {}", title.cyan());
        if let Some(note) = stale_note(&submitted.refresh) {
            text.push_str(&format!("\n{note}"));
        }
        text
    })
    .print(output)
}

pub async fn cmd_asset_edit(id: &str, args: AssetArgs, output: OutputOptions) -> Result<()> {
    let mutation = Mutation::UpdateAsset {
        id: id.to_string(),
        draft: args.into(),
    };
    let submitted = run(&mutation).await?;

    CommandOutput::new(json!({
        "action": "updated",
        "id": id,
        "status": submitted.ack.status,
        "refreshed": submitted.refresh.is_updated(),
    }))
    .with_text_fn(|| {
        let mut text = format!("Updated {}", id.cyan());
        if let Some(note) = stale_note(&submitted.refresh) {
            text.push_str(&format!("\n{note}"));
        }
        text
    })
    .print(output)
}

pub async fn cmd_asset_rm(id: &str, output: OutputOptions) -> Result<()> {
    let mutation = Mutation::DeleteAsset { id: id.to_string() };
    let submitted = run(&mutation).await?;

    CommandOutput::new(json!({
        "action": "deleted",
        "id": id,
        "status": submitted.ack.status,
        "refreshed": submitted.refresh.is_updated(),
        "still_listed": submitted.lingering,
    }))
    .with_text_fn(|| {
        let mut text = format!("Deleted {}", id.cyan());
        if submitted.lingering {
            text = format!(
                "Delete of {} was accepted but the asset is still listed",
                id.cyan()
            )
            .yellow()
            .to_string();
        }
        if let Some(note) = stale_note(&submitted.refresh) {
            text.push_str(&format!("\n{note}"));
        }
        text
    })
    .print(output)
}

/// Admin check, validation, then the write and its reconciling refresh
async fn run(mutation: &Mutation) -> Result<Submitted> {
    let config = Config::load()?;
    Session::load()?.require_admin()?;
    mutation.validate()?;

    let store = open_store(&config)?;
    let sync: Synchronizer<Asset, AppsScriptStore> = Synchronizer::new(store.clone());
    sync.refresh().await;

    Submitter::new(store, config.refresh_delay())
        .submit_and_sync(mutation, &sync)
        .await
}
