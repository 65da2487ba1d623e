//! Idea board commands.
//!
//! Anyone may post; deleting a post needs the password chosen when it was
//! posted. Only the remote store can check that password.

use owo_colors::OwoColorize;
use serde_json::json;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::{CommandOutput, open_store, password_or_prompt, stale_note};
use crate::cli::OutputOptions;
use crate::config::Config;
use crate::error::Result;
use crate::remote::AppsScriptStore;
use crate::submit::{Mutation, Submitted, Submitter};
use crate::sync::{RefreshOutcome, Synchronizer};
use crate::types::{Idea, IdeaDraft};

#[derive(Tabled)]
struct IdeaRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Nickname")]
    nickname: String,
    #[tabled(rename = "Idea")]
    content: String,
}

fn idea_table(ideas: &[Idea]) -> String {
    let rows: Vec<IdeaRow> = ideas
        .iter()
        .map(|idea| IdeaRow {
            id: idea.id.clone(),
            date: idea.date.clone(),
            nickname: idea.nickname.clone(),
            content: idea.content.clone(),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::modern());
    table.to_string()
}

fn idea_sync(config: &Config) -> Result<Synchronizer<Idea, AppsScriptStore>> {
    Ok(Synchronizer::new(open_store(config)?))
}

pub async fn cmd_idea_ls(output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let sync = idea_sync(&config)?;
    let refresh = sync.refresh().await;
    let ideas = sync.snapshot();

    let stale = match &refresh {
        RefreshOutcome::Stale { reason } => Some(reason.clone()),
        RefreshOutcome::Updated { .. } => None,
    };

    CommandOutput::new(json!({
        "ideas": ideas,
        "count": ideas.len(),
        "stale": stale,
    }))
    .with_text_fn(|| {
        let mut text = if ideas.is_empty() {
            "No ideas posted yet".dimmed().to_string()
        } else {
            format!("{}\n\n{} idea(s)", idea_table(&ideas), ideas.len())
        };
        if let Some(note) = stale_note(&refresh) {
            text.push_str(&format!("\n{note}"));
        }
        text
    })
    .print(output)
}

pub async fn cmd_idea_add(
    nickname: &str,
    password: Option<String>,
    content: &str,
    output: OutputOptions,
) -> Result<()> {
    let config = Config::load()?;
    let mutation = Mutation::CreateIdea(IdeaDraft {
        nickname: nickname.to_string(),
        password: password_or_prompt(password, "Password for deleting this idea later")?,
        content: content.to_string(),
    });
    mutation.validate()?;

    let sync = idea_sync(&config)?;
    sync.refresh().await;
    let submitted = Submitter::new(sync.store().clone(), config.refresh_delay())
        .submit_and_sync(&mutation, &sync)
        .await?;

    CommandOutput::new(json!({
        "action": "posted",
        "nickname": nickname.trim(),
        "status": submitted.ack.status,
        "refreshed": submitted.refresh.is_updated(),
    }))
    .with_text_fn(|| {
        let mut text = format!("Posted idea as {}", nickname.trim().cyan());
        if let Some(note) = stale_note(&submitted.refresh) {
            text.push_str(&format!("\n{note}"));
        }
        text
    })
    .print(output)
}

pub async fn cmd_idea_rm(id: &str, password: Option<String>, output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let mutation = Mutation::DeleteIdea {
        id: id.to_string(),
        password: password_or_prompt(password, "Password")?,
    };
    mutation.validate()?;

    let sync = idea_sync(&config)?;
    sync.refresh().await;
    let submitted = Submitter::new(sync.store().clone(), config.refresh_delay())
        .submit_and_sync(&mutation, &sync)
        .await?;

    // The store accepts the request either way; a wrong password only shows
    // up as the idea still being listed
    let deleted = submitted.refresh.is_updated() && !submitted.lingering;

    CommandOutput::new(json!({
        "id": id,
        "deleted": deleted,
        "confirmed": submitted.refresh.is_updated(),
        "still_listed": submitted.lingering,
        "status": submitted.ack.status,
    }))
    .with_text_fn(|| removal_text(id, &submitted))
    .print(output)
}

fn removal_text(id: &str, submitted: &Submitted) -> String {
    if submitted.lingering {
        return format!(
            "Idea {} is still listed; the password was probably wrong",
            id.cyan()
        )
        .yellow()
        .to_string();
    }
    match stale_note(&submitted.refresh) {
        Some(note) => format!(
            "{}\n{note}",
            format!("Delete request for idea {id} sent, but the deletion is unconfirmed").yellow()
        ),
        None => format!("Deleted idea {}", id.cyan()),
    }
}
