mod asset;
mod auth;
mod browse;
mod config;
mod fav;
mod idea;
mod logs;
mod order;

pub use asset::{AssetArgs, cmd_asset_add, cmd_asset_edit, cmd_asset_rm};
pub use auth::{cmd_login, cmd_logout, cmd_whoami};
pub use browse::cmd_ls;
pub use config::{cmd_config_get, cmd_config_set, cmd_config_show};
pub use fav::{cmd_fav_ls, cmd_fav_toggle};
pub use idea::{cmd_idea_add, cmd_idea_ls, cmd_idea_rm};
pub use logs::cmd_logs;
pub use order::{cmd_order_move, cmd_order_reset, cmd_order_save, cmd_order_show};

use std::io::{self, Write};
use std::sync::Arc;

use owo_colors::OwoColorize;
use secrecy::SecretString;
use serde_json::Value;

use crate::cli::OutputOptions;
use crate::config::Config;
use crate::error::Result;
use crate::remote::AppsScriptStore;
use crate::sync::RefreshOutcome;
use crate::types::Asset;

/// Result of a command, rendered as JSON or text depending on output options
pub struct CommandOutput {
    json: Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: Value) -> Self {
        Self { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Like [`Self::with_text`], but only builds the text when it is printed
    pub fn with_text_fn<F: FnOnce() -> String>(self, build: F) -> TextOutput<F> {
        TextOutput {
            json: self.json,
            build,
        }
    }

    pub fn print(self, output: OutputOptions) -> Result<()> {
        if output.json {
            return print_json(&self.json);
        }
        match self.text {
            Some(text) => println!("{text}"),
            None => print_json(&self.json)?,
        }
        Ok(())
    }
}

/// [`CommandOutput`] with deferred text
pub struct TextOutput<F: FnOnce() -> String> {
    json: Value,
    build: F,
}

impl<F: FnOnce() -> String> TextOutput<F> {
    pub fn print(self, output: OutputOptions) -> Result<()> {
        if output.json {
            return print_json(&self.json);
        }
        println!("{}", (self.build)());
        Ok(())
    }
}

pub fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Format an asset for single-line display
pub fn format_asset_line(asset: &Asset, favorite: bool) -> String {
    let star = if favorite {
        "*".yellow().to_string()
    } else {
        " ".to_string()
    };
    let id = format!("{:>14}", asset.id).cyan().to_string();
    let kind = asset
        .asset_type
        .map(|t| format!("[{t}]"))
        .unwrap_or_else(|| "[?]".to_string());

    let mut line = format!("{star} {id} {} {}", kind.dimmed(), asset.title.bold());
    if !asset.description.is_empty() {
        line.push_str(&format!(" - {}", asset.description));
    }
    line.push_str(&format!("\n{:>18}{}", "", asset.url.dimmed()));
    line
}

/// Note for text output when a reconciling refresh did not go through
fn stale_note(refresh: &RefreshOutcome) -> Option<String> {
    match refresh {
        RefreshOutcome::Updated { .. } => None,
        RefreshOutcome::Stale { reason } => Some(format!(
            "{}",
            format!("List not refreshed ({reason}); showing last known state").dimmed()
        )),
    }
}

fn open_store(config: &Config) -> Result<Arc<AppsScriptStore>> {
    Ok(Arc::new(AppsScriptStore::from_config(config)?))
}

/// Use the password given on the command line, or read one line from stdin
fn password_or_prompt(password: Option<String>, prompt: &str) -> Result<SecretString> {
    if let Some(password) = password {
        return Ok(SecretString::from(password));
    }

    eprint!("{prompt}: ");
    io::stderr().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(SecretString::from(input.trim_end_matches(['\r', '\n']).to_string()))
}
