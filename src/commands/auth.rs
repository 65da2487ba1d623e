//! Admin session commands: `login`, `logout`, `whoami`.

use owo_colors::OwoColorize;
use serde_json::json;

use super::{CommandOutput, password_or_prompt};
use crate::cli::OutputOptions;
use crate::config::Config;
use crate::error::Result;
use crate::session::{self, Session};

pub fn cmd_login(id: &str, password: Option<String>, output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let password = password_or_prompt(password, "Password")?;

    let session = session::login(id, &password, &config)?;
    session.save()?;

    CommandOutput::new(json!({
        "tier": session.tier.to_string(),
        "since": session.since,
    }))
    .with_text(format!("Logged in as {}", "admin".green()))
    .print(output)
}

pub fn cmd_logout(output: OutputOptions) -> Result<()> {
    let cleared = Session::clear()?;

    CommandOutput::new(json!({ "logged_out": cleared }))
        .with_text(if cleared {
            "Logged out".to_string()
        } else {
            "No active session".dimmed().to_string()
        })
        .print(output)
}

pub fn cmd_whoami(output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let session = Session::load()?;
    let email = config.user.email.clone();

    CommandOutput::new(json!({
        "tier": session.tier.to_string(),
        "since": session.since,
        "email": email,
    }))
    .with_text_fn(|| {
        let tier = if session.is_admin() {
            session.tier.to_string().green().to_string()
        } else {
            session.tier.to_string().dimmed().to_string()
        };
        let mut text = format!("tier: {tier}");
        if let Some(since) = &session.since {
            text.push_str(&format!("\nsince: {since}"));
        }
        match &email {
            Some(email) => text.push_str(&format!("\nemail: {email}")),
            None => text.push_str(&format!("\nemail: {}", "not configured".dimmed())),
        }
        text
    })
    .print(output)
}
