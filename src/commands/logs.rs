use owo_colors::OwoColorize;
use serde_json::json;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing::warn;

use super::{CommandOutput, open_store};
use crate::cli::OutputOptions;
use crate::config::Config;
use crate::error::Result;
use crate::remote::{ReadAction, RemoteStore};
use crate::session::Session;
use crate::sync::parse_rows;
use crate::types::LogEntry;

#[derive(Tabled)]
struct LogRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "User")]
    user: String,
    #[tabled(rename = "Activity")]
    act: String,
}

async fn fetch_logs<S: RemoteStore>(store: &S) -> Result<Vec<LogEntry>> {
    let body = store.read(ReadAction::Logs).await?;
    Ok(parse_rows(&body)?
        .iter()
        .filter_map(LogEntry::from_fields)
        .collect())
}

/// Show the remote access log (admin only)
pub async fn cmd_logs(output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    Session::load()?.require_admin()?;

    let store = open_store(&config)?;
    let (entries, error) = match fetch_logs(store.as_ref()).await {
        Ok(entries) => (entries, None),
        Err(e) => {
            warn!("failed to load access logs: {e}");
            (Vec::new(), Some(e.to_string()))
        }
    };

    CommandOutput::new(json!({
        "logs": entries,
        "count": entries.len(),
        "error": error,
    }))
    .with_text_fn(|| {
        if let Some(error) = &error {
            return format!("Could not load logs: {error}").yellow().to_string();
        }
        if entries.is_empty() {
            return "No access recorded yet".dimmed().to_string();
        }

        let rows: Vec<LogRow> = entries
            .iter()
            .map(|e| LogRow {
                time: e.time.clone(),
                user: e.user.clone(),
                act: e.act.clone(),
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::modern());
        format!("{table}\n\n{} entries", entries.len())
    })
    .print(output)
}
