//! Configuration commands.
//!
//! - `config show`: Display current configuration
//! - `config get`: Print one value
//! - `config set`: Set a value by dot-notation key

use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::cli::OutputOptions;
use crate::config::{CONFIG_KEYS, Config};
use crate::error::{HubError, Result};

/// Deployment URLs act as bearer capabilities; show only their ends
fn mask_sensitive_value(value: &str) -> String {
    let char_count = value.chars().count();
    if char_count > 16 {
        let first: String = value.chars().take(12).collect();
        let last: String = value.chars().skip(char_count - 4).collect();
        format!("{first}...{last}")
    } else {
        "****".to_string()
    }
}

/// Show current configuration
pub fn cmd_config_show(output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let admin_configured = config.admin_credentials().is_some();
    let endpoint = config.endpoint().map(|e| mask_sensitive_value(&e));

    let mut values = serde_json::Map::new();
    for key in CONFIG_KEYS {
        let value = if *key == "remote.endpoint" {
            endpoint.clone()
        } else {
            config.get_value(key)?
        };
        values.insert(key.to_string(), json!(value));
    }

    let json_output = json!({
        "values": values,
        "auth": {
            "admin_credentials_configured": admin_configured,
        },
        "config_file": Config::config_path().to_string_lossy(),
    });

    CommandOutput::new(json_output)
        .with_text_fn(|| {
            let mut text = format!("{}\n\n", "Configuration:".cyan().bold());
            for (key, value) in &values {
                let shown = match value.as_str() {
                    Some(v) => v.to_string(),
                    None => "not configured".dimmed().to_string(),
                };
                text.push_str(&format!("  {}: {shown}\n", key.cyan()));
            }

            let admin = if admin_configured {
                "configured".green().to_string()
            } else {
                "not configured".dimmed().to_string()
            };
            text.push_str(&format!("\n{}:\n  admin credentials: {admin}\n\n", "auth".cyan()));
            text.push_str(&format!(
                "{}",
                format!("Config file: {}", Config::config_path().display()).dimmed()
            ));
            text
        })
        .print(output)
}

/// Set a configuration value
pub fn cmd_config_set(key: &str, value: &str, output: OutputOptions) -> Result<()> {
    let mut config = Config::load()?;
    config.set_value(key, value)?;
    config.save()?;

    CommandOutput::new(json!({
        "action": "config_set",
        "key": key,
        "value": value,
        "success": true,
    }))
    .with_text(format!("Set {} = {}", key.cyan(), value))
    .print(output)
}

/// Get a specific configuration value
pub fn cmd_config_get(key: &str, output: OutputOptions) -> Result<()> {
    let config = Config::load()?;

    let value = match key {
        "remote.endpoint" => config.endpoint(),
        _ => config.get_value(key)?,
    }
    .ok_or_else(|| HubError::Config(format!("{key} not set")))?;

    CommandOutput::new(json!({
        "key": key,
        "value": value,
        "configured": true,
    }))
    .with_text(value.clone())
    .print(output)
}
