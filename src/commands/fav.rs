use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::cli::OutputOptions;
use crate::error::Result;
use crate::favorites::FavoritesStore;

/// Add or remove an asset from favorites
pub fn cmd_fav_toggle(id: &str, output: OutputOptions) -> Result<()> {
    let mut favorites = FavoritesStore::open()?;
    let favorite = favorites.toggle(id)?;
    let id = id.trim();

    CommandOutput::new(json!({
        "id": id,
        "favorite": favorite,
    }))
    .with_text(if favorite {
        format!("Added {} to favorites", id.cyan())
    } else {
        format!("Removed {} from favorites", id.cyan())
    })
    .print(output)
}

/// List favorite asset ids
pub fn cmd_fav_ls(output: OutputOptions) -> Result<()> {
    let favorites = FavoritesStore::open()?;
    let ids: Vec<&String> = favorites.list().iter().collect();

    CommandOutput::new(json!({
        "favorites": ids,
        "file": favorites.path().to_string_lossy(),
    }))
    .with_text_fn(|| {
        if ids.is_empty() {
            return "No favorites yet".dimmed().to_string();
        }
        ids.iter()
            .map(|id| id.cyan().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    })
    .print(output)
}
