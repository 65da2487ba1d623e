use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::error::HubError;

/// Normalized row as read from the remote store: lowercase column name to cell text.
pub type Fields = BTreeMap<String, String>;

fn field<'a>(fields: &'a Fields, name: &str) -> &'a str {
    fields.get(name).map(|v| v.trim()).unwrap_or("")
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetType {
    #[default]
    WebTool,
    Website,
    Doc,
    Software,
}

/// Category order used when no remote order is configured.
pub const DEFAULT_ORDER: [AssetType; 4] = [
    AssetType::WebTool,
    AssetType::Website,
    AssetType::Doc,
    AssetType::Software,
];

pub const VALID_TYPES: &[&str] = &["web_tool", "website", "doc", "software"];

impl AssetType {
    /// Wire name as stored in the spreadsheet
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::WebTool => "WEB_TOOL",
            AssetType::Website => "WEBSITE",
            AssetType::Doc => "DOC",
            AssetType::Software => "SOFTWARE",
        }
    }

    /// Heading shown above a category group
    pub fn label(&self) -> &'static str {
        match self {
            AssetType::WebTool => "Online Tools",
            AssetType::Website => "Portals & Sites",
            AssetType::Doc => "Documents",
            AssetType::Software => "Desktop Apps",
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetType {
    type Err = HubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "WEB_TOOL" => Ok(AssetType::WebTool),
            "WEBSITE" => Ok(AssetType::Website),
            "DOC" => Ok(AssetType::Doc),
            "SOFTWARE" => Ok(AssetType::Software),
            _ => Err(HubError::InvalidAssetType(s.to_string())),
        }
    }
}

/// A link in the directory.
///
/// `asset_type` is `None` when the sheet holds a missing or unrecognized type;
/// such rows still show up under favorites but belong to no category group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub asset_type: Option<AssetType>,
    pub url: String,
}

impl Asset {
    /// Build from a normalized sheet row. Rows without an id or title are
    /// blank or malformed spreadsheet lines and yield `None`.
    pub fn from_fields(fields: &Fields) -> Option<Self> {
        let id = field(fields, "id");
        let title = field(fields, "title");
        if id.is_empty() || title.is_empty() {
            return None;
        }

        Some(Asset {
            id: id.to_string(),
            title: title.to_string(),
            description: field(fields, "description").to_string(),
            asset_type: field(fields, "type").parse().ok(),
            url: field(fields, "url").to_string(),
        })
    }

    pub fn is_valid(&self) -> bool {
        !self.title.trim().is_empty()
    }
}

/// A suggestion posted to the idea board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Idea {
    pub id: String,
    pub nickname: String,
    pub content: String,
    #[serde(default)]
    pub date: String,
}

impl Idea {
    pub fn from_fields(fields: &Fields) -> Option<Self> {
        let id = field(fields, "id");
        if id.is_empty() {
            return None;
        }

        Some(Idea {
            id: id.to_string(),
            nickname: field(fields, "nickname").to_string(),
            content: field(fields, "content").to_string(),
            date: field(fields, "date").to_string(),
        })
    }
}

/// One row of the remote access log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub time: String,
    pub user: String,
    pub act: String,
}

impl LogEntry {
    pub fn from_fields(fields: &Fields) -> Option<Self> {
        let entry = LogEntry {
            time: field(fields, "time").to_string(),
            user: field(fields, "user").to_string(),
            act: field(fields, "act").to_string(),
        };
        if entry.time.is_empty() && entry.user.is_empty() && entry.act.is_empty() {
            return None;
        }
        Some(entry)
    }
}

/// Which slice of the directory to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Category {
    #[default]
    All,
    Favorite,
    Type(AssetType),
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::All => write!(f, "ALL"),
            Category::Favorite => write!(f, "FAVORITE"),
            Category::Type(t) => write!(f, "{t}"),
        }
    }
}

impl FromStr for Category {
    type Err = HubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ALL" => Ok(Category::All),
            "FAVORITE" | "FAVORITES" => Ok(Category::Favorite),
            other => other
                .parse()
                .map(Category::Type)
                .map_err(|_| HubError::InvalidCategory(s.to_string())),
        }
    }
}

pub const VALID_CATEGORIES: &[&str] = &[
    "all", "favorite", "web_tool", "website", "doc", "software",
];

/// Form state for creating or editing an asset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetDraft {
    pub title: String,
    pub description: String,
    pub asset_type: AssetType,
    pub url: String,
}

/// Form state for posting an idea
#[derive(Debug)]
pub struct IdeaDraft {
    pub nickname: String,
    pub password: SecretString,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> Fields {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_asset_type_from_str() {
        assert_eq!("web_tool".parse::<AssetType>().unwrap(), AssetType::WebTool);
        assert_eq!(" DOC ".parse::<AssetType>().unwrap(), AssetType::Doc);
        assert_eq!("Software".parse::<AssetType>().unwrap(), AssetType::Software);
        assert!("video".parse::<AssetType>().is_err());
    }

    #[test]
    fn test_asset_type_serializes_wire_name() {
        let json = serde_json::to_string(&AssetType::WebTool).unwrap();
        assert_eq!(json, "\"WEB_TOOL\"");
    }

    #[test]
    fn test_asset_from_fields() {
        let asset = Asset::from_fields(&fields(&[
            ("id", "1769047016976"),
            ("title", " Ebook page "),
            ("type", "DOC"),
            ("url", "https://ebook-event.vercel.app/ "),
        ]))
        .unwrap();

        assert_eq!(asset.id, "1769047016976");
        assert_eq!(asset.title, "Ebook page");
        assert_eq!(asset.description, "");
        assert_eq!(asset.asset_type, Some(AssetType::Doc));
        assert_eq!(asset.url, "https://ebook-event.vercel.app/");
    }

    #[test]
    fn test_asset_from_fields_requires_id_and_title() {
        assert!(Asset::from_fields(&fields(&[("id", "1"), ("title", "  ")])).is_none());
        assert!(Asset::from_fields(&fields(&[("title", "A")])).is_none());
    }

    #[test]
    fn test_asset_unknown_type_is_kept_untyped() {
        let asset =
            Asset::from_fields(&fields(&[("id", "1"), ("title", "A"), ("type", "VIDEO")])).unwrap();
        assert_eq!(asset.asset_type, None);
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("all".parse::<Category>().unwrap(), Category::All);
        assert_eq!("favorites".parse::<Category>().unwrap(), Category::Favorite);
        assert_eq!(
            "website".parse::<Category>().unwrap(),
            Category::Type(AssetType::Website)
        );
        assert!("nope".parse::<Category>().is_err());
    }

    #[test]
    fn test_log_entry_skips_blank_rows() {
        assert!(LogEntry::from_fields(&fields(&[("time", ""), ("user", "")])).is_none());
        let entry = LogEntry::from_fields(&fields(&[("user", "a@b.c"), ("act", "visit")])).unwrap();
        assert_eq!(entry.user, "a@b.c");
    }
}
