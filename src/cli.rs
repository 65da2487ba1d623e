use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::io;

use crate::order::Direction;
use crate::types::{AssetType, Category, VALID_CATEGORIES, VALID_TYPES};

#[derive(Parser)]
#[command(name = "digihub")]
#[command(about = "Team asset directory backed by a spreadsheet endpoint")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// How a command renders its result
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    pub json: bool,
}

impl From<bool> for OutputOptions {
    fn from(json: bool) -> Self {
        Self { json }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search and list assets
    Ls {
        /// Case-insensitive text matched against title and description
        query: Option<String>,

        /// Category: all, favorite, web_tool, website, doc, software (default: all)
        #[arg(short, long, default_value = "all", value_parser = parse_category)]
        category: Category,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage favorite assets
    Fav {
        #[command(subcommand)]
        action: FavAction,
    },

    /// Create, edit, or delete assets (admin)
    Asset {
        #[command(subcommand)]
        action: AssetAction,
    },

    /// View and rearrange the category order
    Order {
        #[command(subcommand)]
        action: OrderAction,
    },

    /// Browse and post to the idea board
    Idea {
        #[command(subcommand)]
        action: IdeaAction,
    },

    /// Show the access log (admin)
    Logs {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Log in as admin
    Login {
        /// Admin id
        id: String,

        /// Admin password (read from stdin when omitted)
        #[arg(long)]
        password: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// End the admin session
    Logout {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the current session
    Whoami {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for [possible values: bash, zsh, fish, powershell, elvish]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum FavAction {
    /// Add an asset to favorites, or remove it if already there
    Toggle {
        /// Asset id
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List favorite asset ids
    Ls {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Clone)]
pub struct AssetFields {
    /// Display title
    #[arg(long)]
    pub title: String,

    /// Link target (absolute URL)
    #[arg(long)]
    pub url: String,

    /// Short description
    #[arg(short, long)]
    pub description: Option<String>,

    /// Type: web_tool, website, doc, software (default: web_tool)
    #[arg(short = 't', long = "type", default_value = "web_tool", value_parser = parse_asset_type)]
    pub asset_type: AssetType,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum AssetAction {
    /// Register a new asset
    Add {
        #[command(flatten)]
        fields: AssetFields,
    },
    /// Replace the fields of an existing asset
    Edit {
        /// Asset id
        id: String,
        #[command(flatten)]
        fields: AssetFields,
    },
    /// Delete an asset
    Rm {
        /// Asset id
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum OrderAction {
    /// Show the current order (staged draft if any)
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Move the category at INDEX one place up or down in the draft (admin)
    Move {
        /// Zero-based position
        index: usize,
        /// up or down
        #[arg(value_parser = parse_direction)]
        direction: Direction,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Publish the staged draft (admin)
    Save {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Discard the staged draft
    Reset {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum IdeaAction {
    /// List posted ideas, newest first
    Ls {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Post an idea
    Add {
        /// The idea
        content: String,
        /// Name shown next to the idea
        #[arg(long)]
        nickname: String,
        /// Password needed to delete the idea later (read from stdin when omitted)
        #[arg(long)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete an idea
    Rm {
        /// Idea id
        id: String,
        /// Password given when the idea was posted (read from stdin when omitted)
        #[arg(long)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set a configuration value
    Set {
        /// Configuration key (e.g. remote.endpoint, order.policy, user.email)
        key: String,
        /// Value to set
        value: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Get a configuration value
    Get {
        /// Configuration key (e.g. remote.endpoint, order.policy, user.email)
        key: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl From<AssetFields> for crate::commands::AssetArgs {
    fn from(fields: AssetFields) -> Self {
        crate::commands::AssetArgs {
            title: fields.title,
            url: fields.url,
            description: fields.description,
            asset_type: fields.asset_type,
        }
    }
}

impl Commands {
    /// Execute the command, dispatching to the appropriate handler.
    pub async fn run(self) -> crate::error::Result<()> {
        use crate::commands::{
            cmd_asset_add, cmd_asset_edit, cmd_asset_rm, cmd_config_get, cmd_config_set,
            cmd_config_show, cmd_fav_ls, cmd_fav_toggle, cmd_idea_add, cmd_idea_ls, cmd_idea_rm,
            cmd_login, cmd_logout, cmd_logs, cmd_ls, cmd_order_move, cmd_order_reset,
            cmd_order_save, cmd_order_show, cmd_whoami,
        };

        match self {
            Commands::Ls {
                query,
                category,
                json,
            } => cmd_ls(query.as_deref(), category, json.into()).await,

            Commands::Fav { action } => match action {
                FavAction::Toggle { id, json } => cmd_fav_toggle(&id, json.into()),
                FavAction::Ls { json } => cmd_fav_ls(json.into()),
            },

            Commands::Asset { action } => match action {
                AssetAction::Add { fields } => {
                    let output = fields.json.into();
                    cmd_asset_add(fields.into(), output).await
                }
                AssetAction::Edit { id, fields } => {
                    let output = fields.json.into();
                    cmd_asset_edit(&id, fields.into(), output).await
                }
                AssetAction::Rm { id, json } => cmd_asset_rm(&id, json.into()).await,
            },

            Commands::Order { action } => match action {
                OrderAction::Show { json } => cmd_order_show(json.into()).await,
                OrderAction::Move {
                    index,
                    direction,
                    json,
                } => cmd_order_move(index, direction, json.into()).await,
                OrderAction::Save { json } => cmd_order_save(json.into()).await,
                OrderAction::Reset { json } => cmd_order_reset(json.into()),
            },

            Commands::Idea { action } => match action {
                IdeaAction::Ls { json } => cmd_idea_ls(json.into()).await,
                IdeaAction::Add {
                    content,
                    nickname,
                    password,
                    json,
                } => cmd_idea_add(&nickname, password, &content, json.into()).await,
                IdeaAction::Rm { id, password, json } => {
                    cmd_idea_rm(&id, password, json.into()).await
                }
            },

            Commands::Logs { json } => cmd_logs(json.into()).await,

            Commands::Login { id, password, json } => cmd_login(&id, password, json.into()),
            Commands::Logout { json } => cmd_logout(json.into()),
            Commands::Whoami { json } => cmd_whoami(json.into()),

            Commands::Config { action } => match action {
                ConfigAction::Show { json } => cmd_config_show(json.into()),
                ConfigAction::Set { key, value, json } => {
                    cmd_config_set(&key, &value, json.into())
                }
                ConfigAction::Get { key, json } => cmd_config_get(&key, json.into()),
            },

            Commands::Completions { shell } => {
                generate_completions(shell);
                Ok(())
            }
        }
    }
}

/// Generic validation helper for parsing values with a standard error message format.
fn parse_with_validation<T, F>(
    s: &str,
    parser: F,
    field_name: &str,
    valid_values: &[&str],
) -> Result<T, String>
where
    F: FnOnce(&str) -> Result<T, String>,
{
    parser(s).map_err(|_| {
        format!(
            "Invalid {}. Must be one of: {}",
            field_name,
            valid_values.join(", ")
        )
    })
}

fn parse_category(s: &str) -> Result<Category, String> {
    parse_with_validation(
        s,
        |v| v.parse().map_err(|_| String::new()),
        "category",
        VALID_CATEGORIES,
    )
}

fn parse_asset_type(s: &str) -> Result<AssetType, String> {
    parse_with_validation(
        s,
        |v| v.parse().map_err(|_| String::new()),
        "type",
        VALID_TYPES,
    )
}

fn parse_direction(s: &str) -> Result<Direction, String> {
    parse_with_validation(
        s,
        |v| v.parse().map_err(|_| String::new()),
        "direction",
        &["up", "down"],
    )
}

pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "digihub", &mut io::stdout());
}
