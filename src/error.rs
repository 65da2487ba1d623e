use thiserror::Error;

#[derive(Error, Debug)]
pub enum HubError {
    #[error("{0}")]
    Validation(String),

    #[error("invalid asset type '{0}'")]
    InvalidAssetType(String),

    #[error("invalid category '{0}'")]
    InvalidCategory(String),

    #[error("invalid direction '{0}', expected 'up' or 'down'")]
    InvalidDirection(String),

    #[error("index {index} is out of range for an order of {len} categories")]
    OrderIndexOutOfRange { index: usize, len: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("remote store rejected '{action}' with status {status}")]
    RemoteRejected { action: String, status: u16 },

    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, HubError>;
