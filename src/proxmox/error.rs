use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProxmoxError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load settings: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("API request failed: {0} - {1}")]
    Api(reqwest::StatusCode, String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Network/Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, ProxmoxError>;
