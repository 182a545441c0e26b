use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

/// Failures that end the terminal session. Per-request errors stay in
/// [`crate::client::ClientError`] and are shown on screen instead.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("invalid base_url {url:?}: {reason}")]
    BaseUrl { url: String, reason: String },
    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("terminal error: {0}")]
    Terminal(String),
}
