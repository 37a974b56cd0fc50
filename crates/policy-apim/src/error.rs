//! Error types for policy-apim

/// Result type for policy-apim operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while configuring or talking to the management API
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Missing required setting: {0}")]
    MissingSetting(&'static str),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },
}
