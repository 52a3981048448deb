use thiserror::Error;

/// Errors from backend calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure: DNS, connect, timeout, TLS.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("backend returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unexpected response body: {0}")]
    Parse(String),

    /// Upload succeeded but no recognised URL field was in the body.
    #[error("upload response did not contain a file URL")]
    MissingUrl,

    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),
}

pub type ApiResult<T> = Result<T, ApiError>;
