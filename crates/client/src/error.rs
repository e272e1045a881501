//! Client error types.

use thiserror::Error;

/// Result type alias for client module.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors talking to the concierge server.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The request never got a response.
    #[error("request to concierge failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with an error envelope.
    #[error("concierge returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("{resource} not found")]
    NotFound { resource: String },

    #[error("unexpected response: {0}")]
    InvalidResponse(String),

    /// A chat stream event could not be decoded.
    #[error("chat stream: {0}")]
    Stream(String),

    #[error("connection lost: {0}")]
    Connection(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
