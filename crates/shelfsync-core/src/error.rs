//! Error types for shelfsync.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The object store request or body download failed.
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// The fetched object had no body, or an empty one.
    #[error("No body")]
    EmptyPayload,

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unknown model: {0}")]
    UnknownModel(String),

    /// The host platform rejected a callback.
    #[error("Host error: {0}")]
    Host(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
