use thiserror::Error;

/// A cached tool result could not be stored or read back.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("cannot encode {0} for the cache")]
    Encode(String),
    #[error("cached entry is unreadable: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, CacheError>;
