//! Error types for forumclock-core

use thiserror::Error;

/// Main error type for the forumclock-core library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Timestamp could not be parsed
    #[error("invalid timestamp {input:?}: {reason}")]
    InvalidTimestamp { input: String, reason: String },

    /// Locale tag not supported
    #[error("unknown locale: {0}")]
    UnknownLocale(String),
}

/// Result type alias for forumclock-core
pub type Result<T> = std::result::Result<T, Error>;
