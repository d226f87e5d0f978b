//! Common error types for Tonedeck

use thiserror::Error;

/// Common result type for Tonedeck operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across Tonedeck crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML config file could not be parsed
    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid value supplied by a caller (e.g. tone outside 1..=4)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Final missing from the transliteration rule table.
    ///
    /// Indicates an incomplete phonetic table, never malformed user input.
    #[error("Unexpected (initial, final) = ({initial:?}, {final_:?})")]
    UnknownFinal { initial: String, final_: String },
}
