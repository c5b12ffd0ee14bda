//! # Skin Error Types
//!
//! Errors raised while locating, reading or parsing skin files.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a skin.
#[derive(Error, Debug)]
pub enum SkinError {
    /// A built-in skin with the specified name does not exist.
    #[error("Skin '{name}' not found")]
    SkinNotFound {
        /// The name that was requested.
        name: String,
    },

    /// Skin file was not found.
    #[error("Skin file not found: {path:?}")]
    FileNotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// Error parsing a skin file.
    #[error("Failed to parse skin {origin}: {details}")]
    ParseError {
        /// Where the skin came from (a path or `<inline>`).
        origin: String,
        /// Details about the parse error.
        details: String,
    },

    /// The skin file has an extension other than `.toml`.
    #[error("Unsupported skin file format: {path:?} (use .toml)")]
    UnsupportedFormat {
        /// The offending path.
        path: PathBuf,
    },

    /// A colour string could not be parsed.
    #[error("Invalid color '{value}': {reason}")]
    InvalidColor {
        /// The raw colour string.
        value: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error serializing skin data.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for skin operations.
pub type SkinResult<T> = Result<T, SkinError>;

impl SkinError {
    /// Create a skin not found error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::SkinNotFound { name: name.into() }
    }

    /// Create a skin file not found error.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a parse error.
    pub fn parse_error(origin: impl Into<String>, details: impl Into<String>) -> Self {
        Self::ParseError {
            origin: origin.into(),
            details: details.into(),
        }
    }

    /// Create an invalid colour error.
    pub fn invalid_color(value: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidColor {
            value: value.into(),
            reason,
        }
    }
}
