//! Error types for document ingestion

use thiserror::Error;

/// Result type alias for ingestion operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ingestion errors
#[derive(Debug, Error)]
pub enum Error {
    /// File unreadable or missing
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Bytes are malformed for the assumed format
    #[error("Failed to decode '{path}': {message}")]
    Decode { path: String, message: String },

    /// The underlying extraction library rejected the document
    #[error("{format} extraction failed: {message}")]
    Library { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML parse error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Directory walk error
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Tokenizer could not be loaded
    #[error("Tokenizer error: {0}")]
    Tokenizer(String),
}

impl Error {
    /// Create a decode error
    pub fn decode(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an extraction library error
    pub fn library(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Library {
            format: format.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether this error belongs to the per-file extraction taxonomy
    /// (I/O, decode, library) that the pipeline swallows.
    pub fn is_extraction(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Decode { .. } | Self::Library { .. })
    }
}
