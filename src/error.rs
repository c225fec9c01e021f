//! Error types for codecraft.

use thiserror::Error;

use crate::model::SymbolKind;

/// Errors produced by a symbol renderer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// No encoder is available for the requested kind.
    #[error("{0} library not loaded")]
    Unavailable(SymbolKind),

    /// The encoder rejected the content for the chosen symbology.
    #[error("{0}")]
    InvalidContent(String),
}

/// Deletion of a gallery index that does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Index {index} out of range for gallery of {len} items")]
pub struct IndexError {
    /// The requested index.
    pub index: usize,
    /// Gallery length at the time of the request.
    pub len: usize,
}

/// Key-value storage failures. Never fatal.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Reading or writing the backing file failed.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored document could not be (de)serialized.
    #[error("Storage serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Top-level errors that end the process.
#[derive(Debug, Error)]
pub enum AppError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// Invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A command script could not be loaded.
    #[error("Script error: {0}")]
    Script(String),

    /// Image format conversion error.
    #[error("Image conversion error: {0}")]
    ImageConversion(String),

    /// A command reported a failure.
    #[error("{0}")]
    Command(String),
}
