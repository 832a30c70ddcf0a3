//! Error types for the numbering pass

use thiserror::Error;

use crate::diagnostics::Diagnostic;

/// Errors that abort a numbering run or its ingestion
#[derive(Error, Debug)]
pub enum Error {
    /// A heading depth the counter model cannot represent
    #[error("Heading depth {depth} is outside the supported range 2..=6")]
    DepthOutOfRange { depth: u8 },

    /// The document was rejected before any mutation
    #[error("Document rejected with {} error(s)", diagnostics.len())]
    Rejected { diagnostics: Vec<Diagnostic> },

    /// Error parsing collaborator markup
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Markup that parsed but does not describe a usable node
    #[error("Invalid markup: {0}")]
    InvalidMarkup(String),

    /// Error reading configuration
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// Error reading or writing files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for numbering operations
pub type Result<T> = std::result::Result<T, Error>;
