//! @acp:module "Errors"
//! @acp:summary "Library error type and result alias"
//! @acp:domain cli
//! @acp:layer core
//!
//! Every variant is scoped to a single file or class. The sync pipeline
//! turns them into per-file outcomes; none of them aborts a run.

use std::path::PathBuf;

use thiserror::Error;

/// @acp:summary "Errors raised while scanning, reconciling and splicing"
#[derive(Debug, Error)]
pub enum DocsyncError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Column facts for a class could not be obtained
    #[error("metadata unavailable for {class}: {reason}")]
    MetadataUnavailable { class: String, reason: String },

    /// The previous block text is not present verbatim in the source
    #[error("previous annotation text not found in source")]
    NoSpliceMatch,

    /// The previous block text occurs more than once
    #[error("previous annotation text found {count} times, refusing to guess")]
    AmbiguousSpliceMatch { count: usize },

    #[error("malformed declaration in {}: {reason}", path.display())]
    MalformedDeclaration { path: PathBuf, reason: String },

    #[error("schema error: {0}")]
    Schema(String),

    #[error("{0}")]
    Other(String),
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for DocsyncError {
    fn from(err: rusqlite::Error) -> Self {
        DocsyncError::Schema(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DocsyncError>;
