use crate::host::EditorId;
use thiserror::Error;

/// Errors produced by the masking engine.
#[derive(Debug, Error)]
pub enum MaskError {
    /// A mask pattern failed to compile.
    #[error("invalid mask pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The regex source as configured.
        pattern: String,
        /// The underlying compile error.
        #[source]
        source: regex::Error,
    },

    /// The mask configuration could not be parsed.
    #[error("mask configuration parse error: {0}")]
    Config(#[from] serde_json::Error),

    /// The mask configuration file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The caret shape preference is not one the engine knows about.
    #[error("unknown cursor style '{0}'")]
    UnknownCursorStyle(String),

    /// An editor id was not found in the host.
    #[error("editor not found: {0}")]
    EditorNotFound(EditorId),

    /// A document id was not found in the host.
    #[error("document not found: {0}")]
    DocumentNotFound(u64),
}
