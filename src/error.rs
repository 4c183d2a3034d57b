//! Run-level errors
//!
//! Anything here aborts the run. Problems with individual links are
//! reported as data in `ResolutionResult` instead.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The directory to check does not exist or cannot be resolved.
    #[error("document root not found: {}: {source}", path.display())]
    RootNotFound {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An include or ignore pattern is not a valid glob.
    #[error("invalid glob pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        source: glob::PatternError,
    },

    /// Walking the document tree failed.
    #[error("failed to enumerate documents: {0}")]
    Glob(#[from] glob::GlobError),

    /// A discovered document could not be read.
    #[error("failed to read {}: {source}", path.display())]
    ReadDocument {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A link pattern failed to compile.
    #[error("invalid link pattern: {0}")]
    LinkPattern(#[from] regex::Error),

    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to serialize report: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to write report {}: {source}", path.display())]
    WriteReport {
        path: PathBuf,
        source: std::io::Error,
    },
}
