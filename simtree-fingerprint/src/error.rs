//! Error types for simtree-fingerprint.

use thiserror::Error;

/// Result type alias for fingerprint operations.
pub type Result<T> = std::result::Result<T, FingerprintError>;

/// Errors that can occur while building fingerprints or loading commits.
#[derive(Error, Debug)]
pub enum FingerprintError {
    /// One of the analysis records needed for a fingerprint is missing.
    #[error("Missing {component} analysis for commit {commit_id}")]
    MissingAnalysis {
        /// Identifier of the offending commit.
        commit_id: i64,
        /// Which analysis could not be produced.
        component: &'static str,
    },

    /// IO error reading a commit file.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing error for commit files.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}
