//! Error types for simtree-core.

use simtree_fingerprint::CommitId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TreeError>;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TreeError {
    /// No commits were supplied to build from.
    #[error("Cannot build a similarity tree from an empty commit list")]
    EmptyInput,

    #[error("Commit {id} is not in the similarity tree")]
    CommitNotFound { id: CommitId },
}
