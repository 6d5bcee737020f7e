//! Parsed commit records consumed by the fingerprint builder.
//!
//! These types are produced by whatever reads the repository (a `git`
//! subprocess, a JSON dump) and are treated as read-only input here.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Integer identity of a commit within one analysis run.
pub type CommitId = i64;

/// Author of a commit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    pub name: String,
}

impl Author {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A single changed block within one file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modification {
    pub file_path: String,
    /// Removed lines, newline-terminated.
    #[serde(default)]
    pub old_code: String,
    /// Added lines, newline-terminated.
    #[serde(default)]
    pub new_code: String,
    #[serde(default)]
    pub start_line: u32,
}

impl Modification {
    pub fn new(
        file_path: impl Into<String>,
        old_code: impl Into<String>,
        new_code: impl Into<String>,
        start_line: u32,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            old_code: old_code.into(),
            new_code: new_code.into(),
            start_line,
        }
    }
}

/// A commit as seen by the fingerprint builder.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub id: CommitId,
    /// Full VCS hash, when the commit came from a real repository.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(default)]
    pub author: Author,
    pub message: String,
    /// Unix timestamp in seconds; zero or negative means unknown.
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub modifications: Vec<Modification>,
}

impl Commit {
    pub fn new(id: CommitId, message: impl Into<String>, timestamp: i64) -> Self {
        Self {
            id,
            hash: None,
            author: Author::default(),
            message: message.into(),
            timestamp,
            modifications: Vec::new(),
        }
    }

    pub fn with_author(mut self, author: Author) -> Self {
        self.author = author;
        self
    }

    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = Some(hash.into());
        self
    }

    pub fn with_modification(mut self, modification: Modification) -> Self {
        self.modifications.push(modification);
        self
    }

    /// Short hash for display, falling back to `#<id>`.
    pub fn short_ref(&self) -> String {
        match &self.hash {
            Some(hash) => hash.chars().take(8).collect(),
            None => format!("#{}", self.id),
        }
    }

    /// First line of the message.
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }
}

/// Load a JSON array of commits from disk.
///
/// # Errors
///
/// Returns error if the file cannot be read or is not a valid commit array.
pub fn load_commits<P: AsRef<Path>>(path: P) -> Result<Vec<Commit>> {
    let content = std::fs::read_to_string(path.as_ref())?;
    let commits: Vec<Commit> = serde_json::from_str(&content)?;
    tracing::debug!(
        "Loaded {} commits from {}",
        commits.len(),
        path.as_ref().display()
    );
    Ok(commits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_builder() {
        let commit = Commit::new(3, "fix: null check\n\nlonger body", 10)
            .with_author(Author::new(1, "lucas"))
            .with_modification(Modification::new("src/a.c", "x\n", "y\n", 5));

        assert_eq!(commit.subject(), "fix: null check");
        assert_eq!(commit.short_ref(), "#3");
        assert_eq!(commit.modifications.len(), 1);
        assert_eq!(commit.author.name, "lucas");
    }

    #[test]
    fn test_short_ref_uses_hash() {
        let commit = Commit::new(1, "msg", 0).with_hash("0123456789abcdef");
        assert_eq!(commit.short_ref(), "01234567");
    }

    #[test]
    fn test_deserialize_minimal_commit() {
        let json = r#"[{"id": 9, "message": "docs: readme"}]"#;
        let commits: Vec<Commit> = serde_json::from_str(json).unwrap();
        assert_eq!(commits[0].id, 9);
        assert_eq!(commits[0].timestamp, 0);
        assert!(commits[0].modifications.is_empty());
        assert!(commits[0].hash.is_none());
    }
}
