//! Where a command's commits come from.

use crate::git;
use anyhow::{Context, Result};
use simtree_fingerprint::Commit;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitSource {
    /// Recent history of a git repository.
    Git { repo: PathBuf, max_commits: usize },
    /// A JSON array of commit records.
    File(PathBuf),
}

impl CommitSource {
    pub fn load(&self) -> Result<Vec<Commit>> {
        let commits = match self {
            CommitSource::Git { repo, max_commits } => git::load_history(repo, *max_commits)?,
            CommitSource::File(path) => simtree_fingerprint::load_commits(path)
                .with_context(|| format!("Failed to load commits from {}", path.display()))?,
        };

        if commits.is_empty() {
            anyhow::bail!("No commits found in {}", self);
        }
        Ok(commits)
    }
}

impl std::fmt::Display for CommitSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommitSource::Git { repo, .. } => write!(f, "repository {}", repo.display()),
            CommitSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("commits.json");
        std::fs::write(
            &path,
            r#"[{"id": 1, "message": "feat: add cache", "timestamp": 1700000000,
                "modifications": [{"file_path": "src/cache.c", "new_code": "int c;\n"}]}]"#,
        )
        .unwrap();

        let commits = CommitSource::File(path).load().unwrap();
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].modifications[0].file_path, "src/cache.c");
    }

    #[test]
    fn test_empty_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("commits.json");
        std::fs::write(&path, "[]").unwrap();

        let err = CommitSource::File(path).load().unwrap_err();
        assert!(err.to_string().contains("No commits found"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = CommitSource::File(PathBuf::from("/nonexistent/commits.json"))
            .load()
            .unwrap_err();
        assert!(err.to_string().contains("Failed to load commits"));
    }
}
