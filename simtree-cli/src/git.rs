//! Reading commits out of a git repository.
//!
//! Shells out to `git log` for the commit list and `git show` for each
//! commit's diff, then parses the textual output into commit records.

use anyhow::{Context, Result};
use simtree_fingerprint::{Author, Commit, Modification};
use std::collections::HashMap;
use std::path::Path;
use std::process::Command;

/// `git log` format: full hash, author name, unix time, subject.
const LOG_FORMAT: &str = "--pretty=format:%H|%an|%at|%s";

/// One parsed `git log` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub hash: String,
    pub author: String,
    pub timestamp: i64,
    pub subject: String,
}

/// Parse a `hash|author|timestamp|subject` line. The subject may itself
/// contain `|`. An unparsable timestamp is treated as unknown (0).
pub fn parse_log_line(line: &str) -> Option<LogEntry> {
    let parts: Vec<&str> = line.splitn(4, '|').collect();
    if parts.len() < 4 {
        return None;
    }

    let hash = parts[0].trim();
    if hash.is_empty() {
        return None;
    }

    Some(LogEntry {
        hash: hash.to_string(),
        author: parts[1].trim().to_string(),
        timestamp: parts[2].trim().parse().unwrap_or(0),
        subject: parts[3].trim().to_string(),
    })
}

/// Parse unified diff output into one modification per file.
///
/// Only `-`/`+` lines inside hunks are collected; file headers are skipped.
/// Files without any changed line (renames, mode changes, binaries) are
/// dropped.
pub fn parse_diff(diff: &str) -> Vec<Modification> {
    let mut modifications = Vec::new();
    let mut current: Option<Modification> = None;
    let mut in_hunk = false;

    for line in diff.lines() {
        if let Some(header) = line.strip_prefix("diff --git ") {
            flush(&mut current, &mut modifications);
            in_hunk = false;
            current = Some(Modification::new(diff_path(header), "", "", 0));
        } else if line.starts_with("@@") {
            if let Some(modification) = current.as_mut() {
                modification.start_line = hunk_start(line);
            }
            in_hunk = true;
        } else if in_hunk {
            let Some(modification) = current.as_mut() else {
                continue;
            };
            if let Some(removed) = line.strip_prefix('-') {
                if !line.starts_with("---") {
                    modification.old_code.push_str(removed);
                    modification.old_code.push('\n');
                }
            } else if let Some(added) = line.strip_prefix('+') {
                if !line.starts_with("+++") {
                    modification.new_code.push_str(added);
                    modification.new_code.push('\n');
                }
            }
        }
    }
    flush(&mut current, &mut modifications);

    modifications
}

fn flush(current: &mut Option<Modification>, modifications: &mut Vec<Modification>) {
    if let Some(modification) = current.take() {
        if !modification.old_code.is_empty() || !modification.new_code.is_empty() {
            modifications.push(modification);
        }
    }
}

/// Path from the `a/X b/Y` part of a `diff --git` header, preferring `Y`.
fn diff_path(header: &str) -> String {
    match header.rfind(" b/") {
        Some(position) => header[position + 3..].to_string(),
        None => header.trim_start_matches("a/").to_string(),
    }
}

/// New-file start line from a `@@ -a,b +c,d @@` hunk header.
fn hunk_start(line: &str) -> u32 {
    line.split_whitespace()
        .find_map(|token| token.strip_prefix('+'))
        .and_then(|range| range.split(',').next())
        .and_then(|start| start.parse().ok())
        .unwrap_or(0)
}

fn run_git(repo: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .arg("-C")
        .arg(repo)
        .args(args)
        .output()
        .context("Failed to run git. Is it installed and on PATH?")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("git {} failed: {}", args.join(" "), stderr.trim());
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Load the `max_commits` most recent commits of `repo`, newest first, with
/// ids assigned 1..N in that order.
pub fn load_history(repo: &Path, max_commits: usize) -> Result<Vec<Commit>> {
    run_git(repo, &["rev-parse", "--git-dir"])
        .with_context(|| format!("{} is not a git repository", repo.display()))?;

    let limit = max_commits.to_string();
    let log = run_git(repo, &["log", LOG_FORMAT, "-n", &limit])?;

    let mut authors: HashMap<String, i64> = HashMap::new();
    let mut commits = Vec::new();

    for entry in log.lines().filter_map(parse_log_line) {
        let diff = run_git(repo, &["show", "--pretty=format:", &entry.hash])
            .with_context(|| format!("Failed to read diff for {}", entry.hash))?;

        let next_author_id = authors.len() as i64 + 1;
        let author_id = *authors.entry(entry.author.clone()).or_insert(next_author_id);

        let id = commits.len() as i64 + 1;
        let mut commit = Commit::new(id, entry.subject, entry.timestamp)
            .with_hash(entry.hash)
            .with_author(Author::new(author_id, entry.author));
        commit.modifications = parse_diff(&diff);
        tracing::debug!(
            "Loaded commit {} ({} files)",
            commit.short_ref(),
            commit.modifications.len()
        );
        commits.push(commit);
    }

    tracing::info!("Loaded {} commits from {}", commits.len(), repo.display());
    Ok(commits)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_DIFF: &str = "\
diff --git a/src/parser.c b/src/parser.c
index 83db48f..bf269f4 100644
--- a/src/parser.c
+++ b/src/parser.c
@@ -10,3 +12,4 @@ int parse(void) {
-    return 0;
+    if (!input) return -1;
+    return 1;
 }
diff --git a/docs/logo.png b/docs/logo.png
index 1111111..2222222 100644
Binary files a/docs/logo.png and b/docs/logo.png differ
diff --git a/README.md b/README.md
new file mode 100644
--- /dev/null
+++ b/README.md
@@ -0,0 +1,2 @@
+# Parser
+-- usage notes
";

    #[test]
    fn test_parse_log_line() {
        let entry = parse_log_line("abc123|Ada Lovelace|1700000000|Fix bug | in parser").unwrap();
        assert_eq!(entry.hash, "abc123");
        assert_eq!(entry.author, "Ada Lovelace");
        assert_eq!(entry.timestamp, 1_700_000_000);
        assert_eq!(entry.subject, "Fix bug | in parser");
    }

    #[test]
    fn test_parse_log_line_rejects_short_lines() {
        assert!(parse_log_line("abc123|Ada|1700000000").is_none());
        assert!(parse_log_line("").is_none());
        assert_eq!(parse_log_line("abc|Ada|soon|msg").unwrap().timestamp, 0);
    }

    #[test]
    fn test_parse_diff_collects_hunks_per_file() {
        let modifications = parse_diff(SAMPLE_DIFF);
        assert_eq!(modifications.len(), 2);

        let parser = &modifications[0];
        assert_eq!(parser.file_path, "src/parser.c");
        assert_eq!(parser.start_line, 12);
        assert_eq!(parser.old_code, "    return 0;\n");
        assert_eq!(parser.new_code, "    if (!input) return -1;\n    return 1;\n");

        let readme = &modifications[1];
        assert_eq!(readme.file_path, "README.md");
        assert_eq!(readme.start_line, 1);
        assert_eq!(readme.old_code, "");
        assert_eq!(readme.new_code, "# Parser\n-- usage notes\n");
    }

    #[test]
    fn test_parse_empty_diff() {
        assert!(parse_diff("").is_empty());
    }

    #[test]
    fn test_hunk_start() {
        assert_eq!(hunk_start("@@ -1,5 +7,9 @@"), 7);
        assert_eq!(hunk_start("@@ -1 +3 @@ fn main()"), 3);
        assert_eq!(hunk_start("@@ garbage @@"), 0);
    }

    #[test]
    fn test_diff_path_prefers_new_name() {
        assert_eq!(diff_path("a/old.rs b/new.rs"), "new.rs");
        assert_eq!(diff_path("a/dir with space/x b/dir with space/x"), "dir with space/x");
    }
}
