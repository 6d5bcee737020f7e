//! Command implementations for the simtree CLI
//!
//! Each command module provides a `run` function that loads commits, builds
//! the similarity tree and renders one report.

pub mod cluster;
pub mod compare;
pub mod completions;
pub mod fingerprint;
pub mod pairs;
pub mod patterns;
pub mod precedents;
pub mod stats;
pub mod timeline;
pub mod tree;

use colored::{ColoredString, Colorize};
use simtree_fingerprint::Commit;

/// Color a similarity score by strength.
pub(crate) fn colored_score(score: f64) -> ColoredString {
    let text = format!("{:.3}", score);
    if score > 0.8 {
        text.green().bold()
    } else if score > 0.5 {
        text.green()
    } else if score > 0.3 {
        text.yellow()
    } else {
        text.dimmed()
    }
}

/// `<short ref> <subject>` for one-line listings.
pub(crate) fn commit_label(commit: &Commit) -> String {
    format!("{} {}", commit.short_ref(), commit.subject())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_label() {
        let commit = Commit::new(7, "Fix parser\n\nDetails", 0);
        assert_eq!(commit_label(&commit), "#7 Fix parser");
        let commit = commit.with_hash("deadbeefcafe");
        assert_eq!(commit_label(&commit), "deadbeef Fix parser");
    }

    #[test]
    fn test_colored_score_text() {
        colored::control::set_override(false);
        assert_eq!(colored_score(0.91234).to_string(), "0.912");
        assert_eq!(colored_score(0.1).to_string(), "0.100");
    }
}
