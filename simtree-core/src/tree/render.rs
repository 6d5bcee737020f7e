//! Plain-text rendering of the active tree structure.

use super::CommitSimilarityTree;
use std::fmt::Write;

/// Text rendering of the active structure, one two-line block per node.
///
/// Children whose cached similarity is below `min_similarity` are left out
/// along with everything beneath them.
pub fn render_tree(tree: &CommitSimilarityTree<'_>, min_similarity: f64) -> String {
    let mut out = String::new();

    for entry in tree.walk(min_similarity) {
        let Some(node) = tree.node(entry.node) else {
            continue;
        };
        let indent = "  ".repeat(entry.level);
        let (left, right) = node.child_scores();
        let fingerprint = node.fingerprint();

        let _ = writeln!(
            out,
            "{}├─ {} (depth {}) {} - Similarity: L={:.3} R={:.3}",
            indent,
            node.commit().short_ref(),
            entry.level,
            node.commit().subject(),
            left,
            right
        );
        let _ = writeln!(
            out,
            "{}  Intent: {}, Files: {}, Sentiment: {:.2}",
            indent,
            fingerprint.keywords.intent_type,
            fingerprint.file_analysis.total_files_changed,
            fingerprint.keywords.sentiment_score
        );
    }

    out
}

impl<'c> CommitSimilarityTree<'c> {
    pub fn render(&self, min_similarity: f64) -> String {
        render_tree(self, min_similarity)
    }
}
