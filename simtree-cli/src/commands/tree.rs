//! Tree command - Print the similarity tree
//!
//! Walks the active structure from the root, printing each commit with the
//! cached similarity of its two child slots.

use crate::output::{Output, OutputFormat, TableDisplay};
use crate::source::CommitSource;
use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use simtree_core::{build_similarity_tree, ChildSlot, CommitSimilarityTree, TreeStatistics};

/// One printed line of the tree.
#[derive(Debug, Serialize)]
pub struct TreeEntry {
    pub commit_id: i64,
    pub short_ref: String,
    pub subject: String,
    pub level: usize,
    /// Slot this commit occupies under its parent; `None` for the root.
    pub slot: Option<&'static str>,
    pub most_similar: f64,
    pub second_similar: f64,
    pub intent: String,
    pub files_changed: usize,
    pub sentiment: f64,
}

#[derive(Debug, Serialize)]
pub struct TreeReport {
    pub min_similarity: f64,
    pub entries: Vec<TreeEntry>,
    pub statistics: TreeStatistics,
    #[serde(skip)]
    rendered: String,
}

impl TreeReport {
    pub fn from_tree(tree: &CommitSimilarityTree<'_>, min_similarity: f64) -> Self {
        let entries = tree
            .walk(min_similarity)
            .into_iter()
            .filter_map(|entry| {
                let node = tree.node(entry.node)?;
                let (most_similar, second_similar) = node.child_scores();
                let fingerprint = node.fingerprint();
                Some(TreeEntry {
                    commit_id: node.commit_id(),
                    short_ref: node.commit().short_ref(),
                    subject: node.commit().subject().to_string(),
                    level: entry.level,
                    slot: entry.slot.map(|slot| match slot {
                        ChildSlot::MostSimilar => "most_similar",
                        ChildSlot::SecondSimilar => "second_similar",
                    }),
                    most_similar,
                    second_similar,
                    intent: fingerprint.keywords.intent_type.to_string(),
                    files_changed: fingerprint.file_analysis.total_files_changed,
                    sentiment: fingerprint.keywords.sentiment_score,
                })
            })
            .collect();

        Self {
            min_similarity,
            entries,
            statistics: tree.statistics(),
            rendered: tree.render(min_similarity),
        }
    }
}

impl TableDisplay for TreeReport {
    fn to_table(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "{} ({} shown, min similarity {:.2})\n\n",
            "COMMIT SIMILARITY TREE".cyan().bold(),
            self.entries.len(),
            self.min_similarity
        ));

        if self.rendered.is_empty() {
            output.push_str(&"(empty tree)".dimmed().to_string());
        } else {
            output.push_str(&self.rendered);
        }

        output.push('\n');
        output.push_str(&self.statistics.to_string());
        output
    }
}

/// Run the tree command
pub fn run(source: &CommitSource, min_similarity: f64, format: OutputFormat) -> Result<()> {
    let commits = source.load()?;
    let tree = build_similarity_tree(&commits).context("Failed to build similarity tree")?;

    let report = TreeReport::from_tree(&tree, min_similarity);
    Output::new(report, format).render()
}
