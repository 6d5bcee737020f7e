//! Compare command - Similarity between two commits

use super::commit_label;
use crate::output::{OutputConfig, OutputFormat, Outputter, TableOutput};
use crate::source::CommitSource;
use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use simtree_core::{build_similarity_tree, CommitSimilarityTree};
use simtree_fingerprint::{compare, CommitId, SimilarityLabel};

#[derive(Debug, Serialize)]
pub struct CommitSummary {
    pub commit_id: CommitId,
    pub label: String,
    pub intent: String,
    pub primary_module: String,
    pub files_changed: usize,
    pub depth: usize,
}

#[derive(Debug, Serialize)]
pub struct CompareReport {
    pub first: CommitSummary,
    pub second: CommitSummary,
    /// Score recomputed from the two fingerprints.
    pub similarity: f64,
    /// Score from the matrix cache built with the tree.
    pub cached_similarity: f64,
    pub label: SimilarityLabel,
    /// Commit ids linking the two through the active structure, if connected.
    pub tree_path: Option<Vec<CommitId>>,
}

fn summarize(tree: &CommitSimilarityTree<'_>, commit_id: CommitId) -> Result<CommitSummary> {
    let node = tree.require_node(commit_id)?;
    let fingerprint = node.fingerprint();
    Ok(CommitSummary {
        commit_id,
        label: commit_label(node.commit()),
        intent: fingerprint.keywords.intent_type.to_string(),
        primary_module: fingerprint.file_analysis.primary_module.to_string(),
        files_changed: fingerprint.file_analysis.total_files_changed,
        depth: node.depth(),
    })
}

impl CompareReport {
    pub fn from_tree(tree: &CommitSimilarityTree<'_>, a: CommitId, b: CommitId) -> Result<Self> {
        let first = summarize(tree, a)?;
        let second = summarize(tree, b)?;

        let similarity = compare(
            tree.require_node(a)?.fingerprint(),
            tree.require_node(b)?.fingerprint(),
        );

        Ok(Self {
            first,
            second,
            similarity,
            cached_similarity: tree.lookup_cached_similarity(a, b),
            label: SimilarityLabel::from_score(similarity),
            tree_path: tree.similarity_path(a, b),
        })
    }
}

impl Outputter for CompareReport {
    fn to_table(&self, config: &OutputConfig) -> String {
        let mut output = format!(
            "{} {} {} {}\n",
            "COMPARE".cyan().bold(),
            self.first.label.yellow(),
            "vs".dimmed(),
            self.second.label.yellow()
        );

        let path = match &self.tree_path {
            Some(ids) => ids
                .iter()
                .map(|id| format!("#{}", id))
                .collect::<Vec<_>>()
                .join(" -> "),
            None => "not connected".to_string(),
        };

        let pairs = [
            ("Similarity", format!("{:.4}", self.similarity)),
            ("Cached", format!("{:.4}", self.cached_similarity)),
            ("Verdict", self.label.to_string()),
            ("Tree path", path),
            (
                "Intent",
                format!("{} / {}", self.first.intent, self.second.intent),
            ),
            (
                "Module",
                format!(
                    "{} / {}",
                    self.first.primary_module, self.second.primary_module
                ),
            ),
            (
                "Files",
                format!(
                    "{} / {}",
                    self.first.files_changed, self.second.files_changed
                ),
            ),
            (
                "Depth",
                format!("{} / {}", self.first.depth, self.second.depth),
            ),
        ];
        output.push_str(&TableOutput::format_key_value(&pairs, config));
        output
    }
}

/// Run the compare command
pub fn run(source: &CommitSource, a: CommitId, b: CommitId, format: OutputFormat) -> Result<()> {
    let commits = source.load()?;
    let tree = build_similarity_tree(&commits).context("Failed to build similarity tree")?;

    let config = OutputConfig::auto_detect(format);
    CompareReport::from_tree(&tree, a, b)?.output(&config);
    Ok(())
}
