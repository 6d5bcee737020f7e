//! Fingerprint command - Show one commit's semantic fingerprint

use super::commit_label;
use crate::output::{Output, OutputFormat, TableDisplay};
use crate::source::CommitSource;
use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use simtree_core::{build_similarity_tree, CommitSimilarityTree};
use simtree_fingerprint::{CommitId, SemanticFingerprint};

#[derive(Debug, Serialize)]
pub struct FingerprintReport {
    pub label: String,
    pub fingerprint: SemanticFingerprint,
}

impl FingerprintReport {
    pub fn from_tree(tree: &CommitSimilarityTree<'_>, commit_id: CommitId) -> Result<Self> {
        let node = tree.require_node(commit_id)?;
        Ok(Self {
            label: commit_label(node.commit()),
            fingerprint: node.fingerprint().clone(),
        })
    }
}

impl TableDisplay for FingerprintReport {
    fn to_table(&self) -> String {
        let mut output = format!("{}\n\n", self.label.yellow().bold());
        output.push_str(&self.fingerprint.to_string());
        output.push_str(&format!("\n\n{}\n", "Vector:".cyan().bold()));

        for (row, chunk) in self.fingerprint.vector.chunks(8).enumerate() {
            let cells: Vec<String> = chunk.iter().map(|value| format!("{:>7.3}", value)).collect();
            output.push_str(&format!("  [{:>2}] {}\n", row * 8, cells.join(" ")));
        }
        output
    }
}

/// Run the fingerprint command
pub fn run(source: &CommitSource, commit_id: CommitId, format: OutputFormat) -> Result<()> {
    let commits = source.load()?;
    let tree = build_similarity_tree(&commits).context("Failed to build similarity tree")?;

    let report = FingerprintReport::from_tree(&tree, commit_id)?;
    Output::new(report, format).render()
}
