//! Stats command - Summary statistics for the similarity tree

use crate::output::{OutputConfig, OutputFormat, Outputter, TableOutput};
use crate::source::CommitSource;
use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use simtree_core::{build_similarity_tree, CommitSimilarityTree};

#[derive(Debug, Serialize)]
pub struct StatsReport {
    /// Commits handed to the builder.
    pub input_commits: usize,
    /// Commits that made it into the tree.
    pub total_commits: usize,
    /// Commits without a fingerprint.
    pub skipped_commits: usize,
    pub average_similarity: f64,
    pub max_depth: usize,
    pub detached_nodes: usize,
    pub nodes_per_level: Vec<usize>,
}

impl StatsReport {
    pub fn from_tree(tree: &CommitSimilarityTree<'_>) -> Self {
        let statistics = tree.statistics();
        let input_commits = tree.matrix().size();
        Self {
            input_commits,
            total_commits: statistics.total_commits,
            skipped_commits: input_commits.saturating_sub(statistics.total_commits),
            average_similarity: statistics.average_similarity,
            max_depth: statistics.max_depth,
            detached_nodes: statistics.detached_nodes,
            nodes_per_level: statistics.nodes_per_level,
        }
    }
}

impl Outputter for StatsReport {
    fn to_table(&self, config: &OutputConfig) -> String {
        let mut output = format!("{}\n", "SIMILARITY TREE STATISTICS".cyan().bold());

        let pairs = [
            ("Input commits", self.input_commits.to_string()),
            ("Tree commits", self.total_commits.to_string()),
            ("Skipped", self.skipped_commits.to_string()),
            ("Average similarity", format!("{:.4}", self.average_similarity)),
            ("Tree depth", self.max_depth.to_string()),
            ("Detached nodes", self.detached_nodes.to_string()),
        ];
        output.push_str(&TableOutput::format_key_value(&pairs, config));
        output.push_str("\n\n");

        let rows: Vec<Vec<String>> = self
            .nodes_per_level
            .iter()
            .enumerate()
            .map(|(level, count)| vec![level.to_string(), count.to_string()])
            .collect();
        output.push_str(&TableOutput::from_rows(&["Level", "Nodes"], &rows, None, config));
        output
    }
}

/// Run the stats command
pub fn run(source: &CommitSource, format: OutputFormat) -> Result<()> {
    let commits = source.load()?;
    let tree = build_similarity_tree(&commits).context("Failed to build similarity tree")?;

    let config = OutputConfig::auto_detect(format);
    StatsReport::from_tree(&tree).output(&config);
    Ok(())
}
