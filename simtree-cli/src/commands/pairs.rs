//! Pairs command - The most similar commit pairs from the matrix cache

use super::commit_label;
use crate::output::{OutputConfig, OutputFormat, Outputter, TableOutput};
use crate::source::CommitSource;
use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use simtree_core::{build_similarity_tree, CommitSimilarityTree};
use simtree_fingerprint::CommitId;

/// Subject column width when truncating.
const MAX_LABEL_WIDTH: usize = 40;

#[derive(Debug, Serialize)]
pub struct PairEntry {
    pub first: CommitId,
    pub first_label: String,
    pub second: CommitId,
    pub second_label: String,
    pub similarity: f64,
}

#[derive(Debug, Serialize)]
pub struct PairsReport {
    pub average_similarity: f64,
    pub pairs: Vec<PairEntry>,
}

impl PairsReport {
    pub fn from_tree(tree: &CommitSimilarityTree<'_>, top: usize) -> Self {
        let label = |id: CommitId| {
            tree.node_for(id)
                .map(|node| commit_label(node.commit()))
                .unwrap_or_else(|| format!("#{}", id))
        };

        let pairs = tree
            .top_similar_pairs(top)
            .into_iter()
            .map(|pair| PairEntry {
                first: pair.first,
                first_label: label(pair.first),
                second: pair.second,
                second_label: label(pair.second),
                similarity: pair.similarity,
            })
            .collect();

        Self {
            average_similarity: tree.average_similarity(),
            pairs,
        }
    }
}

impl Outputter for PairsReport {
    fn to_table(&self, config: &OutputConfig) -> String {
        let mut output = format!(
            "{} (average {:.4})\n",
            "MOST SIMILAR PAIRS".cyan().bold(),
            self.average_similarity
        );

        let rows: Vec<Vec<String>> = self
            .pairs
            .iter()
            .enumerate()
            .map(|(rank, pair)| {
                vec![
                    (rank + 1).to_string(),
                    pair.first_label.clone(),
                    pair.second_label.clone(),
                    format!("{:.3}", pair.similarity),
                ]
            })
            .collect();
        output.push_str(&TableOutput::from_rows(
            &["#", "First", "Second", "Similarity"],
            &rows,
            Some(MAX_LABEL_WIDTH),
            config,
        ));
        output
    }
}

/// Run the pairs command
pub fn run(source: &CommitSource, top: usize, format: OutputFormat) -> Result<()> {
    let commits = source.load()?;
    let tree = build_similarity_tree(&commits).context("Failed to build similarity tree")?;

    let config = OutputConfig::auto_detect(format);
    PairsReport::from_tree(&tree, top).output(&config);
    Ok(())
}
