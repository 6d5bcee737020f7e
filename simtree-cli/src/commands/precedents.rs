//! Precedents command - Find historical commits similar to a given one
//!
//! Scans every commit in the tree, including ones displaced from the active
//! structure, and reports those above the precedent threshold together with
//! what they share with the target. `--ranked` drops the threshold and lists
//! the closest commits best first.

use super::{colored_score, commit_label};
use crate::output::{Output, OutputFormat, TableDisplay};
use crate::source::CommitSource;
use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use simtree_core::{
    build_similarity_tree, common_characteristics, explain_similarity, CommitSimilarityTree,
    HistoricalPrecedent,
};
use simtree_fingerprint::CommitId;

#[derive(Debug, Serialize)]
pub struct PrecedentEntry {
    pub commit_id: CommitId,
    pub label: String,
    pub similarity_score: f64,
    pub similarity_explanation: String,
    pub common_characteristics: Vec<String>,
}

impl From<HistoricalPrecedent<'_>> for PrecedentEntry {
    fn from(precedent: HistoricalPrecedent<'_>) -> Self {
        Self {
            commit_id: precedent.commit.id,
            label: commit_label(precedent.commit),
            similarity_score: precedent.similarity_score,
            similarity_explanation: precedent.similarity_explanation.to_string(),
            common_characteristics: precedent.common_characteristics,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PrecedentsReport {
    pub target_id: CommitId,
    pub target: String,
    pub ranked: bool,
    pub precedents: Vec<PrecedentEntry>,
}

impl PrecedentsReport {
    /// Fails if `target_id` has no node in the tree.
    pub fn from_tree(
        tree: &CommitSimilarityTree<'_>,
        target_id: CommitId,
        max_results: usize,
        ranked: bool,
    ) -> Result<Self> {
        let target = tree.require_node(target_id)?;
        let precedents = if ranked {
            tree.find_most_similar_commits(target_id, max_results)
                .into_iter()
                .filter_map(|similar| {
                    let fingerprint = tree.fingerprint_of(similar.commit.id)?;
                    Some(PrecedentEntry {
                        commit_id: similar.commit.id,
                        label: commit_label(similar.commit),
                        similarity_score: similar.similarity,
                        similarity_explanation: explain_similarity(similar.similarity)
                            .to_string(),
                        common_characteristics: common_characteristics(
                            target.fingerprint(),
                            fingerprint,
                        ),
                    })
                })
                .collect()
        } else {
            tree.find_historical_precedents(target_id, max_results)
                .into_iter()
                .map(PrecedentEntry::from)
                .collect()
        };

        Ok(Self {
            target_id,
            target: commit_label(target.commit()),
            ranked,
            precedents,
        })
    }
}

impl TableDisplay for PrecedentsReport {
    fn to_table(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "{} for {}\n\n",
            if self.ranked {
                "MOST SIMILAR COMMITS"
            } else {
                "HISTORICAL PRECEDENTS"
            }
            .cyan()
            .bold(),
            self.target.yellow()
        ));

        if self.precedents.is_empty() {
            output.push_str(&"No similar historical commits found.".dimmed().to_string());
            return output;
        }

        for (rank, precedent) in self.precedents.iter().enumerate() {
            output.push_str(&format!(
                "{}. Similarity: {} - {}\n",
                rank + 1,
                colored_score(precedent.similarity_score),
                precedent.similarity_explanation
            ));
            output.push_str(&format!("   Commit: {}\n", precedent.label));
            for characteristic in &precedent.common_characteristics {
                output.push_str(&format!("   {} {}\n", "-".dimmed(), characteristic));
            }
        }
        output
    }
}

/// Run the precedents command
pub fn run(
    source: &CommitSource,
    target_id: CommitId,
    max_results: usize,
    ranked: bool,
    format: OutputFormat,
) -> Result<()> {
    let commits = source.load()?;
    let tree = build_similarity_tree(&commits).context("Failed to build similarity tree")?;

    let report = PrecedentsReport::from_tree(&tree, target_id, max_results, ranked)?;
    Output::new(report, format).render()
}
