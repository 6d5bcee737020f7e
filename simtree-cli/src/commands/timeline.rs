//! Timeline command - Commits in time order with their place in the tree
//!
//! The tree is built in input order, so a commit's depth and parent say how
//! it relates to work that came before it in the list, not in time. This
//! view puts both orders side by side.

use super::commit_label;
use crate::output::{OutputConfig, OutputFormat, Outputter, TableOutput};
use crate::source::CommitSource;
use anyhow::{Context, Result};
use chrono::DateTime;
use colored::Colorize;
use serde::Serialize;
use simtree_core::{build_similarity_tree, CommitSimilarityTree};
use simtree_fingerprint::CommitId;
use std::collections::BTreeMap;

const MAX_LABEL_WIDTH: usize = 50;

#[derive(Debug, Serialize)]
pub struct TimelineEntry {
    pub commit_id: CommitId,
    pub timestamp: i64,
    /// `YYYY-MM-DD HH:MM` in UTC, or `unknown`.
    pub date: String,
    pub label: String,
    pub intent: String,
    pub depth: usize,
    pub parent: Option<CommitId>,
    pub attached: bool,
}

#[derive(Debug, Serialize)]
pub struct TimelineReport {
    pub entries: Vec<TimelineEntry>,
}

fn format_date(timestamp: i64) -> String {
    if timestamp <= 0 {
        return "unknown".to_string();
    }
    DateTime::from_timestamp(timestamp, 0)
        .map(|date| date.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

impl TimelineReport {
    /// Oldest first; equal timestamps fall back to commit id.
    pub fn from_tree(tree: &CommitSimilarityTree<'_>) -> Self {
        let mut ordered = BTreeMap::new();
        for (id, node) in tree.nodes() {
            ordered
                .entry((node.commit().timestamp, node.commit_id()))
                .or_insert(id);
        }

        let entries = ordered
            .into_values()
            .filter_map(|id| {
                let node = tree.node(id)?;
                let commit = node.commit();
                Some(TimelineEntry {
                    commit_id: commit.id,
                    timestamp: commit.timestamp,
                    date: format_date(commit.timestamp),
                    label: commit_label(commit),
                    intent: node.fingerprint().keywords.intent_type.to_string(),
                    depth: node.depth(),
                    parent: node
                        .parent()
                        .and_then(|parent| tree.node(parent))
                        .map(|parent| parent.commit_id()),
                    attached: tree.is_attached(id),
                })
            })
            .collect();

        Self { entries }
    }
}

impl Outputter for TimelineReport {
    fn to_table(&self, config: &OutputConfig) -> String {
        let mut output = format!("{}\n", "COMMIT TIMELINE".cyan().bold());

        let rows: Vec<Vec<String>> = self
            .entries
            .iter()
            .map(|entry| {
                let parent = match entry.parent {
                    Some(id) => format!("#{}", id),
                    None if entry.attached => "root".to_string(),
                    None => "detached".to_string(),
                };
                vec![
                    entry.date.clone(),
                    entry.label.clone(),
                    entry.intent.clone(),
                    entry.depth.to_string(),
                    parent,
                ]
            })
            .collect();
        output.push_str(&TableOutput::from_rows(
            &["Date", "Commit", "Intent", "Depth", "Parent"],
            &rows,
            Some(MAX_LABEL_WIDTH),
            config,
        ));
        output
    }
}

/// Run the timeline command
pub fn run(source: &CommitSource, format: OutputFormat) -> Result<()> {
    let commits = source.load()?;
    let tree = build_similarity_tree(&commits).context("Failed to build similarity tree")?;

    let config = OutputConfig::auto_detect(format);
    TimelineReport::from_tree(&tree).output(&config);
    Ok(())
}
