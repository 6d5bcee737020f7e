//! Grouping the registry by what commits set out to do.

use crate::tree::{CommitSimilarityTree, SimilarityTreeNode};
use serde::Serialize;
use simtree_fingerprint::{compare, Commit, CommitId, IntentType, PrimaryModule};
use std::collections::BTreeMap;

/// Representative commits kept per pattern.
const MAX_REPRESENTATIVES: usize = 3;

/// Commits sharing one intent type.
#[derive(Debug, Clone, Serialize)]
pub struct DevelopmentPattern {
    pub pattern_name: String,
    pub intent: IntentType,
    pub commit_count: usize,
    /// Mean pairwise similarity inside the group; 0 for a single commit.
    pub avg_similarity: f64,
    pub representative_commits: Vec<CommitId>,
}

impl<'c> CommitSimilarityTree<'c> {
    /// Registry commits matching the given intent and/or primary module.
    /// A `None` filter matches everything.
    pub fn find_commits_by_pattern(
        &self,
        intent: Option<IntentType>,
        module: Option<PrimaryModule>,
    ) -> Vec<&'c Commit> {
        self.nodes()
            .filter(|(_, node)| {
                let fingerprint = node.fingerprint();
                intent.map_or(true, |i| fingerprint.keywords.intent_type == i)
                    && module.map_or(true, |m| fingerprint.file_analysis.primary_module == m)
            })
            .map(|(_, node)| node.commit())
            .collect()
    }

    /// One pattern per intent present in the registry, largest group first.
    pub fn analyze_development_patterns(&self) -> Vec<DevelopmentPattern> {
        let mut groups: BTreeMap<IntentType, Vec<&SimilarityTreeNode<'c>>> = BTreeMap::new();
        for (_, node) in self.nodes() {
            groups
                .entry(node.fingerprint().keywords.intent_type)
                .or_default()
                .push(node);
        }

        let mut patterns: Vec<DevelopmentPattern> = groups
            .into_iter()
            .map(|(intent, members)| DevelopmentPattern {
                pattern_name: format!("{} commits", intent),
                intent,
                commit_count: members.len(),
                avg_similarity: mean_pairwise_similarity(&members),
                representative_commits: members
                    .iter()
                    .take(MAX_REPRESENTATIVES)
                    .map(|node| node.commit_id())
                    .collect(),
            })
            .collect();

        // BTreeMap order is intent order, so the stable sort breaks ties by it
        patterns.sort_by(|a, b| b.commit_count.cmp(&a.commit_count));
        patterns
    }
}

fn mean_pairwise_similarity(members: &[&SimilarityTreeNode<'_>]) -> f64 {
    let mut total = 0.0;
    let mut pairs = 0usize;
    for (i, a) in members.iter().enumerate() {
        for b in &members[i + 1..] {
            total += compare(a.fingerprint(), b.fingerprint());
            pairs += 1;
        }
    }
    if pairs == 0 {
        0.0
    } else {
        total / pairs as f64
    }
}
