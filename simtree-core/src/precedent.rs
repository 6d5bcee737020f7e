//! Registry scans for commits that resemble a target commit.

use crate::tree::CommitSimilarityTree;
use serde::Serialize;
use simtree_fingerprint::{compare, Commit, CommitId, SemanticFingerprint};
use std::collections::HashSet;

/// Similarity a candidate must exceed to count as a precedent.
pub const PRECEDENT_THRESHOLD: f64 = 0.3;

/// Shared keywords listed in a precedent's characteristics.
const MAX_SHARED_KEYWORDS: usize = 5;

/// A past commit that resembles the target.
#[derive(Debug, Clone, Serialize)]
pub struct HistoricalPrecedent<'c> {
    pub commit: &'c Commit,
    pub similarity_score: f64,
    pub similarity_explanation: &'static str,
    pub common_characteristics: Vec<String>,
}

/// A registry node paired with its similarity to some reference commit.
#[derive(Debug, Clone, Serialize)]
pub struct SimilarCommit<'c> {
    pub commit: &'c Commit,
    pub similarity: f64,
}

/// Canned explanation for a precedent score.
pub fn explain_similarity(score: f64) -> &'static str {
    if score > 0.7 {
        "Very similar commit pattern"
    } else if score > 0.5 {
        "Similar development approach"
    } else {
        "Somewhat related change"
    }
}

/// Traits two fingerprints share, in a fixed order: intent, module, ticket,
/// then keywords.
pub fn common_characteristics(a: &SemanticFingerprint, b: &SemanticFingerprint) -> Vec<String> {
    let mut traits = Vec::new();

    if a.keywords.intent_type == b.keywords.intent_type {
        traits.push(format!("Same intent: {}", a.keywords.intent_type));
    }
    if a.file_analysis.primary_module == b.file_analysis.primary_module {
        traits.push(format!("Same module: {}", a.file_analysis.primary_module));
    }
    if let (Some(ticket_a), Some(ticket_b)) =
        (&a.keywords.ticket_reference, &b.keywords.ticket_reference)
    {
        if ticket_a == ticket_b {
            traits.push(format!("Same ticket: {}", ticket_a));
        }
    }

    let theirs: HashSet<String> = b.keywords.keywords.iter().map(|k| k.to_lowercase()).collect();
    let mut seen = HashSet::new();
    let shared: Vec<String> = a
        .keywords
        .keywords
        .iter()
        .map(|k| k.to_lowercase())
        .filter(|k| theirs.contains(k) && seen.insert(k.clone()))
        .take(MAX_SHARED_KEYWORDS)
        .collect();
    if !shared.is_empty() {
        traits.push(format!("Shared keywords: {}", shared.join(", ")));
    }

    traits
}

impl<'c> CommitSimilarityTree<'c> {
    /// Up to `max_results` other commits whose similarity to `commit_id`
    /// exceeds [`PRECEDENT_THRESHOLD`], in registry order.
    ///
    /// Scans every node ever inserted, including ones displaced from the
    /// active structure. An unknown commit yields no results.
    pub fn find_historical_precedents(
        &self,
        commit_id: CommitId,
        max_results: usize,
    ) -> Vec<HistoricalPrecedent<'c>> {
        let Some(target_id) = self.find_node(commit_id) else {
            return Vec::new();
        };
        let Some(target) = self.node(target_id) else {
            return Vec::new();
        };

        self.nodes()
            .filter(|(id, _)| *id != target_id)
            .filter_map(|(_, candidate)| {
                let score = compare(target.fingerprint(), candidate.fingerprint());
                (score > PRECEDENT_THRESHOLD).then(|| HistoricalPrecedent {
                    commit: candidate.commit(),
                    similarity_score: score,
                    similarity_explanation: explain_similarity(score),
                    common_characteristics: common_characteristics(
                        target.fingerprint(),
                        candidate.fingerprint(),
                    ),
                })
            })
            .take(max_results)
            .collect()
    }

    /// The `max_results` commits most similar to `commit_id`, best first.
    pub fn find_most_similar_commits(
        &self,
        commit_id: CommitId,
        max_results: usize,
    ) -> Vec<SimilarCommit<'c>> {
        let mut ranked = self.scored_against(commit_id);
        ranked.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        ranked.truncate(max_results);
        ranked
    }

    /// Every other commit at least `min_similarity` away from the center, in
    /// registry order.
    pub fn similarity_cluster(
        &self,
        commit_id: CommitId,
        min_similarity: f64,
    ) -> Vec<SimilarCommit<'c>> {
        self.scored_against(commit_id)
            .into_iter()
            .filter(|entry| entry.similarity >= min_similarity)
            .collect()
    }

    fn scored_against(&self, commit_id: CommitId) -> Vec<SimilarCommit<'c>> {
        let Some(center_id) = self.find_node(commit_id) else {
            return Vec::new();
        };
        let Some(center) = self.node(center_id) else {
            return Vec::new();
        };

        self.nodes()
            .filter(|(id, _)| *id != center_id)
            .map(|(_, node)| SimilarCommit {
                commit: node.commit(),
                similarity: compare(center.fingerprint(), node.fingerprint()),
            })
            .collect()
    }
}
