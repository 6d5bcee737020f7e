//! Dense pairwise similarity cache.
//!
//! Rows and columns follow the commit list the matrix was built from, which
//! is not necessarily the set of commits that made it into the tree.

use crate::tree::CommitSimilarityTree;
use serde::Serialize;
use simtree_fingerprint::{compare, Commit, CommitId};
use std::collections::HashMap;
use tracing::debug;

/// N×N similarity table over a fixed commit list.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SimilarityMatrix {
    /// Commit id for each row/column.
    commit_index: Vec<CommitId>,
    #[serde(skip)]
    positions: HashMap<CommitId, usize>,
    /// Row-major cells.
    cells: Vec<f64>,
    average_similarity: f64,
}

/// One off-diagonal matrix cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimilarPair {
    pub first: CommitId,
    pub second: CommitId,
    pub similarity: f64,
}

impl SimilarityMatrix {
    /// Build the matrix for `commits` using fingerprints found in `tree`.
    ///
    /// Diagonal cells are 1.0. A cell whose row or column commit has no
    /// node in the tree is 0.0 and does not count towards the average.
    pub fn build(tree: &CommitSimilarityTree<'_>, commits: &[Commit]) -> Self {
        let size = commits.len();
        let commit_index: Vec<CommitId> = commits.iter().map(|c| c.id).collect();

        let mut positions = HashMap::with_capacity(size);
        for (position, id) in commit_index.iter().enumerate() {
            positions.entry(*id).or_insert(position);
        }

        let fingerprints: Vec<_> = commit_index
            .iter()
            .map(|id| tree.fingerprint_of(*id))
            .collect();

        let mut cells = vec![0.0; size * size];
        let mut total = 0.0;
        let mut found = 0usize;

        for i in 0..size {
            cells[i * size + i] = 1.0;
            for j in (i + 1)..size {
                if let (Some(a), Some(b)) = (fingerprints[i], fingerprints[j]) {
                    let similarity = compare(a, b);
                    cells[i * size + j] = similarity;
                    cells[j * size + i] = similarity;
                    total += 2.0 * similarity;
                    found += 2;
                }
            }
        }

        let average_similarity = if found > 0 {
            total / found as f64
        } else {
            0.0
        };
        debug!(
            "Similarity matrix built: {}x{}, {} cells matched",
            size, size, found
        );

        Self {
            commit_index,
            positions,
            cells,
            average_similarity,
        }
    }

    /// Number of rows (and columns).
    pub fn size(&self) -> usize {
        self.commit_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commit_index.is_empty()
    }

    pub fn commit_index(&self) -> &[CommitId] {
        &self.commit_index
    }

    pub fn average_similarity(&self) -> f64 {
        self.average_similarity
    }

    /// Row of the first occurrence of `id`.
    pub fn position(&self, id: CommitId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    pub fn get(&self, row: usize, column: usize) -> Option<f64> {
        let size = self.size();
        if row < size && column < size {
            Some(self.cells[row * size + column])
        } else {
            None
        }
    }

    pub fn row(&self, row: usize) -> Option<&[f64]> {
        let size = self.size();
        (row < size).then(|| &self.cells[row * size..(row + 1) * size])
    }

    /// Cached similarity of two commits, `0.0` if either is not a row.
    pub fn lookup(&self, a: CommitId, b: CommitId) -> f64 {
        match (self.position(a), self.position(b)) {
            (Some(i), Some(j)) => self.get(i, j).unwrap_or(0.0),
            _ => 0.0,
        }
    }

    /// The `n` highest upper-triangle cells, best first. Ties keep row then
    /// column order.
    pub fn top_pairs(&self, n: usize) -> Vec<SimilarPair> {
        let size = self.size();
        let mut pairs = Vec::with_capacity(size * size.saturating_sub(1) / 2);
        for i in 0..size {
            for j in (i + 1)..size {
                pairs.push(SimilarPair {
                    first: self.commit_index[i],
                    second: self.commit_index[j],
                    similarity: self.cells[i * size + j],
                });
            }
        }

        // stable sort keeps (i, j) order among equal scores
        pairs.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        pairs.truncate(n);
        pairs
    }
}

impl<'c> CommitSimilarityTree<'c> {
    /// See [`SimilarityMatrix::top_pairs`].
    pub fn top_similar_pairs(&self, n: usize) -> Vec<SimilarPair> {
        self.matrix().top_pairs(n)
    }
}
