//! Descriptive statistics over the node registry.

use crate::tree::CommitSimilarityTree;
use serde::Serialize;
use std::fmt;

/// Summary of a built tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeStatistics {
    pub total_commits: usize,
    pub average_similarity: f64,
    /// Largest insertion depth in the registry.
    pub max_depth: usize,
    /// Node count for each depth `0..=max_depth`.
    pub nodes_per_level: Vec<usize>,
    /// Nodes no longer reachable from the root.
    pub detached_nodes: usize,
}

impl<'c> CommitSimilarityTree<'c> {
    /// Collect statistics over every registered node, displaced or not.
    pub fn statistics(&self) -> TreeStatistics {
        let max_depth = self
            .nodes()
            .map(|(_, node)| node.depth())
            .max()
            .unwrap_or(0);

        let mut nodes_per_level = vec![0; max_depth + 1];
        let mut detached_nodes = 0;
        for (id, node) in self.nodes() {
            nodes_per_level[node.depth()] += 1;
            if !self.is_attached(id) {
                detached_nodes += 1;
            }
        }
        if self.is_empty() {
            nodes_per_level.clear();
        }

        TreeStatistics {
            total_commits: self.total_commits(),
            average_similarity: self.average_similarity(),
            max_depth,
            nodes_per_level,
            detached_nodes,
        }
    }
}

impl fmt::Display for TreeStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "========== COMMIT SIMILARITY TREE STATISTICS ==========")?;
        writeln!(f, "Total Commits: {}", self.total_commits)?;
        writeln!(f, "Average Similarity: {:.4}", self.average_similarity)?;
        writeln!(f, "Tree Depth: {}", self.max_depth)?;
        writeln!(f, "Detached Nodes: {}", self.detached_nodes)?;
        writeln!(f)?;
        writeln!(f, "Nodes per level:")?;
        for (level, count) in self.nodes_per_level.iter().enumerate() {
            writeln!(f, "  Level {}: {} nodes", level, count)?;
        }
        write!(f, "=======================================================")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::build_similarity_tree;
    use simtree_fingerprint::{Commit, Modification};

    fn commits(n: i64) -> Vec<Commit> {
        (1..=n)
            .map(|id| {
                let (message, path) = match id % 3 {
                    0 => ("Fix lexer bug", "src/lexer.c"),
                    1 => ("feat: add parser", "src/parser.c"),
                    _ => ("docs: usage", "README.md"),
                };
                Commit::new(id, message, 1_700_000_000 + id * 3_600)
                    .with_modification(Modification::new(path, "a\n", "b\nc\n", 1))
            })
            .collect()
    }

    #[test]
    fn test_levels_cover_every_node() {
        let commits = commits(9);
        let tree = build_similarity_tree(&commits).unwrap();
        let stats = tree.statistics();

        assert_eq!(stats.total_commits, 9);
        assert_eq!(stats.nodes_per_level.len(), stats.max_depth + 1);
        assert_eq!(stats.nodes_per_level.iter().sum::<usize>(), 9);
        assert_eq!(stats.nodes_per_level[0], 1);
        assert_eq!(stats.average_similarity, tree.average_similarity());
    }

    #[test]
    fn test_single_node_statistics() {
        let commits = commits(1);
        let tree = build_similarity_tree(&commits).unwrap();
        let stats = tree.statistics();
        assert_eq!(stats.max_depth, 0);
        assert_eq!(stats.nodes_per_level, vec![1]);
        assert_eq!(stats.detached_nodes, 0);
        assert_eq!(stats.average_similarity, 0.0);
    }

    #[test]
    fn test_empty_tree_statistics() {
        let stats = CommitSimilarityTree::new().statistics();
        assert_eq!(stats.total_commits, 0);
        assert!(stats.nodes_per_level.is_empty());
    }

    #[test]
    fn test_report_text() {
        let commits = commits(3);
        let tree = build_similarity_tree(&commits).unwrap();
        let report = tree.statistics().to_string();
        assert!(report.contains("Total Commits: 3"));
        assert!(report.contains("Level 0: 1 nodes"));
        assert!(report.contains("Nodes per level:"));
    }
}
