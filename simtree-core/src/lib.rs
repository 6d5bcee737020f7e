//! Simtree Core - Similarity tree and queries over commit fingerprints.
//!
//! Commits are fingerprinted with [`simtree_fingerprint`] and inserted one by
//! one into a greedy two-child tree where each node keeps the two most
//! similar commits it has seen. A dense similarity matrix is cached next to
//! the tree for constant-time pair lookups.
//!
//! # Features
//!
//! - **Similarity tree**: incremental greedy placement, no rebalancing
//! - **Matrix cache**: pairwise similarities over the input list
//! - **Precedent search**: threshold-filtered scans of every inserted node
//! - **Pattern analysis**: grouping by intent, clusters, top pairs
//! - **Reports**: tree printout and statistics
//!
//! # Usage
//!
//! ```rust
//! use simtree_core::build_similarity_tree;
//! use simtree_fingerprint::{Commit, Modification};
//!
//! let commits = vec![
//!     Commit::new(1, "feat: add parser", 1_700_000_000)
//!         .with_modification(Modification::new("src/parser.c", "", "int parse();\n", 1)),
//!     Commit::new(2, "Fix parser crash", 1_700_003_600)
//!         .with_modification(Modification::new("src/parser.c", "a\n", "b\n", 4)),
//! ];
//!
//! let tree = build_similarity_tree(&commits)?;
//! assert_eq!(tree.total_commits(), 2);
//! let precedents = tree.find_historical_precedents(2, 5);
//! assert!(precedents.len() <= 5);
//! # Ok::<(), simtree_core::TreeError>(())
//! ```

#![warn(clippy::all)]

pub mod error;
pub mod matrix;
pub mod patterns;
pub mod precedent;
pub mod stats;
pub mod tree;

pub use error::{Result, TreeError};
pub use matrix::{SimilarPair, SimilarityMatrix};
pub use patterns::DevelopmentPattern;
pub use precedent::{
    common_characteristics, explain_similarity, HistoricalPrecedent, SimilarCommit,
    PRECEDENT_THRESHOLD,
};
pub use stats::TreeStatistics;
pub use tree::{
    build_similarity_tree, render_tree, ActiveEntry, ChildLink, ChildSlot, CommitSimilarityTree,
    NodeId, SimilarityTreeNode,
};
