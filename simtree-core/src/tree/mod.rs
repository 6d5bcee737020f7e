//! Greedy similarity tree over commit fingerprints.
//!
//! Each node keeps two ranked child slots holding the two most similar
//! commits it has seen so far. New commits descend from the root towards
//! the region they resemble most and are installed at the first node where
//! they beat one of the cached child scores.
//!
//! Placement is approximate: a node pushed out of a full slot is detached
//! from the active structure but stays in the arena, so statistics, the
//! matrix and precedent search still see it.
//!
//! ```text
//!            root
//!           /    \
//!   most_similar  second_similar
//!      /   \          /   \
//!    ...   ...      ...   ...
//! ```

mod node;
mod render;

pub use node::{ChildLink, ChildSlot, NodeId, SimilarityTreeNode};
pub use render::render_tree;

use crate::error::{Result, TreeError};
use crate::matrix::SimilarityMatrix;
use simtree_fingerprint::{compare, Commit, CommitId, SemanticFingerprint};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Similarity tree plus the node arena and matrix cache built alongside it.
///
/// Nodes borrow their commits from the caller's list; the arena owns every
/// node and fingerprint ever created and is dropped with the tree.
#[derive(Debug, Clone, Default)]
pub struct CommitSimilarityTree<'c> {
    nodes: Vec<SimilarityTreeNode<'c>>,
    root: Option<NodeId>,
    /// First node registered for each commit id.
    by_commit: HashMap<CommitId, NodeId>,
    total_commits: usize,
    matrix: SimilarityMatrix,
}

/// One step of a root-down walk over the active structure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveEntry {
    pub node: NodeId,
    /// Distance from the root along the walk.
    pub level: usize,
    /// Slot of the parent this node was reached through; `None` for the root.
    pub slot: Option<ChildSlot>,
}

/// Build a tree from `commits` in order, then the matrix cache over the
/// same list.
///
/// Commits that cannot be fingerprinted are skipped with a warning, so the
/// tree may hold fewer nodes than the matrix has rows.
///
/// # Errors
///
/// Returns [`TreeError::EmptyInput`] if `commits` is empty.
pub fn build_similarity_tree(commits: &[Commit]) -> Result<CommitSimilarityTree<'_>> {
    CommitSimilarityTree::build(commits)
}

impl<'c> CommitSimilarityTree<'c> {
    pub fn new() -> Self {
        Self::default()
    }

    /// See [`build_similarity_tree`].
    pub fn build(commits: &'c [Commit]) -> Result<Self> {
        if commits.is_empty() {
            return Err(TreeError::EmptyInput);
        }

        info!("Building similarity tree from {} commits", commits.len());
        let mut tree = Self::new();
        for (position, commit) in commits.iter().enumerate() {
            debug!(
                "Processing commit {}/{} (id {})",
                position + 1,
                commits.len(),
                commit.id
            );
            tree.insert_commit(commit);
        }

        tree.build_matrix(commits);
        info!(
            "Similarity tree built with {} commits (average similarity {:.4})",
            tree.total_commits,
            tree.average_similarity()
        );
        Ok(tree)
    }

    /// Fingerprint and insert one commit. Returns `None` if the commit has
    /// no fingerprint (empty message or no modifications).
    ///
    /// The matrix cache is not touched; call [`Self::build_matrix`] again if
    /// the new commit should be visible to cached lookups.
    pub fn insert_commit(&mut self, commit: &'c Commit) -> Option<NodeId> {
        match SemanticFingerprint::build(commit) {
            Ok(fingerprint) => Some(self.insert_with_fingerprint(commit, fingerprint)),
            Err(e) => {
                warn!("Skipping commit {}: {}", commit.id, e);
                None
            }
        }
    }

    /// Insert a commit with a fingerprint built by the caller.
    pub fn insert_with_fingerprint(
        &mut self,
        commit: &'c Commit,
        fingerprint: SemanticFingerprint,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        let mut node = SimilarityTreeNode::new(commit, fingerprint);

        if let Some(parent) = self.find_insertion_point(&node.fingerprint) {
            let similarity = compare(&self.nodes[parent.0].fingerprint, &node.fingerprint);
            let slot = self.place_child(parent, id, similarity);
            debug!(
                "Commit {} placed under commit {} as {:?} ({:.4})",
                commit.id,
                self.nodes[parent.0].commit.id,
                slot,
                similarity
            );
            node.parent = Some(parent);
            node.depth = self.nodes[parent.0].depth + 1;
        } else {
            self.root = Some(id);
        }

        self.nodes.push(node);
        if self.by_commit.contains_key(&commit.id) {
            warn!(
                "Duplicate commit id {}; lookups resolve to the first node",
                commit.id
            );
        } else {
            self.by_commit.insert(commit.id, id);
        }
        self.total_commits += 1;
        id
    }

    /// Node the new fingerprint should hang under, or `None` for an empty
    /// tree.
    ///
    /// Stops at the first node where the new fingerprint beats either cached
    /// child score or finds an empty slot. Otherwise descends into the child
    /// that is itself closer to the new fingerprint, `most_similar` on ties.
    pub fn find_insertion_point(&self, fingerprint: &SemanticFingerprint) -> Option<NodeId> {
        let mut current = self.root?;
        loop {
            let node = &self.nodes[current.0];
            let similarity = compare(&node.fingerprint, fingerprint);

            let (most, second) = match (node.most_similar, node.second_similar) {
                (Some(most), Some(second)) => (most, second),
                _ => return Some(current),
            };
            if similarity > most.similarity || similarity > second.similarity {
                return Some(current);
            }

            let to_most = compare(&self.nodes[most.node.0].fingerprint, fingerprint);
            let to_second = compare(&self.nodes[second.node.0].fingerprint, fingerprint);
            current = if to_most >= to_second {
                most.node
            } else {
                second.node
            };
        }
    }

    /// Install `child` under `parent`, demoting or displacing existing
    /// children. Returns the slot the child landed in.
    fn place_child(&mut self, parent: NodeId, child: NodeId, similarity: f64) -> ChildSlot {
        let link = ChildLink {
            node: child,
            similarity,
        };
        let parent_node = &mut self.nodes[parent.0];

        let beats_most = parent_node
            .most_similar
            .map_or(true, |most| similarity > most.similarity);

        let displaced = if beats_most {
            let displaced = match parent_node.most_similar.take() {
                Some(most) => parent_node.second_similar.replace(most),
                None => None,
            };
            parent_node.most_similar = Some(link);
            displaced
        } else {
            // Either a better second or worse than both; the slot is
            // overwritten in both cases.
            parent_node.second_similar.replace(link)
        };

        if let Some(orphan) = displaced {
            debug!(
                "Commit {} displaced from the active structure",
                self.nodes[orphan.node.0].commit.id
            );
            self.nodes[orphan.node.0].parent = None;
        }

        if beats_most {
            ChildSlot::MostSimilar
        } else {
            ChildSlot::SecondSimilar
        }
    }

    /// Rebuild the matrix cache over `commits`.
    pub fn build_matrix(&mut self, commits: &[Commit]) {
        self.matrix = SimilarityMatrix::build(self, commits);
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn root_node(&self) -> Option<&SimilarityTreeNode<'c>> {
        self.root.map(|id| &self.nodes[id.0])
    }

    pub fn node(&self, id: NodeId) -> Option<&SimilarityTreeNode<'c>> {
        self.nodes.get(id.0)
    }

    /// Every node ever inserted, in insertion order, including displaced
    /// ones.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &SimilarityTreeNode<'c>)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId(index), node))
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn total_commits(&self) -> usize {
        self.total_commits
    }

    /// Mean off-diagonal similarity from the last matrix build.
    pub fn average_similarity(&self) -> f64 {
        self.matrix.average_similarity()
    }

    pub fn matrix(&self) -> &SimilarityMatrix {
        &self.matrix
    }

    pub fn find_node(&self, commit_id: CommitId) -> Option<NodeId> {
        self.by_commit.get(&commit_id).copied()
    }

    pub fn node_for(&self, commit_id: CommitId) -> Option<&SimilarityTreeNode<'c>> {
        self.find_node(commit_id).map(|id| &self.nodes[id.0])
    }

    /// Strict variant of [`Self::node_for`].
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::CommitNotFound`] if no node holds `commit_id`.
    pub fn require_node(&self, commit_id: CommitId) -> Result<&SimilarityTreeNode<'c>> {
        self.node_for(commit_id)
            .ok_or(TreeError::CommitNotFound { id: commit_id })
    }

    pub fn fingerprint_of(&self, commit_id: CommitId) -> Option<&SemanticFingerprint> {
        self.node_for(commit_id).map(|node| &node.fingerprint)
    }

    /// Similarity from the matrix cache. `0.0` if either commit is not a
    /// matrix row.
    pub fn lookup_cached_similarity(&self, a: CommitId, b: CommitId) -> f64 {
        self.matrix.lookup(a, b)
    }

    /// Whether `id` can be reached from the root through child slots.
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.ancestors(id).last() == self.root.as_ref()
    }

    /// `id` followed by its parents up to the top of its subtree.
    fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = vec![id];
        let mut current = id;
        while let Some(parent) = self.nodes[current.0].parent {
            chain.push(parent);
            current = parent;
        }
        chain
    }

    /// Commit ids on the path between two commits through their lowest
    /// common ancestor, both ends included.
    ///
    /// Returns `None` if either commit has no node or the two nodes do not
    /// share an ancestor.
    pub fn similarity_path(&self, from: CommitId, to: CommitId) -> Option<Vec<CommitId>> {
        let from_chain = self.ancestors(self.find_node(from)?);
        let to_chain = self.ancestors(self.find_node(to)?);

        let (up_len, common) = from_chain
            .iter()
            .enumerate()
            .find(|(_, node)| to_chain.contains(node))?;
        let down_len = to_chain.iter().position(|node| node == common)?;

        let mut path: Vec<CommitId> = from_chain[..=up_len]
            .iter()
            .map(|id| self.nodes[id.0].commit.id)
            .collect();
        path.extend(
            to_chain[..down_len]
                .iter()
                .rev()
                .map(|id| self.nodes[id.0].commit.id),
        );
        Some(path)
    }

    /// Pre-order walk of the active structure from the root, `most_similar`
    /// before `second_similar`. Children whose cached score is below
    /// `min_similarity` are skipped together with their subtrees.
    pub fn walk(&self, min_similarity: f64) -> Vec<ActiveEntry> {
        let mut visited = Vec::new();
        let Some(root) = self.root else {
            return visited;
        };

        let mut stack = vec![ActiveEntry {
            node: root,
            level: 0,
            slot: None,
        }];
        while let Some(entry) = stack.pop() {
            visited.push(entry);
            let node = &self.nodes[entry.node.0];
            for slot in [ChildSlot::SecondSimilar, ChildSlot::MostSimilar] {
                if let Some(link) = node.child(slot) {
                    if link.similarity >= min_similarity {
                        stack.push(ActiveEntry {
                            node: link.node,
                            level: entry.level + 1,
                            slot: Some(slot),
                        });
                    }
                }
            }
        }
        visited
    }

    /// Call `visitor` for every node of the active structure in pre-order.
    pub fn traverse<F>(&self, mut visitor: F)
    where
        F: FnMut(&SimilarityTreeNode<'c>),
    {
        self.traverse_by_threshold(f64::NEG_INFINITY, &mut visitor);
    }

    /// Like [`Self::traverse`], pruning children below `threshold`.
    pub fn traverse_by_threshold<F>(&self, threshold: f64, mut visitor: F)
    where
        F: FnMut(&SimilarityTreeNode<'c>),
    {
        for entry in self.walk(threshold) {
            visitor(&self.nodes[entry.node.0]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simtree_fingerprint::Modification;

    fn commit(id: CommitId, message: &str, path: &str, new_code: &str) -> Commit {
        Commit::new(id, message, 1_700_000_000 + id * 600)
            .with_modification(Modification::new(path, "", new_code, 1))
    }

    fn mixed_history() -> Vec<Commit> {
        vec![
            commit(1, "feat: add parser", "src/parser.c", "int parse();\n"),
            commit(2, "Fix crash in parser", "src/parser.c", "if (!p) return;\n"),
            commit(3, "docs: describe parser", "README.md", "Parser docs\n"),
            commit(4, "feat: add lexer", "src/lexer.c", "int lex();\n"),
            commit(5, "Add tests for lexer", "tests/lexer_test.txt", "case\n"),
            commit(6, "refactor parser state", "src/parser.c", "struct state {\n};\n"),
            commit(7, "Fix bug in lexer (#12)", "src/lexer.c", "x = 0;\n"),
            commit(8, "chore: bump version", "Makefile", "VERSION=2\n"),
        ]
    }

    #[test]
    fn test_empty_input_is_an_error() {
        assert!(matches!(
            build_similarity_tree(&[]),
            Err(TreeError::EmptyInput)
        ));
    }

    #[test]
    fn test_single_commit_becomes_root() {
        let commits = vec![commit(1, "feat: add parser", "src/parser.c", "int p;\n")];
        let tree = build_similarity_tree(&commits).unwrap();

        let root = tree.root_node().unwrap();
        assert_eq!(root.commit_id(), 1);
        assert_eq!(root.depth(), 0);
        assert!(root.most_similar().is_none());
        assert!(root.second_similar().is_none());
        assert!(root.parent().is_none());
        assert_eq!(tree.total_commits(), 1);
    }

    #[test]
    fn test_registry_holds_every_commit() {
        let commits = mixed_history();
        let tree = build_similarity_tree(&commits).unwrap();
        assert_eq!(tree.total_commits(), commits.len());
        assert_eq!(tree.len(), commits.len());
        for c in &commits {
            assert!(tree.find_node(c.id).is_some());
        }
    }

    #[test]
    fn test_child_links_match_parent_and_scores() {
        let commits = mixed_history();
        let tree = build_similarity_tree(&commits).unwrap();
        for (_, node) in tree.nodes() {
            for link in node.children() {
                let child = tree.node(link.node).unwrap();
                assert_eq!(child.parent(), tree.find_node(node.commit_id()));
                assert_eq!(child.depth(), node.depth() + 1);
                let expected = compare(node.fingerprint(), child.fingerprint());
                assert_eq!(link.similarity, expected);
            }
        }
    }

    /// Fingerprint of `commit` with its vector replaced by `weights`, so the
    /// scores between test nodes are known exactly.
    fn shaped(commit: &Commit, weights: &[(usize, f64)]) -> SemanticFingerprint {
        let mut fingerprint = SemanticFingerprint::build(commit).unwrap();
        fingerprint.vector = [0.0; 32];
        for &(dim, value) in weights {
            fingerprint.vector[dim] = value;
        }
        fingerprint
    }

    /// Root along dimension 0; every other vector scores its dimension-0
    /// weight against the root.
    fn scored_against_root(commit: &Commit, score: f64, dim: usize) -> SemanticFingerprint {
        shaped(commit, &[(0, score), (dim, (1.0 - score * score).sqrt())])
    }

    #[test]
    fn test_better_match_demotes_most_similar() {
        let commits = mixed_history();
        let mut tree = CommitSimilarityTree::new();
        let root = tree.insert_with_fingerprint(&commits[0], shaped(&commits[0], &[(0, 1.0)]));
        let weaker =
            tree.insert_with_fingerprint(&commits[1], scored_against_root(&commits[1], 0.6, 1));
        let stronger =
            tree.insert_with_fingerprint(&commits[2], scored_against_root(&commits[2], 0.8, 2));

        let root_node = tree.node(root).unwrap();
        assert_eq!(root_node.most_similar().unwrap().node, stronger);
        assert_eq!(root_node.second_similar().unwrap().node, weaker);
        let (most, second) = root_node.child_scores();
        assert!((most - 0.8).abs() < 1e-9);
        assert!((second - 0.6).abs() < 1e-9);
        assert_eq!(tree.node(weaker).unwrap().parent(), Some(root));
        assert_eq!(tree.statistics().detached_nodes, 0);
    }

    #[test]
    fn test_full_parent_displaces_second_similar() {
        let commits = mixed_history();
        let mut tree = CommitSimilarityTree::new();
        let root = tree.insert_with_fingerprint(&commits[0], shaped(&commits[0], &[(0, 1.0)]));
        let first =
            tree.insert_with_fingerprint(&commits[1], scored_against_root(&commits[1], 0.6, 1));
        let displaced =
            tree.insert_with_fingerprint(&commits[2], scored_against_root(&commits[2], 0.5, 2));
        assert_eq!(tree.node(displaced).unwrap().parent(), Some(root));

        // Beats the cached 0.6, so it takes the most-similar slot, the old
        // most-similar moves down and the old second-similar falls out.
        let best =
            tree.insert_with_fingerprint(&commits[3], scored_against_root(&commits[3], 0.9, 3));
        tree.build_matrix(&commits[..4]);

        let root_node = tree.node(root).unwrap();
        assert_eq!(root_node.most_similar().unwrap().node, best);
        assert_eq!(root_node.second_similar().unwrap().node, first);

        let orphan = tree.node(displaced).unwrap();
        assert!(orphan.parent().is_none());
        assert_eq!(orphan.depth(), 1);
        assert!(!tree.is_attached(displaced));
        assert!(tree.walk(f64::NEG_INFINITY).iter().all(|e| e.node != displaced));
        assert!(tree.similarity_path(2, 3).is_none());

        // Still registered and visible to every registry-wide query
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.find_node(3), Some(displaced));
        assert!(tree
            .find_historical_precedents(1, 10)
            .iter()
            .any(|p| p.commit.id == 3));
        let row = tree.matrix().position(3).unwrap();
        let root_column = tree.matrix().position(1).unwrap();
        assert!((tree.matrix().get(row, root_column).unwrap() - 0.5).abs() < 1e-9);

        let stats = tree.statistics();
        assert_eq!(stats.detached_nodes, 1);
        assert_eq!(stats.nodes_per_level, vec![1, 3]);
    }

    #[test]
    fn test_varied_history_detaches_nodes() {
        let messages = [
            "feat: add parser",
            "Fix crash in parser",
            "docs: describe parser",
            "refactor parser state",
            "Add tests for lexer",
            "chore: bump version",
        ];
        let paths = ["src/parser.c", "README.md", "tests/lexer_test.txt", "Makefile"];
        let commits: Vec<Commit> = (0..40)
            .map(|i| {
                let code = "line\n".repeat(1 + (i as usize * 7) % 30);
                commit(i + 1, messages[i as usize % 6], paths[i as usize % 4], &code)
            })
            .collect();
        let tree = build_similarity_tree(&commits).unwrap();

        let detached: Vec<NodeId> = tree
            .nodes()
            .map(|(id, _)| id)
            .filter(|id| !tree.is_attached(*id))
            .collect();
        assert!(!detached.is_empty());
        assert_eq!(tree.statistics().detached_nodes, detached.len());
        assert_eq!(tree.walk(f64::NEG_INFINITY).len() + detached.len(), 40);

        for id in detached {
            let node = tree.node(id).unwrap();
            assert!(node.parent().is_none());
            assert!(node.depth() > 0);
            assert!(tree.find_most_similar_commits(node.commit_id(), 1).len() == 1);
        }
    }

    #[test]
    fn test_skipped_commit_creates_matrix_discrepancy() {
        let mut commits = mixed_history();
        commits.push(Commit::new(9, "", 1_700_000_000));
        commits.push(Commit::new(10, "wip", 1_700_000_100));
        let tree = build_similarity_tree(&commits).unwrap();

        assert_eq!(tree.total_commits(), 8);
        assert_eq!(tree.matrix().size(), 10);
        assert!(tree.find_node(9).is_none());
        assert_eq!(tree.lookup_cached_similarity(9, 1), 0.0);
        assert_eq!(tree.lookup_cached_similarity(9, 9), 1.0);
    }

    #[test]
    fn test_insert_after_build_leaves_matrix_alone() {
        let commits = mixed_history();
        let extra = commit(42, "Fix parser again", "src/parser.c", "y = 1;\n");
        let mut tree = build_similarity_tree(&commits).unwrap();

        assert!(tree.insert_commit(&extra).is_some());
        assert_eq!(tree.total_commits(), commits.len() + 1);
        assert_eq!(tree.matrix().size(), commits.len());
        assert_eq!(tree.lookup_cached_similarity(42, 1), 0.0);
    }

    #[test]
    fn test_duplicate_ids_resolve_to_first_node() {
        let commits = vec![
            commit(1, "feat: add parser", "src/parser.c", "int p;\n"),
            commit(1, "docs: readme", "README.md", "text\n"),
        ];
        let tree = build_similarity_tree(&commits).unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.find_node(1), Some(NodeId(0)));
        assert_eq!(tree.node_for(1).unwrap().commit().subject(), "feat: add parser");
    }

    #[test]
    fn test_walk_starts_at_root_and_respects_threshold() {
        let commits = mixed_history();
        let tree = build_similarity_tree(&commits).unwrap();

        let all = tree.walk(f64::NEG_INFINITY);
        assert_eq!(all[0].node, tree.root().unwrap());
        assert_eq!(all[0].level, 0);
        assert!(all.iter().skip(1).all(|entry| entry.slot.is_some()));

        let pruned = tree.walk(2.0);
        assert_eq!(pruned.len(), 1);

        let mut visited = 0;
        tree.traverse(|_| visited += 1);
        assert_eq!(visited, all.len());
    }

    #[test]
    fn test_similarity_path_through_common_ancestor() {
        let commits = mixed_history();
        let tree = build_similarity_tree(&commits).unwrap();
        let root_id = tree.root_node().unwrap().commit_id();

        let mut attached = tree
            .nodes()
            .filter(|(id, node)| tree.is_attached(*id) && node.depth() > 0);
        let (_, child) = attached.next().unwrap();

        let path = tree.similarity_path(child.commit_id(), root_id).unwrap();
        assert_eq!(path.first(), Some(&child.commit_id()));
        assert_eq!(path.last(), Some(&root_id));
        assert_eq!(path.len(), child.depth() + 1);

        let back = tree.similarity_path(root_id, child.commit_id()).unwrap();
        let mut reversed = path.clone();
        reversed.reverse();
        assert_eq!(back, reversed);

        assert_eq!(tree.similarity_path(root_id, root_id), Some(vec![root_id]));
        assert!(tree.similarity_path(root_id, 999).is_none());
    }

    #[test]
    fn test_require_node_reports_missing_commit() {
        let commits = mixed_history();
        let tree = build_similarity_tree(&commits).unwrap();
        assert!(tree.require_node(1).is_ok());
        assert!(matches!(
            tree.require_node(404),
            Err(TreeError::CommitNotFound { id: 404 })
        ));
    }
}
