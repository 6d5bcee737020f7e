//! Arena node types for the similarity tree.

use serde::Serialize;
use simtree_fingerprint::{Commit, CommitId, SemanticFingerprint};

/// Index of a node in the tree's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position in registry (insertion) order.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Which of a node's two ranked child slots a link lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChildSlot {
    MostSimilar,
    SecondSimilar,
}

/// Link from a parent to a child along with the similarity cached at
/// insertion time.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ChildLink {
    pub node: NodeId,
    pub similarity: f64,
}

/// One commit in the similarity tree.
///
/// The node owns its fingerprint and borrows its commit from the caller's
/// commit list. `parent` is a plain index used for navigation only.
#[derive(Debug, Clone)]
pub struct SimilarityTreeNode<'c> {
    pub(crate) commit: &'c Commit,
    pub(crate) fingerprint: SemanticFingerprint,
    pub(crate) most_similar: Option<ChildLink>,
    pub(crate) second_similar: Option<ChildLink>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) depth: usize,
    pub(crate) subtree_size: usize,
}

impl<'c> SimilarityTreeNode<'c> {
    pub(crate) fn new(commit: &'c Commit, fingerprint: SemanticFingerprint) -> Self {
        Self {
            commit,
            fingerprint,
            most_similar: None,
            second_similar: None,
            parent: None,
            depth: 0,
            subtree_size: 1,
        }
    }

    pub fn commit(&self) -> &'c Commit {
        self.commit
    }

    pub fn commit_id(&self) -> CommitId {
        self.commit.id
    }

    pub fn fingerprint(&self) -> &SemanticFingerprint {
        &self.fingerprint
    }

    pub fn most_similar(&self) -> Option<ChildLink> {
        self.most_similar
    }

    pub fn second_similar(&self) -> Option<ChildLink> {
        self.second_similar
    }

    pub fn child(&self, slot: ChildSlot) -> Option<ChildLink> {
        match slot {
            ChildSlot::MostSimilar => self.most_similar,
            ChildSlot::SecondSimilar => self.second_similar,
        }
    }

    /// Occupied child slots, `most_similar` first.
    pub fn children(&self) -> impl Iterator<Item = ChildLink> + '_ {
        self.most_similar.into_iter().chain(self.second_similar)
    }

    /// `None` for the root and for nodes displaced from the active structure.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Depth assigned at insertion time; not updated on displacement.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Informational only. Always 1; never maintained as nodes are added.
    pub fn subtree_size(&self) -> usize {
        self.subtree_size
    }

    /// Cached similarity scores of the two slots, `0.0` for an empty slot.
    pub fn child_scores(&self) -> (f64, f64) {
        (
            self.most_similar.map_or(0.0, |link| link.similarity),
            self.second_similar.map_or(0.0, |link| link.similarity),
        )
    }
}
