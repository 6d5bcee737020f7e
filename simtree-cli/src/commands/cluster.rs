//! Cluster command - Every commit within a similarity radius of a center

use super::{colored_score, commit_label};
use crate::output::{Output, OutputFormat, TableDisplay};
use crate::source::CommitSource;
use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use simtree_core::{build_similarity_tree, CommitSimilarityTree};
use simtree_fingerprint::CommitId;

#[derive(Debug, Serialize)]
pub struct ClusterMember {
    pub commit_id: CommitId,
    pub label: String,
    pub similarity: f64,
}

#[derive(Debug, Serialize)]
pub struct ClusterReport {
    pub center_id: CommitId,
    pub center: String,
    pub min_similarity: f64,
    pub members: Vec<ClusterMember>,
}

impl ClusterReport {
    pub fn from_tree(
        tree: &CommitSimilarityTree<'_>,
        center_id: CommitId,
        min_similarity: f64,
    ) -> Result<Self> {
        let center = tree.require_node(center_id)?;
        let members = tree
            .similarity_cluster(center_id, min_similarity)
            .into_iter()
            .map(|member| ClusterMember {
                commit_id: member.commit.id,
                label: commit_label(member.commit),
                similarity: member.similarity,
            })
            .collect();

        Ok(Self {
            center_id,
            center: commit_label(center.commit()),
            min_similarity,
            members,
        })
    }
}

impl TableDisplay for ClusterReport {
    fn to_table(&self) -> String {
        let mut output = format!(
            "{} around {} (>= {:.2}, {} members)\n\n",
            "SIMILARITY CLUSTER".cyan().bold(),
            self.center.yellow(),
            self.min_similarity,
            self.members.len()
        );
        for member in &self.members {
            output.push_str(&format!(
                "  {}  {}\n",
                colored_score(member.similarity),
                member.label
            ));
        }
        output
    }
}

/// Run the cluster command
pub fn run(
    source: &CommitSource,
    center_id: CommitId,
    min_similarity: f64,
    format: OutputFormat,
) -> Result<()> {
    let commits = source.load()?;
    let tree = build_similarity_tree(&commits).context("Failed to build similarity tree")?;

    let report = ClusterReport::from_tree(&tree, center_id, min_similarity)?;
    Output::new(report, format).render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use simtree_fingerprint::{Commit, Modification};

    fn commits() -> Vec<Commit> {
        vec![
            Commit::new(1, "Fix parser crash", 0)
                .with_modification(Modification::new("src/parser.c", "a\n", "b\n", 1)),
            Commit::new(2, "Fix parser crash", 0)
                .with_modification(Modification::new("src/parser.c", "a\n", "b\n", 1)),
            Commit::new(3, "docs: usage", 43_200)
                .with_modification(Modification::new("docs/usage.md", "", "usage\n", 1)),
        ]
    }

    #[test]
    fn test_cluster_excludes_center() {
        let commits = commits();
        let tree = build_similarity_tree(&commits).unwrap();

        let everything = ClusterReport::from_tree(&tree, 1, -1.0).unwrap();
        assert_eq!(everything.members.len(), 2);
        assert!(everything.members.iter().all(|m| m.commit_id != 1));

        let tight = ClusterReport::from_tree(&tree, 1, 0.9).unwrap();
        assert_eq!(tight.members.len(), 1);
        assert_eq!(tight.members[0].commit_id, 2);
    }

    #[test]
    fn test_table_output() {
        colored::control::set_override(false);
        let commits = commits();
        let tree = build_similarity_tree(&commits).unwrap();
        let table = ClusterReport::from_tree(&tree, 1, 0.9).unwrap().to_table();

        assert!(table.contains("SIMILARITY CLUSTER around #1 Fix parser crash"));
        assert!(table.contains("#2 Fix parser crash"));
    }
}
