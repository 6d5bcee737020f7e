//! Patterns command - Group commits by what they set out to do
//!
//! Without filters, lists one development pattern per intent type. With
//! `--intent` and/or `--module`, lists the commits matching those filters.

use super::commit_label;
use crate::output::{Output, OutputFormat, TableDisplay};
use crate::source::CommitSource;
use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use simtree_core::{build_similarity_tree, CommitSimilarityTree, DevelopmentPattern};
use simtree_fingerprint::{CommitId, IntentType, PrimaryModule};

#[derive(Debug, Serialize)]
pub struct PatternsReport {
    pub patterns: Vec<DevelopmentPattern>,
}

impl TableDisplay for PatternsReport {
    fn to_table(&self) -> String {
        let mut output = format!("{}\n\n", "DEVELOPMENT PATTERNS".cyan().bold());

        if self.patterns.is_empty() {
            output.push_str(&"No patterns found.".dimmed().to_string());
            return output;
        }

        for pattern in &self.patterns {
            output.push_str(&format!(
                "{} {} commits, avg similarity {:.3}\n",
                format!("{}:", pattern.pattern_name).yellow().bold(),
                pattern.commit_count,
                pattern.avg_similarity
            ));
            let examples: Vec<String> = pattern
                .representative_commits
                .iter()
                .map(|id| format!("#{}", id))
                .collect();
            output.push_str(&format!("  e.g. {}\n", examples.join(", ")));
        }
        output
    }
}

#[derive(Debug, Serialize)]
pub struct MatchingCommit {
    pub commit_id: CommitId,
    pub label: String,
}

#[derive(Debug, Serialize)]
pub struct PatternMatchReport {
    pub intent: Option<IntentType>,
    pub module: Option<PrimaryModule>,
    pub commits: Vec<MatchingCommit>,
}

impl TableDisplay for PatternMatchReport {
    fn to_table(&self) -> String {
        let describe = |value: Option<String>| value.unwrap_or_else(|| "any".to_string());
        let mut output = format!(
            "{} intent={} module={} ({} commits)\n\n",
            "MATCHING COMMITS".cyan().bold(),
            describe(self.intent.map(|i| i.to_string())),
            describe(self.module.map(|m| m.to_string())),
            self.commits.len()
        );
        for commit in &self.commits {
            output.push_str(&format!("  {}\n", commit.label));
        }
        output
    }
}

fn parse_intent(value: &str) -> Result<IntentType> {
    IntentType::parse(value).with_context(|| {
        format!(
            "Unknown intent '{}'. Expected one of: fix, feat, refactor, docs, test, chore",
            value
        )
    })
}

fn parse_module(value: &str) -> Result<PrimaryModule> {
    PrimaryModule::parse(value).with_context(|| {
        format!(
            "Unknown module '{}'. Expected one of: src, test, docs, config",
            value
        )
    })
}

pub fn matching_commits(
    tree: &CommitSimilarityTree<'_>,
    intent: Option<IntentType>,
    module: Option<PrimaryModule>,
) -> PatternMatchReport {
    let commits = tree
        .find_commits_by_pattern(intent, module)
        .into_iter()
        .map(|commit| MatchingCommit {
            commit_id: commit.id,
            label: commit_label(commit),
        })
        .collect();

    PatternMatchReport {
        intent,
        module,
        commits,
    }
}

/// Run the patterns command
pub fn run(
    source: &CommitSource,
    intent: Option<&str>,
    module: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let intent = intent.map(parse_intent).transpose()?;
    let module = module.map(parse_module).transpose()?;

    let commits = source.load()?;
    let tree = build_similarity_tree(&commits).context("Failed to build similarity tree")?;

    if intent.is_none() && module.is_none() {
        let report = PatternsReport {
            patterns: tree.analyze_development_patterns(),
        };
        Output::new(report, format).render()
    } else {
        Output::new(matching_commits(&tree, intent, module), format).render()
    }
}
