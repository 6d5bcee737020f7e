//! Classification of the files a commit touches.

use crate::commit::Modification;
use serde::{Deserialize, Serialize};

/// Bucket a single file path falls into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Src,
    Test,
    Docs,
    Config,
    Other,
}

impl FileCategory {
    /// Buckets in classification priority order.
    pub const ALL: [FileCategory; 5] = [
        FileCategory::Src,
        FileCategory::Test,
        FileCategory::Docs,
        FileCategory::Config,
        FileCategory::Other,
    ];

    fn index(&self) -> usize {
        match self {
            FileCategory::Src => 0,
            FileCategory::Test => 1,
            FileCategory::Docs => 2,
            FileCategory::Config => 3,
            FileCategory::Other => 4,
        }
    }
}

/// Dominant area of the codebase a commit works in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimaryModule {
    Src,
    Test,
    Docs,
    Config,
}

impl PrimaryModule {
    pub const ALL: [PrimaryModule; 4] = [
        PrimaryModule::Src,
        PrimaryModule::Test,
        PrimaryModule::Docs,
        PrimaryModule::Config,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PrimaryModule::Src => "src",
            PrimaryModule::Test => "test",
            PrimaryModule::Docs => "docs",
            PrimaryModule::Config => "config",
        }
    }

    /// Position of this module's one-hot dimension. Config shares its slot
    /// with "other".
    pub fn dimension(&self) -> usize {
        match self {
            PrimaryModule::Src => 11,
            PrimaryModule::Test => 12,
            PrimaryModule::Docs => 13,
            PrimaryModule::Config => 14,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|module| module.as_str() == value)
    }
}

impl std::fmt::Display for PrimaryModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const SRC_MARKERS: &[&str] = &[
    "src/", "lib/", ".c", ".cpp", ".h", ".rs", ".py", ".go", ".java", ".ts",
];
const TEST_MARKERS: &[&str] = &["test", "spec"];
const DOCS_MARKERS: &[&str] = &["doc", "README", ".md"];
const CONFIG_MARKERS: &[&str] = &["config", ".json", ".yml", ".yaml", ".toml", "Makefile"];

/// Bucket a path by substring match, checking src, test, docs, config in
/// that order. Matching is case-sensitive.
pub fn classify_path(path: &str) -> FileCategory {
    let rules: [(FileCategory, &[&str]); 4] = [
        (FileCategory::Src, SRC_MARKERS),
        (FileCategory::Test, TEST_MARKERS),
        (FileCategory::Docs, DOCS_MARKERS),
        (FileCategory::Config, CONFIG_MARKERS),
    ];

    rules
        .iter()
        .find(|(_, markers)| markers.iter().any(|marker| path.contains(marker)))
        .map(|(category, _)| *category)
        .unwrap_or(FileCategory::Other)
}

/// Where a commit's changes landed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilePathAnalysis {
    pub primary_module: PrimaryModule,
    /// Normalized Shannon entropy over the five buckets, in `[0, 1]`.
    pub file_diversity: f64,
    pub total_files_changed: usize,
    /// Per-bucket counts in [`FileCategory::ALL`] order.
    pub category_counts: [usize; 5],
}

/// Analyze the paths of a commit's modifications. Returns `None` when there
/// are no modifications.
pub fn analyze_file_paths(modifications: &[Modification]) -> Option<FilePathAnalysis> {
    if modifications.is_empty() {
        return None;
    }

    let mut counts = [0usize; 5];
    for modification in modifications {
        counts[classify_path(&modification.file_path).index()] += 1;
    }

    Some(FilePathAnalysis {
        primary_module: primary_module(&counts),
        file_diversity: normalized_entropy(&counts),
        total_files_changed: modifications.len(),
        category_counts: counts,
    })
}

/// Largest of the src/test/docs/config buckets, earlier buckets winning ties.
/// Falls back to config when every file landed in "other".
fn primary_module(counts: &[usize; 5]) -> PrimaryModule {
    let mut best = PrimaryModule::Config;
    let mut best_count = 0;
    for (module, &count) in PrimaryModule::ALL.iter().zip(counts.iter()) {
        if count > best_count {
            best = *module;
            best_count = count;
        }
    }
    best
}

fn normalized_entropy(counts: &[usize; 5]) -> f64 {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }

    let total = total as f64;
    let entropy: f64 = counts
        .iter()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let p = count as f64 / total;
            -p * p.log2()
        })
        .sum();

    entropy / (counts.len() as f64).log2()
}
