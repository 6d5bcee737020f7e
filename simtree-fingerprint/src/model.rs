//! Fingerprint assembly, normalization and the similarity metric.

use crate::commit::{Commit, CommitId};
use crate::delta::{analyze_code_delta, CodeDeltaAnalysis};
use crate::error::{FingerprintError, Result};
use crate::message::{analyze_commit_message, CommitKeywords};
use crate::paths::{analyze_file_paths, FilePathAnalysis};
use crate::{FINGERPRINT_DIMENSIONS, JITTER_AMPLITUDE};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use tracing::debug;

const SENTIMENT_DIM: usize = 8;
const DIVERSITY_DIM: usize = 9;
const FILE_COUNT_DIM: usize = 10;
const DISTANCE_DIM: usize = 16;
const ADDED_DIM: usize = 17;
const REMOVED_DIM: usize = 18;
const FUNCTIONS_DIM: usize = 19;
const CLASSES_DIM: usize = 20;
const COMPLEXITY_DIM: usize = 21;
const TIME_SIN_DIM: usize = 22;
const TIME_COS_DIM: usize = 23;
const JITTER_START: usize = 24;

const SECONDS_PER_DAY: i64 = 86_400;

/// Normalized feature vector summarizing one commit, together with the
/// analysis records it was built from.
///
/// Once built the fingerprint is never mutated. The vector has unit length
/// unless the pre-normalization `magnitude` was exactly zero.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SemanticFingerprint {
    pub commit_id: CommitId,
    pub vector: [f64; FINGERPRINT_DIMENSIONS],
    /// L2 norm of the vector before normalization.
    pub magnitude: f64,
    pub keywords: CommitKeywords,
    pub file_analysis: FilePathAnalysis,
    pub code_delta: CodeDeltaAnalysis,
}

impl SemanticFingerprint {
    /// Build the fingerprint for a commit.
    ///
    /// # Errors
    ///
    /// Returns [`FingerprintError::MissingAnalysis`] when the message is
    /// empty or the commit has no modifications; all three analysis records
    /// must exist for a fingerprint to exist.
    pub fn build(commit: &Commit) -> Result<Self> {
        let missing = |component| FingerprintError::MissingAnalysis {
            commit_id: commit.id,
            component,
        };

        let keywords = analyze_commit_message(&commit.message).ok_or_else(|| missing("message"))?;
        let file_analysis =
            analyze_file_paths(&commit.modifications).ok_or_else(|| missing("file path"))?;
        let code_delta =
            analyze_code_delta(&commit.modifications).ok_or_else(|| missing("code delta"))?;

        let mut vector = [0.0; FINGERPRINT_DIMENSIONS];

        vector[keywords.intent_type.dimension()] = 1.0;
        vector[SENTIMENT_DIM] = keywords.sentiment_score;

        vector[DIVERSITY_DIM] = file_analysis.file_diversity;
        vector[FILE_COUNT_DIM] = file_analysis.total_files_changed as f64 / 10.0;
        vector[file_analysis.primary_module.dimension()] = 1.0;

        vector[DISTANCE_DIM] = code_delta.semantic_distance;
        vector[ADDED_DIM] = code_delta.lines_added as f64 / 100.0;
        vector[REMOVED_DIM] = code_delta.lines_removed as f64 / 100.0;
        vector[FUNCTIONS_DIM] = code_delta.functions_modified as f64 / 10.0;
        vector[CLASSES_DIM] = code_delta.classes_modified as f64 / 5.0;
        vector[COMPLEXITY_DIM] = code_delta.complexity_delta / 2.0;

        if commit.timestamp > 0 {
            let time_of_day = (commit.timestamp % SECONDS_PER_DAY) as f64 / SECONDS_PER_DAY as f64;
            vector[TIME_SIN_DIM] = (TAU * time_of_day).sin();
            vector[TIME_COS_DIM] = (TAU * time_of_day).cos();
        }

        // Seeded by id so the same commit always gets the same offsets.
        let mut rng = StdRng::seed_from_u64(commit.id as u64);
        for value in &mut vector[JITTER_START..] {
            *value = (rng.gen::<f64>() - 0.5) * 2.0 * JITTER_AMPLITUDE;
        }

        let magnitude = normalize(&mut vector);
        debug!(
            "Fingerprinted commit {} ({}, magnitude {:.4})",
            commit.id, keywords.intent_type, magnitude
        );

        Ok(Self {
            commit_id: commit.id,
            vector,
            magnitude,
            keywords,
            file_analysis,
            code_delta,
        })
    }

    /// Cosine similarity to another fingerprint.
    pub fn similarity(&self, other: &SemanticFingerprint) -> f64 {
        compare(self, other)
    }
}

impl std::fmt::Display for SemanticFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Semantic Fingerprint:")?;
        writeln!(f, "  Magnitude: {:.4}", self.magnitude)?;
        writeln!(f, "  Intent: {}", self.keywords.intent_type)?;
        writeln!(f, "  Sentiment: {:.2}", self.keywords.sentiment_score)?;
        if let Some(ticket) = &self.keywords.ticket_reference {
            writeln!(f, "  Ticket: {}", ticket)?;
        }
        writeln!(f, "  Primary Module: {}", self.file_analysis.primary_module)?;
        writeln!(f, "  File Diversity: {:.2}", self.file_analysis.file_diversity)?;
        writeln!(f, "  Files Changed: {}", self.file_analysis.total_files_changed)?;
        writeln!(f, "  Semantic Distance: {:.2}", self.code_delta.semantic_distance)?;
        writeln!(f, "  Lines Added: {}", self.code_delta.lines_added)?;
        writeln!(f, "  Lines Removed: {}", self.code_delta.lines_removed)?;
        write!(f, "  Functions Modified: {}", self.code_delta.functions_modified)
    }
}

/// Scale `vector` to unit length in place and return its original L2 norm.
/// A zero vector is left untouched.
pub fn normalize(vector: &mut [f64]) -> f64 {
    let magnitude = vector.iter().map(|v| v * v).sum::<f64>().sqrt();
    if magnitude > 0.0 {
        for value in vector.iter_mut() {
            *value /= magnitude;
        }
    }
    magnitude
}

/// Dot product of two equal-length vectors. For unit vectors this is their
/// cosine similarity. Mismatched lengths compare as `0.0`.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Similarity of two fingerprints, in `[-1, 1]`.
pub fn compare(a: &SemanticFingerprint, b: &SemanticFingerprint) -> f64 {
    cosine_similarity(&a.vector, &b.vector)
}

/// Coarse human label for a pairwise similarity score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimilarityLabel {
    VerySimilar,
    Similar,
    SomewhatSimilar,
    WeaklySimilar,
    Different,
}

impl SimilarityLabel {
    pub fn from_score(score: f64) -> Self {
        if score > 0.8 {
            SimilarityLabel::VerySimilar
        } else if score > 0.6 {
            SimilarityLabel::Similar
        } else if score > 0.4 {
            SimilarityLabel::SomewhatSimilar
        } else if score > 0.2 {
            SimilarityLabel::WeaklySimilar
        } else {
            SimilarityLabel::Different
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SimilarityLabel::VerySimilar => "Very Similar",
            SimilarityLabel::Similar => "Similar",
            SimilarityLabel::SomewhatSimilar => "Somewhat Similar",
            SimilarityLabel::WeaklySimilar => "Weakly Similar",
            SimilarityLabel::Different => "Different",
        }
    }
}

impl std::fmt::Display for SimilarityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commit::Modification;
    use crate::message::IntentType;
    use approx::assert_abs_diff_eq;

    fn sample_commit(id: CommitId, message: &str) -> Commit {
        Commit::new(id, message, 1_700_000_000)
            .with_modification(Modification::new(
                "src/cache.c",
                "int x;\n",
                "struct cache {\n  int size;\n};\n",
                3,
            ))
            .with_modification(Modification::new("README.md", "", "Caching docs\n", 1))
    }

    fn norm(vector: &[f64]) -> f64 {
        vector.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    #[test]
    fn test_unit_length_and_self_similarity() {
        let fp = SemanticFingerprint::build(&sample_commit(1, "feat: add cache")).unwrap();
        assert!(fp.magnitude > 0.0);
        assert_abs_diff_eq!(norm(&fp.vector), 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(compare(&fp, &fp), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_similarity_is_symmetric() {
        let a = SemanticFingerprint::build(&sample_commit(1, "feat: add cache")).unwrap();
        let b = SemanticFingerprint::build(&sample_commit(2, "Fix bug in cache")).unwrap();
        assert_eq!(compare(&a, &b), compare(&b, &a));
        assert!(compare(&a, &b) <= 1.0 && compare(&a, &b) >= -1.0);
    }

    #[test]
    fn test_vector_layout() {
        let fp = SemanticFingerprint::build(&sample_commit(5, "Fix bug (#123)")).unwrap();
        assert_eq!(fp.keywords.intent_type, IntentType::Fix);

        let raw: Vec<f64> = fp.vector.iter().map(|v| v * fp.magnitude).collect();
        assert_abs_diff_eq!(raw[0], 1.0, epsilon = 1e-9);
        for dim in 1..8 {
            assert_abs_diff_eq!(raw[dim], 0.0, epsilon = 1e-12);
        }
        assert_abs_diff_eq!(raw[SENTIMENT_DIM], -0.5, epsilon = 1e-9);
        assert_abs_diff_eq!(raw[FILE_COUNT_DIM], 0.2, epsilon = 1e-9);
        // one src file, one docs file: tie goes to src
        assert_abs_diff_eq!(raw[11], 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(raw[15], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(raw[FUNCTIONS_DIM], 0.2, epsilon = 1e-9);
        assert_abs_diff_eq!(raw[CLASSES_DIM], 0.2, epsilon = 1e-9);
        for dim in JITTER_START..FINGERPRINT_DIMENSIONS {
            assert!(raw[dim].abs() <= JITTER_AMPLITUDE + 1e-12);
        }
    }

    #[test]
    fn test_time_of_day_encoding() {
        let mut commit = sample_commit(1, "chore: bump");
        commit.timestamp = 6 * 3600; // 06:00 UTC
        let fp = SemanticFingerprint::build(&commit).unwrap();
        assert_abs_diff_eq!(fp.vector[TIME_SIN_DIM] * fp.magnitude, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(fp.vector[TIME_COS_DIM] * fp.magnitude, 0.0, epsilon = 1e-9);

        commit.timestamp = 0;
        let fp = SemanticFingerprint::build(&commit).unwrap();
        assert_eq!(fp.vector[TIME_SIN_DIM], 0.0);
        assert_eq!(fp.vector[TIME_COS_DIM], 0.0);
    }

    #[test]
    fn test_jitter_is_deterministic_per_id() {
        let a = SemanticFingerprint::build(&sample_commit(77, "refactor loader")).unwrap();
        let b = SemanticFingerprint::build(&sample_commit(77, "refactor loader")).unwrap();
        assert_eq!(a.vector, b.vector);
    }

    #[test]
    fn test_twins_with_different_ids_are_close_but_distinct() {
        let a = SemanticFingerprint::build(&sample_commit(1, "refactor loader")).unwrap();
        let b = SemanticFingerprint::build(&sample_commit(2, "refactor loader")).unwrap();
        let similarity = compare(&a, &b);
        assert!(similarity < 1.0, "similarity was {}", similarity);
        assert!(similarity > 0.95, "similarity was {}", similarity);
    }

    #[test]
    fn test_missing_analysis_fails_whole_fingerprint() {
        let empty_message = sample_commit(1, "");
        assert!(matches!(
            SemanticFingerprint::build(&empty_message),
            Err(FingerprintError::MissingAnalysis {
                component: "message",
                ..
            })
        ));

        let no_mods = Commit::new(2, "feat: add thing", 100);
        assert!(matches!(
            SemanticFingerprint::build(&no_mods),
            Err(FingerprintError::MissingAnalysis {
                component: "file path",
                ..
            })
        ));
    }

    #[test]
    fn test_normalize_zero_vector() {
        let mut vector = [0.0; FINGERPRINT_DIMENSIONS];
        assert_eq!(normalize(&mut vector), 0.0);
        assert!(vector.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_cosine_length_mismatch() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0]), 0.0);
    }

    #[test]
    fn test_similarity_labels() {
        assert_eq!(SimilarityLabel::from_score(0.95), SimilarityLabel::VerySimilar);
        assert_eq!(SimilarityLabel::from_score(0.7), SimilarityLabel::Similar);
        assert_eq!(SimilarityLabel::from_score(0.5), SimilarityLabel::SomewhatSimilar);
        assert_eq!(SimilarityLabel::from_score(0.3), SimilarityLabel::WeaklySimilar);
        assert_eq!(SimilarityLabel::from_score(0.2), SimilarityLabel::Different);
        assert_eq!(SimilarityLabel::VerySimilar.to_string(), "Very Similar");
    }
}
