//! Simtree Fingerprint - Semantic fingerprints for version-control commits.
//!
//! This crate turns an already-parsed commit (message, timestamp and per-file
//! modifications) into a fixed-length, unit-normalized feature vector so that
//! commits can be compared by *what they do* rather than *when they happened*.
//!
//! # Features
//!
//! - **Message analysis**: intent classification, ticket extraction, sentiment
//! - **File-path analysis**: module classification and change diversity
//! - **Code-delta analysis**: line counts, modification heuristics, complexity trend
//! - **Deterministic jitter**: commit-id seeded perturbation to separate twins
//!
//! # Usage
//!
//! ```rust
//! use simtree_fingerprint::{compare, Commit, Modification, SemanticFingerprint};
//!
//! let commit = Commit::new(1, "feat: add caching layer", 1_700_000_000)
//!     .with_modification(Modification::new("src/cache.rs", "", "pub struct Cache;\n", 1));
//!
//! let fingerprint = SemanticFingerprint::build(&commit)?;
//! assert!((compare(&fingerprint, &fingerprint) - 1.0).abs() < 1e-9);
//! # Ok::<(), simtree_fingerprint::FingerprintError>(())
//! ```
//!
//! # Vector layout
//!
//! | Dimensions | Content |
//! |---|---|
//! | 0-5 | one-hot intent (fix, feat, refactor, docs, test, chore) |
//! | 8 | sentiment score |
//! | 9-10 | file diversity, files touched / 10 |
//! | 11-14 | one-hot primary module (src, test, docs, config/other) |
//! | 16-21 | semantic distance, added/100, removed/100, functions/10, classes/5, complexity/2 |
//! | 22-23 | time of day as sine/cosine |
//! | 24-31 | commit-id seeded jitter |

#![warn(clippy::all)]

mod commit;
mod delta;
mod error;
mod message;
mod model;
mod paths;
mod tokenizer;

pub use commit::{load_commits, Author, Commit, CommitId, Modification};
pub use delta::{analyze_code_delta, CodeDeltaAnalysis};
pub use error::{FingerprintError, Result};
pub use message::{
    analyze_commit_message, calculate_sentiment_score, classify_intent, extract_ticket_reference,
    CommitKeywords, IntentType,
};
pub use model::{compare, cosine_similarity, normalize, SemanticFingerprint, SimilarityLabel};
pub use paths::{analyze_file_paths, classify_path, FileCategory, FilePathAnalysis, PrimaryModule};
pub use tokenizer::KeywordTokenizer;

/// Number of dimensions in every fingerprint vector.
pub const FINGERPRINT_DIMENSIONS: usize = 32;

/// Maximum number of keywords kept from a commit message.
pub const MAX_KEYWORDS: usize = 20;

/// Upper bound on the per-dimension jitter magnitude.
pub const JITTER_AMPLITUDE: f64 = 0.025;
