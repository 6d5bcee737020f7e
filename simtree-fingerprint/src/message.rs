//! Commit message analysis: intent, ticket reference, sentiment and keywords.
//!
//! Everything here is a keyword/substring heuristic. Rules are evaluated in a
//! fixed order and the first match wins; there is no scoring across rules.

use crate::tokenizer::KeywordTokenizer;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Inferred purpose of a commit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentType {
    Fix,
    Feat,
    Refactor,
    Docs,
    Test,
    Chore,
}

impl IntentType {
    /// All intents in classification priority order.
    pub const ALL: [IntentType; 6] = [
        IntentType::Fix,
        IntentType::Feat,
        IntentType::Refactor,
        IntentType::Docs,
        IntentType::Test,
        IntentType::Chore,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IntentType::Fix => "fix",
            IntentType::Feat => "feat",
            IntentType::Refactor => "refactor",
            IntentType::Docs => "docs",
            IntentType::Test => "test",
            IntentType::Chore => "chore",
        }
    }

    /// Position of this intent's one-hot dimension.
    pub fn dimension(&self) -> usize {
        match self {
            IntentType::Fix => 0,
            IntentType::Feat => 1,
            IntentType::Refactor => 2,
            IntentType::Docs => 3,
            IntentType::Test => 4,
            IntentType::Chore => 5,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|intent| intent.as_str() == value)
    }
}

impl std::fmt::Display for IntentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Substring rules, checked top to bottom against the lower-cased message.
const INTENT_RULES: &[(IntentType, &[&str])] = &[
    (IntentType::Fix, &["fix", "bug", "error"]),
    (IntentType::Feat, &["feat:", "add", "new"]),
    (IntentType::Refactor, &["refactor", "restructure", "cleanup"]),
    (IntentType::Docs, &["docs:", "documentation", "readme"]),
    (IntentType::Test, &["test", "spec"]),
];

/// Sentiment lexicon. Every matching term contributes independently.
const SENTIMENT_TERMS: &[(&str, f64)] = &[
    ("improve", 0.3),
    ("optimize", 0.3),
    ("enhance", 0.3),
    ("add", 0.2),
    ("better", 0.2),
    ("clean", 0.2),
    ("fix", -0.2),
    ("bug", -0.3),
    ("error", -0.3),
    ("issue", -0.2),
    ("problem", -0.3),
    ("fail", -0.3),
];

static HASH_TICKET: Lazy<Regex> = Lazy::new(|| Regex::new(r"#[0-9]+").unwrap());
static KEY_TICKET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z][A-Za-z0-9_]*-[0-9]+").unwrap());

/// Keywords and classifications extracted from a commit message.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CommitKeywords {
    pub intent_type: IntentType,
    /// Tokens longer than three characters, case preserved, capped.
    pub keywords: Vec<String>,
    /// `#123` or `PROJ-123` style reference, if any.
    pub ticket_reference: Option<String>,
    /// Heuristic tone in `[-1.0, 1.0]`.
    pub sentiment_score: f64,
}

/// Classify a message into one intent. First matching rule wins; the
/// fallback is [`IntentType::Chore`].
pub fn classify_intent(message: &str) -> IntentType {
    let lower = message.to_lowercase();
    INTENT_RULES
        .iter()
        .find(|(_, needles)| needles.iter().any(|needle| lower.contains(needle)))
        .map(|(intent, _)| *intent)
        .unwrap_or(IntentType::Chore)
}

/// Extract a ticket reference. A `#<digits>` token is preferred over a
/// `WORD-<digits>` token regardless of position.
pub fn extract_ticket_reference(message: &str) -> Option<String> {
    HASH_TICKET
        .find(message)
        .or_else(|| KEY_TICKET.find(message))
        .map(|m| m.as_str().to_string())
}

/// Additive sentiment over the fixed lexicon, clamped to `[-1.0, 1.0]`.
pub fn calculate_sentiment_score(message: &str) -> f64 {
    let lower = message.to_lowercase();
    let score: f64 = SENTIMENT_TERMS
        .iter()
        .filter(|(term, _)| lower.contains(term))
        .map(|(_, weight)| weight)
        .sum();
    score.clamp(-1.0, 1.0)
}

/// Analyze a commit message. Returns `None` for an empty message.
pub fn analyze_commit_message(message: &str) -> Option<CommitKeywords> {
    if message.trim().is_empty() {
        return None;
    }

    Some(CommitKeywords {
        intent_type: classify_intent(message),
        keywords: KeywordTokenizer::default().tokenize(message),
        ticket_reference: extract_ticket_reference(message),
        sentiment_score: calculate_sentiment_score(message),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_fix_takes_precedence() {
        let keywords = analyze_commit_message("Fix bug (#123)").unwrap();
        assert_eq!(keywords.intent_type, IntentType::Fix);
        assert_eq!(keywords.ticket_reference.as_deref(), Some("#123"));
        assert_abs_diff_eq!(keywords.sentiment_score, -0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_feature_message() {
        let keywords = analyze_commit_message("feat: add caching layer").unwrap();
        assert_eq!(keywords.intent_type, IntentType::Feat);
        assert_eq!(keywords.ticket_reference, None);
        assert_abs_diff_eq!(keywords.sentiment_score, 0.2, epsilon = 1e-12);
        assert_eq!(keywords.keywords, vec!["feat", "caching", "layer"]);
    }

    #[test]
    fn test_intent_rules_in_order() {
        assert_eq!(classify_intent("Restructure the loader"), IntentType::Refactor);
        assert_eq!(classify_intent("docs: usage"), IntentType::Docs);
        assert_eq!(classify_intent("Update README"), IntentType::Docs);
        assert_eq!(classify_intent("more unit tests"), IntentType::Test);
        assert_eq!(classify_intent("bump version"), IntentType::Chore);
        // "add" outranks "test"
        assert_eq!(classify_intent("add tests"), IntentType::Feat);
    }

    #[test]
    fn test_ticket_patterns() {
        assert_eq!(
            extract_ticket_reference("JIRA-42 then #7").as_deref(),
            Some("#7")
        );
        assert_eq!(
            extract_ticket_reference("Resolve PROJ_X-981 in parser").as_deref(),
            Some("PROJ_X-981")
        );
        assert_eq!(extract_ticket_reference("issue # 12"), None);
        assert_eq!(extract_ticket_reference("nothing here"), None);
    }

    #[test]
    fn test_sentiment_is_clamped() {
        let score = calculate_sentiment_score("fix bug error issue problem fail");
        assert_abs_diff_eq!(score, -1.0, epsilon = 1e-12);

        let score = calculate_sentiment_score("improve optimize enhance better");
        assert_abs_diff_eq!(score, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_message_has_no_analysis() {
        assert!(analyze_commit_message("").is_none());
        assert!(analyze_commit_message("   \n").is_none());
    }

    #[test]
    fn test_intent_parse_roundtrip() {
        for intent in IntentType::ALL {
            assert_eq!(IntentType::parse(intent.as_str()), Some(intent));
        }
        assert_eq!(IntentType::parse("FEAT"), Some(IntentType::Feat));
        assert_eq!(IntentType::parse("wip"), None);
    }
}
