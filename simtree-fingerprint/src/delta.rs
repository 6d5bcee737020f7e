//! Size and shape of the code change itself.

use crate::commit::Modification;
use serde::{Deserialize, Serialize};

/// Substrings in new code that count as a type definition.
const TYPE_DEFINITION_MARKERS: &[&str] = &["struct ", "class ", "enum ", "trait ", "interface "];

/// Changed lines per modification that saturate `semantic_distance`.
const LINES_PER_MODIFICATION: f64 = 20.0;

/// Summary of how much code a commit moved.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeDeltaAnalysis {
    /// Total changed lines normalized by modification count, in `[0, 1]`.
    pub semantic_distance: f64,
    pub lines_added: usize,
    pub lines_removed: usize,
    /// One per modification record, not per actual function.
    pub functions_modified: usize,
    /// Modifications whose new code contains a type definition.
    pub classes_modified: usize,
    /// Growth ratio of added to removed lines, in `[-2, 2]`.
    pub complexity_delta: f64,
}

/// Analyze the code blocks of a commit's modifications. Returns `None` when
/// there are no modifications.
pub fn analyze_code_delta(modifications: &[Modification]) -> Option<CodeDeltaAnalysis> {
    if modifications.is_empty() {
        return None;
    }

    let mut analysis = CodeDeltaAnalysis::default();

    for modification in modifications {
        analysis.lines_removed += count_lines(&modification.old_code);
        analysis.lines_added += count_lines(&modification.new_code);
        analysis.functions_modified += 1;

        if TYPE_DEFINITION_MARKERS
            .iter()
            .any(|marker| modification.new_code.contains(marker))
        {
            analysis.classes_modified += 1;
        }
    }

    let total_changes = (analysis.lines_added + analysis.lines_removed) as f64;
    let scale = modifications.len() as f64 * LINES_PER_MODIFICATION;
    analysis.semantic_distance = (total_changes / scale).min(1.0);

    let delta = if analysis.lines_removed > 0 {
        (analysis.lines_added as f64 - analysis.lines_removed as f64)
            / analysis.lines_removed as f64
    } else if analysis.lines_added > 0 {
        1.0
    } else {
        0.0
    };
    analysis.complexity_delta = delta.clamp(-2.0, 2.0);

    Some(analysis)
}

/// Number of newline characters in a code block.
fn count_lines(code: &str) -> usize {
    bytecount::count(code.as_bytes(), b'\n')
}
