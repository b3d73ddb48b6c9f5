//! Answer grading: exact and similarity-based written checks, option checks.

use similar::TextDiff;

/// Default similarity threshold for smart grading.
pub const DEFAULT_STRICTNESS: f32 = 0.8;

fn normalize(answer: &str) -> String {
    answer.trim().to_lowercase()
}

/// Character-level similarity ratio between two strings, in `[0, 1]`.
///
/// Computed as `2 * matches / total_chars`, so 1.0 means identical and 0.0
/// means nothing in common.
pub fn similarity(a: &str, b: &str) -> f32 {
    TextDiff::from_chars(a, b).ratio()
}

/// Whether a written answer matches the expected text after normalization.
pub fn is_exact_match(expected: &str, answer: &str) -> bool {
    normalize(answer) == normalize(expected)
}

/// Grade a written answer.
///
/// Both sides are trimmed and lowercased. An exact normalized match always
/// passes, whatever the strictness. With smart grading enabled, an answer is
/// also accepted when its similarity to the expected text reaches
/// `strictness`. `None` (no answer given) never passes.
pub fn written_answer_correct(
    expected: &str,
    answer: Option<&str>,
    smart_grading: bool,
    strictness: f32,
) -> bool {
    let Some(answer) = answer else {
        return false;
    };

    let answer = normalize(answer);
    let expected = normalize(expected);
    if answer == expected {
        return true;
    }

    smart_grading && similarity(&answer, &expected) >= strictness
}

/// Grade a multiple-choice answer by option index.
pub fn choice_answer_correct(correct: usize, answer: Option<usize>) -> bool {
    answer == Some(correct)
}
