//! Question generation for practice tests.

use rand::seq::index;
use rand::Rng;
use thiserror::Error;

use crate::grading;
use crate::models::Deck;

/// Options per multiple-choice question.
pub const OPTION_COUNT: usize = 4;

/// Errors from question generation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerationError {
    /// The deck cannot supply enough distinct wrong answers.
    #[error("only {available} distinct wrong answers available, need {needed}")]
    NotEnoughDistractors { available: usize, needed: usize },
}

/// A single test question, created per session and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Question {
    /// Free-text answer graded against the card's definition.
    Written {
        prompt: String,
        expected: String,
        answer: Option<String>,
    },
    /// Pick-one answer with a fixed option list.
    MultipleChoice {
        prompt: String,
        options: Vec<String>,
        correct: usize,
        answer: Option<usize>,
    },
}

impl Question {
    /// The text shown to the student.
    pub fn prompt(&self) -> &str {
        match self {
            Self::Written { prompt, .. } | Self::MultipleChoice { prompt, .. } => prompt,
        }
    }

    /// Whether an answer has been recorded.
    pub fn is_answered(&self) -> bool {
        match self {
            Self::Written { answer, .. } => answer.is_some(),
            Self::MultipleChoice { answer, .. } => answer.is_some(),
        }
    }

    /// Grade the recorded answer. Written questions accept exact normalized
    /// matches only; unanswered questions grade incorrect.
    pub fn is_correct(&self) -> bool {
        match self {
            Self::Written {
                expected, answer, ..
            } => grading::written_answer_correct(
                expected,
                answer.as_deref(),
                false,
                grading::DEFAULT_STRICTNESS,
            ),
            Self::MultipleChoice {
                correct, answer, ..
            } => grading::choice_answer_correct(*correct, *answer),
        }
    }
}

/// Generate written questions from a uniform sample of distinct cards.
///
/// At most `count` questions; a short deck yields one question per card.
pub fn generate_written(deck: &Deck, count: usize, rng: &mut impl Rng) -> Vec<Question> {
    let amount = count.min(deck.cards.len());
    index::sample(rng, deck.cards.len(), amount)
        .into_iter()
        .map(|i| {
            let card = &deck.cards[i];
            Question::Written {
                prompt: card.term.clone(),
                expected: card.definition.clone(),
                answer: None,
            }
        })
        .collect()
}

/// Generate multiple-choice questions from a uniform sample of distinct cards.
///
/// Returns an empty set when the deck is too small for the option count, so
/// callers can treat the mode as unavailable. Distractors are drawn from the
/// distinct definition texts of the other cards; cards sharing the sampled
/// card's definition are excluded by value, and too few distinct candidates
/// is an error rather than a short option list.
pub fn generate_choice(
    deck: &Deck,
    count: usize,
    rng: &mut impl Rng,
) -> Result<Vec<Question>, GenerationError> {
    if deck.cards.len() < OPTION_COUNT {
        return Ok(Vec::new());
    }

    let amount = count.min(deck.cards.len());
    let mut questions = Vec::with_capacity(amount);

    for i in index::sample(rng, deck.cards.len(), amount) {
        let card = &deck.cards[i];

        let mut pool: Vec<&str> = Vec::new();
        for other in &deck.cards {
            if other.definition != card.definition && !pool.contains(&other.definition.as_str()) {
                pool.push(&other.definition);
            }
        }

        let needed = OPTION_COUNT - 1;
        if pool.len() < needed {
            return Err(GenerationError::NotEnoughDistractors {
                available: pool.len(),
                needed,
            });
        }

        let mut options: Vec<String> = index::sample(rng, pool.len(), needed)
            .into_iter()
            .map(|j| pool[j].to_string())
            .collect();
        let correct = rng.random_range(0..=options.len());
        options.insert(correct, card.definition.clone());

        questions.push(Question::MultipleChoice {
            prompt: card.term.clone(),
            options,
            correct,
            answer: None,
        });
    }

    Ok(questions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Card;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn deck_with_cards(pairs: &[(&str, &str)]) -> Deck {
        let mut deck = Deck::new("t", "Test");
        deck.cards = pairs
            .iter()
            .map(|(term, def)| Card::new(*term, *def))
            .collect();
        deck
    }

    #[test]
    fn test_written_covers_whole_deck_when_short() {
        let deck = deck_with_cards(&[("uno", "one"), ("dos", "two")]);
        let mut rng = StdRng::seed_from_u64(1);

        let questions = generate_written(&deck, 10, &mut rng);
        assert_eq!(questions.len(), 2);

        let mut prompts: Vec<&str> = questions.iter().map(|q| q.prompt()).collect();
        prompts.sort_unstable();
        assert_eq!(prompts, vec!["dos", "uno"]);
    }

    #[test]
    fn test_written_samples_distinct_cards() {
        let deck = deck_with_cards(&[("a", "1"), ("b", "2"), ("c", "3"), ("d", "4")]);
        let mut rng = StdRng::seed_from_u64(2);

        let questions = generate_written(&deck, 3, &mut rng);
        assert_eq!(questions.len(), 3);

        let mut prompts: Vec<&str> = questions.iter().map(|q| q.prompt()).collect();
        prompts.sort_unstable();
        prompts.dedup();
        assert_eq!(prompts.len(), 3);
    }

    #[test]
    fn test_choice_unavailable_below_option_count() {
        let deck = deck_with_cards(&[("a", "1"), ("b", "2"), ("c", "3")]);
        let mut rng = StdRng::seed_from_u64(3);

        let questions = generate_choice(&deck, 5, &mut rng).unwrap();
        assert!(questions.is_empty());
    }

    #[test]
    fn test_choice_questions_are_well_formed() {
        let deck = deck_with_cards(&[
            ("a", "1"),
            ("b", "2"),
            ("c", "3"),
            ("d", "4"),
            ("e", "5"),
        ]);
        let mut rng = StdRng::seed_from_u64(4);

        let questions = generate_choice(&deck, 5, &mut rng).unwrap();
        assert_eq!(questions.len(), 5);

        for question in &questions {
            let Question::MultipleChoice {
                prompt,
                options,
                correct,
                answer,
            } = question
            else {
                panic!("expected multiple choice");
            };

            assert_eq!(options.len(), OPTION_COUNT);
            assert!(answer.is_none());

            // The recorded index points at the sampled card's definition.
            let card = deck.cards.iter().find(|c| c.term == *prompt).unwrap();
            assert_eq!(options[*correct], card.definition);

            // Each distractor is a real definition and none repeats.
            let mut seen = options.clone();
            seen.sort_unstable();
            seen.dedup();
            assert_eq!(seen.len(), OPTION_COUNT);
            for option in options {
                assert!(deck.cards.iter().any(|c| c.definition == *option));
            }
        }
    }

    #[test]
    fn test_choice_works_at_minimum_deck_size() {
        let deck = deck_with_cards(&[("a", "1"), ("b", "2"), ("c", "3"), ("d", "4")]);
        let mut rng = StdRng::seed_from_u64(9);

        let questions = generate_choice(&deck, 4, &mut rng).unwrap();
        assert_eq!(questions.len(), 4);

        for question in &questions {
            let Question::MultipleChoice {
                options, correct, ..
            } = question
            else {
                panic!("expected multiple choice");
            };
            assert_eq!(options.len(), OPTION_COUNT);
            assert!(*correct < options.len());
        }
    }

    #[test]
    fn test_choice_dedupes_shared_definitions() {
        // Two cards share "one": each other card still sees three distinct
        // wrong answers, so generation succeeds with no repeated option.
        let deck = deck_with_cards(&[
            ("uno", "one"),
            ("een", "one"),
            ("dos", "two"),
            ("tres", "three"),
            ("cuatro", "four"),
        ]);
        let mut rng = StdRng::seed_from_u64(5);

        let questions = generate_choice(&deck, 5, &mut rng).unwrap();
        for question in &questions {
            let Question::MultipleChoice { options, .. } = question else {
                panic!("expected multiple choice");
            };
            let mut seen = options.clone();
            seen.sort_unstable();
            seen.dedup();
            assert_eq!(seen.len(), OPTION_COUNT);
        }
    }

    #[test]
    fn test_choice_errors_without_enough_distinct_wrong_answers() {
        let deck = deck_with_cards(&[
            ("a", "same"),
            ("b", "same"),
            ("c", "same"),
            ("d", "other"),
        ]);
        let mut rng = StdRng::seed_from_u64(6);

        let err = generate_choice(&deck, 4, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            GenerationError::NotEnoughDistractors { needed: 3, .. }
        ));
    }

    #[test]
    fn test_written_grading_is_exact_only() {
        let question = Question::Written {
            prompt: "Capital of France".to_string(),
            expected: "Paris".to_string(),
            answer: Some("pari".to_string()),
        };
        assert!(!question.is_correct());

        let question = Question::Written {
            prompt: "Capital of France".to_string(),
            expected: "Paris".to_string(),
            answer: Some(" PARIS ".to_string()),
        };
        assert!(question.is_correct());
    }

    #[test]
    fn test_unanswered_grades_incorrect() {
        let question = Question::MultipleChoice {
            prompt: "q".to_string(),
            options: vec!["a".to_string(), "b".to_string()],
            correct: 1,
            answer: None,
        };
        assert!(!question.is_correct());
        assert!(!question.is_answered());
    }
}
