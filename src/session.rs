//! Shared types for the revision session engines.

use thiserror::Error;

use crate::questions::GenerationError;

/// Result alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// The three revision modes, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    /// Flip through cards, sorting them into known and still-learning.
    Flashcards,
    /// Type answers and move cards up and down the mastery ladder.
    Learn,
    /// A fixed set of questions graded on submit.
    Test,
}

impl SessionKind {
    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Flashcards => "Flashcards",
            Self::Learn => "Learn",
            Self::Test => "Practice Test",
        }
    }

    /// All modes in menu order.
    pub fn all() -> [SessionKind; 3] {
        [Self::Flashcards, Self::Learn, Self::Test]
    }
}

/// Errors from session setup and answer input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The deck has no cards to revise.
    #[error("this deck has no cards to revise")]
    EmptyDeck,
    /// Cards per round outside `1..=deck size`.
    #[error("cards per round must be between 1 and {max}")]
    InvalidRoundSize { max: usize },
    /// Question count outside `1..=deck size`.
    #[error("question count must be between 1 and {max}")]
    InvalidQuestionCount { max: usize },
    /// Multiple choice needs at least one card per option.
    #[error("not enough cards for multiple choice (need at least {min})")]
    TooFewCardsForChoice { min: usize },
    /// Option input was not a number within the option range.
    #[error("enter an option number from 1 to {max}")]
    InvalidOption { max: usize },
    /// Question generation failed.
    #[error(transparent)]
    Generation(#[from] GenerationError),
}
