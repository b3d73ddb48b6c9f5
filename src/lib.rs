//! Core engine for a flashcard study trainer.
//!
//! This crate provides the whole study loop without any rendering: a profile
//! of decks with per-card mastery tracking, three kinds of study session, and
//! atomic JSON persistence that trashes files instead of deleting them.
//!
//! # Features
//!
//! - **Mastery Ladder**: Five familiarity levels with weighted deck progress
//! - **Flashcards**: Read-only card flipping into known/learning buckets
//! - **Learn**: Typed-answer rounds that promote and demote cards as you go
//! - **Practice Test**: Written or multiple-choice tests graded once on submit
//! - **Smart Grading**: Similarity-ratio matching for typed answers
//! - **Crash Safety**: Temp-file-then-rename writes, orphan files kept in a trash directory

pub mod crash;
pub mod flashcards;
pub mod grading;
pub mod learn;
pub mod mastery;
pub mod models;
pub mod questions;
pub mod session;
pub mod storage;

// Re-exports
pub use flashcards::{FlashcardPhase, FlashcardSession};
pub use learn::{AnswerFeedback, LearnPhase, LearnSession, LearnSettings};
pub use models::{Card, Config, Deck, DeckError, Profile};
pub use practice_test::{
    QuestionKind, QuestionOutcome, QuestionResult, QuestionStatus, TestReport, TestSession,
    TestSettings,
};
pub use questions::{GenerationError, Question};
pub use session::{SessionError, SessionKind, SessionResult};
pub use storage::{DeckLoadFailure, LoadCategory, LoadStatus, StorageError, StorageResult, Store};
