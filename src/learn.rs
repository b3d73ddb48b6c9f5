//! Learn session: type the definition for each prompt and move cards up and
//! down the mastery ladder as you go.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::grading::{self, DEFAULT_STRICTNESS};
use crate::mastery::{self, MAX_LEVEL};
use crate::models::{Card, Deck};
use crate::session::{SessionError, SessionResult};

/// Default round size.
pub const DEFAULT_CARDS_PER_ROUND: usize = 7;

/// Knobs chosen at session setup.
#[derive(Debug, Clone, Copy)]
pub struct LearnSettings {
    /// Cards drawn per round, `1..=deck size`.
    pub cards_per_round: usize,
    /// Shuffle each round instead of studying weakest cards first.
    pub shuffle: bool,
    /// Accept close-enough written answers.
    pub smart_grading: bool,
    /// Similarity threshold for smart grading.
    pub strictness: f32,
}

impl Default for LearnSettings {
    fn default() -> Self {
        Self {
            cards_per_round: DEFAULT_CARDS_PER_ROUND,
            shuffle: true,
            smart_grading: true,
            strictness: DEFAULT_STRICTNESS,
        }
    }
}

impl LearnSettings {
    /// Defaults with the round size capped at the deck size.
    pub fn for_deck(deck: &Deck) -> Self {
        Self {
            cards_per_round: DEFAULT_CARDS_PER_ROUND.min(deck.cards.len()).max(1),
            ..Self::default()
        }
    }
}

/// Where a learn session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LearnPhase {
    /// Waiting for the answer to the current card.
    Prompt,
    /// Showing how the last answer was graded.
    Feedback,
    /// A round has finished; waiting on what to do next.
    RoundComplete,
    /// Every card in the deck is at the top of the ladder.
    AllMastered,
    /// The session is over.
    Ended,
}

/// How a submitted answer was graded, with the card's new standing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    /// Whether the answer was accepted.
    pub correct: bool,
    /// Whether it matched the definition exactly after normalization.
    pub exact: bool,
    /// The answer as typed.
    pub user_answer: String,
    /// The card's definition.
    pub expected: String,
    /// Familiarity level after grading.
    pub level: u8,
    /// Display label for the new level.
    pub level_label: &'static str,
}

/// A graded recall session over one deck.
///
/// Holding the deck mutably for the whole session means nothing else can
/// touch the cards until it ends. Mastery changes land at grading time, so
/// an interrupted session keeps the progress already made.
#[derive(Debug)]
pub struct LearnSession<'a> {
    deck: &'a mut Deck,
    settings: LearnSettings,
    rng: StdRng,
    /// Card indices for the current round, in study order.
    round: Vec<usize>,
    position: usize,
    feedback: Option<AnswerFeedback>,
    phase: LearnPhase,
}

impl<'a> LearnSession<'a> {
    /// Start a session with the given settings.
    pub fn new(deck: &'a mut Deck, settings: LearnSettings) -> SessionResult<Self> {
        Self::with_rng(deck, settings, StdRng::from_os_rng())
    }

    /// Start a session with a caller-seeded generator.
    pub fn with_rng(
        deck: &'a mut Deck,
        settings: LearnSettings,
        rng: StdRng,
    ) -> SessionResult<Self> {
        if deck.cards.is_empty() {
            return Err(SessionError::EmptyDeck);
        }
        if settings.cards_per_round == 0 || settings.cards_per_round > deck.cards.len() {
            return Err(SessionError::InvalidRoundSize {
                max: deck.cards.len(),
            });
        }

        let mut session = Self {
            deck,
            settings,
            rng,
            round: Vec::new(),
            position: 0,
            feedback: None,
            phase: LearnPhase::Prompt,
        };
        session.select_round();
        Ok(session)
    }

    /// Pick the next round from the cards still below the top of the ladder.
    fn select_round(&mut self) {
        let mut working: Vec<usize> = (0..self.deck.cards.len())
            .filter(|&i| self.deck.cards[i].familiarity_level < MAX_LEVEL)
            .collect();

        if working.is_empty() {
            self.round.clear();
            self.position = 0;
            self.feedback = None;
            self.phase = LearnPhase::AllMastered;
            return;
        }

        if self.settings.shuffle {
            working.shuffle(&mut self.rng);
        } else {
            // Weakest first; the sort is stable so ties keep deck order.
            working.sort_by_key(|&i| self.deck.cards[i].familiarity_level);
        }
        working.truncate(self.settings.cards_per_round);

        self.round = working;
        self.position = 0;
        self.feedback = None;
        self.phase = LearnPhase::Prompt;
    }

    /// Current phase.
    pub fn phase(&self) -> LearnPhase {
        self.phase
    }

    /// The card being asked or just graded, if any.
    pub fn current_card(&self) -> Option<&Card> {
        match self.phase {
            LearnPhase::Prompt | LearnPhase::Feedback => {
                self.round.get(self.position).map(|&i| &self.deck.cards[i])
            }
            _ => None,
        }
    }

    /// Zero-based position within the round.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Cards in the current round.
    pub fn round_len(&self) -> usize {
        self.round.len()
    }

    /// Grading details for the last submitted answer.
    pub fn feedback(&self) -> Option<&AnswerFeedback> {
        self.feedback.as_ref()
    }

    /// Grade an answer for the current card and apply the mastery change.
    ///
    /// Returns the feedback, or `None` outside the prompt phase.
    pub fn submit_answer(&mut self, answer: &str) -> Option<&AnswerFeedback> {
        if self.phase != LearnPhase::Prompt {
            return None;
        }

        let index = self.round[self.position];
        let card = &mut self.deck.cards[index];

        let correct = grading::written_answer_correct(
            &card.definition,
            Some(answer),
            self.settings.smart_grading,
            self.settings.strictness,
        );
        if correct {
            mastery::on_correct(card);
        } else {
            mastery::on_incorrect(card);
        }

        self.feedback = Some(AnswerFeedback {
            correct,
            exact: grading::is_exact_match(&card.definition, answer),
            user_answer: answer.to_string(),
            expected: card.definition.clone(),
            level: card.familiarity_level,
            level_label: mastery::level_label(card.familiarity_level),
        });
        self.phase = LearnPhase::Feedback;
        self.feedback.as_ref()
    }

    /// Move past the feedback to the next card or the round summary.
    pub fn advance(&mut self) {
        if self.phase != LearnPhase::Feedback {
            return;
        }

        self.feedback = None;
        self.position += 1;
        if self.position >= self.round.len() {
            self.phase = LearnPhase::RoundComplete;
        } else {
            self.phase = LearnPhase::Prompt;
        }
    }

    /// Start the next round, re-reading the deck so newly mastered cards
    /// drop out.
    pub fn next_round(&mut self) {
        if self.phase == LearnPhase::RoundComplete {
            self.select_round();
        }
    }

    /// From the all-mastered screen: zero every card's level and start over.
    pub fn reset_progress(&mut self) {
        if self.phase == LearnPhase::AllMastered {
            for card in &mut self.deck.cards {
                card.familiarity_level = 0;
            }
            self.select_round();
        }
    }

    /// End the session. Mastery changes already applied are kept.
    pub fn end(&mut self) {
        self.phase = LearnPhase::Ended;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Card;

    fn deck_with_levels(levels: &[u8]) -> Deck {
        let mut deck = Deck::new("t", "Test");
        deck.cards = levels
            .iter()
            .enumerate()
            .map(|(i, &lvl)| {
                let mut card = Card::new(format!("term{i}"), format!("def{i}"));
                card.familiarity_level = lvl;
                card
            })
            .collect();
        deck
    }

    fn ordered_settings(cards_per_round: usize) -> LearnSettings {
        LearnSettings {
            cards_per_round,
            shuffle: false,
            smart_grading: true,
            strictness: DEFAULT_STRICTNESS,
        }
    }

    fn seeded(deck: &mut Deck, settings: LearnSettings) -> LearnSession<'_> {
        LearnSession::with_rng(deck, settings, StdRng::seed_from_u64(21)).unwrap()
    }

    #[test]
    fn test_empty_deck_refused() {
        let mut deck = Deck::new("t", "Empty");
        assert_eq!(
            LearnSession::new(&mut deck, LearnSettings::default()).unwrap_err(),
            SessionError::EmptyDeck
        );
    }

    #[test]
    fn test_round_size_validated() {
        let mut deck = deck_with_levels(&[0, 0]);
        let err = LearnSession::with_rng(
            &mut deck,
            ordered_settings(3),
            StdRng::seed_from_u64(0),
        )
        .unwrap_err();
        assert_eq!(err, SessionError::InvalidRoundSize { max: 2 });
    }

    #[test]
    fn test_settings_for_deck_caps_round_size() {
        let deck = deck_with_levels(&[0, 0, 0]);
        assert_eq!(LearnSettings::for_deck(&deck).cards_per_round, 3);

        let big = deck_with_levels(&[0; 20]);
        assert_eq!(LearnSettings::for_deck(&big).cards_per_round, 7);
    }

    #[test]
    fn test_round_takes_weakest_first_stably() {
        let mut deck = deck_with_levels(&[3, 1, 1, 0]);
        let mut session = seeded(&mut deck, ordered_settings(3));

        let mut order = Vec::new();
        while let Some(card) = session.current_card() {
            order.push(card.term.clone());
            session.submit_answer("wrong");
            session.advance();
        }
        assert_eq!(order, vec!["term3", "term1", "term2"]);
    }

    #[test]
    fn test_round_excludes_mastered_cards() {
        let mut deck = deck_with_levels(&[4, 0, 4]);
        let session = seeded(&mut deck, ordered_settings(1));
        assert_eq!(session.round_len(), 1);
        assert_eq!(session.current_card().unwrap().term, "term1");
    }

    #[test]
    fn test_correct_answer_promotes_immediately() {
        let mut deck = deck_with_levels(&[0]);
        let mut session = seeded(&mut deck, ordered_settings(1));

        let feedback = session.submit_answer("def0").unwrap();
        assert!(feedback.correct);
        assert!(feedback.exact);
        assert_eq!(feedback.level, 2);
        assert_eq!(feedback.level_label, "Familiar");
        assert_eq!(session.phase(), LearnPhase::Feedback);

        drop(session);
        assert_eq!(deck.cards[0].familiarity_level, 2);
    }

    #[test]
    fn test_smart_grading_accepts_close_answer() {
        let mut deck = deck_with_levels(&[1]);
        deck.cards[0].definition = "Paris".to_string();
        let mut session = seeded(&mut deck, ordered_settings(1));

        let feedback = session.submit_answer("Pari").unwrap();
        assert!(feedback.correct);
        assert!(!feedback.exact);
        assert_eq!(feedback.level, 2);
    }

    #[test]
    fn test_exact_grading_rejects_close_answer() {
        let mut deck = deck_with_levels(&[2]);
        deck.cards[0].definition = "Paris".to_string();
        let settings = LearnSettings {
            smart_grading: false,
            ..ordered_settings(1)
        };
        let mut session = seeded(&mut deck, settings);

        let feedback = session.submit_answer("Pari").unwrap();
        assert!(!feedback.correct);
        assert_eq!(feedback.level, 1);
    }

    #[test]
    fn test_next_round_drops_newly_mastered() {
        let mut deck = deck_with_levels(&[3, 0]);
        let mut session = seeded(&mut deck, ordered_settings(2));

        // Weakest first: term1 (level 0), then term0 (level 3).
        session.submit_answer("def1");
        session.advance();
        session.submit_answer("def0");
        session.advance();
        assert_eq!(session.phase(), LearnPhase::RoundComplete);

        // term0 reached the top, so only term1 comes back.
        session.next_round();
        assert_eq!(session.round_len(), 1);
        assert_eq!(session.current_card().unwrap().term, "term1");
    }

    #[test]
    fn test_all_mastered_and_reset() {
        let mut deck = deck_with_levels(&[4, 4]);
        let mut session = seeded(&mut deck, ordered_settings(2));
        assert_eq!(session.phase(), LearnPhase::AllMastered);
        assert!(session.current_card().is_none());

        session.reset_progress();
        assert_eq!(session.phase(), LearnPhase::Prompt);
        assert_eq!(session.round_len(), 2);

        drop(session);
        assert!(deck.cards.iter().all(|c| c.familiarity_level == 0));
    }

    #[test]
    fn test_interrupted_session_keeps_progress() {
        let mut deck = deck_with_levels(&[0, 0]);
        {
            let mut session = seeded(&mut deck, ordered_settings(2));
            session.submit_answer("def0");
            session.end();
        }
        assert_eq!(deck.cards[0].familiarity_level, 2);
        assert_eq!(deck.cards[1].familiarity_level, 0);
    }

    #[test]
    fn test_submit_outside_prompt_is_ignored() {
        let mut deck = deck_with_levels(&[0]);
        let mut session = seeded(&mut deck, ordered_settings(1));

        session.submit_answer("def0");
        assert!(session.submit_answer("again").is_none());

        session.end();
        assert!(session.submit_answer("def0").is_none());
    }
}
