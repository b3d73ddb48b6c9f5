//! Flashcard session: flip through a deck, sorting cards into known and
//! still-learning piles.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::models::{Card, Deck};
use crate::session::{SessionError, SessionResult};

/// Where a flashcard session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashcardPhase {
    /// Showing a card, possibly revealed.
    Studying,
    /// A round has finished; waiting on what to do next.
    RoundComplete,
    /// The session is over.
    Ended,
}

/// A flip-through session over one deck.
///
/// Cards are grouped by index into session-local known and learning piles.
/// The deck is only read; familiarity levels never change here.
#[derive(Debug)]
pub struct FlashcardSession<'a> {
    deck: &'a Deck,
    rng: StdRng,
    shuffle: bool,
    /// Card indices for the current round, in study order.
    order: Vec<usize>,
    position: usize,
    revealed: bool,
    known: Vec<usize>,
    learning: Vec<usize>,
    phase: FlashcardPhase,
}

impl<'a> FlashcardSession<'a> {
    /// Start a session over the whole deck.
    pub fn new(deck: &'a Deck, shuffle: bool) -> SessionResult<Self> {
        Self::with_rng(deck, shuffle, StdRng::from_os_rng())
    }

    /// Start a session with a caller-seeded generator.
    pub fn with_rng(deck: &'a Deck, shuffle: bool, rng: StdRng) -> SessionResult<Self> {
        if deck.cards.is_empty() {
            return Err(SessionError::EmptyDeck);
        }

        let mut session = Self {
            deck,
            rng,
            shuffle,
            order: Vec::new(),
            position: 0,
            revealed: false,
            known: Vec::new(),
            learning: Vec::new(),
            phase: FlashcardPhase::Studying,
        };
        session.start_round((0..deck.cards.len()).collect());
        Ok(session)
    }

    fn start_round(&mut self, mut order: Vec<usize>) {
        if self.shuffle {
            order.shuffle(&mut self.rng);
        }
        self.order = order;
        self.position = 0;
        self.revealed = false;
        self.known.clear();
        self.learning.clear();
        self.phase = FlashcardPhase::Studying;
    }

    /// Current phase.
    pub fn phase(&self) -> FlashcardPhase {
        self.phase
    }

    /// The card being studied, if any.
    pub fn current_card(&self) -> Option<&Card> {
        if self.phase != FlashcardPhase::Studying {
            return None;
        }
        self.order.get(self.position).map(|&i| &self.deck.cards[i])
    }

    /// Whether the current card's definition is showing.
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Zero-based position within the round.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Cards in the current round.
    pub fn round_len(&self) -> usize {
        self.order.len()
    }

    /// Cards marked known so far this round.
    pub fn known_count(&self) -> usize {
        self.known.len()
    }

    /// Cards marked still-learning so far this round.
    pub fn learning_count(&self) -> usize {
        self.learning.len()
    }

    /// Show the current card's definition.
    pub fn reveal(&mut self) {
        if self.phase == FlashcardPhase::Studying {
            self.revealed = true;
        }
    }

    /// Put the current card in the known pile and move on.
    ///
    /// Does nothing until the card has been revealed.
    pub fn mark_known(&mut self) {
        if self.phase == FlashcardPhase::Studying && self.revealed {
            let index = self.order[self.position];
            self.known.push(index);
            self.advance();
        }
    }

    /// Put the current card in the learning pile and move on.
    ///
    /// Does nothing until the card has been revealed.
    pub fn mark_learning(&mut self) {
        if self.phase == FlashcardPhase::Studying && self.revealed {
            let index = self.order[self.position];
            self.learning.push(index);
            self.advance();
        }
    }

    fn advance(&mut self) {
        self.revealed = false;
        self.position += 1;
        if self.position >= self.order.len() {
            self.phase = FlashcardPhase::RoundComplete;
        }
    }

    /// Whether the finished round ended with every card known.
    pub fn all_known(&self) -> bool {
        self.phase == FlashcardPhase::RoundComplete && self.learning.is_empty()
    }

    /// Start a new round over the cards still being learned.
    pub fn review_learning(&mut self) {
        if self.phase == FlashcardPhase::RoundComplete && !self.learning.is_empty() {
            let order = std::mem::take(&mut self.learning);
            self.start_round(order);
        }
    }

    /// Start a new round over the whole deck.
    pub fn restart(&mut self) {
        if self.phase == FlashcardPhase::RoundComplete {
            self.start_round((0..self.deck.cards.len()).collect());
        }
    }

    /// End the session.
    pub fn end(&mut self) {
        self.revealed = false;
        self.phase = FlashcardPhase::Ended;
    }
}
