//! Core data model: cards, decks, profile, persisted preferences.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors from deck collection operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeckError {
    /// Deck names must be non-empty.
    #[error("deck name cannot be empty")]
    EmptyName,
    /// Deck names and filenames must be unique within a profile.
    #[error("a deck named '{0}' already exists")]
    AlreadyExists(String),
    /// No deck with the given name.
    #[error("deck '{0}' doesn't exist")]
    NotFound(String),
}

/// A single term/definition pair with its mastery rung.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// The prompt side.
    pub term: String,
    /// The answer side.
    pub definition: String,
    /// Mastery rung, 0 (new) through 4 (mastered).
    pub familiarity_level: u8,
}

impl Card {
    /// Create a new card at the lowest familiarity level.
    pub fn new(term: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            definition: definition.into(),
            familiarity_level: 0,
        }
    }
}

/// An ordered collection of cards.
///
/// The `filename` is the deck's stable storage identity: assigned once at
/// creation and never changed, so renaming a deck never moves its file. It
/// lives in the profile head record, not in the deck file itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    /// Caller-supplied creation timestamp, stored verbatim.
    pub creation_date: String,
    /// Display name, unique within a profile.
    pub name: String,
    /// Cards in display order.
    #[serde(default)]
    pub cards: Vec<Card>,
    /// Storage filename; filled in by the store on load.
    #[serde(skip)]
    pub filename: String,
}

impl Deck {
    /// Create an empty deck with a freshly generated storage filename.
    pub fn new(creation_date: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            creation_date: creation_date.into(),
            name: name.into(),
            cards: Vec::new(),
            filename: format!("{}.json", Uuid::new_v4()),
        }
    }

    /// Number of cards.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Whether the deck has no cards.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Insert a card at `index`, clamped to the end of the deck.
    pub fn insert_card(&mut self, index: usize, card: Card) {
        let index = index.min(self.cards.len());
        self.cards.insert(index, card);
    }

    /// Remove and return the card at `index`, if it exists.
    pub fn remove_card(&mut self, index: usize) -> Option<Card> {
        if index < self.cards.len() {
            Some(self.cards.remove(index))
        } else {
            None
        }
    }

    /// Swap the card at `index` with its predecessor. Returns whether it moved.
    pub fn move_card_up(&mut self, index: usize) -> bool {
        if index > 0 && index < self.cards.len() {
            self.cards.swap(index, index - 1);
            true
        } else {
            false
        }
    }

    /// Swap the card at `index` with its successor. Returns whether it moved.
    pub fn move_card_down(&mut self, index: usize) -> bool {
        if index + 1 < self.cards.len() {
            self.cards.swap(index, index + 1);
            true
        } else {
            false
        }
    }
}

/// Persisted user preferences.
///
/// Unknown keys in stored data are dropped and missing keys take their
/// defaults, so the saved shape tracks this struct across versions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Warn before discarding unsaved state on interrupt.
    #[serde(default)]
    pub warn_interrupt: bool,
}

/// Top-level aggregate: a named owner of decks and preferences.
#[derive(Debug, Clone, Default)]
pub struct Profile {
    /// Profile display name.
    pub name: String,
    /// Decks in storage order.
    pub decks: Vec<Deck>,
    /// Persisted preferences.
    pub config: Config,
}

impl Profile {
    /// Create an empty profile.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            decks: Vec::new(),
            config: Config::default(),
        }
    }

    /// Add a new empty deck. Names and filenames must be unique.
    pub fn new_deck(
        &mut self,
        timestamp: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<&Deck, DeckError> {
        let name = name.into();
        if name.is_empty() {
            return Err(DeckError::EmptyName);
        }
        if self.decks.iter().any(|d| d.name == name) {
            return Err(DeckError::AlreadyExists(name));
        }

        let deck = Deck::new(timestamp, name);
        if self.decks.iter().any(|d| d.filename == deck.filename) {
            return Err(DeckError::AlreadyExists(deck.filename));
        }

        let idx = self.decks.len();
        self.decks.push(deck);
        Ok(&self.decks[idx])
    }

    /// Remove the deck with the given name.
    ///
    /// Only the in-memory collection changes; the next save moves the deck's
    /// file to the trash directory.
    pub fn remove_deck(&mut self, name: &str) -> Result<(), DeckError> {
        let idx = self
            .decks
            .iter()
            .position(|d| d.name == name)
            .ok_or_else(|| DeckError::NotFound(name.to_string()))?;
        self.decks.remove(idx);
        Ok(())
    }

    /// Rename a deck. The storage filename is untouched.
    pub fn rename_deck(&mut self, name: &str, new_name: impl Into<String>) -> Result<(), DeckError> {
        let new_name = new_name.into();
        if new_name.is_empty() {
            return Err(DeckError::EmptyName);
        }

        let idx = self
            .decks
            .iter()
            .position(|d| d.name == name)
            .ok_or_else(|| DeckError::NotFound(name.to_string()))?;
        if self
            .decks
            .iter()
            .enumerate()
            .any(|(i, d)| i != idx && d.name == new_name)
        {
            return Err(DeckError::AlreadyExists(new_name));
        }

        self.decks[idx].name = new_name;
        Ok(())
    }

    /// Look up a deck by name.
    pub fn find_deck(&self, name: &str) -> Option<&Deck> {
        self.decks.iter().find(|d| d.name == name)
    }

    /// Look up a deck by name, mutably.
    pub fn find_deck_mut(&mut self, name: &str) -> Option<&mut Deck> {
        self.decks.iter_mut().find(|d| d.name == name)
    }
}
