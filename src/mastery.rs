//! Familiarity ladder: per-card mastery transitions and deck progress.

use crate::models::{Card, Deck};

/// Highest familiarity rung; terminal under `on_correct`.
pub const MAX_LEVEL: u8 = 4;

/// Number of rungs on the ladder.
pub const LEVEL_COUNT: usize = 5;

/// Display label and progress weight per rung, lowest first.
const LEVELS: [(&str, f64); LEVEL_COUNT] = [
    ("New", 0.0),
    ("Learning", 0.15),
    ("Familiar", 0.4),
    ("Proficient", 0.7),
    ("Mastered", 1.0),
];

/// Display label for a familiarity level, clamped to the ladder.
pub fn level_label(level: u8) -> &'static str {
    LEVELS[(level as usize).min(LEVEL_COUNT - 1)].0
}

/// Progress weight for a familiarity level, clamped to the ladder.
pub fn level_weight(level: u8) -> f64 {
    LEVELS[(level as usize).min(LEVEL_COUNT - 1)].1
}

/// Promote a card after a correct answer.
pub fn on_correct(card: &mut Card) {
    if card.familiarity_level == 0 {
        // A brand-new card answered correctly skips a rung.
        card.familiarity_level = 2;
        return;
    }

    card.familiarity_level = (card.familiarity_level + 1).min(MAX_LEVEL);
}

/// Demote a card after an incorrect answer.
///
/// A card that has been attempted at least once never drops back to
/// completely new, so the floor is level 1.
pub fn on_incorrect(card: &mut Card) {
    card.familiarity_level = card.familiarity_level.saturating_sub(1).max(1);
}

/// Overall deck progress as the mean of card weights, in `[0, 1]`.
///
/// An empty deck reports 0: nothing studied, no progress.
pub fn deck_progress(deck: &Deck) -> f64 {
    if deck.cards.is_empty() {
        return 0.0;
    }

    let total: f64 = deck
        .cards
        .iter()
        .map(|card| level_weight(card.familiarity_level))
        .sum();
    total / deck.cards.len() as f64
}

/// Number of cards sitting at each rung, lowest first.
pub fn level_counts(deck: &Deck) -> [usize; LEVEL_COUNT] {
    let mut counts = [0; LEVEL_COUNT];
    for card in &deck.cards {
        counts[(card.familiarity_level as usize).min(LEVEL_COUNT - 1)] += 1;
    }
    counts
}
