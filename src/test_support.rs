//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::core::deck::{Deck, Document};
use crate::core::session::DEFAULT_FONT_SIZE;
use crate::core::state::{App, Settings};

/// Builds a deck from `(path, csv text)` pairs. Panics on an empty deck.
pub fn deck_from(pairs: &[(&str, &str)]) -> Deck {
    let docs: Vec<Document> = pairs.iter().map(|(p, t)| Document::new(*p, *t)).collect();
    Deck::build(&docs).expect("test deck should have cards")
}

/// Deterministic RNG so shuffles are reproducible.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn test_settings() -> Settings {
    Settings {
        front_first: true,
        font_size: DEFAULT_FONT_SIZE,
    }
}

/// Creates a test App already holding `pairs` as its deck.
pub fn test_app(pairs: &[(&str, &str)]) -> App {
    let mut app = App::new(test_settings());
    app.install_deck(deck_from(pairs));
    app
}
