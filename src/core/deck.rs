//! # Deck Builder
//!
//! Merges the cards of every ingested document into one canonically ordered
//! [`Deck`]. The order only depends on the cards themselves:
//!
//! ```text
//! sort key = (path lowercased, row_index, path)
//! ```
//!
//! so the same documents always give the same deck, no matter which order the
//! reads were issued in or finished in. The trailing raw `path` only breaks
//! ties between paths that differ in case alone.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use log::{info, warn};

use crate::core::card::{Card, parse_document};

/// One source document: a forward-slash path and its decoded text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub path: String,
    pub text: String,
}

impl Document {
    pub fn new(path: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }
}

/// Failures while turning a selection of documents into a deck.
/// None of them touch any existing deck; the caller keeps what it had.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeckError {
    /// The selection held no `.csv` entries at all.
    NoInputFiles,
    /// Documents were read, but not one row produced a valid card.
    EmptyDeck,
    /// At least one document could not be read. The whole batch is dropped.
    ReadFailure {
        path: String,
        message: String,
        failed: usize,
    },
}

impl fmt::Display for DeckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeckError::NoInputFiles => write!(f, "no .csv files selected"),
            DeckError::EmptyDeck => write!(f, "no valid cards found in the selected files"),
            DeckError::ReadFailure {
                path,
                message,
                failed,
            } => {
                if *failed > 1 {
                    write!(f, "failed to read {path}: {message} (and {} more)", failed - 1)
                } else {
                    write!(f, "failed to read {path}: {message}")
                }
            }
        }
    }
}

impl std::error::Error for DeckError {}

/// The full, canonically ordered card collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
    /// Card id → canonical position.
    positions: HashMap<String, usize>,
}

impl Deck {
    /// Parse every document and merge the results.
    ///
    /// An empty input is [`DeckError::NoInputFiles`]; input that parses to
    /// zero cards is [`DeckError::EmptyDeck`]. Neither yields an empty deck.
    pub fn build(documents: &[Document]) -> Result<Self, DeckError> {
        if documents.is_empty() {
            warn!("Deck build requested with no documents");
            return Err(DeckError::NoInputFiles);
        }

        let cards: Vec<Card> = documents
            .iter()
            .flat_map(|doc| parse_document(&doc.text, &doc.path))
            .collect();

        if cards.is_empty() {
            warn!("{} documents parsed to zero cards", documents.len());
            return Err(DeckError::EmptyDeck);
        }

        let deck = Self::from_cards(cards);
        info!(
            "Built deck: {} cards from {} documents",
            deck.len(),
            documents.len()
        );
        Ok(deck)
    }

    /// Order an arbitrary card list canonically.
    pub fn from_cards(mut cards: Vec<Card>) -> Self {
        cards.sort_by(|a, b| {
            a.path
                .to_lowercase()
                .cmp(&b.path.to_lowercase())
                .then(a.row_index.cmp(&b.row_index))
                .then_with(|| a.path.cmp(&b.path))
        });
        let positions = cards
            .iter()
            .enumerate()
            .map(|(i, card)| (card.id.clone(), i))
            .collect();
        Self { cards, positions }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Card> {
        self.positions.get(id).map(|&i| &self.cards[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    /// Canonical position of a card id, if it is in this deck.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    /// All card ids in canonical order.
    pub fn ids(&self) -> Vec<String> {
        self.cards.iter().map(|c| c.id.clone()).collect()
    }

    /// Sorted, de-duplicated source paths. This is the deck's identity.
    pub fn paths(&self) -> Vec<String> {
        self.cards
            .iter()
            .map(|c| c.path.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Sort `ids` into canonical deck order, dropping ids not in the deck.
    pub fn canonical_order<'a, I>(&self, ids: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut known: Vec<(usize, &String)> = ids
            .into_iter()
            .filter_map(|id| self.position(id).map(|pos| (pos, id)))
            .collect();
        known.sort_by_key(|(pos, _)| *pos);
        known.dedup_by_key(|(pos, _)| *pos);
        known.into_iter().map(|(_, id)| id.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(pairs: &[(&str, &str)]) -> Vec<Document> {
        pairs.iter().map(|(p, t)| Document::new(*p, *t)).collect()
    }

    #[test]
    fn test_paths_order_before_rows() {
        let deck = Deck::build(&docs(&[("b/x.csv", "q,a"), ("a.csv", "q,a")])).unwrap();
        let ids = deck.ids();
        assert_eq!(ids, vec!["a.csv::0", "b/x.csv::0"]);
    }

    #[test]
    fn test_order_is_case_insensitive_on_path() {
        let deck = Deck::build(&docs(&[
            ("Zoo.csv", "z,1"),
            ("apple.csv", "a,1"),
            ("Banana.csv", "b,1"),
        ]))
        .unwrap();
        let paths: Vec<&str> = deck.cards().iter().map(|c| c.path.as_str()).collect();
        assert_eq!(paths, vec!["apple.csv", "Banana.csv", "Zoo.csv"]);
    }

    #[test]
    fn test_rows_sorted_numerically_not_lexically() {
        let text = (0..12).map(|i| format!("q{i},a{i}")).collect::<Vec<_>>().join("\n");
        let deck = Deck::build(&docs(&[("n.csv", text.as_str())])).unwrap();
        let rows: Vec<usize> = deck.cards().iter().map(|c| c.row_index).collect();
        assert_eq!(rows, (0..12).collect::<Vec<_>>());
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let base = [
            ("b/x.csv", "1,2\n3,4"),
            ("A.csv", "5,6"),
            ("a.csv", "7,8"),
            ("b/a/y.csv", "9,10"),
        ];
        let expected = Deck::build(&docs(&base)).unwrap();

        let mut permuted = base.to_vec();
        permuted.reverse();
        assert_eq!(Deck::build(&docs(&permuted)).unwrap(), expected);

        permuted.rotate_left(1);
        assert_eq!(Deck::build(&docs(&permuted)).unwrap(), expected);
    }

    #[test]
    fn test_no_documents_is_no_input_files() {
        assert_eq!(Deck::build(&[]), Err(DeckError::NoInputFiles));
    }

    #[test]
    fn test_all_invalid_rows_is_empty_deck() {
        let result = Deck::build(&docs(&[("a.csv", "foo\nbar"), ("b.csv", "")]));
        assert_eq!(result, Err(DeckError::EmptyDeck));
    }

    #[test]
    fn test_paths_are_sorted_unique() {
        let deck = Deck::build(&docs(&[("b.csv", "1,2\n3,4"), ("a.csv", "1,2")])).unwrap();
        assert_eq!(deck.paths(), vec!["a.csv", "b.csv"]);
    }

    #[test]
    fn test_canonical_order_drops_unknown_and_duplicates() {
        let deck = Deck::build(&docs(&[("a.csv", "1,2\n3,4\n5,6")])).unwrap();
        let ids = vec![
            "a.csv::2".to_string(),
            "ghost::0".to_string(),
            "a.csv::0".to_string(),
            "a.csv::2".to_string(),
        ];
        assert_eq!(deck.canonical_order(&ids), vec!["a.csv::0", "a.csv::2"]);
    }

    #[test]
    fn test_read_failure_display_mentions_extra_failures() {
        let err = DeckError::ReadFailure {
            path: "x.csv".to_string(),
            message: "permission denied".to_string(),
            failed: 3,
        };
        assert_eq!(
            err.to_string(),
            "failed to read x.csv: permission denied (and 2 more)"
        );
    }
}
