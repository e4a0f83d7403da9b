//! # Document Normalizer
//!
//! Turns the raw text of one CSV document into validated [`Card`]s.
//!
//! Row indices count *every* line of the document, including the ones that
//! get skipped. That keeps card ids stable across re-parses: if row 3 is
//! malformed today it is still row 3 tomorrow, and row 4 is still `::4`.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::core::csv::split_line;

/// One term/definition pair from a single CSV row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// `path::rowIndex`, stable for an unmodified document.
    pub id: String,
    pub path: String,
    pub row_index: usize,
    pub front: String,
    pub back: String,
}

impl Card {
    pub fn new(path: &str, row_index: usize, front: String, back: String) -> Self {
        Self {
            id: card_id(path, row_index),
            path: path.to_string(),
            row_index,
            front,
            back,
        }
    }
}

/// Builds the composite id for the card at `row_index` in `path`.
pub fn card_id(path: &str, row_index: usize) -> String {
    format!("{path}::{row_index}")
}

/// Parse one document into cards, in row order.
///
/// Rows with fewer than two fields, or whose first two fields are blank after
/// cleaning, are dropped. Extra fields past the second are ignored.
pub fn parse_document(text: &str, path: &str) -> Vec<Card> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut cards = Vec::new();
    let mut skipped = 0usize;

    // `lines()` accepts both "\n" and "\r\n".
    for (row_index, line) in text.lines().enumerate() {
        let fields = split_line(line);
        if fields.len() < 2 {
            skipped += 1;
            continue;
        }
        let front = clean_field(&fields[0]);
        let back = clean_field(&fields[1]);
        if front.is_empty() || back.is_empty() {
            skipped += 1;
            continue;
        }
        cards.push(Card::new(path, row_index, front.to_string(), back.to_string()));
    }

    debug!(
        "Parsed {}: {} cards, {} rows skipped",
        path,
        cards.len(),
        skipped
    );
    cards
}

/// Trim, strip one layer of wrapping quotes, trim again.
fn clean_field(field: &str) -> &str {
    let trimmed = field.trim();
    let unwrapped = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed);
    unwrapped.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_row_becomes_card() {
        let cards = parse_document(r#""Capital of France","Paris""#, "a.csv");
        assert_eq!(
            cards,
            vec![Card {
                id: "a.csv::0".to_string(),
                path: "a.csv".to_string(),
                row_index: 0,
                front: "Capital of France".to_string(),
                back: "Paris".to_string(),
            }]
        );
    }

    #[test]
    fn test_line_without_comma_contributes_nothing() {
        assert!(parse_document("foo", "a.csv").is_empty());
    }

    #[test]
    fn test_row_index_counts_skipped_lines() {
        let text = "term,definition\nbroken\n,empty front\nback empty,\nx,y\n";
        let cards = parse_document(text, "deck.csv");
        let ids: Vec<&str> = cards.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["deck.csv::0", "deck.csv::4"]);
    }

    #[test]
    fn test_crlf_and_lf_give_same_cards() {
        let lf = parse_document("a,1\nb,2\n", "x.csv");
        let crlf = parse_document("a,1\r\nb,2\r\n", "x.csv");
        assert_eq!(lf, crlf);
        assert_eq!(crlf[1].back, "2");
    }

    #[test]
    fn test_fields_are_trimmed_and_unwrapped_once() {
        let cards = parse_document(r#"  """hello"""  ,  world  "#, "q.csv");
        // Parser leaves `"hello"`, normalizer strips exactly one layer.
        assert_eq!(cards[0].front, "hello");
        assert_eq!(cards[0].back, "world");

        let nested = parse_document(r#""""""x"""""",y"#, "q.csv");
        assert_eq!(nested[0].front, "\"x\"");
    }

    #[test]
    fn test_whitespace_only_fields_are_dropped() {
        assert!(parse_document("   ,  \n\" \",x", "w.csv").is_empty());
    }

    #[test]
    fn test_extra_columns_ignored() {
        let cards = parse_document("front,back,notes,more", "e.csv");
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].back, "back");
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let cards = parse_document("\u{feff}front,back", "bom.csv");
        assert_eq!(cards[0].front, "front");
    }

    #[test]
    fn test_reparse_is_stable() {
        let text = "a,b\n\nc,d";
        assert_eq!(parse_document(text, "s.csv"), parse_document(text, "s.csv"));
        assert_eq!(parse_document(text, "s.csv")[1].id, "s.csv::2");
    }
}
