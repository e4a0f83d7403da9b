//! # Scope Filter
//!
//! A scope is a string key that picks a subset of the deck:
//!
//! ```text
//! "__all__"        → every card
//! "lang/es"        → every card under the folder lang/es/
//! "lang/es/a.csv"  → every card from exactly that file
//! anything else    → no cards
//! ```
//!
//! Folder keys are checked before file keys. A key nothing matches is not an
//! error: it only shows up via foreign or corrupted snapshots, and an empty
//! session is still a valid thing to display.

use std::collections::BTreeSet;

use crate::core::card::Card;
use crate::core::deck::Deck;

/// Scope key selecting the whole deck.
pub const ALL_SCOPE: &str = "__all__";

/// What a scope key resolved to against a particular deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeKind {
    All,
    Folder(String),
    File(String),
    Unknown(String),
}

/// Every ancestor folder of every card path, sorted.
pub fn derive_folders(deck: &Deck) -> Vec<String> {
    let mut folders = BTreeSet::new();
    for path in deck.paths() {
        let parts: Vec<&str> = path.split('/').collect();
        // Proper prefixes only: the last part is the file name.
        for end in 1..parts.len() {
            let prefix = parts[..end].join("/");
            if !prefix.is_empty() && !parts[end - 1].is_empty() {
                folders.insert(prefix);
            }
        }
    }
    folders.into_iter().collect()
}

/// Distinct card paths, sorted.
pub fn derive_files(deck: &Deck) -> Vec<String> {
    deck.paths()
}

pub fn resolve_scope(deck: &Deck, key: &str) -> ScopeKind {
    if key == ALL_SCOPE {
        return ScopeKind::All;
    }
    if derive_folders(deck).iter().any(|f| f == key) {
        return ScopeKind::Folder(key.to_string());
    }
    if deck.cards().iter().any(|c| c.path == key) {
        return ScopeKind::File(key.to_string());
    }
    ScopeKind::Unknown(key.to_string())
}

/// Cards in scope `key`, in canonical deck order.
pub fn select_scope<'a>(deck: &'a Deck, key: &str) -> Vec<&'a Card> {
    match resolve_scope(deck, key) {
        ScopeKind::All => deck.cards().iter().collect(),
        ScopeKind::Folder(folder) => {
            let prefix = format!("{folder}/");
            deck.cards()
                .iter()
                .filter(|c| c.path.starts_with(&prefix))
                .collect()
        }
        ScopeKind::File(file) => deck.cards().iter().filter(|c| c.path == file).collect(),
        ScopeKind::Unknown(_) => Vec::new(),
    }
}

/// Ids of the cards in scope `key`, in canonical deck order.
pub fn select_scope_ids(deck: &Deck, key: &str) -> Vec<String> {
    select_scope(deck, key)
        .into_iter()
        .map(|c| c.id.clone())
        .collect()
}

/// One entry a presentation layer can offer for scope selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeOption {
    pub key: String,
    pub label: String,
    pub card_count: usize,
}

/// ALL first, then folders, then files.
pub fn scope_options(deck: &Deck) -> Vec<ScopeOption> {
    let mut options = vec![ScopeOption {
        key: ALL_SCOPE.to_string(),
        label: scope_label(ALL_SCOPE),
        card_count: deck.len(),
    }];
    for key in derive_folders(deck).into_iter().chain(derive_files(deck)) {
        let card_count = select_scope(deck, &key).len();
        options.push(ScopeOption {
            label: scope_label(&key),
            key,
            card_count,
        });
    }
    options
}

/// Human-readable name for a scope key.
pub fn scope_label(key: &str) -> String {
    if key == ALL_SCOPE {
        "All cards".to_string()
    } else if key.to_lowercase().ends_with(".csv") {
        key.to_string()
    } else {
        format!("{key}/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::deck_from;

    fn sample_deck() -> Deck {
        deck_from(&[
            ("lang/es/verbs.csv", "ser,to be\nir,to go"),
            ("lang/fr.csv", "etre,to be"),
            ("lang/es2.csv", "x,y"),
            ("math.csv", "2+2,4"),
        ])
    }

    #[test]
    fn test_derive_folders_lists_every_ancestor() {
        assert_eq!(derive_folders(&sample_deck()), vec!["lang", "lang/es"]);
    }

    #[test]
    fn test_derive_files_sorted_unique() {
        assert_eq!(
            derive_files(&sample_deck()),
            vec!["lang/es/verbs.csv", "lang/es2.csv", "lang/fr.csv", "math.csv"]
        );
    }

    #[test]
    fn test_select_all() {
        let deck = sample_deck();
        assert_eq!(select_scope(&deck, ALL_SCOPE).len(), 5);
    }

    #[test]
    fn test_folder_scope_respects_path_boundary() {
        let deck = sample_deck();
        // `lang/es2.csv` shares the prefix `lang/es` but is not inside the folder.
        let ids = select_scope_ids(&deck, "lang/es");
        assert_eq!(ids, vec!["lang/es/verbs.csv::0", "lang/es/verbs.csv::1"]);
    }

    #[test]
    fn test_file_scope() {
        let deck = sample_deck();
        assert_eq!(select_scope_ids(&deck, "math.csv"), vec!["math.csv::0"]);
    }

    #[test]
    fn test_unknown_key_is_empty_not_error() {
        let deck = sample_deck();
        assert!(select_scope(&deck, "nope/").is_empty());
        assert_eq!(
            resolve_scope(&deck, "nope/"),
            ScopeKind::Unknown("nope/".to_string())
        );
    }

    #[test]
    fn test_scope_options_order_and_counts() {
        let options = scope_options(&sample_deck());
        let keys: Vec<&str> = options.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                ALL_SCOPE,
                "lang",
                "lang/es",
                "lang/es/verbs.csv",
                "lang/es2.csv",
                "lang/fr.csv",
                "math.csv"
            ]
        );
        assert_eq!(options[1].card_count, 4);
        assert_eq!(options[1].label, "lang/");
        assert_eq!(options[0].label, "All cards");
    }
}
