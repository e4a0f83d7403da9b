//! # Application State
//!
//! Core business state for flashdeck. Domain data only, no TUI types.
//! Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── deck: Option<Deck>          // None until the first successful load
//! ├── session: Option<Session>    // always Some once a deck is installed
//! ├── settings: Settings          // defaults for new sessions
//! ├── sources: Vec<PathBuf>       // what was selected, for reloads
//! ├── status_message: String      // status bar text
//! ├── error: Option<String>       // last failure, cleared on success
//! ├── is_loading: bool            // reload in flight
//! └── pending_import: Option<Snapshot> // imported before any deck, applied on load
//! ```
//!
//! State changes only happen through `update(app, action)` in action.rs.

use std::path::PathBuf;

use log::info;

use crate::core::config::ResolvedConfig;
use crate::core::deck::Deck;
use crate::core::scope::ALL_SCOPE;
use crate::core::session::Session;
use crate::core::snapshot::{self, Snapshot};

/// Defaults applied whenever a brand-new session is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub front_first: bool,
    pub font_size: u32,
}

pub struct App {
    pub deck: Option<Deck>,
    pub session: Option<Session>,
    pub settings: Settings,
    pub sources: Vec<PathBuf>,
    pub status_message: String,
    pub error: Option<String>,
    pub is_loading: bool,
    pub pending_import: Option<Snapshot>,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        Self {
            deck: None,
            session: None,
            settings,
            sources: Vec::new(),
            status_message: String::from("Welcome to flashdeck!"),
            error: None,
            is_loading: false,
            pending_import: None,
        }
    }

    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self::new(Settings {
            front_first: config.front_first,
            font_size: config.font_size,
        })
    }

    /// Replace the deck and start a fresh full-deck session over it.
    /// The previous session is discarded, never migrated.
    pub fn install_deck(&mut self, deck: Deck) {
        let session = Session::new(
            &deck,
            ALL_SCOPE,
            self.settings.front_first,
            self.settings.font_size,
        );
        info!(
            "Installed deck: {} cards, {} files",
            deck.len(),
            deck.paths().len()
        );
        self.status_message = format!(
            "Loaded {} cards from {} files",
            deck.len(),
            deck.paths().len()
        );
        self.session = Some(session);
        self.deck = Some(deck);
        self.error = None;
    }

    /// Snapshot of the current session, if there is one.
    pub fn snapshot(&self) -> Option<Snapshot> {
        match (&self.session, &self.deck) {
            (Some(session), Some(deck)) => Some(snapshot::encode(session, deck)),
            _ => None,
        }
    }

    pub fn fail(&mut self, message: String) {
        self.status_message = message.clone();
        self.error = Some(message);
    }
}
