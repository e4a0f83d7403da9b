//! # Actions
//!
//! Everything that can happen in flashdeck becomes an `Action`.
//! User presses `x`? That's `Action::Answer(Outcome::Incorrect)`.
//! A reload finishes? That's `Action::DeckLoaded(deck)`.
//!
//! The `update()` function applies one action to the state and returns an
//! [`Effect`]: the I/O the adapter should perform next. No I/O happens here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! Failures are validated before anything is touched, so a rejected action
//! leaves the state exactly as it was, apart from the status line.

use log::{debug, info, warn};
use rand::Rng;

use crate::core::deck::{Deck, DeckError};
use crate::core::session::{Outcome, clamp_font_size};
use crate::core::snapshot::{self, Snapshot, SnapshotError};
use crate::core::state::App;

/// Font size step for `FontSizeUp` / `FontSizeDown`.
pub const FONT_SIZE_STEP: u32 = 2;

#[derive(Debug)]
pub enum Action {
    Quit,
    /// Ask the adapter to re-read the current sources.
    Reload,
    DeckLoaded(Deck),
    DeckFailed(DeckError),
    Answer(Outcome),
    Undo,
    Flip,
    ToggleShuffle,
    ChangeScope(String),
    ReviewWrongOnly,
    RestartFullDeck,
    ToggleFrontFirst,
    FontSizeUp,
    FontSizeDown,
    ImportSnapshot(Snapshot),
    /// Like `ImportSnapshot`, but for the automatic resume on start:
    /// a mismatch is logged and the fresh session kept.
    ResumeSnapshot(Snapshot),
    SnapshotFailed(SnapshotError),
    Export,
}

/// Side effect requested by `update`, carried out by the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    Quit,
    /// Session changed: persist it to the store.
    SaveSnapshot,
    /// Write the current snapshot to an export file.
    ExportSnapshot,
    /// Re-read `app.sources` and send back `DeckLoaded` / `DeckFailed`.
    ReloadSources,
}

/// Apply `action` using the thread-local RNG for shuffles.
pub fn update(app: &mut App, action: Action) -> Effect {
    update_with_rng(app, action, &mut rand::rng())
}

pub fn update_with_rng<R: Rng + ?Sized>(app: &mut App, action: Action, rng: &mut R) -> Effect {
    debug!("update: {:?}", action);
    match action {
        Action::Quit => Effect::Quit,

        Action::Reload => {
            if app.sources.is_empty() {
                app.status_message = "Nothing to reload".to_string();
                return Effect::None;
            }
            if app.is_loading {
                return Effect::None;
            }
            app.is_loading = true;
            app.status_message = "Reloading...".to_string();
            Effect::ReloadSources
        }

        Action::DeckLoaded(deck) => {
            app.is_loading = false;
            app.install_deck(deck);
            if let Some(snapshot) = app.pending_import.take() {
                apply_import(app, &snapshot);
            }
            Effect::SaveSnapshot
        }

        Action::DeckFailed(e) => {
            app.is_loading = false;
            warn!("Deck load failed: {e}");
            app.fail(format!("Load failed: {e}"));
            Effect::None
        }

        Action::ImportSnapshot(snapshot) => {
            if app.deck.is_none() {
                info!("No deck yet, holding imported snapshot until files load");
                app.pending_import = Some(snapshot);
                app.status_message = "Snapshot will be applied once files load".to_string();
                return Effect::None;
            }
            apply_import(app, &snapshot)
        }

        Action::ResumeSnapshot(snapshot) => {
            let Some(deck) = app.deck.as_ref() else {
                return Effect::None;
            };
            match snapshot::decode(&snapshot, deck) {
                Ok(session) => {
                    info!("Resumed session at card {}", session.current_index() + 1);
                    app.status_message = format!(
                        "Resumed: {} of {} answered",
                        session.answered(),
                        session.len()
                    );
                    app.session = Some(session);
                    Effect::None
                }
                Err(e) => {
                    warn!("Not resuming stored session: {e}");
                    Effect::None
                }
            }
        }

        Action::SnapshotFailed(e) => {
            app.fail(format!("Import failed: {e}"));
            Effect::None
        }

        Action::Export => {
            if app.session.is_none() {
                app.status_message = "Nothing to export".to_string();
                return Effect::None;
            }
            Effect::ExportSnapshot
        }

        action => apply_session_action(app, action, rng),
    }
}

/// Replace the session with one decoded from `snapshot`. On failure the
/// current session stays as it was.
fn apply_import(app: &mut App, snapshot: &Snapshot) -> Effect {
    let Some(deck) = app.deck.as_ref() else {
        return Effect::None;
    };
    match snapshot::decode(snapshot, deck) {
        Ok(session) => {
            info!(
                "Imported snapshot: {} cards, index {}",
                session.len(),
                session.current_index()
            );
            app.session = Some(session);
            app.error = None;
            app.status_message = "Snapshot imported".to_string();
            Effect::SaveSnapshot
        }
        Err(e) => {
            app.fail(format!("Import failed: {e}"));
            Effect::None
        }
    }
}

/// Transitions that only touch the current session.
fn apply_session_action<R: Rng + ?Sized>(app: &mut App, action: Action, rng: &mut R) -> Effect {
    let (Some(session), Some(deck)) = (app.session.as_mut(), app.deck.as_ref()) else {
        return Effect::None;
    };

    let changed = match action {
        Action::Answer(outcome) => session.answer(outcome),
        Action::Undo => session.undo(),
        Action::Flip => {
            // Display only; nothing worth persisting.
            session.flip();
            return Effect::None;
        }
        Action::ToggleShuffle => {
            session.toggle_shuffle(rng);
            app.status_message = if session.is_shuffled() {
                "Shuffled".to_string()
            } else {
                "Original order".to_string()
            };
            true
        }
        Action::ChangeScope(key) => {
            session.change_scope(deck, &key);
            app.status_message = format!("{} cards in scope", session.len());
            true
        }
        Action::ReviewWrongOnly => {
            let reviewing = session.review_wrong_only(deck);
            if reviewing {
                app.status_message = format!("Reviewing {} wrong cards", session.len());
            }
            reviewing
        }
        Action::RestartFullDeck => {
            session.restart_full_deck(deck);
            app.status_message = "Restarted full deck".to_string();
            true
        }
        Action::ToggleFrontFirst => {
            let front_first = !session.front_first();
            session.set_front_first(front_first);
            app.settings.front_first = front_first;
            true
        }
        Action::FontSizeUp => {
            let size = clamp_font_size(session.font_size().saturating_add(FONT_SIZE_STEP));
            session.set_font_size(size);
            app.settings.font_size = size;
            true
        }
        Action::FontSizeDown => {
            let size = clamp_font_size(session.font_size().saturating_sub(FONT_SIZE_STEP));
            session.set_font_size(size);
            app.settings.font_size = size;
            true
        }
        other => {
            debug!("Unhandled session action: {:?}", other);
            false
        }
    };

    if changed {
        app.error = None;
        Effect::SaveSnapshot
    } else {
        Effect::None
    }
}
