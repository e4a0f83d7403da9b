//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//! It also carries out the [`Effect`]s that `update()` asks for: saving to
//! the store, writing exports, and reloading the sources in the background.
//!
//! ## Redraw Strategy
//!
//! Nothing on screen animates, so the loop only draws after an input event
//! or a background action. Between events it sleeps up to 250ms.
//!
//! ## Keys
//!
//! ```text
//! Space/Enter  flip           y/→  correct        n/←  wrong
//! u/Backspace  undo           s    shuffle         o    scope picker
//! w            wrong only     a    restart all     f    front/back first
//! +/-          font size      e    export          R    reload files
//! q/Ctrl+C     quit
//! ```

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::sync::mpsc;
use std::time::Duration;

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::session::Outcome;
use crate::core::state::App;
use crate::core::store::{self, PersistentStore};
use crate::source;
use crate::tui::component::EventHandler;
use crate::tui::components::ScopePickerState;
use crate::tui::components::scope_picker::ScopeEvent;
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

const IDLE_POLL: Duration = Duration::from_millis(250);

/// TUI-specific presentation state (not part of core business logic)
#[derive(Default)]
pub struct TuiState {
    // Scope picker overlay (None = hidden)
    pub scope_picker: Option<ScopePickerState>,
}

impl TuiState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Map a key to the core action it stands for. Keys that only drive the
/// adapter (the scope picker, quitting) are handled by the loop.
pub fn key_action(event: &TuiEvent) -> Option<Action> {
    let action = match event {
        TuiEvent::InputChar(' ') | TuiEvent::Submit => Action::Flip,
        TuiEvent::InputChar('y') | TuiEvent::CursorRight => Action::Answer(Outcome::Correct),
        TuiEvent::InputChar('n') | TuiEvent::CursorLeft => Action::Answer(Outcome::Incorrect),
        TuiEvent::InputChar('u') | TuiEvent::Backspace => Action::Undo,
        TuiEvent::InputChar('s') => Action::ToggleShuffle,
        TuiEvent::InputChar('w') => Action::ReviewWrongOnly,
        TuiEvent::InputChar('a') => Action::RestartFullDeck,
        TuiEvent::InputChar('f') => Action::ToggleFrontFirst,
        TuiEvent::InputChar('+') | TuiEvent::InputChar('=') => Action::FontSizeUp,
        TuiEvent::InputChar('-') => Action::FontSizeDown,
        TuiEvent::InputChar('e') => Action::Export,
        TuiEvent::InputChar('R') => Action::Reload,
        TuiEvent::InputChar('q') | TuiEvent::ForceQuit => Action::Quit,
        _ => return None,
    };
    Some(action)
}

pub fn run(
    mut app: App,
    store: &mut dyn PersistentStore,
    config: &ResolvedConfig,
) -> std::io::Result<()> {
    let mut tui = TuiState::new();
    let mut terminal = ratatui::init();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    let mut needs_redraw = true; // Force first frame

    loop {
        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui))?;
            needs_redraw = false;
        }

        let first_event = poll_event_timeout(IDLE_POLL);

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if matches!(event, TuiEvent::Resize) {
                continue;
            }

            // Ctrl+C always quits, even with the picker open
            if matches!(event, TuiEvent::ForceQuit) {
                should_quit = true;
                break;
            }

            // When the scope picker is open, route all events to it
            if let Some(ref mut picker) = tui.scope_picker {
                if let Some(scope_event) = picker.handle_event(&event) {
                    match scope_event {
                        ScopeEvent::Select(key) => {
                            let effect = update(&mut app, Action::ChangeScope(key));
                            should_quit |= handle_effect(effect, &mut app, store, config, &tx);
                            tui.scope_picker = None;
                        }
                        ScopeEvent::Dismiss => {
                            tui.scope_picker = None;
                        }
                    }
                }
                continue;
            }

            if matches!(event, TuiEvent::InputChar('o')) {
                match app.deck.as_ref() {
                    Some(deck) => {
                        let current = app.session.as_ref().map(|s| s.scope());
                        tui.scope_picker = Some(ScopePickerState::new(deck, current));
                    }
                    None => app.status_message = "No cards loaded".to_string(),
                }
                continue;
            }

            if let Some(action) = key_action(&event) {
                let effect = update(&mut app, action);
                should_quit |= handle_effect(effect, &mut app, store, config, &tx);
            }
        }

        if should_quit {
            break;
        }

        // Handle background task actions (reload results)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            let effect = update(&mut app, action);
            if handle_effect(effect, &mut app, store, config, &tx) {
                should_quit = true;
            }
        }

        if should_quit {
            break;
        }
    }

    // Save on exit so the next start resumes exactly here
    save(&app, store);

    ratatui::restore();
    Ok(())
}

/// Carry out one effect. Returns true when the loop should stop.
fn handle_effect(
    effect: Effect,
    app: &mut App,
    store: &mut dyn PersistentStore,
    config: &ResolvedConfig,
    tx: &mpsc::Sender<Action>,
) -> bool {
    match effect {
        Effect::None => {}
        Effect::Quit => return true,
        Effect::SaveSnapshot => save(app, store),
        Effect::ExportSnapshot => {
            if let Some(snapshot) = app.snapshot() {
                match store::export_to_file(&snapshot, &config.export_dir) {
                    Ok(path) => {
                        app.error = None;
                        app.status_message = format!("Exported to {}", path.display());
                    }
                    Err(e) => {
                        warn!("Export failed: {e}");
                        app.fail(format!("Export failed: {e}"));
                    }
                }
            }
        }
        Effect::ReloadSources => spawn_reload(app.sources.clone(), tx.clone()),
    }
    false
}

fn save(app: &App, store: &mut dyn PersistentStore) {
    let (Some(snapshot), Some(deck)) = (app.snapshot(), app.deck.as_ref()) else {
        return;
    };
    if let Err(e) = store::save_snapshot(store, &snapshot, deck) {
        warn!("Failed to save session: {e}");
    }
}

fn spawn_reload(sources: Vec<std::path::PathBuf>, tx: mpsc::Sender<Action>) {
    info!("Reloading {} selections", sources.len());
    tokio::spawn(async move {
        let action = match source::load_deck(sources).await {
            Ok(deck) => Action::DeckLoaded(deck),
            Err(e) => Action::DeckFailed(e),
        };
        if tx.send(action).is_err() {
            warn!("Failed to send reload result: receiver dropped");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::MemoryStore;
    use crate::test_support::test_app;
    use std::path::PathBuf;

    fn test_config(dir: &std::path::Path) -> ResolvedConfig {
        ResolvedConfig {
            front_first: true,
            font_size: 30,
            resume: true,
            snapshot_dir: dir.join("snapshots"),
            export_dir: dir.join("exports"),
            log_level: log::LevelFilter::Off,
        }
    }

    #[test]
    fn test_key_action_mapping() {
        assert!(matches!(key_action(&TuiEvent::InputChar(' ')), Some(Action::Flip)));
        assert!(matches!(
            key_action(&TuiEvent::CursorRight),
            Some(Action::Answer(Outcome::Correct))
        ));
        assert!(matches!(
            key_action(&TuiEvent::InputChar('n')),
            Some(Action::Answer(Outcome::Incorrect))
        ));
        assert!(matches!(key_action(&TuiEvent::Backspace), Some(Action::Undo)));
        assert!(matches!(key_action(&TuiEvent::InputChar('R')), Some(Action::Reload)));
        assert!(matches!(key_action(&TuiEvent::InputChar('q')), Some(Action::Quit)));
        assert!(key_action(&TuiEvent::InputChar('o')).is_none());
        assert!(key_action(&TuiEvent::InputChar('z')).is_none());
    }

    #[test]
    fn test_save_effect_writes_to_store() {
        let tmp = tempfile::tempdir().unwrap();
        let config = test_config(tmp.path());
        let mut app = test_app(&[("a.csv", "1,2\n3,4")]);
        let mut store = MemoryStore::new();
        let (tx, _rx) = mpsc::channel();

        let effect = update(&mut app, Action::Answer(Outcome::Incorrect));
        assert!(!handle_effect(effect, &mut app, &mut store, &config, &tx));

        let deck = app.deck.as_ref().unwrap();
        let stored = store::load_snapshot(&store, deck).unwrap();
        assert_eq!(stored.current_index, 1);
    }

    #[test]
    fn test_export_effect_reports_path() {
        let tmp = tempfile::tempdir().unwrap();
        let config = test_config(tmp.path());
        let mut app = test_app(&[("a.csv", "1,2")]);
        let mut store = MemoryStore::new();
        let (tx, _rx) = mpsc::channel();

        let effect = update(&mut app, Action::Export);
        assert_eq!(effect, Effect::ExportSnapshot);
        handle_effect(effect, &mut app, &mut store, &config, &tx);

        assert!(app.status_message.starts_with("Exported to "));
        let exported = std::fs::read_dir(&config.export_dir).unwrap().count();
        assert_eq!(exported, 1);
    }

    #[test]
    fn test_quit_effect_stops_loop() {
        let tmp = tempfile::tempdir().unwrap();
        let config = test_config(tmp.path());
        let mut app = test_app(&[("a.csv", "1,2")]);
        let mut store = MemoryStore::new();
        let (tx, _rx) = mpsc::channel();
        assert!(handle_effect(Effect::Quit, &mut app, &mut store, &config, &tx));
    }

    #[tokio::test]
    async fn test_reload_sends_loaded_deck() {
        let tmp = tempfile::tempdir().unwrap();
        let csv = tmp.path().join("a.csv");
        std::fs::write(&csv, "1,2\n3,4").unwrap();
        let (tx, rx) = mpsc::channel();

        spawn_reload(vec![csv], tx);

        let action = tokio::task::spawn_blocking(move || rx.recv_timeout(Duration::from_secs(5)))
            .await
            .unwrap()
            .unwrap();
        match action {
            Action::DeckLoaded(deck) => assert_eq!(deck.len(), 2),
            other => panic!("expected DeckLoaded, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_reload_of_missing_folder_sends_failure() {
        let (tx, rx) = mpsc::channel();
        spawn_reload(vec![PathBuf::from("/nonexistent/flashdeck/dir")], tx);

        let action = tokio::task::spawn_blocking(move || rx.recv_timeout(Duration::from_secs(5)))
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(action, Action::DeckFailed(_)));
    }
}
