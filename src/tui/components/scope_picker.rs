//! # Scope Picker Component
//!
//! Overlay listing every scope the deck offers: all cards, each folder, each
//! file, with how many cards each holds. Opened with `o`, dismissed with Esc.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `ScopePickerState` lives in `TuiState`
//! - `ScopePicker` is created each frame with borrowed state

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding};
use unicode_width::UnicodeWidthStr;

use crate::core::deck::Deck;
use crate::core::scope::{ScopeOption, scope_options};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Persistent state for the scope picker overlay.
pub struct ScopePickerState {
    pub options: Vec<ScopeOption>,
    pub selected: usize,
    pub list_state: ListState,
}

impl ScopePickerState {
    /// Options come from `deck`; the cursor starts on `current` when present.
    pub fn new(deck: &Deck, current: Option<&str>) -> Self {
        let options = scope_options(deck);
        let selected = current
            .and_then(|key| options.iter().position(|o| o.key == key))
            .unwrap_or(0);
        let mut list_state = ListState::default();
        list_state.select(Some(selected));
        Self {
            options,
            selected,
            list_state,
        }
    }

    fn select(&mut self, index: usize) {
        self.selected = index;
        self.list_state.select(Some(index));
    }
}

impl EventHandler for ScopePickerState {
    type Event = ScopeEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<ScopeEvent> {
        let last = self.options.len().saturating_sub(1);
        match event {
            TuiEvent::Escape | TuiEvent::InputChar('o') | TuiEvent::InputChar('q') => {
                Some(ScopeEvent::Dismiss)
            }
            TuiEvent::CursorUp | TuiEvent::InputChar('k') => {
                self.select(self.selected.saturating_sub(1));
                None
            }
            TuiEvent::CursorDown | TuiEvent::InputChar('j') => {
                self.select((self.selected + 1).min(last));
                None
            }
            TuiEvent::Submit | TuiEvent::InputChar(' ') => self
                .options
                .get(self.selected)
                .map(|option| ScopeEvent::Select(option.key.clone())),
            _ => None,
        }
    }
}

/// Events emitted by the scope picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeEvent {
    Select(String),
    Dismiss,
}

/// Transient render wrapper for the scope picker overlay.
pub struct ScopePicker<'a> {
    state: &'a mut ScopePickerState,
}

impl<'a> ScopePicker<'a> {
    pub fn new(state: &'a mut ScopePickerState) -> Self {
        Self { state }
    }
}

impl Component for ScopePicker<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(70, 70, area);
        frame.render_widget(Clear, overlay);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Scope ")
            .title_alignment(Alignment::Left)
            .title_bottom(Line::from(" ↑↓ Move  Enter Study  Esc Back ").centered())
            .padding(Padding::horizontal(1));

        // Layout: "<label>   12 cards"
        let inner_width = overlay.width.saturating_sub(4) as usize; // borders + padding
        let items: Vec<ListItem> = self
            .state
            .options
            .iter()
            .enumerate()
            .map(|(i, option)| {
                let count = format!("{} cards", option.card_count);
                let label_width = inner_width.saturating_sub(count.len() + 2);
                let label = truncate_str(&option.label, label_width);
                let pad = label_width.saturating_sub(label.width());

                let style = if i == self.state.selected {
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                } else {
                    Style::default().fg(Color::Gray)
                };

                ListItem::new(Line::from(vec![
                    Span::styled(label, style),
                    Span::styled(" ".repeat(pad + 2), style),
                    Span::styled(count, style),
                ]))
            })
            .collect();

        let list = List::new(items).block(block);
        frame.render_stateful_widget(list, overlay, &mut self.state.list_state);
    }
}

/// Keep the tail of long paths, where the distinguishing part usually is.
fn truncate_str(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }
    let mut tail: Vec<char> = Vec::new();
    let mut width = 3;
    for c in s.chars().rev() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if width + w > max_width {
            break;
        }
        width += w;
        tail.push(c);
    }
    format!("...{}", tail.into_iter().rev().collect::<String>())
}

/// Compute a centered rect using percentage of the outer rect.
fn centered_rect(percent_x: u16, percent_y: u16, outer: Rect) -> Rect {
    let [_, center_v, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center_v);
    center
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scope::ALL_SCOPE;
    use crate::test_support::deck_from;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn picker() -> ScopePickerState {
        let deck = deck_from(&[
            ("a.csv", "1,2"),
            ("lang/es.csv", "3,4\n5,6"),
            ("lang/fr.csv", "7,8"),
        ]);
        ScopePickerState::new(&deck, None)
    }

    #[test]
    fn test_options_start_with_all_cards() {
        let state = picker();
        assert_eq!(state.options[0].key, ALL_SCOPE);
        assert_eq!(state.options[0].card_count, 4);
        assert_eq!(state.options[1].key, "lang");
        assert_eq!(state.selected, 0);
    }

    #[test]
    fn test_cursor_starts_on_current_scope() {
        let deck = deck_from(&[("a.csv", "1,2"), ("b.csv", "3,4")]);
        let state = ScopePickerState::new(&deck, Some("b.csv"));
        assert_eq!(state.options[state.selected].key, "b.csv");
    }

    #[test]
    fn test_navigation_clamps_and_selects() {
        let mut state = picker();
        assert_eq!(state.handle_event(&TuiEvent::CursorUp), None);
        assert_eq!(state.selected, 0);
        for _ in 0..10 {
            state.handle_event(&TuiEvent::CursorDown);
        }
        assert_eq!(state.selected, state.options.len() - 1);
        assert_eq!(
            state.handle_event(&TuiEvent::Submit),
            Some(ScopeEvent::Select("lang/fr.csv".to_string()))
        );
    }

    #[test]
    fn test_escape_dismisses() {
        let mut state = picker();
        assert_eq!(state.handle_event(&TuiEvent::Escape), Some(ScopeEvent::Dismiss));
        assert_eq!(state.handle_event(&TuiEvent::InputChar('x')), None);
    }

    #[test]
    fn test_truncate_keeps_tail() {
        assert_eq!(truncate_str("short", 10), "short");
        assert_eq!(truncate_str("lang/spanish/verbs.csv", 12), "...verbs.csv");
        assert_eq!(truncate_str("abcdef", 2), "..");
    }

    #[test]
    fn test_render_lists_labels_and_counts() {
        let backend = TestBackend::new(60, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut state = picker();

        terminal
            .draw(|f| ScopePicker::new(&mut state).render(f, f.area()))
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("All cards"));
        assert!(text.contains("lang/"));
        assert!(text.contains("4 cards"));
        assert!(text.contains("Scope"));
    }
}
