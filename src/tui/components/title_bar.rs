//! # TitleBar Component
//!
//! Top status bar: scope, progress, order, font size and the status line.
//!
//! Stateless: it receives everything as props and renders one line.
//!
//! ```text
//! flashdeck | lang/ | 3/10 | shuffled | Aa 30 | Loaded 10 cards from 2 files
//! ```
//!
//! When `is_error` is set the status part is drawn in red.

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

pub struct TitleBar {
    pub scope_label: String,
    /// e.g. "3/10", empty when there is no session
    pub progress: String,
    pub is_shuffled: bool,
    pub font_size: u32,
    pub status_message: String,
    pub is_error: bool,
}

impl TitleBar {
    fn parts(&self) -> Vec<String> {
        let mut parts = vec!["flashdeck".to_string(), self.scope_label.clone()];
        if !self.progress.is_empty() {
            parts.push(self.progress.clone());
        }
        if self.is_shuffled {
            parts.push("shuffled".to_string());
        }
        parts.push(format!("Aa {}", self.font_size));
        if !self.status_message.is_empty() {
            parts.push(self.status_message.clone());
        }
        parts
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let parts = self.parts();
        let last = parts.len() - 1;
        let has_status = !self.status_message.is_empty();

        let mut spans = Vec::with_capacity(parts.len() * 2);
        for (i, part) in parts.into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" | ", Style::default().fg(Color::DarkGray)));
            }
            let style = if i == 0 {
                Style::default().add_modifier(Modifier::BOLD)
            } else if i == last && has_status && self.is_error {
                Style::default().fg(Color::Red)
            } else {
                Style::default()
            };
            spans.push(Span::styled(part, style));
        }

        frame.render_widget(Line::from(spans), area);
    }
}
