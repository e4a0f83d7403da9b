//! # Summary Component
//!
//! Shown when a session is finished: how it went, and what to do next.

use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use crate::tui::component::Component;

pub struct Summary {
    pub total: usize,
    pub correct: usize,
    pub incorrect: usize,
    /// Whether `u` has a card to step back to
    pub can_undo: bool,
}

impl Summary {
    fn lines(&self) -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::from(Span::styled(
                "Finished!",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled(format!("{} right", self.correct), Style::default().fg(Color::Green)),
                Span::raw("  "),
                Span::styled(format!("{} wrong", self.incorrect), Style::default().fg(Color::Red)),
                Span::raw(format!("  of {}", self.total)),
            ]),
            Line::from(""),
        ];
        if self.incorrect > 0 {
            lines.push(Line::from("w  review the wrong cards"));
        }
        lines.push(Line::from("a  restart the full deck"));
        if self.can_undo {
            lines.push(Line::from("u  step back one card"));
        }
        lines
    }
}

impl Component for Summary {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .title(" Summary ")
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let lines = self.lines();
        let height = (lines.len() as u16).min(inner.height);
        let [text_area] = Layout::vertical([Constraint::Length(height)])
            .flex(Flex::Center)
            .areas(inner);
        frame.render_widget(Paragraph::new(lines).centered(), text_area);
    }
}
