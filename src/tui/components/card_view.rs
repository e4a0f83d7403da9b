//! # CardView Component
//!
//! The card itself: the displayed face's text, wrapped and centered in a
//! bordered box titled with the face name. The bottom border shows the
//! card's file and its position in the session.
//!
//! A terminal can't change glyph size, so the session's font size sets how
//! wide the text column is: larger sizes use more of the card.

use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Padding, Paragraph, Wrap};

use crate::core::session::Face;
use crate::tui::component::Component;

/// Share of the card's width the text may use at `font_size`, in percent.
pub fn text_width_percent(font_size: u32) -> u16 {
    (40 + font_size).min(100) as u16
}

pub struct CardView<'a> {
    pub text: &'a str,
    pub face: Face,
    pub path: &'a str,
    /// 1-based position of the card in the session
    pub position: usize,
    pub total: usize,
    pub font_size: u32,
}

impl CardView<'_> {
    fn face_style(&self) -> Style {
        match self.face {
            Face::Front => Style::default().fg(Color::Cyan),
            Face::Back => Style::default().fg(Color::Green),
        }
    }
}

impl Component for CardView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let style = self.face_style();
        let title = match self.face {
            Face::Front => " Front ",
            Face::Back => " Back ",
        };
        let footer = format!(" {}  {}/{} ", self.path, self.position, self.total);

        let block = Block::bordered()
            .title(title)
            .title_style(style.add_modifier(Modifier::BOLD))
            .title_bottom(Line::from(footer).right_aligned())
            .border_style(style.add_modifier(Modifier::DIM))
            .padding(Padding::uniform(1));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [column] = Layout::horizontal([Constraint::Percentage(text_width_percent(
            self.font_size,
        ))])
        .flex(Flex::Center)
        .areas(inner);

        let paragraph = Paragraph::new(self.text)
            .style(Style::default().add_modifier(Modifier::BOLD))
            .centered()
            .wrap(Wrap { trim: true });

        let height = (paragraph.line_count(column.width) as u16).min(column.height);
        let [text_area] = Layout::vertical([Constraint::Length(height)])
            .flex(Flex::Center)
            .areas(column);

        frame.render_widget(paragraph, text_area);
    }
}
