use crate::core::scope::scope_label;
use crate::core::session::{Face, Session};
use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{CardView, ScopePicker, Summary, TitleBar};

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Paragraph, Wrap};

const HELP: &str =
    "space flip  y right  n wrong  u undo  s shuffle  o scope  w wrong only  a all  f face  +/- size  e export  q quit";

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Min(0), Length(1)]);
    let [title_area, main_area, help_area] = layout.areas(frame.area());

    title_bar(app).render(frame, title_area);

    match (app.session.as_ref(), app.deck.as_ref()) {
        (Some(session), Some(deck)) => {
            if session.is_finished() {
                Summary {
                    total: session.len(),
                    correct: session.correct_count(),
                    incorrect: session.incorrect_count(),
                    can_undo: session.current_index() > 0,
                }
                .render(frame, main_area);
            } else if let Some(card) = session.current_card(deck) {
                let face = session.displayed_face();
                let text = match face {
                    Face::Front => card.front.as_str(),
                    Face::Back => card.back.as_str(),
                };
                CardView {
                    text,
                    face,
                    path: &card.path,
                    position: session.current_index() + 1,
                    total: session.len(),
                    font_size: session.font_size(),
                }
                .render(frame, main_area);
            } else {
                draw_message(
                    frame,
                    main_area,
                    "No cards in this scope. Press o to pick another or a for all cards.",
                );
            }
        }
        _ => match &app.error {
            Some(error) => draw_error_view(frame, main_area, error),
            None => draw_message(frame, main_area, "No cards loaded."),
        },
    }

    frame.render_widget(
        Paragraph::new(HELP).style(Style::default().fg(Color::DarkGray)),
        help_area,
    );

    if let Some(ref mut picker) = tui.scope_picker {
        ScopePicker::new(picker).render(frame, frame.area());
    }
}

fn title_bar(app: &App) -> TitleBar {
    let session = app.session.as_ref();
    TitleBar {
        scope_label: session.map_or_else(|| "No deck".to_string(), |s| scope_label(s.scope())),
        progress: session.map(progress).unwrap_or_default(),
        is_shuffled: session.is_some_and(Session::is_shuffled),
        font_size: session.map_or(app.settings.font_size, Session::font_size),
        status_message: app.status_message.clone(),
        is_error: app.error.is_some(),
    }
}

/// "3/10", or "10/10" once finished. Empty sessions show "0/0".
fn progress(session: &Session) -> String {
    let shown = if session.is_finished() {
        session.len()
    } else {
        (session.current_index() + 1).min(session.len())
    };
    format!("{}/{}", shown, session.len())
}

fn draw_message(frame: &mut Frame, area: Rect, message: &str) {
    let paragraph = Paragraph::new(message)
        .block(Block::bordered().border_style(Style::default().fg(Color::DarkGray)))
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn draw_error_view(frame: &mut Frame, area: Rect, error_msg: &str) {
    let error_paragraph = Paragraph::new(error_msg)
        .block(Block::bordered().title("ERROR"))
        .style(Style::default().fg(Color::Red))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(error_paragraph, area);
}
