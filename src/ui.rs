// src/ui.rs

pub mod chat;
pub mod footer;
pub mod header;
pub mod quit_confirm;
pub mod suggestions;

use crate::app::{App, AppState};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

/// Draws the whole screen for the current application state.
pub fn draw(f: &mut Frame, app: &App) {
    // The layout margin takes a column on each side.
    let suggestion_rows = suggestions::suggestions_height(app, f.area().width.saturating_sub(2));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(2), // Header
                Constraint::Min(3),    // Messages
                Constraint::Length(1), // Typing indicator
                Constraint::Length(suggestion_rows), // Quick replies
                Constraint::Length(3), // Input
                Constraint::Length(1), // Footer
            ]
            .as_ref(),
        )
        .split(f.area());

    header::draw_header(f, chunks[0], app);
    chat::draw_messages(f, chunks[1], app);
    app.status_indicator
        .render(f, chunks[2], app.conversation.is_typing());
    suggestions::draw_suggestions(f, chunks[3], app);
    chat::draw_input(f, chunks[4], app);
    footer::draw_footer(f, chunks[5], app);

    if app.state == AppState::QuitConfirm {
        quit_confirm::draw_quit_confirm(f, f.area());
    }
}
