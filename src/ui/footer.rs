use crate::app::{App, AppState, Focus};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

/// Draws the footer with dynamic instructions
pub fn draw_footer(f: &mut Frame<'_>, area: Rect, app: &App) {
    let instructions = match (app.state, app.focus) {
        (AppState::QuitConfirm, _) => "Press 'y' to confirm quit or 'n' to cancel.".to_string(),
        (AppState::PickLink(_), _) => match app.picked_message_summary() {
            Some((count, time)) => format!(
                "Links in the {} reply: 1-{} to open · Ctrl+O older reply · Esc to cancel",
                time, count
            ),
            None => "Esc to cancel".to_string(),
        },
        (_, Focus::Suggestion(_)) => {
            "Enter to ask, Tab/Shift+Tab to move, Esc to return to the input.".to_string()
        }
        _ => concat!(
            "Enter to send · F1-F4 quick replies · Tab to pick · PgUp/PgDn scroll · ",
            "Ctrl+O links · Esc to quit"
        )
        .to_string(),
    };

    let footer = Paragraph::new(instructions)
        .style(Style::default().fg(Color::LightCyan))
        .alignment(Alignment::Center);

    f.render_widget(footer, area);
}
