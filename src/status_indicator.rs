use crate::constants::{SPINNER_FRAMES, TYPING_TEXT};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// The "FinBot is typing" line shown while a reply is outstanding.
#[derive(Debug, Default)]
pub struct StatusIndicator {
    spinner_idx: usize,
}

impl StatusIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_spinner(&mut self) {
        self.spinner_idx = self.spinner_idx.wrapping_add(1);
    }

    pub fn frame(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_idx % SPINNER_FRAMES.len()]
    }

    /// Draws the indicator when `typing` is set and clears the row otherwise.
    pub fn render(&self, frame: &mut Frame, area: Rect, typing: bool) {
        let line = if typing {
            Line::from(vec![
                Span::styled(self.frame(), Style::default().fg(Color::Gray)),
                Span::raw(" "),
                Span::styled(
                    TYPING_TEXT,
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::ITALIC),
                ),
            ])
        } else {
            Line::default()
        };

        frame.render_widget(Paragraph::new(line), area);
    }
}
