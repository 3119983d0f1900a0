use crate::app::{App, AppState, Focus};
use crate::chat_message::ChatMessage;
use crate::constants::INPUT_PLACEHOLDER;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn draw_messages(f: &mut Frame<'_>, area: Rect, app: &App) {
    let mut lines: Vec<Line<'static>> = Vec::new();
    for message in app.conversation.messages() {
        if !lines.is_empty() {
            lines.push(Line::default());
        }
        lines.extend(ChatMessage::new(message).render(area.width));
    }

    // Lines are already wrapped to the pane, so each one is a single row.
    let total_lines = lines.len();
    let max_scroll = total_lines.saturating_sub(usize::from(area.height));
    let offset = max_scroll.saturating_sub(usize::from(app.scroll_from_bottom));

    let visible: Vec<Line<'static>> = lines.into_iter().skip(offset).collect();
    let msgs_para = Paragraph::new(visible).block(Block::default());
    f.render_widget(msgs_para, area);
}

/// The end of `draft` that fits in `max_width` columns.
fn visible_tail(draft: &str, max_width: usize) -> &str {
    let mut width = 0;
    let mut start = draft.len();
    for (idx, c) in draft.char_indices().rev() {
        let char_width = c.width().unwrap_or(0);
        if width + char_width > max_width {
            break;
        }
        width += char_width;
        start = idx;
    }
    &draft[start..]
}

pub fn draw_input(f: &mut Frame<'_>, area: Rect, app: &App) {
    let focused = app.focus == Focus::Input && app.state == AppState::Chat;
    let border_style = if focused {
        Style::default().fg(Color::LightYellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let draft = app.conversation.draft();
    // Leave a column after the text for the cursor.
    let shown = visible_tail(draft, usize::from(area.width.saturating_sub(3)));

    let content = if draft.is_empty() {
        Line::from(Span::styled(
            INPUT_PLACEHOLDER,
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(Span::styled(
            shown.to_string(),
            Style::default().fg(Color::White),
        ))
    };

    let input = Paragraph::new(content)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title("Ask FinBot"),
        );
    f.render_widget(input, area);

    if focused {
        let shown_width = u16::try_from(shown.width()).unwrap_or(0);
        f.set_cursor_position((area.x + 1 + shown_width, area.y + 1));
    }
}
