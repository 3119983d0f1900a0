use crate::app::{App, Focus};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use textwrap::{core::Fragment, wrap_algorithms::wrap_first_fit};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const TITLE: &str = "Try asking:";
const GAP: &str = "  ";

/// A title or quick-reply button; buttons are never split across rows.
#[derive(Debug)]
struct Button {
    spans: Vec<Span<'static>>,
    width: usize,
}

impl Button {
    fn new(spans: Vec<Span<'static>>) -> Self {
        let width = spans.iter().map(Span::width).sum();
        Self { spans, width }
    }
}

impl Fragment for Button {
    fn width(&self) -> f64 {
        self.width as f64
    }

    fn whitespace_width(&self) -> f64 {
        GAP.width() as f64
    }

    fn penalty_width(&self) -> f64 {
        0.0
    }
}

/// Rows the quick-reply bar needs at `width` columns.
pub fn suggestions_height(app: &App, width: u16) -> u16 {
    u16::try_from(suggestion_lines(app, width).len()).unwrap_or(u16::MAX)
}

/// Quick-reply buttons for the configured example questions.
pub fn draw_suggestions(f: &mut Frame<'_>, area: Rect, app: &App) {
    let lines = suggestion_lines(app, area.width);
    f.render_widget(Paragraph::new(lines), area);
}

fn suggestion_lines(app: &App, width: u16) -> Vec<Line<'static>> {
    if app.example_questions.is_empty() {
        return Vec::new();
    }

    let width = usize::from(width.max(1));
    let buttons = buttons(app, width);
    wrap_first_fit(&buttons, &[width as f64])
        .into_iter()
        .map(|row| {
            let mut spans = Vec::new();
            for (idx, button) in row.iter().enumerate() {
                if idx > 0 {
                    spans.push(Span::raw(GAP));
                }
                spans.extend(button.spans.iter().cloned());
            }
            Line::from(spans)
        })
        .collect()
}

fn buttons(app: &App, width: usize) -> Vec<Button> {
    let mut buttons = vec![Button::new(vec![Span::styled(
        TITLE,
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )])];

    for (idx, question) in app.example_questions.iter().enumerate() {
        let focused = app.focus == Focus::Suggestion(idx);
        let style = if focused {
            Style::default()
                .fg(Color::Black)
                .bg(Color::LightYellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        };

        let key = format!("F{}", idx + 1);
        // key, a space, then the label padded by a space on each side
        let room = width.saturating_sub(key.width() + 3);
        let label = shorten(question, room);

        buttons.push(Button::new(vec![
            Span::styled(key, Style::default().fg(Color::DarkGray)),
            Span::raw(" "),
            Span::styled(format!(" {} ", label), style),
        ]));
    }

    buttons
}

/// Cuts `text` to `max_width` columns, ending in an ellipsis when shortened.
fn shorten(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let char_width = c.width().unwrap_or(0);
        if used + char_width + 1 > max_width {
            break;
        }
        out.push(c);
        used += char_width;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn plain(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_wide_bar_packs_buttons_on_shared_rows() {
        let app = App::new(&Config::default());
        let lines = suggestion_lines(&app, 200);

        assert_eq!(lines.len(), 1);
        let row = plain(&lines[0]);
        assert!(row.starts_with("Try asking:  F1  How to check my account balance? "));
        assert!(row.contains("F4  How to contact customer support? "));
    }

    #[test]
    fn test_narrow_bar_keeps_every_button() {
        let app = App::new(&Config::default());
        let lines = suggestion_lines(&app, 31);
        let rows: Vec<String> = lines.iter().map(plain).collect();

        assert_eq!(suggestions_height(&app, 31), 5);
        for key in ["F1", "F2", "F3", "F4"] {
            assert!(rows.iter().any(|r| r.starts_with(key)), "{} missing", key);
        }
        assert!(lines.iter().all(|l| l.width() <= 31));
        assert!(rows.contains(&"F2  How can I transfer funds? ".to_string()));
        assert!(rows.iter().any(|r| r.contains('…')));
    }

    #[test]
    fn test_no_examples_takes_no_rows() {
        let config = Config {
            example_questions: Vec::new(),
            ..Config::default()
        };
        assert_eq!(suggestions_height(&App::new(&config), 80), 0);
    }

    #[test]
    fn test_shorten() {
        assert_eq!(shorten("balance", 10), "balance");
        assert_eq!(shorten("balance", 5), "bala…");
    }
}
