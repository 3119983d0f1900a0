use crate::markdown::render_markdown;
use crate::models::{Message, Sender};
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use textwrap::{core::Fragment, wrap, wrap_algorithms::wrap_first_fit};
use unicode_width::UnicodeWidthChar;

const USER_COLOR: Color = Color::Rgb(255, 223, 128);
const BOT_COLOR: Color = Color::Rgb(144, 238, 144);

/// Terminal rendering of one conversation entry.
///
/// User messages hug the right edge and wrap at three quarters of the pane;
/// bot replies sit on the left and are rendered as markdown. Every line comes
/// back no wider than the pane, so one line is one terminal row.
pub struct ChatMessage<'a> {
    message: &'a Message,
}

impl<'a> ChatMessage<'a> {
    pub fn new(message: &'a Message) -> Self {
        Self { message }
    }

    pub fn render(&self, width: u16) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        let style = self.base_style();
        let width = usize::from(width.max(1));

        self.render_header(&mut lines, style);
        match self.message.sender {
            Sender::User => self.render_user_body(&mut lines, width, style),
            Sender::Bot => self.render_bot_body(&mut lines, style),
        }

        lines
            .into_iter()
            .flat_map(|line| wrap_line(line, width))
            .collect()
    }

    /// Link targets in this message, in the order they are numbered.
    pub fn links(&self) -> Vec<String> {
        match self.message.sender {
            Sender::User => Vec::new(),
            Sender::Bot => render_markdown(&self.message.text, Style::default()).links,
        }
    }

    fn base_style(&self) -> Style {
        match self.message.sender {
            Sender::User => Style::default().fg(USER_COLOR),
            Sender::Bot => Style::default().fg(BOT_COLOR),
        }
    }

    fn alignment(&self) -> Alignment {
        match self.message.sender {
            Sender::User => Alignment::Right,
            Sender::Bot => Alignment::Left,
        }
    }

    fn render_header(&self, lines: &mut Vec<Line<'static>>, style: Style) {
        let timestamp = self.message.timestamp.format("%H:%M").to_string();
        let name_style = style.add_modifier(Modifier::BOLD);
        let time_style = Style::default().fg(Color::DarkGray);

        let header = match self.message.sender {
            Sender::User => Line::from(vec![
                Span::styled(timestamp, time_style),
                Span::raw(" "),
                Span::styled("You", name_style),
            ]),
            Sender::Bot => Line::from(vec![
                Span::styled("FinBot", name_style),
                Span::raw(" "),
                Span::styled(timestamp, time_style),
            ]),
        };

        lines.push(header.alignment(self.alignment()));
    }

    fn render_user_body(&self, lines: &mut Vec<Line<'static>>, width: usize, style: Style) {
        let wrap_width = (width * 3 / 4).max(10).min(width);

        for text_line in self.message.text.lines() {
            for wrapped in wrap(text_line, wrap_width) {
                lines.push(
                    Line::from(Span::styled(wrapped.into_owned(), style))
                        .alignment(Alignment::Right),
                );
            }
        }
    }

    fn render_bot_body(&self, lines: &mut Vec<Line<'static>>, style: Style) {
        let rendered = render_markdown(&self.message.text, style);
        lines.extend(rendered.lines);
    }
}

/// One word of a styled line and the whitespace that follows it.
#[derive(Debug, Default)]
struct StyledWord {
    word: Vec<(char, Style)>,
    whitespace: Vec<(char, Style)>,
    width: usize,
    whitespace_width: usize,
}

impl Fragment for StyledWord {
    fn width(&self) -> f64 {
        self.width as f64
    }

    fn whitespace_width(&self) -> f64 {
        self.whitespace_width as f64
    }

    fn penalty_width(&self) -> f64 {
        0.0
    }
}

/// Splits `line` at word boundaries into lines at most `width` columns wide,
/// keeping each character's style. Words longer than a row are broken.
fn wrap_line(line: Line<'static>, width: usize) -> Vec<Line<'static>> {
    if line.width() <= width {
        return vec![line];
    }

    let words = split_words(&line, width);
    wrap_first_fit(&words, &[width as f64])
        .into_iter()
        .map(|row| {
            let mut chars = Vec::new();
            for (idx, word) in row.iter().enumerate() {
                chars.extend_from_slice(&word.word);
                if idx + 1 < row.len() {
                    chars.extend_from_slice(&word.whitespace);
                }
            }
            let mut wrapped = Line::from(merge_spans(chars)).style(line.style);
            wrapped.alignment = line.alignment;
            wrapped
        })
        .collect()
}

fn split_words(line: &Line<'_>, width: usize) -> Vec<StyledWord> {
    let mut words = Vec::new();
    let mut current = StyledWord::default();

    for span in &line.spans {
        for c in span.content.chars() {
            let char_width = c.width().unwrap_or(0);
            if c.is_whitespace() {
                current.whitespace.push((c, span.style));
                current.whitespace_width += char_width;
                continue;
            }

            let overflows = !current.word.is_empty() && current.width + char_width > width;
            if !current.whitespace.is_empty() || overflows {
                words.push(std::mem::take(&mut current));
            }
            current.word.push((c, span.style));
            current.width += char_width;
        }
    }

    if !current.word.is_empty() || !current.whitespace.is_empty() {
        words.push(current);
    }
    words
}

fn merge_spans(chars: Vec<(char, Style)>) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut text = String::new();
    let mut style = None;

    for (c, char_style) in chars {
        if style != Some(char_style) {
            if let Some(prev) = style {
                spans.push(Span::styled(std::mem::take(&mut text), prev));
            }
            style = Some(char_style);
        }
        text.push(c);
    }
    if let Some(prev) = style {
        spans.push(Span::styled(text, prev));
    }

    spans
}
