use crate::chat_message::ChatMessage;
use crate::config::Config;
use crate::conversation::Conversation;
use crate::models::{PendingQuestion, Settlement};
use crate::status_indicator::StatusIndicator;
use log::warn;
use reqwest::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Chat,
    /// Waiting for the number of a link in the message at this index.
    PickLink(usize),
    QuitConfirm,
    Quit,
}

/// Where keyboard input goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    Suggestion(usize),
}

pub struct App {
    pub state: AppState,
    pub focus: Focus,
    pub conversation: Conversation,
    pub example_questions: Vec<String>,
    pub backend_url: String,
    /// Lines scrolled up from the newest message; 0 follows the conversation.
    pub scroll_from_bottom: u16,
    pub status_indicator: StatusIndicator,
}

impl App {
    pub fn new(config: &Config) -> App {
        App {
            state: AppState::Chat,
            focus: Focus::Input,
            conversation: Conversation::with_greeting(&config.greeting),
            example_questions: config.example_questions.clone(),
            backend_url: config.backend_url.clone(),
            scroll_from_bottom: 0,
            status_indicator: StatusIndicator::new(),
        }
    }

    pub fn submit_draft(&mut self) -> Option<PendingQuestion> {
        let pending = self.conversation.submit_draft();
        if pending.is_some() {
            self.snap_to_latest();
        }
        pending
    }

    /// Sends a quick-reply question through the same path as typed input.
    pub fn ask_example(&mut self, idx: usize) -> Option<PendingQuestion> {
        let question = self.example_questions.get(idx)?.clone();
        let pending = self.conversation.submit(&question);
        if pending.is_some() {
            self.snap_to_latest();
        }
        pending
    }

    pub fn apply_settlement(&mut self, settlement: Settlement) -> bool {
        let applied = self.conversation.settle(settlement);
        if applied {
            self.snap_to_latest();
        }
        applied
    }

    /// Scrolls back to the newest message and returns focus to the input.
    pub fn snap_to_latest(&mut self) {
        self.scroll_from_bottom = 0;
        self.focus = Focus::Input;
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(lines);
    }

    /// Tab order: input, then each quick reply, then back to the input.
    pub fn focus_next(&mut self) {
        let count = self.example_questions.len();
        self.focus = match self.focus {
            Focus::Input if count > 0 => Focus::Suggestion(0),
            Focus::Suggestion(i) if i + 1 < count => Focus::Suggestion(i + 1),
            _ => Focus::Input,
        };
    }

    pub fn focus_prev(&mut self) {
        let count = self.example_questions.len();
        self.focus = match self.focus {
            Focus::Input if count > 0 => Focus::Suggestion(count - 1),
            Focus::Suggestion(i) if i > 0 => Focus::Suggestion(i - 1),
            _ => Focus::Input,
        };
    }

    pub fn on_tick(&mut self) {
        if self.conversation.is_typing() {
            self.status_indicator.update_spinner();
        }
    }

    /// Indices of messages that contain links, newest first.
    fn linked_messages(&self) -> Vec<usize> {
        self.conversation
            .messages()
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, message)| !ChatMessage::new(message).links().is_empty())
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Starts link picking on the newest reply with links, or moves to the
    /// next older one when already picking. Wraps around after the oldest.
    pub fn pick_link_message(&mut self) {
        let linked = self.linked_messages();
        let next = match self.state {
            AppState::PickLink(current) => linked
                .iter()
                .copied()
                .find(|&idx| idx < current)
                .or_else(|| linked.first().copied()),
            _ => linked.first().copied(),
        };

        if let Some(idx) = next {
            self.state = AppState::PickLink(idx);
        }
    }

    /// Link `number` (as shown in the reply, starting at 1) of the message at
    /// `message`, if it is a web link.
    pub fn link(&self, message: usize, number: usize) -> Option<String> {
        let message = self.conversation.messages().get(message)?;
        let url = ChatMessage::new(message)
            .links()
            .into_iter()
            .nth(number.checked_sub(1)?)?;

        if is_web_link(&url) {
            Some(url)
        } else {
            warn!("Refusing to open non-web link {}", url);
            None
        }
    }

    /// Link count and timestamp of the reply being picked from.
    pub fn picked_message_summary(&self) -> Option<(usize, String)> {
        let AppState::PickLink(idx) = self.state else {
            return None;
        };
        let message = self.conversation.messages().get(idx)?;
        let count = ChatMessage::new(message).links().len();
        Some((count, message.timestamp.format("%H:%M").to_string()))
    }
}

fn is_web_link(url: &str) -> bool {
    Url::parse(url)
        .map(|url| url.scheme() == "http" || url.scheme() == "https")
        .unwrap_or(false)
}
