// src/conversation.rs

use crate::models::{Message, PendingQuestion, RequestId, Settlement};
use log::debug;

/// The session's messages, draft and request bookkeeping.
///
/// Only the UI loop owns a `Conversation`, so every mutation here is a plain
/// synchronous state transition.
#[derive(Debug, Default)]
pub struct Conversation {
    messages: Vec<Message>,
    draft: String,
    typing: bool,
    latest_request: Option<RequestId>,
    next_request: u64,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a conversation with the bot's greeting already shown.
    pub fn with_greeting(greeting: &str) -> Self {
        let mut conversation = Self::new();
        if !greeting.trim().is_empty() {
            conversation.append_bot_message(greeting);
        }
        conversation
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn is_typing(&self) -> bool {
        self.typing
    }

    pub fn latest_request(&self) -> Option<RequestId> {
        self.latest_request
    }

    pub fn append_user_message(&mut self, text: impl Into<String>) {
        self.messages.push(Message::user(text));
    }

    pub fn append_bot_message(&mut self, text: impl Into<String>) {
        self.messages.push(Message::bot(text));
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn clear_draft(&mut self) {
        self.draft.clear();
    }

    pub fn push_draft_char(&mut self, c: char) {
        self.draft.push(c);
    }

    pub fn pop_draft_char(&mut self) {
        self.draft.pop();
    }

    pub fn set_typing(&mut self, typing: bool) {
        self.typing = typing;
    }

    /// Accepts a question for sending.
    ///
    /// Blank questions are rejected without touching the draft. Otherwise the
    /// user message is appended, the draft cleared and a fresh request id
    /// becomes the latest one.
    pub fn submit(&mut self, question: &str) -> Option<PendingQuestion> {
        if question.trim().is_empty() {
            return None;
        }

        self.append_user_message(question);
        self.clear_draft();

        self.next_request += 1;
        let id = RequestId(self.next_request);
        if let Some(previous) = self.latest_request.replace(id) {
            if self.typing {
                debug!("Request {} superseded by {}", previous, id);
            }
        }
        self.set_typing(true);

        Some(PendingQuestion {
            id,
            question: question.to_string(),
        })
    }

    /// Submits whatever is currently in the draft.
    pub fn submit_draft(&mut self) -> Option<PendingQuestion> {
        let draft = self.draft.clone();
        self.submit(&draft)
    }

    /// Applies a settled request. Returns `false` when the settlement belongs
    /// to a request that is no longer the latest outstanding one.
    pub fn settle(&mut self, settlement: Settlement) -> bool {
        if !self.typing || self.latest_request != Some(settlement.id) {
            debug!("Discarding stale reply for request {}", settlement.id);
            return false;
        }

        self.append_bot_message(settlement.reply);
        self.set_typing(false);
        true
    }
}
