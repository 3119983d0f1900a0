// src/dispatcher.rs

use crate::api::BackendClient;
use crate::models::{PendingQuestion, Settlement};
use log::{debug, info, warn};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Sends accepted questions to the backend on background tasks.
///
/// Only the most recent request is kept alive: dispatching a new question
/// cancels the previous one, and a cancelled request never reports back.
/// Settled requests are delivered to the UI loop through `settled_tx`.
pub struct Dispatcher {
    client: BackendClient,
    fallback_message: String,
    settled_tx: UnboundedSender<Settlement>,
    current: Option<CancellationToken>,
}

impl Dispatcher {
    pub fn new(
        client: BackendClient,
        fallback_message: impl Into<String>,
        settled_tx: UnboundedSender<Settlement>,
    ) -> Self {
        Self {
            client,
            fallback_message: fallback_message.into(),
            settled_tx,
            current: None,
        }
    }

    pub fn dispatch(&mut self, pending: PendingQuestion) -> JoinHandle<()> {
        let cancel_token = CancellationToken::new();
        if let Some(previous) = self.current.replace(cancel_token.clone()) {
            previous.cancel();
        }

        let client = self.client.clone();
        let fallback = self.fallback_message.clone();
        let settled_tx = self.settled_tx.clone();

        info!("Sending question {} to {}", pending.id, client.chat_url());

        tokio::spawn(async move {
            let PendingQuestion { id, question } = pending;

            tokio::select! {
                biased;

                () = cancel_token.cancelled() => {
                    debug!("Request {} cancelled", id);
                }

                result = client.ask(&question) => {
                    let reply = match result {
                        Ok(answer) => answer,
                        Err(e) => {
                            warn!("Request {} failed: {}", id, e);
                            fallback
                        }
                    };

                    if settled_tx.send(Settlement { id, reply }).is_err() {
                        debug!("UI loop gone, dropping reply for {}", id);
                    }
                }
            }
        })
    }

    /// Cancels the outstanding request, if any.
    pub fn cancel_all(&mut self) {
        if let Some(token) = self.current.take() {
            token.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PLAIN_FALLBACK;
    use crate::conversation::Conversation;
    use crate::models::Sender;
    use serde_json::json;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use wiremock::{
        matchers::{body_json, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    async fn mount_answer(server: &MockServer, question: &str, answer: &str, delay: Duration) {
        Mock::given(method("POST"))
            .and(path("/chat"))
            .and(body_json(json!({ "question": question })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "answer": answer }))
                    .set_delay(delay),
            )
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_submit_then_settle_appends_user_then_bot() {
        let server = MockServer::start().await;
        mount_answer(&server, "What is 6 x 7?", "42", Duration::ZERO).await;

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut dispatcher =
            Dispatcher::new(BackendClient::new(&server.uri()), PLAIN_FALLBACK, tx);
        let mut conversation = Conversation::new();

        let pending = conversation.submit("What is 6 x 7?").unwrap();
        assert_eq!(conversation.messages().len(), 1);
        assert!(conversation.is_typing());

        dispatcher.dispatch(pending);
        let settlement = rx.recv().await.unwrap();
        assert!(conversation.settle(settlement));

        let messages = conversation.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].sender, Sender::User);
        assert_eq!(messages[1].sender, Sender::Bot);
        assert_eq!(messages[1].text, "42");
        assert!(!conversation.is_typing());
    }

    #[tokio::test]
    async fn test_server_error_settles_with_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut dispatcher =
            Dispatcher::new(BackendClient::new(&server.uri()), PLAIN_FALLBACK, tx);
        let mut conversation = Conversation::new();

        let pending = conversation.submit("hello").unwrap();
        dispatcher.dispatch(pending);
        assert!(conversation.settle(rx.recv().await.unwrap()));

        assert_eq!(conversation.messages()[1].text, "Error connecting to backend.");
        assert!(!conversation.is_typing());
    }

    #[tokio::test]
    async fn test_connection_failure_uses_configured_fallback() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut dispatcher = Dispatcher::new(
            BackendClient::new("http://127.0.0.1:1"),
            "The server is spinning up. Please try again in a minute.",
            tx,
        );
        let mut conversation = Conversation::new();

        let pending = conversation.submit("hello").unwrap();
        dispatcher.dispatch(pending);
        assert!(conversation.settle(rx.recv().await.unwrap()));

        assert_eq!(
            conversation.messages()[1].text,
            "The server is spinning up. Please try again in a minute."
        );
    }

    #[tokio::test]
    async fn test_new_dispatch_cancels_previous_request() {
        let server = MockServer::start().await;
        mount_answer(&server, "slow", "slow answer", Duration::from_millis(500)).await;
        mount_answer(&server, "fast", "fast answer", Duration::ZERO).await;

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut dispatcher =
            Dispatcher::new(BackendClient::new(&server.uri()), PLAIN_FALLBACK, tx);
        let mut conversation = Conversation::new();

        let slow = conversation.submit("slow").unwrap();
        let slow_task = dispatcher.dispatch(slow);
        let fast = conversation.submit("fast").unwrap();
        let fast_id = fast.id;
        let fast_task = dispatcher.dispatch(fast);

        slow_task.await.unwrap();
        fast_task.await.unwrap();

        let settlement = rx.recv().await.unwrap();
        assert_eq!(settlement.id, fast_id);
        assert!(conversation.settle(settlement));
        assert!(rx.try_recv().is_err());

        let texts: Vec<&str> = conversation.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["slow", "fast", "fast answer"]);
    }

    #[tokio::test]
    async fn test_cancel_all_suppresses_settlement() {
        let server = MockServer::start().await;
        mount_answer(&server, "hello", "hi", Duration::from_millis(300)).await;

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut dispatcher =
            Dispatcher::new(BackendClient::new(&server.uri()), PLAIN_FALLBACK, tx);
        let mut conversation = Conversation::new();

        let task = dispatcher.dispatch(conversation.submit("hello").unwrap());
        dispatcher.cancel_all();
        task.await.unwrap();

        assert!(rx.try_recv().is_err());
    }
}
