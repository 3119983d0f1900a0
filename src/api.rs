use crate::{
    constants::CHAT_PATH,
    errors::{FinbotError, FinbotResult},
    logging::log_api_call,
    models::{ApiCallLog, ChatRequest, ChatResponse},
};
use chrono::Utc;
use reqwest::Client;
use std::time::Instant;

/// HTTP client for the FinBot backend's single chat endpoint.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    chat_url: String,
}

impl BackendClient {
    pub fn new(backend_url: &str) -> Self {
        Self::with_client(Client::new(), backend_url)
    }

    pub fn with_client(client: Client, backend_url: &str) -> Self {
        let base = backend_url.trim_end_matches('/');
        Self {
            client,
            chat_url: format!("{}{}", base, CHAT_PATH),
        }
    }

    pub fn chat_url(&self) -> &str {
        &self.chat_url
    }

    /// Posts one question and returns the backend's answer.
    ///
    /// A single attempt: transport failures, non-2xx statuses and bodies
    /// without an `answer` all come back as `FinbotError`.
    pub async fn ask(&self, question: &str) -> FinbotResult<String> {
        let start_time = Instant::now();
        let payload = ChatRequest {
            question: question.to_string(),
        };

        let result = self.client.post(&self.chat_url).json(&payload).send().await;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                self.record("chat", None, start_time);
                return Err(FinbotError::api_error(format!("Request failed: {}", e)));
            }
        };

        let status = response.status();
        self.record("chat", Some(status.as_u16()), start_time);

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(FinbotError::api_error(format!(
                "Backend returned error: {} - {}",
                status, error_text
            )));
        }

        let body: ChatResponse = response.json().await.map_err(|e| {
            FinbotError::api_error(format!("Failed to parse backend response: {}", e))
        })?;

        Ok(body.answer)
    }

    fn record(&self, summary: &str, status: Option<u16>, start_time: Instant) {
        log_api_call(&ApiCallLog {
            timestamp: Utc::now(),
            endpoint: self.chat_url.clone(),
            request_summary: summary.to_string(),
            response_status: status,
            response_time_ms: start_time.elapsed().as_millis(),
        });
    }
}
