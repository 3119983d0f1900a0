// src/errors.rs

use thiserror::Error;

/// Errors raised inside the FinBot client.
///
/// None of these reach the conversation directly: a failed backend call is
/// turned into the configured fallback message by the dispatcher.
#[derive(Debug, Error)]
pub enum FinbotError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Logger error: {0}")]
    Logger(#[from] flexi_logger::FlexiLoggerError),
}

impl FinbotError {
    pub fn api_error(msg: impl Into<String>) -> Self {
        FinbotError::Api(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        FinbotError::Config(msg.into())
    }
}

pub type FinbotResult<T> = Result<T, FinbotError>;
