// Backend
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
pub const CHAT_PATH: &str = "/chat";

pub const BACKEND_URL_ENV: &str = "FINBOT_BACKEND_URL";
pub const LOG_LEVEL_ENV: &str = "FINBOT_LOG_LEVEL";

// Fallback replies
pub const PLAIN_FALLBACK: &str = "Error connecting to backend.";
pub const COLD_START_FALLBACK: &str = "The server is spinning up. Please try again in a minute.";

// Conversation
pub const DEFAULT_GREETING: &str = "Hello! I'm FinBot, your personal finance assistant. You can ask me about your password reset, balances, transactions, fund transfers, or spending insights. How can I help you today?";

pub const DEFAULT_EXAMPLE_QUESTIONS: [&str; 4] = [
    "How to check my account balance?",
    "How can I transfer funds?",
    "What are my recent transactions?",
    "How to contact customer support?",
];

// UI
pub const APP_TITLE: &str = "FinBot";
pub const TYPING_TEXT: &str = "FinBot is typing…";
pub const INPUT_PLACEHOLDER: &str = "Type your question...";
pub const SPINNER_FRAMES: [&str; 4] = ["◐", "◓", "◑", "◒"];
pub const DEFAULT_TICK_RATE_MS: u64 = 120;
