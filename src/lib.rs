// src/lib.rs

pub mod api;
pub mod app;
pub mod chat_message;
pub mod config;
pub mod constants;
pub mod conversation;
pub mod dispatcher;
pub mod errors;
pub mod event;
pub mod key_handlers;
pub mod logging;
pub mod markdown;
pub mod models;
pub mod status_indicator;
pub mod ui;
