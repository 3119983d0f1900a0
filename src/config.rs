use crate::constants::{
    BACKEND_URL_ENV, COLD_START_FALLBACK, DEFAULT_BACKEND_URL, DEFAULT_EXAMPLE_QUESTIONS,
    DEFAULT_GREETING, DEFAULT_TICK_RATE_MS, LOG_LEVEL_ENV, PLAIN_FALLBACK,
};
use crate::errors::{FinbotError, FinbotResult};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path, path::PathBuf};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Which fixed message replaces an answer when the backend cannot be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackStyle {
    #[default]
    Plain,
    /// For backends on hosts that sleep when idle.
    ColdStart,
}

impl FallbackStyle {
    pub fn message(self) -> &'static str {
        match self {
            FallbackStyle::Plain => PLAIN_FALLBACK,
            FallbackStyle::ColdStart => COLD_START_FALLBACK,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend_url: String,
    pub fallback_style: FallbackStyle,
    pub greeting: String,
    pub example_questions: Vec<String>,
    pub log_level: String,
    pub log_dir: String,
    pub tick_rate_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            fallback_style: FallbackStyle::Plain,
            greeting: DEFAULT_GREETING.to_string(),
            example_questions: DEFAULT_EXAMPLE_QUESTIONS
                .iter()
                .map(|q| q.to_string())
                .collect(),
            log_level: "info".to_string(),
            log_dir: default_log_dir(),
            tick_rate_ms: DEFAULT_TICK_RATE_MS,
        }
    }
}

impl Config {
    pub fn fallback_message(&self) -> &'static str {
        self.fallback_style.message()
    }
}

/// Loads the config file (creating it on first run) and applies environment
/// overrides.
pub fn initialize_config() -> FinbotResult<Config> {
    let config_path = get_config_path()?;
    let mut config = load_or_create(&config_path)?;
    apply_env_overrides(&mut config, |key| env::var(key).ok());
    validate_config(&config)?;

    Ok(config)
}

/// Reads `path`, or writes a default config there when it does not exist yet.
pub fn load_or_create(path: &Path) -> FinbotResult<Config> {
    if path.exists() {
        let config_str = fs::read_to_string(path).map_err(|e| {
            FinbotError::config_error(format!("Failed to read config file: {}", e))
        })?;

        return serde_json::from_str(&config_str)
            .map_err(|e| FinbotError::config_error(format!("Failed to parse config: {}", e)));
    }

    let config = Config::default();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            FinbotError::config_error(format!("Failed to create config directory: {}", e))
        })?;
    }

    let config_str = serde_json::to_string_pretty(&config)?;
    fs::write(path, config_str)
        .map_err(|e| FinbotError::config_error(format!("Failed to write config file: {}", e)))?;

    Ok(config)
}

/// Environment values win over whatever the file says.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(BACKEND_URL_ENV).filter(|v| !v.trim().is_empty()) {
        config.backend_url = url.trim().to_string();
    }
    if let Some(level) = lookup(LOG_LEVEL_ENV).filter(|v| !v.trim().is_empty()) {
        config.log_level = level.trim().to_lowercase();
    }
}

fn get_config_path() -> FinbotResult<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| FinbotError::config_error("Could not determine home directory"))?;

    Ok(home_dir.join(".config").join("finbot").join("config.json"))
}

fn default_log_dir() -> String {
    dirs::data_local_dir()
        .map(|dir| dir.join("finbot").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
        .to_string_lossy()
        .into_owned()
}

pub fn validate_config(config: &Config) -> FinbotResult<()> {
    if config.backend_url.trim().is_empty() {
        return Err(FinbotError::config_error("Backend URL is required"));
    }

    let url = Url::parse(&config.backend_url).map_err(|e| {
        FinbotError::config_error(format!("Invalid backend URL {}: {}", config.backend_url, e))
    })?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(FinbotError::config_error(format!(
            "Backend URL must use http or https, got {}",
            url.scheme()
        )));
    }

    if !LOG_LEVELS.contains(&config.log_level.as_str()) {
        return Err(FinbotError::config_error(format!(
            "Unknown log level: {}",
            config.log_level
        )));
    }

    if config.tick_rate_ms == 0 {
        return Err(FinbotError::config_error("tick_rate_ms must be greater than 0"));
    }

    Ok(())
}
