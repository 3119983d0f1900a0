// src/logging.rs

use crate::config::Config;
use crate::errors::FinbotResult;
use crate::models::ApiCallLog;
use flexi_logger::{detailed_format, FileSpec, Logger, LoggerHandle};
use log::{info, warn};

/// Starts file logging. The returned handle must stay alive for the whole run.
///
/// The terminal belongs to the UI, so log output only ever goes to a file.
pub fn init_logging(config: &Config) -> FinbotResult<LoggerHandle> {
    let handle = Logger::try_with_str(&config.log_level)?
        .log_to_file(
            FileSpec::default()
                .directory(&config.log_dir)
                .basename("finbot"),
        )
        .format(detailed_format)
        .start()?;

    Ok(handle)
}

pub fn format_api_call(log: &ApiCallLog) -> String {
    let status = log
        .response_status
        .map(|s| s.to_string())
        .unwrap_or_else(|| "none".to_string());

    format!(
        "[{}] {} - {} - Status: {} - Time: {}ms",
        log.timestamp.to_rfc3339(),
        log.endpoint,
        log.request_summary,
        status,
        log.response_time_ms
    )
}

/// Records one backend call.
pub fn log_api_call(log: &ApiCallLog) {
    let entry = format_api_call(log);
    match log.response_status {
        Some(status) if (200..300).contains(&status) => info!("{}", entry),
        _ => warn!("{}", entry),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_format_api_call_with_status() {
        let log = ApiCallLog {
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            endpoint: "http://localhost:8000/chat".to_string(),
            request_summary: "chat #1".to_string(),
            response_status: Some(200),
            response_time_ms: 35,
        };

        assert_eq!(
            format_api_call(&log),
            "[2024-05-01T12:00:00+00:00] http://localhost:8000/chat - chat #1 - Status: 200 - Time: 35ms"
        );
    }

    #[test]
    fn test_format_api_call_without_status() {
        let log = ApiCallLog {
            timestamp: Utc::now(),
            endpoint: "http://localhost:8000/chat".to_string(),
            request_summary: "chat #2".to_string(),
            response_status: None,
            response_time_ms: 3,
        };

        assert!(format_api_call(&log).contains("Status: none"));
    }
}
