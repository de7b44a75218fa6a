//! Log entry structure

use super::log_level::LogLevel;
use super::timestamp::TimestampFormat;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl LogEntry {
    /// Sanitize log message to prevent log injection attacks
    ///
    /// Replaces newlines, carriage returns, and tabs with escape sequences
    /// to prevent attackers from injecting fake log entries.
    fn sanitize_message(message: &str) -> String {
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    pub fn new(level: LogLevel, message: String) -> Self {
        Self {
            level,
            message: Self::sanitize_message(&message),
            timestamp: Utc::now(),
        }
    }

    /// Render the entry as a single fixed-format text line
    ///
    /// The format is non-colored with a full timestamp:
    /// `[2025-01-08T10:30:45.123Z] [INFO ] message`
    #[must_use]
    pub fn render(&self, timestamp_format: &TimestampFormat) -> String {
        format!(
            "[{}] [{:5}] {}",
            timestamp_format.format(&self.timestamp),
            self.level.to_str(),
            self.message
        )
    }
}
