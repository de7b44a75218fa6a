//! Timestamp formatting utilities
//!
//! All timestamps in the crate are UTC. Rotation markers and rotated-aside
//! file names use [`utc_stamp`], the RFC 3339 seconds-precision form with a
//! `Z` suffix that external rotation tooling expects.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Standardized timestamp format options for log lines
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// ISO 8601 with milliseconds: `2025-01-08T10:30:45.123Z`
    ///
    /// This is the default format, widely supported by log aggregation systems.
    #[default]
    Iso8601,

    /// RFC 3339 with seconds precision: `2025-01-08T10:30:45Z`
    Rfc3339,

    /// Custom strftime format
    Custom(String),
}

impl TimestampFormat {
    /// Format a `DateTime<Utc>` according to this format
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            TimestampFormat::Rfc3339 => datetime.to_rfc3339_opts(SecondsFormat::Secs, true),
            TimestampFormat::Custom(format_str) => datetime.format(format_str).to_string(),
        }
    }
}

/// Current UTC time in RFC 3339 seconds precision with a `Z` suffix
///
/// Used for rotated-aside file name suffixes and for the stream
/// start/reopen marker lines.
#[must_use]
pub fn utc_stamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_iso8601_format() {
        let dt = Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).unwrap();
        assert_eq!(
            TimestampFormat::Iso8601.format(&dt),
            "2025-01-08T10:30:45.000Z"
        );
    }

    #[test]
    fn test_rfc3339_format() {
        let dt = Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).unwrap();
        assert_eq!(TimestampFormat::Rfc3339.format(&dt), "2025-01-08T10:30:45Z");
    }

    #[test]
    fn test_custom_format() {
        let dt = Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).unwrap();
        let format = TimestampFormat::Custom("%Y-%m-%d".to_string());
        assert_eq!(format.format(&dt), "2025-01-08");
    }

    #[test]
    fn test_utc_stamp_shape() {
        let stamp = utc_stamp();
        assert!(stamp.ends_with('Z'));
        assert_eq!(stamp.len(), "2025-01-08T10:30:45Z".len());
    }
}
