//! Time helpers
//!
//! Timestamps travel through the engine as RFC 3339 strings.

use crate::error::{Result, RuntimeError};
use chrono::{DateTime, Datelike, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};
use verdict_core::Value;

/// Parse an RFC 3339 timestamp into UTC
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Read a value as a timestamp
pub(crate) fn value_to_timestamp(value: &Value) -> Result<DateTime<Utc>> {
    value
        .as_str()
        .and_then(parse_timestamp)
        .ok_or_else(|| {
            RuntimeError::TypeError(format!("expected an RFC 3339 timestamp, got {}", value))
        })
}

pub(crate) fn timestamp_to_value(ts: DateTime<Utc>) -> Value {
    Value::String(ts.to_rfc3339())
}

/// Relative duration such as `24h` or `7d`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelativeDuration {
    pub value: u64,
    pub unit: TimeUnit,
}

/// Time units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
}

impl RelativeDuration {
    /// Convert to seconds, `None` on overflow
    pub fn to_seconds(&self) -> Option<u64> {
        let factor = match self.unit {
            TimeUnit::Seconds => 1,
            TimeUnit::Minutes => 60,
            TimeUnit::Hours => 3600,
            TimeUnit::Days => 86400,
            TimeUnit::Weeks => 604800,
        };
        self.value.checked_mul(factor)
    }

    /// Convert to a chrono duration, `None` when out of range
    pub fn to_duration(&self) -> Option<Duration> {
        let seconds = i64::try_from(self.to_seconds()?).ok()?;
        Duration::try_seconds(seconds)
    }

    /// Parse from string like "24h", "7d", "5m" (an optional "last_" prefix is accepted)
    pub fn from_string(s: &str) -> Option<Self> {
        let s = s.strip_prefix("last_").unwrap_or(s);
        let (split, _) = s.char_indices().last()?;
        let (value_str, unit_str) = s.split_at(split);
        let value = value_str.parse::<u64>().ok()?;

        let unit = match unit_str {
            "s" => TimeUnit::Seconds,
            "m" => TimeUnit::Minutes,
            "h" => TimeUnit::Hours,
            "d" => TimeUnit::Days,
            "w" => TimeUnit::Weeks,
            _ => return None,
        };

        Some(RelativeDuration { value, unit })
    }
}

/// Part of a timestamp extracted by `TimestampExtract`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampPart {
    Year,
    Month,
    DayOfMonth,
    /// ISO weekday, Monday = 1 through Sunday = 7
    DayOfWeek,
    Hour,
    Minute,
}

impl TimestampPart {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "year" => Some(TimestampPart::Year),
            "month" => Some(TimestampPart::Month),
            "day_of_month" => Some(TimestampPart::DayOfMonth),
            "day_of_week" => Some(TimestampPart::DayOfWeek),
            "hour" => Some(TimestampPart::Hour),
            "minute" => Some(TimestampPart::Minute),
            _ => None,
        }
    }

    pub fn extract(&self, ts: &DateTime<Utc>) -> i64 {
        match self {
            TimestampPart::Year => ts.year() as i64,
            TimestampPart::Month => ts.month() as i64,
            TimestampPart::DayOfMonth => ts.day() as i64,
            TimestampPart::DayOfWeek => ts.weekday().number_from_monday() as i64,
            TimestampPart::Hour => ts.hour() as i64,
            TimestampPart::Minute => ts.minute() as i64,
        }
    }
}
