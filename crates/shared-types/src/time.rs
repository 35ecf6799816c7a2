//! Block timestamp rendering.

use chrono::{DateTime, SecondsFormat};

use crate::entities::TimestampMs;

/// RFC 3339 at second precision in UTC. Sub-second digits are dropped.
pub fn format_timestamp(timestamp_ms: TimestampMs) -> String {
    i64::try_from(timestamp_ms / 1_000)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_else(|| format!("{}ms", timestamp_ms))
}
