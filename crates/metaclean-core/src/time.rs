//! Timestamp formatting shared by every JSON response.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serializer;

/// Format a timestamp as ISO-8601 UTC with millisecond precision (`2024-01-01T00:00:00.000Z`).
pub fn iso_millis(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Serde adapter for `#[serde(serialize_with = "...")]` on `DateTime<Utc>` fields.
pub fn serialize_iso_millis<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&iso_millis(ts))
}
