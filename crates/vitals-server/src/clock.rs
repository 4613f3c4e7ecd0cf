use chrono::{SecondsFormat, Utc};

/// RFC 3339 UTC timestamp with millisecond precision, e.g. `2024-05-01T12:00:00.123Z`.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
