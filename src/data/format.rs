use chrono::{DateTime, Local, Utc};

/// Format a latency value: negative values mean the check timed out.
pub fn format_latency(ms: i64) -> String {
    if ms < 0 {
        "Timeout".to_string()
    } else {
        format!("{}ms", ms)
    }
}

/// Format the age of a timestamp relative to `now` (e.g. "42s", "5m", "3h", "2d").
///
/// Timestamps in the future are shown as "0s".
pub fn format_age(since: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - since).num_seconds().max(0);
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m", seconds / 60)
    } else if seconds < 86400 {
        format!("{}h", seconds / 3600)
    } else {
        format!("{}d", seconds / 86400)
    }
}

/// Format a timestamp in local time for the detail overlay.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}
