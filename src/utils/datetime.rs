use jiff::Timestamp;

/// Relative age of a unix timestamp (seconds) measured against `now`, e.g.
/// "3 hours ago". Zero means the API sent no time and yields an empty string.
pub fn format_relative_time(unix_secs: i64, now: Timestamp) -> String {
    if unix_secs == 0 {
        return String::new();
    }

    let delta = now.as_second().saturating_sub(unix_secs);
    // Future timestamps come from clock skew
    if delta < 60 {
        return "just now".to_string();
    }

    let (count, unit) = match delta {
        d if d >= 86_400 => (d / 86_400, "day"),
        d if d >= 3_600 => (d / 3_600, "hour"),
        d => (d / 60, "minute"),
    };

    if count == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", count, unit)
    }
}
