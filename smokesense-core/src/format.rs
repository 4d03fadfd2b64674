//! Formatting helpers shared by the CLI renderers.

use chrono::{DateTime, Utc};

/// Format an hour of day on a 12-hour clock (e.g., "12 AM", "3 PM").
pub fn format_hour(hour: u8) -> String {
    match hour {
        0 => "12 AM".to_string(),
        12 => "12 PM".to_string(),
        h if h > 12 => format!("{} PM", h - 12),
        h => format!("{} AM", h),
    }
}

/// Compact duration from minutes (e.g., "45m", "8h", "14d").
pub fn format_duration_minutes(minutes: i64) -> String {
    let minutes = minutes.max(0);
    if minutes < 60 {
        format!("{}m", minutes)
    } else if minutes < 24 * 60 {
        format!("{}h", minutes / 60)
    } else {
        format!("{}d", minutes / (24 * 60))
    }
}

/// Format the time since the last log (e.g., "2h 5m 10s ago").
pub fn format_time_since(last: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = now.signed_duration_since(last).num_seconds();
    if secs < 0 {
        return "just now".to_string();
    }

    if secs < 60 {
        format!("{}s ago", secs)
    } else if secs < 3600 {
        format!("{}m {}s ago", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s ago", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}

/// Format an optional last-log time, or a dash if nothing has been logged.
pub fn format_time_since_opt(last: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    match last {
        Some(ts) => format_time_since(ts, now),
        None => "-".to_string(),
    }
}

/// Time-of-day greeting for a local hour.
pub fn greeting(hour: u8, name: &str) -> String {
    let part = if hour < 12 {
        "morning"
    } else if hour < 17 {
        "afternoon"
    } else {
        "evening"
    };
    format!("Good {}, {}", part, name)
}

/// Format an amount of money with the configured currency symbol.
pub fn format_money(symbol: &str, amount: f64) -> String {
    format!("{}{:.0}", symbol, amount)
}
