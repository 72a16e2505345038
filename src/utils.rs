//! Small string and time helpers.
//!
//! - Capitalization for placeholder topics and headings
//! - Truncation of response bodies and descriptions for logs and terminal output
//! - Human-friendly publication times

use chrono::{DateTime, Utc};

/// Capitalize the first character of a string.
///
/// Used to turn a search term or category name into a topic label
/// (e.g. "technology" -> "Technology").
///
/// # Examples
///
/// ```ignore
/// assert_eq!(upcase("hello"), "Hello");
/// assert_eq!(upcase(""), "");
/// ```
pub fn upcase(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().collect::<String>() + c.as_str(),
    }
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (on a char boundary) with an
/// ellipsis and the number of dropped bytes appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Shorten text to `max` characters for display, ending with an ellipsis.
pub fn ellipsize(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept.trim_end())
}

/// Format a publication time relative to `now`.
///
/// Recent items read as "5 minutes ago" / "3 hours ago" / "2 days ago";
/// anything a week or older, or in the future, falls back to a calendar date.
pub fn format_published(published: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let age = now.signed_duration_since(published);
    if age.num_seconds() < 0 || age.num_days() >= 7 {
        return published.format("%b %-d, %Y").to_string();
    }

    let (n, unit) = if age.num_minutes() < 1 {
        return "just now".to_string();
    } else if age.num_hours() < 1 {
        (age.num_minutes(), "minute")
    } else if age.num_days() < 1 {
        (age.num_hours(), "hour")
    } else {
        (age.num_days(), "day")
    };

    if n == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", n, unit)
    }
}
