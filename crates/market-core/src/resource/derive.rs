//! Derived listing fields. Everything here is pure; "now" is always passed in.

use chrono::{DateTime, Utc};

/// Marker that replaces line breaks in stored descriptions.
pub const LINE_BREAK_MARKER: &str = "<br />";

/// Characters kept by [`short_description`] before the ellipsis.
pub const SHORT_DESCRIPTION_LEN: usize = 10;

const TRUNCATION_MARKER: &str = "...";

/// Below this many elapsed seconds the phrase is "a few seconds".
const FEW_SECONDS: i64 = 10;

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 365 * DAY;

/// Replace `\r\n`, `\n` and `\r` with [`LINE_BREAK_MARKER`].
///
/// Line breaks are removed rather than annotated, so normalizing twice is a no-op.
pub fn normalize_description(raw: &str) -> String {
    raw.replace("\r\n", LINE_BREAK_MARKER)
        .replace(['\n', '\r'], LINE_BREAK_MARKER)
}

/// First [`SHORT_DESCRIPTION_LEN`] characters of the stored description plus `...`.
///
/// Lengths are counted in chars, never bytes, so multi-byte text is not split.
pub fn short_description(description: &str) -> String {
    if description.chars().count() < SHORT_DESCRIPTION_LEN {
        return description.to_string();
    }

    let mut short: String = description.chars().take(SHORT_DESCRIPTION_LEN).collect();
    short.push_str(TRUNCATION_MARKER);
    short
}

/// Human-relative rendering of `created_at` as seen from `now`.
pub fn created_at_ago(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(created_at).num_seconds();
    let phrase = relative_phrase(elapsed.abs());

    if elapsed < 0 {
        format!("in {phrase}")
    } else {
        format!("{phrase} ago")
    }
}

fn relative_phrase(seconds: i64) -> String {
    if seconds < FEW_SECONDS {
        return "a few seconds".to_string();
    }

    let (count, unit) = match seconds {
        s if s < MINUTE => (s, "second"),
        s if s < HOUR => (s / MINUTE, "minute"),
        s if s < DAY => (s / HOUR, "hour"),
        s if s < MONTH => (s / DAY, "day"),
        s if s < YEAR => (s / MONTH, "month"),
        s => (s / YEAR, "year"),
    };

    if count == 1 {
        format!("1 {unit}")
    } else {
        format!("{count} {unit}s")
    }
}
