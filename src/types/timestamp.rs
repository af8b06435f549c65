//! Timestamps of mentions inside audio and video sources.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref LEADING_TIMESTAMP: Regex = Regex::new(r"^\s*\d{1,2}:\d{2}(?::\d{2})?\s*").unwrap();
}

/// Integer prefix of a string, as typed into a form: leading whitespace is
/// skipped, a sign is allowed, and parsing stops at the first non-digit.
/// Anything without digits is 0.
pub fn parse_int_prefix(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let value = digits
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .fold(0_i64, |acc, c| {
            acc.saturating_mul(10).saturating_add(i64::from(c as u8 - b'0'))
        });
    if negative {
        -value
    } else {
        value
    }
}

/// Seconds in `H:MM:SS`, `MM:SS` or `SS`. Fields are read from the right;
/// missing or non-numeric fields count as 0. Out of range values such as
/// `0:75` are taken as they are; totals too large saturate.
pub fn parse_time_to_seconds(text: &str) -> i64 {
    let mut parts = text.split(':').rev();
    let seconds = parts.next().map_or(0, parse_int_prefix);
    let minutes = parts.next().map_or(0, parse_int_prefix);
    let hours = parts.next().map_or(0, parse_int_prefix);
    hours
        .saturating_mul(3600)
        .saturating_add(minutes.saturating_mul(60))
        .saturating_add(seconds)
}

/// The time field as typed: plain seconds, where 0 or garbage clears it.
pub fn parse_time_field(text: &str) -> Option<i64> {
    match parse_int_prefix(text.trim()) {
        0 => None,
        seconds => Some(seconds),
    }
}

/// The timestamp a pasted transcript starts with, e.g. "12:34" in
/// "12:34 and then he said".
pub fn find_first_timestamp(text: &str) -> Option<&str> {
    LEADING_TIMESTAMP.find(text).map(|m| m.as_str().trim())
}

/// Drop the leading timestamp of every line and join the remaining lines
/// with single spaces.
pub fn remove_timestamps(text: &str) -> String {
    text.split('\n')
        .map(|line| LEADING_TIMESTAMP.replace(line, "").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// "1:02:03" for 3723, "2:03" below an hour.
pub fn format_seconds(seconds: i64) -> String {
    let sign = if seconds < 0 { "-" } else { "" };
    let seconds = seconds.unsigned_abs();
    let (h, m, s) = (seconds / 3600, (seconds % 3600) / 60, seconds % 60);
    if h > 0 {
        format!("{sign}{h}:{m:02}:{s:02}")
    } else {
        format!("{sign}{m}:{s:02}")
    }
}
