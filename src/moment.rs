//! Date and time formatting with `YYYY-MM-DD` style tokens
//!
//! Templates write formats the way note-taking apps do (`{{date:DD/MM/YYYY}}`,
//! `{{time:h:mm A}}`), not as strftime strings. Letters that are not tokens
//! are copied through unchanged, and text inside `[...]` is always literal.

use chrono::{DateTime, Datelike, FixedOffset, Timelike};

/// Default format for `{{date}}`
pub const DATE_FORMAT: &str = "YYYY-MM-DD";

/// Default format for `{{time}}`
pub const TIME_FORMAT: &str = "HH:mm";

// Longest tokens first so `MMMM` is not read as `MM` twice.
const TOKENS: &[&str] = &[
    "YYYY", "GGGG", "MMMM", "DDDD", "DDDo", "dddd", "MMM", "DDD", "ddd", "SSS", "YY", "MM", "Mo",
    "Do", "DD", "dd", "WW", "Wo", "ww", "wo", "Qo", "HH", "hh", "kk", "mm", "ss", "SS", "ZZ", "Q",
    "M", "D", "d", "E", "W", "w", "H", "h", "k", "m", "s", "S", "A", "a", "X", "x", "Z",
];

/// Render `instant` according to `pattern`
pub fn format(instant: &DateTime<FixedOffset>, pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut rest = pattern;

    while !rest.is_empty() {
        if let Some(inner) = rest.strip_prefix('[') {
            if let Some(end) = inner.find(']') {
                out.push_str(&inner[..end]);
                rest = &inner[end + 1..];
                continue;
            }
        }

        if let Some(token) = TOKENS.iter().find(|t| rest.starts_with(**t)) {
            out.push_str(&expand(instant, token));
            rest = &rest[token.len()..];
            continue;
        }

        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            out.push(c);
        }
        rest = chars.as_str();
    }

    out
}

fn expand(instant: &DateTime<FixedOffset>, token: &str) -> String {
    match token {
        "YYYY" => format!("{:04}", instant.year()),
        "YY" => format!("{:02}", instant.year().rem_euclid(100)),
        "GGGG" => format!("{:04}", instant.iso_week().year()),
        "Q" => quarter(instant).to_string(),
        "Qo" => ordinal(quarter(instant)),
        "MMMM" => instant.format("%B").to_string(),
        "MMM" => instant.format("%b").to_string(),
        "MM" => format!("{:02}", instant.month()),
        "M" => instant.month().to_string(),
        "Mo" => ordinal(instant.month()),
        "DDDD" => format!("{:03}", instant.ordinal()),
        "DDD" => instant.ordinal().to_string(),
        "DDDo" => ordinal(instant.ordinal()),
        "DD" => format!("{:02}", instant.day()),
        "Do" => ordinal(instant.day()),
        "D" => instant.day().to_string(),
        "dddd" => instant.format("%A").to_string(),
        "ddd" => instant.format("%a").to_string(),
        "dd" => instant.format("%a").to_string().chars().take(2).collect(),
        "d" => instant.weekday().num_days_from_sunday().to_string(),
        "E" => instant.weekday().number_from_monday().to_string(),
        "WW" => format!("{:02}", instant.iso_week().week()),
        "W" => instant.iso_week().week().to_string(),
        "Wo" => ordinal(instant.iso_week().week()),
        "ww" => format!("{:02}", sunday_week(instant)),
        "w" => sunday_week(instant).to_string(),
        "wo" => ordinal(sunday_week(instant)),
        "HH" => format!("{:02}", instant.hour()),
        "H" => instant.hour().to_string(),
        "hh" => format!("{:02}", instant.hour12().1),
        "h" => instant.hour12().1.to_string(),
        "kk" => format!("{:02}", hour_from_one(instant.hour())),
        "k" => hour_from_one(instant.hour()).to_string(),
        "mm" => format!("{:02}", instant.minute()),
        "m" => instant.minute().to_string(),
        "ss" => format!("{:02}", instant.second()),
        "s" => instant.second().to_string(),
        "SSS" => format!("{:03}", millis(instant)),
        "SS" => format!("{:02}", millis(instant) / 10),
        "S" => (millis(instant) / 100).to_string(),
        "A" => (if instant.hour12().0 { "PM" } else { "AM" }).to_string(),
        "a" => (if instant.hour12().0 { "pm" } else { "am" }).to_string(),
        "X" => instant.timestamp().to_string(),
        "x" => instant.timestamp_millis().to_string(),
        "ZZ" => instant.format("%z").to_string(),
        "Z" => instant.format("%:z").to_string(),
        other => other.to_string(),
    }
}

fn quarter(instant: &DateTime<FixedOffset>) -> u32 {
    (instant.month() - 1) / 3 + 1
}

// Leap seconds report 1000+ ms.
fn millis(instant: &DateTime<FixedOffset>) -> u32 {
    instant.timestamp_subsec_millis().min(999)
}

/// Week of the year with weeks starting on Sunday; the week holding
/// January 1st is week 1.
fn sunday_week(instant: &DateTime<FixedOffset>) -> u32 {
    let date = instant.date_naive();
    let days_to_saturday = 6 - date.weekday().num_days_from_sunday();
    let saturday = date + chrono::Days::new(u64::from(days_to_saturday));
    (saturday.ordinal() - 1) / 7 + 1
}

fn hour_from_one(hour: u32) -> u32 {
    if hour == 0 { 24 } else { hour }
}

fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}
