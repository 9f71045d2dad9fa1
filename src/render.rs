//! Placeholder substitution
//!
//! Recognized placeholders:
//!
//! - `{{title}}`: the note's base name
//! - `{{date}}` or `{{date:FORMAT}}`: current date, `YYYY-MM-DD` by default
//! - `{{time}}` or `{{time:FORMAT}}`: current time, `HH:mm` by default
//!
//! Anything else, including malformed placeholders, is left as written.
//! The template is scanned once: text produced by a substitution is never
//! looked at again, so a title containing `{{date}}` stays literal.

use chrono::{DateTime, FixedOffset};
use regex::{Captures, Regex};
use std::sync::OnceLock;

use crate::moment;

/// Values available to placeholders
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// Base name of the note, without folder or extension
    pub title: String,
    /// Instant the template is rendered at
    pub now: DateTime<FixedOffset>,
}

impl RenderContext {
    pub fn new(title: impl Into<String>, now: DateTime<FixedOffset>) -> Self {
        Self {
            title: title.into(),
            now,
        }
    }
}

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\{\{(?:(date|time)(?::([^}]+))?|title)\}\}").expect("placeholder regex is valid")
    })
}

/// Substitute every recognized placeholder in `template`
pub fn render(template: &str, ctx: &RenderContext) -> String {
    placeholder_regex()
        .replace_all(template, |caps: &Captures| match caps.get(1).map(|m| m.as_str()) {
            Some("date") => {
                let format = caps.get(2).map_or(moment::DATE_FORMAT, |m| m.as_str());
                moment::format(&ctx.now, format)
            }
            Some(_) => {
                let format = caps.get(2).map_or(moment::TIME_FORMAT, |m| m.as_str());
                moment::format(&ctx.now, format)
            }
            None => ctx.title.clone(),
        })
        .into_owned()
}
