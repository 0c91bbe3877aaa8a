use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use kassa_core::{Money, RawMessage, Record};
use regex::{Captures, Regex};

use crate::error::MessageError;

/// Turns the capture groups of a matched pattern into a record.
pub type Build = fn(&Fields<'_>) -> Result<Record, MessageError>;

/// One alternative of a bank grammar.
pub struct Pattern {
    pub name: &'static str,
    pub regex: fn() -> &'static Regex,
    pub build: Build,
}

/// Tries `patterns` in order; the first one whose regex matches decides the
/// outcome, later ones are never attempted.
pub fn first_match(patterns: &[Pattern], message: &RawMessage) -> Result<Record, MessageError> {
    for pattern in patterns {
        if let Some(caps) = (pattern.regex)().captures(&message.body) {
            tracing::trace!(pattern = pattern.name, "pattern matched");
            return (pattern.build)(&Fields { caps, message });
        }
    }
    Err(MessageError::Unrecognized)
}

/// Typed access to the capture groups of one match.
pub struct Fields<'h> {
    caps: Captures<'h>,
    message: &'h RawMessage,
}

impl<'h> Fields<'h> {
    pub fn message(&self) -> &RawMessage {
        self.message
    }

    /// Trimmed capture; empty or unmatched groups are `None`.
    pub fn opt_text(&self, group: usize) -> Option<String> {
        self.caps
            .get(group)
            .map(|m| m.as_str().trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    pub fn text(&self, group: usize) -> String {
        self.opt_text(group).unwrap_or_default()
    }

    pub fn amount(&self, group: usize, field: &'static str) -> Result<Money, MessageError> {
        let raw = self.caps.get(group).map(|m| m.as_str()).unwrap_or_default();
        parse_money(raw, field)
    }

    pub fn opt_amount(&self, group: usize, field: &'static str) -> Result<Option<Money>, MessageError> {
        self.opt_text(group).map(|raw| parse_money(&raw, field)).transpose()
    }

    /// Timestamp written inside the message, completed from the receipt time.
    pub fn declared_time(&self, group: usize) -> Result<NaiveDateTime, MessageError> {
        let raw = self.text(group);
        let anchor = self.message.timestamp.naive_local();
        parse_declared_time(&raw, anchor).ok_or(MessageError::InvalidTimestamp(raw))
    }
}

fn parse_money(raw: &str, field: &'static str) -> Result<Money, MessageError> {
    raw.parse::<Money>().map_err(|_| MessageError::InvalidAmount {
        field,
        value: raw.trim().to_string(),
    })
}

// ── Declared timestamps ──────────────────────────────────────────────────────

/// Reads `DD.MM[.YY[YY]]` and/or `HH:MM[:SS]` tokens, day first. Any component
/// the text does not carry is taken from `anchor`; a written clock time without
/// seconds gets zero seconds.
pub fn parse_declared_time(text: &str, anchor: NaiveDateTime) -> Option<NaiveDateTime> {
    let mut date = None;
    let mut time = None;

    let tokens = text
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty());
    for token in tokens {
        if token.contains(':') {
            if time.is_some() {
                return None;
            }
            time = Some(parse_clock(token)?);
        } else {
            if date.is_some() {
                return None;
            }
            date = Some(parse_day_first(token, anchor.date())?);
        }
    }

    if date.is_none() && time.is_none() {
        return None;
    }
    Some(NaiveDateTime::new(
        date.unwrap_or(anchor.date()),
        time.unwrap_or(anchor.time()),
    ))
}

fn parse_clock(token: &str) -> Option<NaiveTime> {
    let parts: Vec<u32> = token
        .split(':')
        .map(|p| p.parse().ok())
        .collect::<Option<_>>()?;
    match parts.as_slice() {
        [h, m] => NaiveTime::from_hms_opt(*h, *m, 0),
        [h, m, s] => NaiveTime::from_hms_opt(*h, *m, *s),
        _ => None,
    }
}

fn parse_day_first(token: &str, anchor: NaiveDate) -> Option<NaiveDate> {
    use chrono::Datelike;

    let parts: Vec<&str> = token
        .trim_end_matches('.')
        .split(['.', '/', '-'])
        .collect();
    let number = |s: &str| -> Option<u32> {
        if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        s.parse().ok()
    };

    let (day, month, year) = match parts.as_slice() {
        [d, m] => (number(d)?, number(m)?, anchor.year()),
        [d, m, y] => (number(d)?, number(m)?, expand_year(y)?),
        _ => return None,
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

fn expand_year(s: &str) -> Option<i32> {
    let y: i32 = s.parse().ok()?;
    match s.len() {
        1 | 2 => Some(2000 + y),
        4 => Some(y),
        _ => None,
    }
}
