use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};

/// One bank notification as delivered by the mailbox: receipt time plus the
/// SMS text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMessage {
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<FixedOffset>,
    pub body: String,
}

impl RawMessage {
    pub fn new(timestamp: DateTime<FixedOffset>, body: impl Into<String>) -> Self {
        Self { timestamp, body: body.into() }
    }
}

/// Accepts RFC 3339 (`2017-03-05T14:21:00+03:00`) and RFC 2822, the format of
/// e-mail `Date:` headers (`Sun, 05 Mar 2017 14:21:00 +0300`).
pub fn parse_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    let s = s.trim();
    DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_rfc2822(s))
        .ok()
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("unrecognized timestamp: '{raw}'")))
}
