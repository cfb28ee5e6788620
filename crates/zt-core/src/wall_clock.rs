//! Wall-clock helpers for `HH:MM` values.

use std::sync::LazyLock;

use chrono::{NaiveTime, Timelike};
use regex::Regex;

/// Strict `H:MM`/`HH:MM` time of day, 00:00 to 23:59.
static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-1]?\d|2[0-3]):([0-5]\d)$").unwrap());

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Parses a strict `HH:MM` time of day. One-digit hours are accepted.
pub fn parse_hhmm(s: &str) -> Option<NaiveTime> {
    let caps = TIME_RE.captures(s)?;
    let hour = caps[1].parse().ok()?;
    let minute = caps[2].parse().ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Formats a time of day as `HH:MM`.
pub fn format_hhmm(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

pub fn minutes_since_midnight(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Builds a time of day from minutes since midnight. `None` past 23:59.
pub fn time_from_minutes(minutes: u32) -> Option<NaiveTime> {
    if minutes >= MINUTES_PER_DAY {
        return None;
    }
    NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0)
}

/// Minutes from `start` to `end`; zero if `end` is not after `start`.
pub fn minutes_between(start: NaiveTime, end: NaiveTime) -> u32 {
    minutes_since_midnight(end).saturating_sub(minutes_since_midnight(start))
}

/// Formats a signed minute count as `H:MM` (e.g. `7:30`, `-0:15`).
pub fn format_minutes(minutes: i64) -> String {
    let sign = if minutes < 0 { "-" } else { "" };
    let m = minutes.unsigned_abs();
    format!("{sign}{}:{:02}", m / 60, m % 60)
}

/// Serde adapter storing a [`NaiveTime`] as `HH:MM`.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_hhmm(*time))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        super::parse_hhmm(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid time of day: {s}")))
    }
}

/// Serde adapter for an optional `HH:MM` time.
pub mod hhmm_option {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match time {
            Some(time) => serializer.serialize_some(&super::format_hhmm(*time)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|s| {
                super::parse_hhmm(&s)
                    .ok_or_else(|| serde::de::Error::custom(format!("invalid time of day: {s}")))
            })
            .transpose()
    }
}
