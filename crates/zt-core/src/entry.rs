//! Line-level parsing of time entries.
//!
//! Each non-empty line of a day is one statement:
//!
//! - `HH:MM - HH:MM [reason]` closed interval
//! - `HH:MM -` open interval, closed at the reference time
//! - `HH:MM` bare start time, running until the reference time
//! - a special-day keyword, ignored at line level
//!
//! Problems are collected per line and never abort parsing.

use std::fmt;
use std::sync::LazyLock;

use chrono::NaiveTime;
use regex::Regex;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::rules::BreakRules;
use crate::special_day::classify_keyword;
use crate::wall_clock::{self, hhmm, minutes_since_midnight, parse_hhmm};

static CLOSED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2}:\d{2})\s*-\s*(\d{1,2}:\d{2})(?:\s+(.+))?$").unwrap()
});
static OPEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d{1,2}:\d{2})\s*-$").unwrap());
static BARE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d{1,2}:\d{2})$").unwrap());

/// One worked interval within a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeEntry {
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
    /// Minutes from start to end.
    pub duration: u32,
    /// Free text after a closed interval (e.g. "Homeoffice").
    pub reason: Option<String>,
    /// The source line, so callers can edit or delete the entry.
    pub original_line: String,
    /// True if the end was resolved from the reference time.
    pub is_open: bool,
}

impl TimeEntry {
    fn new(start: NaiveTime, end: NaiveTime, line: &str, is_open: bool) -> Self {
        Self {
            start,
            end,
            duration: wall_clock::minutes_between(start, end),
            reason: None,
            original_line: line.to_string(),
            is_open,
        }
    }

    /// Returns true if `[start, end)` of both entries intersect.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && self.end > other.start
    }
}

/// Why a line was rejected. Messages are user-facing (German).
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum EntryError {
    /// The line matches none of the recognized forms.
    #[error("Ungültiges Format. Verwende HH:MM - HH:MM oder HH:MM.")]
    InvalidFormat,
    /// A time is outside 00:00..23:59.
    #[error("Ungültige Zeitangabe")]
    InvalidTime,
    /// The end of a closed interval is not after its start.
    #[error("Endzeit muss nach der Startzeit liegen")]
    EndNotAfterStart,
    /// The interval intersects an accepted entry.
    #[error("Zeitraum überlappt mit vorherigem Eintrag")]
    Overlap,
    /// A bare start time lies ahead of the reference time.
    #[error("Startzeit liegt in der Zukunft")]
    FutureStart,
}

impl EntryError {
    /// Stable identifier for serialized output.
    pub const fn code(self) -> &'static str {
        match self {
            Self::InvalidFormat => "invalid_format",
            Self::InvalidTime => "invalid_time",
            Self::EndNotAfterStart => "end_not_after_start",
            Self::Overlap => "overlap",
            Self::FutureStart => "future_start",
        }
    }
}

/// A rejected line, addressed by its 1-based position among non-empty lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub line: usize,
    pub kind: EntryError,
}

impl ValidationError {
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Zeile {}: {}", self.line, self.kind)
    }
}

impl Serialize for ValidationError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("ValidationError", 3)?;
        state.serialize_field("line", &self.line)?;
        state.serialize_field("code", self.kind.code())?;
        state.serialize_field("message", &self.message())?;
        state.end()
    }
}

fn time(s: &str) -> Result<NaiveTime, EntryError> {
    parse_hhmm(s).ok_or(EntryError::InvalidTime)
}

fn reject_overlap(entry: TimeEntry, accepted: &[TimeEntry]) -> Result<TimeEntry, EntryError> {
    if accepted.iter().any(|other| entry.overlaps(other)) {
        return Err(EntryError::Overlap);
    }
    Ok(entry)
}

/// Parses one trimmed line against the entries accepted so far.
///
/// Returns `Ok(None)` for lines that are valid but yield no entry: special-day
/// keywords, and open intervals that have not started yet or lack a reference
/// time.
///
/// Without a reference time a bare start time becomes a zero-length entry.
pub fn parse_line(
    line: &str,
    reference: Option<NaiveTime>,
    accepted: &[TimeEntry],
    rules: &BreakRules,
) -> Result<Option<TimeEntry>, EntryError> {
    if let Some(caps) = CLOSED_RE.captures(line) {
        let start = time(&caps[1])?;
        let end = time(&caps[2])?;
        if end <= start {
            return Err(EntryError::EndNotAfterStart);
        }
        let mut entry = TimeEntry::new(start, end, line, false);
        entry.reason = caps
            .get(3)
            .map(|m| m.as_str().trim().to_string())
            .filter(|reason| !reason.is_empty());
        return reject_overlap(entry, accepted).map(Some);
    }

    if let Some(caps) = OPEN_RE.captures(line) {
        let start = time(&caps[1])?;
        let Some(now) = reference.filter(|now| *now >= start) else {
            return Ok(None);
        };
        return reject_overlap(TimeEntry::new(start, now, line, true), accepted).map(Some);
    }

    if let Some(caps) = BARE_RE.captures(line) {
        let start = time(&caps[1])?;
        let end = match reference {
            Some(now) => {
                let limit = minutes_since_midnight(now) + rules.future_tolerance_minutes;
                if minutes_since_midnight(start) > limit {
                    return Err(EntryError::FutureStart);
                }
                now.max(start)
            }
            None => start,
        };
        return reject_overlap(TimeEntry::new(start, end, line, true), accepted).map(Some);
    }

    if classify_keyword(line).is_some() {
        return Ok(None);
    }

    Err(EntryError::InvalidFormat)
}

/// Parses every non-empty line of a day's text.
///
/// Accepted entries are returned sorted by start time.
pub fn parse_entries(
    text: &str,
    reference: Option<NaiveTime>,
    rules: &BreakRules,
) -> (Vec<TimeEntry>, Vec<ValidationError>) {
    let mut entries: Vec<TimeEntry> = Vec::new();
    let mut errors = Vec::new();

    let lines = text.lines().map(str::trim).filter(|line| !line.is_empty());
    for (index, line) in lines.enumerate() {
        match parse_line(line, reference, &entries, rules) {
            Ok(Some(entry)) => entries.push(entry),
            Ok(None) => {}
            Err(kind) => errors.push(ValidationError {
                line: index + 1,
                kind,
            }),
        }
    }

    entries.sort_by_key(|entry| entry.start);
    (entries, errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn parse(line: &str, reference: Option<NaiveTime>) -> Result<Option<TimeEntry>, EntryError> {
        parse_line(line, reference, &[], &BreakRules::default())
    }

    #[test]
    fn closed_interval_computes_duration() {
        let entry = parse("08:00 - 12:30", None).unwrap().unwrap();
        assert_eq!(entry.start, at(8, 0));
        assert_eq!(entry.end, at(12, 30));
        assert_eq!(entry.duration, 270);
        assert_eq!(entry.reason, None);
        assert!(!entry.is_open);
    }

    #[test]
    fn closed_interval_keeps_reason_and_line() {
        let entry = parse("8:00-16:00 Homeoffice", None).unwrap().unwrap();
        assert_eq!(entry.reason.as_deref(), Some("Homeoffice"));
        assert_eq!(entry.original_line, "8:00-16:00 Homeoffice");
    }

    #[test]
    fn invalid_time_is_reported() {
        assert_eq!(parse("25:00 - 26:00", None), Err(EntryError::InvalidTime));
        assert_eq!(parse("08:00 - 08:61", None), Err(EntryError::InvalidTime));
        assert_eq!(parse("24:00", None), Err(EntryError::InvalidTime));
    }

    #[test]
    fn end_before_start_is_rejected() {
        assert_eq!(parse("12:00 - 08:00", None), Err(EntryError::EndNotAfterStart));
        assert_eq!(parse("12:00 - 12:00", None), Err(EntryError::EndNotAfterStart));
    }

    #[test]
    fn open_interval_resolves_to_reference() {
        let entry = parse("09:00 -", Some(at(10, 0))).unwrap().unwrap();
        assert_eq!(entry.end, at(10, 0));
        assert_eq!(entry.duration, 60);
        assert!(entry.is_open);
    }

    #[test]
    fn open_interval_in_future_is_dropped() {
        assert_eq!(parse("11:00 -", Some(at(10, 0))), Ok(None));
        assert_eq!(parse("11:00 -", None), Ok(None));
    }

    #[test]
    fn bare_time_runs_until_reference() {
        let entry = parse("07:30", Some(at(9, 0))).unwrap().unwrap();
        assert_eq!(entry.end, at(9, 0));
        assert_eq!(entry.duration, 90);
    }

    #[test]
    fn bare_time_within_tolerance_is_zero_length() {
        let entry = parse("09:02", Some(at(9, 0))).unwrap().unwrap();
        assert_eq!(entry.end, at(9, 2));
        assert_eq!(entry.duration, 0);
    }

    #[test]
    fn bare_time_beyond_tolerance_is_future() {
        assert_eq!(parse("09:03", Some(at(9, 0))), Err(EntryError::FutureStart));
    }

    #[test]
    fn bare_time_without_reference_is_zero_length() {
        let entry = parse("09:00", None).unwrap().unwrap();
        assert_eq!(entry.duration, 0);
    }

    #[test]
    fn keyword_line_is_not_an_error() {
        assert_eq!(parse("Urlaub", None), Ok(None));
    }

    #[test]
    fn garbage_is_invalid_format() {
        assert_eq!(parse("lunch", None), Err(EntryError::InvalidFormat));
        assert_eq!(parse("08:00 bis 12:00", None), Err(EntryError::InvalidFormat));
        assert_eq!(
            EntryError::InvalidFormat.to_string(),
            "Ungültiges Format. Verwende HH:MM - HH:MM oder HH:MM."
        );
    }

    #[test]
    fn overlap_rejects_second_line() {
        let (entries, errors) =
            parse_entries("08:00 - 10:00\n09:30 - 11:00", None, &BreakRules::default());
        assert_eq!(entries.len(), 1);
        assert_eq!(
            errors,
            vec![ValidationError {
                line: 2,
                kind: EntryError::Overlap
            }]
        );
    }

    #[test]
    fn adjacent_intervals_do_not_overlap() {
        let (entries, errors) =
            parse_entries("08:00 - 10:00\n10:00 - 11:00", None, &BreakRules::default());
        assert_eq!(entries.len(), 2);
        assert!(errors.is_empty());
    }

    #[test]
    fn resolved_open_entry_is_checked_for_overlap() {
        let (entries, errors) = parse_entries(
            "08:00 -\n09:00 - 09:30",
            Some(at(10, 0)),
            &BreakRules::default(),
        );
        assert_eq!(entries.len(), 1);
        assert_eq!(errors[0].kind, EntryError::Overlap);
    }

    #[test]
    fn entries_are_sorted_and_errors_continue() {
        let (entries, errors) = parse_entries(
            "13:00 - 17:00\n\nfoo\n08:00 - 12:00",
            None,
            &BreakRules::default(),
        );
        let starts: Vec<_> = entries.iter().map(|e| e.start).collect();
        assert_eq!(starts, vec![at(8, 0), at(13, 0)]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].line, 2);
        assert_eq!(
            errors[0].to_string(),
            "Zeile 2: Ungültiges Format. Verwende HH:MM - HH:MM oder HH:MM."
        );
    }

    #[test]
    fn validation_error_serializes_message() {
        let error = ValidationError {
            line: 3,
            kind: EntryError::FutureStart,
        };
        let json = serde_json::to_string(&error).unwrap();
        assert_eq!(
            json,
            r#"{"line":3,"code":"future_start","message":"Startzeit liegt in der Zukunft"}"#
        );
    }
}
