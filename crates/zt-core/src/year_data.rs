//! Stored day texts keyed by date, and the holiday lookup seam.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::NaiveDate;

/// Date key format used by the storage layer.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw day texts keyed by calendar date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YearData {
    days: BTreeMap<NaiveDate, String>,
}

impl YearData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds from `yyyy-MM-dd` keyed pairs, skipping keys that are not dates.
    pub fn from_raw<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut data = Self::new();
        for (key, text) in pairs {
            let key = key.as_ref();
            match NaiveDate::parse_from_str(key, DATE_FORMAT) {
                Ok(date) => data.insert(date, text),
                Err(err) => tracing::warn!(key, %err, "skipping day with invalid date key"),
            }
        }
        data
    }

    /// Sets the text for a day. Blank text removes the day.
    pub fn insert(&mut self, date: NaiveDate, text: impl Into<String>) {
        let text = text.into();
        if text.trim().is_empty() {
            self.days.remove(&date);
        } else {
            self.days.insert(date, text);
        }
    }

    /// Text stored for a day, empty if none.
    pub fn get(&self, date: NaiveDate) -> &str {
        self.days.get(&date).map_or("", String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &str)> {
        self.days.iter().map(|(date, text)| (*date, text.as_str()))
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.days.keys().next().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.days.keys().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl FromIterator<(NaiveDate, String)> for YearData {
    fn from_iter<T: IntoIterator<Item = (NaiveDate, String)>>(iter: T) -> Self {
        let mut data = Self::new();
        for (date, text) in iter {
            data.insert(date, text);
        }
        data
    }
}

/// Answers whether a calendar date is a public holiday.
pub trait HolidayLookup {
    fn is_holiday(&self, date: NaiveDate) -> bool;
}

/// A calendar without holidays.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHolidays;

impl HolidayLookup for NoHolidays {
    fn is_holiday(&self, _date: NaiveDate) -> bool {
        false
    }
}

impl HolidayLookup for HashSet<NaiveDate> {
    fn is_holiday(&self, date: NaiveDate) -> bool {
        self.contains(&date)
    }
}

impl HolidayLookup for BTreeSet<NaiveDate> {
    fn is_holiday(&self, date: NaiveDate) -> bool {
        self.contains(&date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn from_raw_skips_invalid_keys() {
        let data = YearData::from_raw([
            ("2025-03-03", "08:00 - 16:00"),
            ("not-a-date", "08:00 - 16:00"),
            ("2025-02-30", "urlaub"),
        ]);
        assert_eq!(data.len(), 1);
        assert_eq!(data.get(date(2025, 3, 3)), "08:00 - 16:00");
    }

    #[test]
    fn blank_text_removes_day() {
        let mut data = YearData::new();
        data.insert(date(2025, 1, 2), "urlaub");
        data.insert(date(2025, 1, 2), "  ");
        assert!(data.is_empty());
        assert_eq!(data.get(date(2025, 1, 2)), "");
    }

    #[test]
    fn bounds_follow_date_order() {
        let data = YearData::from_raw([("2025-05-01", "x"), ("2024-12-31", "y")]);
        assert_eq!(data.first_date(), Some(date(2024, 12, 31)));
        assert_eq!(data.last_date(), Some(date(2025, 5, 1)));
    }

    #[test]
    fn holiday_sets_implement_lookup() {
        let set: HashSet<_> = [date(2025, 1, 6)].into_iter().collect();
        assert!(set.is_holiday(date(2025, 1, 6)));
        assert!(!set.is_holiday(date(2025, 1, 7)));
        assert!(!NoHolidays.is_holiday(date(2025, 1, 6)));
    }
}
