//! Period aggregation over stored day texts.
//!
//! A [`Ledger`] runs the daily calculation once per day of a date range and
//! folds the results. Days without stored text contribute nothing.

use std::collections::BTreeMap;

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::Serialize;

use crate::daily::{DailyTimeDetails, calculate_time_details_with_rules};
use crate::rules::BreakRules;
use crate::special_day::SpecialDayType;
use crate::wall_clock::{hhmm_option, minutes_since_midnight, time_from_minutes};
use crate::year_data::{HolidayLookup, YearData};

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub const fn day(date: NaiveDate) -> Self {
        Self::new(date, date)
    }

    /// Monday to Sunday around `date`.
    pub fn week_of(date: NaiveDate) -> Self {
        let monday = date.week(Weekday::Mon).first_day();
        let sunday = date.week(Weekday::Mon).last_day();
        Self::new(monday, sunday)
    }

    pub fn month_of(date: NaiveDate) -> Self {
        let first = date.with_day(1).unwrap_or(date);
        let last = first
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(date);
        Self::new(first, last)
    }

    pub fn year(year: i32) -> Option<Self> {
        Some(Self::new(
            NaiveDate::from_ymd_opt(year, 1, 1)?,
            NaiveDate::from_ymd_opt(year, 12, 31)?,
        ))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        (self.start..=self.end).contains(&date)
    }

    /// Every date of the range in order. Empty if `end < start`.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end;
        self.start.iter_days().take_while(move |date| *date <= end)
    }
}

/// Reporting periods relative to a reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Day,
    Week,
    Month,
    Year,
    AllTime,
}

impl Period {
    /// Resolves the period around `reference`.
    ///
    /// `AllTime` spans the first to the last stored day, or just `reference`
    /// when nothing is stored.
    pub fn range(self, reference: NaiveDate, data: &YearData) -> DateRange {
        match self {
            Self::Day => DateRange::day(reference),
            Self::Week => DateRange::week_of(reference),
            Self::Month => DateRange::month_of(reference),
            Self::Year => {
                DateRange::year(reference.year()).unwrap_or_else(|| DateRange::day(reference))
            }
            Self::AllTime => match (data.first_date(), data.last_date()) {
                (Some(first), Some(last)) => DateRange::new(first, last),
                _ => DateRange::day(reference),
            },
        }
    }
}

/// Totals for a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeSummary {
    pub range: DateRange,
    /// Sum of net minutes.
    pub total_minutes: u32,
    /// Daily target for each working day (Monday to Friday, not a holiday).
    pub target_minutes: u32,
    /// `total_minutes - target_minutes`.
    pub balance_minutes: i64,
    /// Days with entries or a special classification other than holiday.
    pub booked_days: u32,
    /// Days with at least one rejected line.
    pub days_with_errors: u32,
    pub special_days: BTreeMap<SpecialDayType, u32>,
}

/// Average working day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AverageDay {
    /// Days included in the average.
    pub days: u32,
    #[serde(with = "hhmm_option")]
    pub start: Option<NaiveTime>,
    #[serde(with = "hhmm_option")]
    pub end: Option<NaiveTime>,
    /// Average break over days with entries.
    pub break_minutes: u32,
    /// Average net minutes over all included days.
    pub total_minutes: u32,
}

/// Read-only view of stored days with everything needed to evaluate them.
pub struct Ledger<'a> {
    pub(crate) data: &'a YearData,
    pub(crate) holidays: &'a dyn HolidayLookup,
    pub(crate) daily_target_minutes: u32,
    pub(crate) rules: BreakRules,
    pub(crate) now: Option<NaiveDateTime>,
}

impl<'a> Ledger<'a> {
    pub fn new(
        data: &'a YearData,
        holidays: &'a dyn HolidayLookup,
        daily_target_minutes: u32,
    ) -> Self {
        Self {
            data,
            holidays,
            daily_target_minutes,
            rules: BreakRules::default(),
            now: None,
        }
    }

    #[must_use]
    pub fn with_rules(mut self, rules: BreakRules) -> Self {
        self.rules = rules;
        self
    }

    /// Sets the current local time; open entries of that day resolve against it.
    #[must_use]
    pub const fn at(mut self, now: NaiveDateTime) -> Self {
        self.now = Some(now);
        self
    }

    pub const fn rules(&self) -> &BreakRules {
        &self.rules
    }

    pub const fn daily_target_minutes(&self) -> u32 {
        self.daily_target_minutes
    }

    pub const fn data(&self) -> &YearData {
        self.data
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.is_holiday(date)
    }

    /// Reference time for `date`: the current time on today, nothing otherwise.
    pub fn reference_for(&self, date: NaiveDate) -> Option<NaiveTime> {
        self.now
            .filter(|now| now.date() == date)
            .map(|now| now.time())
    }

    pub fn details(&self, date: NaiveDate) -> DailyTimeDetails {
        calculate_time_details_with_rules(
            self.data.get(date),
            self.reference_for(date),
            self.daily_target_minutes,
            self.is_holiday(date),
            &self.rules,
        )
    }

    /// Target minutes for one day: zero on weekends and holidays.
    pub fn target_for(&self, date: NaiveDate) -> u32 {
        if is_weekend(date) || self.is_holiday(date) {
            0
        } else {
            self.daily_target_minutes
        }
    }

    pub fn range_summary(&self, range: DateRange) -> RangeSummary {
        let mut summary = RangeSummary {
            range,
            total_minutes: 0,
            target_minutes: 0,
            balance_minutes: 0,
            booked_days: 0,
            days_with_errors: 0,
            special_days: BTreeMap::new(),
        };

        for date in range.days() {
            summary.target_minutes += self.target_for(date);
            if self.data.get(date).trim().is_empty() && !self.is_holiday(date) {
                continue;
            }

            let details = self.details(date);
            summary.total_minutes += details.total_minutes;
            if !details.errors.is_empty() {
                summary.days_with_errors += 1;
            }
            if let Some(day_type) = details.special_day_type {
                *summary.special_days.entry(day_type).or_insert(0) += 1;
            }
            let booked = details.has_entries()
                || details
                    .special_day_type
                    .is_some_and(|day_type| day_type != SpecialDayType::Holiday);
            if booked {
                summary.booked_days += 1;
            }
        }

        summary.balance_minutes =
            i64::from(summary.total_minutes) - i64::from(summary.target_minutes);
        summary
    }

    pub fn period_summary(&self, period: Period, reference: NaiveDate) -> RangeSummary {
        self.range_summary(period.range(reference, self.data))
    }

    /// Averages start, end, break and net time over the range.
    ///
    /// Vacation and sick days are left out. Other special days count with the
    /// daily target as their net time but have no start or end. Returns `None`
    /// if no day qualifies.
    pub fn average_day(&self, range: DateRange) -> Option<AverageDay> {
        let mut days = 0_u32;
        let mut entry_days = 0_u32;
        let mut start_sum = 0_u64;
        let mut end_sum = 0_u64;
        let mut break_sum = 0_u64;
        let mut total_sum = 0_u64;

        for (date, text) in self.data.iter() {
            if !range.contains(date) || text.trim().is_empty() {
                continue;
            }
            let details = self.details(date);
            if details
                .special_day_type
                .is_some_and(|day_type| day_type.is_absence())
            {
                continue;
            }
            if let (Some(start), Some(end)) = (details.first_start(), details.last_end()) {
                entry_days += 1;
                start_sum += u64::from(minutes_since_midnight(start));
                end_sum += u64::from(minutes_since_midnight(end));
                break_sum += u64::from(details.total_break);
            } else if details.special_day_type.is_none() {
                continue;
            }
            days += 1;
            total_sum += u64::from(details.total_minutes);
        }

        if days == 0 {
            return None;
        }
        Some(AverageDay {
            days,
            start: rounded_mean(start_sum, entry_days).and_then(time_from_minutes),
            end: rounded_mean(end_sum, entry_days).and_then(time_from_minutes),
            break_minutes: rounded_mean(break_sum, entry_days).unwrap_or(0),
            total_minutes: rounded_mean(total_sum, days).unwrap_or(0),
        })
    }

    /// Number of vacation days booked in `year`.
    pub fn vacation_days_taken(&self, year: i32) -> u32 {
        DateRange::year(year).map_or(0, |range| {
            self.range_summary(range)
                .special_days
                .get(&SpecialDayType::Vacation)
                .copied()
                .unwrap_or(0)
        })
    }
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "the mean of u32 values fits in u32"
)]
fn rounded_mean(sum: u64, count: u32) -> Option<u32> {
    if count == 0 {
        return None;
    }
    let count = u64::from(count);
    Some(((sum + count / 2) / count) as u32)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::year_data::NoHolidays;

    const TARGET: u32 = 480;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    /// Week of Mon 2025-03-03 .. Sun 2025-03-09.
    fn sample_week() -> YearData {
        YearData::from_raw([
            ("2025-03-03", "08:00 - 12:00\n12:30 - 16:30"),
            ("2025-03-04", "07:00 - 12:00\n13:00 - 17:00"),
            ("2025-03-05", "urlaub"),
            ("2025-03-06", "krank"),
            ("2025-03-07", "schulung"),
            ("2025-03-08", "10:00 - 11:00"),
        ])
    }

    #[test]
    fn week_of_starts_on_monday() {
        let range = DateRange::week_of(date(2025, 3, 6));
        assert_eq!(range, DateRange::new(date(2025, 3, 3), date(2025, 3, 9)));
        assert_eq!(range.days().count(), 7);
    }

    #[test]
    fn month_of_handles_leap_february() {
        let range = DateRange::month_of(date(2024, 2, 10));
        assert_eq!(range, DateRange::new(date(2024, 2, 1), date(2024, 2, 29)));
        let december = DateRange::month_of(date(2025, 12, 31));
        assert_eq!(december.end, date(2025, 12, 31));
    }

    #[test]
    fn all_time_spans_stored_days() {
        let data = sample_week();
        let range = Period::AllTime.range(date(2025, 3, 8), &data);
        assert_eq!(range, DateRange::new(date(2025, 3, 3), date(2025, 3, 8)));
        let empty = YearData::new();
        assert_eq!(
            Period::AllTime.range(date(2025, 1, 1), &empty),
            DateRange::day(date(2025, 1, 1))
        );
    }

    #[test]
    fn range_summary_sums_net_minutes() {
        let data = sample_week();
        let ledger = Ledger::new(&data, &NoHolidays, TARGET);
        let summary = ledger.period_summary(Period::Week, date(2025, 3, 5));

        // 480 + 540 + 3 special days * 480 + 60
        assert_eq!(summary.total_minutes, 480 + 540 + 3 * 480 + 60);
        assert_eq!(summary.target_minutes, 5 * TARGET);
        assert_eq!(summary.balance_minutes, 120);
        assert_eq!(summary.booked_days, 6);
        assert_eq!(summary.special_days[&SpecialDayType::Vacation], 1);
        assert_eq!(summary.special_days[&SpecialDayType::Sick], 1);
    }

    #[test]
    fn empty_range_is_zero() {
        let data = YearData::new();
        let ledger = Ledger::new(&data, &NoHolidays, TARGET);
        let summary = ledger.period_summary(Period::Day, date(2025, 3, 8));
        assert_eq!(summary.total_minutes, 0);
        assert_eq!(summary.target_minutes, 0);
        assert_eq!(summary.booked_days, 0);
    }

    #[test]
    fn holidays_reduce_target_and_count_as_special() {
        let data = YearData::new();
        let holidays: HashSet<_> = [date(2025, 1, 6)].into_iter().collect();
        let ledger = Ledger::new(&data, &holidays, TARGET);
        let summary = ledger.range_summary(DateRange::week_of(date(2025, 1, 6)));
        assert_eq!(summary.target_minutes, 4 * TARGET);
        assert_eq!(summary.special_days[&SpecialDayType::Holiday], 1);
        assert_eq!(summary.booked_days, 0);
    }

    #[test]
    fn reference_time_applies_to_today_only() {
        let data = YearData::from_raw([("2025-03-03", "08:00 -"), ("2025-03-04", "08:00 -")]);
        let now = date(2025, 3, 4).and_time(at(10, 0));
        let ledger = Ledger::new(&data, &NoHolidays, TARGET).at(now);
        assert_eq!(ledger.details(date(2025, 3, 3)).total_minutes, 0);
        assert_eq!(ledger.details(date(2025, 3, 4)).total_minutes, 120);
    }

    #[test]
    fn average_day_skips_absences() {
        let data = sample_week();
        let ledger = Ledger::new(&data, &NoHolidays, TARGET);
        let range = DateRange::week_of(date(2025, 3, 3));
        let average = ledger.average_day(range).expect("days qualify");

        // Entry days: Mon, Tue, Sat. Training counts with the target.
        assert_eq!(average.days, 4);
        assert_eq!(average.start, Some(at(8, 20)));
        assert_eq!(average.end, Some(at(14, 50)));
        assert_eq!(average.break_minutes, 30);
        assert_eq!(average.total_minutes, (480 + 540 + 480 + 60) / 4);
    }

    #[test]
    fn average_day_none_without_qualifying_days() {
        let data = YearData::from_raw([("2025-03-05", "urlaub")]);
        let ledger = Ledger::new(&data, &NoHolidays, TARGET);
        assert_eq!(ledger.average_day(DateRange::week_of(date(2025, 3, 5))), None);
    }

    #[test]
    fn vacation_days_are_counted_per_year() {
        let data = YearData::from_raw([
            ("2024-12-30", "urlaub"),
            ("2025-01-02", "Urlaub"),
            ("2025-01-03", "urlaub"),
        ]);
        let ledger = Ledger::new(&data, &NoHolidays, TARGET);
        assert_eq!(ledger.vacation_days_taken(2025), 2);
        assert_eq!(ledger.vacation_days_taken(2024), 1);
    }
}
