//! Yearly extremes and streaks.
//!
//! All extremes keep the first occurrence on ties.

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::Serialize;

use crate::ledger::{DateRange, Ledger};
use crate::wall_clock::hhmm;

/// A time of day and the date it occurred on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DatedTime {
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
}

/// A minute count and the date it occurred on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DatedMinutes {
    pub date: NaiveDate,
    pub minutes: u32,
}

/// Net minutes of one Monday-based week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeekTotal {
    /// ISO week number.
    pub week: u32,
    /// Monday of the week.
    pub start: NaiveDate,
    pub minutes: u32,
}

/// Longest run of consecutive booked days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Streak {
    pub start: NaiveDate,
    pub days: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearlyStatistics {
    pub year: i32,
    /// Days with at least one entry.
    pub booked_days: u32,
    pub earliest_start: Option<DatedTime>,
    pub latest_end: Option<DatedTime>,
    pub longest_break: Option<DatedMinutes>,
    /// Days with more net minutes than the long-day threshold.
    pub long_days: u32,
    pub longest_day: Option<DatedMinutes>,
    pub longest_streak: Option<Streak>,
    pub best_week: Option<WeekTotal>,
    /// Days at or above the break threshold with too little total break.
    pub break_violations: u32,
}

impl YearlyStatistics {
    fn empty(year: i32) -> Self {
        Self {
            year,
            booked_days: 0,
            earliest_start: None,
            latest_end: None,
            longest_break: None,
            long_days: 0,
            longest_day: None,
            longest_streak: None,
            best_week: None,
            break_violations: 0,
        }
    }
}

/// Replaces `slot` if `candidate` is strictly better.
fn keep_first<T: Copy>(slot: &mut Option<T>, candidate: T, better: impl Fn(&T, &T) -> bool) {
    if slot.as_ref().is_none_or(|current| better(&candidate, current)) {
        *slot = Some(candidate);
    }
}

fn close_week(stats: &mut YearlyStatistics, week: Option<WeekTotal>) {
    if let Some(done) = week.filter(|w| w.minutes > 0) {
        keep_first(&mut stats.best_week, done, |a, b| a.minutes > b.minutes);
    }
}

impl Ledger<'_> {
    /// Collects the extremes of `year` in a single pass over its days.
    pub fn yearly_statistics(&self, year: i32) -> YearlyStatistics {
        let mut stats = YearlyStatistics::empty(year);
        let Some(range) = DateRange::year(year) else {
            return stats;
        };

        let mut streak: Option<Streak> = None;
        let mut week: Option<WeekTotal> = None;

        for date in range.days() {
            let details = self.details(date);

            if date.weekday() == Weekday::Mon || week.is_none() {
                close_week(&mut stats, week.take());
                week = Some(WeekTotal {
                    week: date.iso_week().week(),
                    start: date.week(Weekday::Mon).first_day(),
                    minutes: 0,
                });
            }
            if let Some(current) = week.as_mut() {
                current.minutes += details.total_minutes;
            }

            if !details.has_entries() {
                if let Some(done) = streak.take() {
                    keep_first(&mut stats.longest_streak, done, |a, b| a.days > b.days);
                }
                continue;
            }

            stats.booked_days += 1;
            match streak.as_mut() {
                Some(current) => current.days += 1,
                None => streak = Some(Streak { start: date, days: 1 }),
            }

            if let Some(time) = details.first_start() {
                keep_first(&mut stats.earliest_start, DatedTime { date, time }, |a, b| {
                    a.time < b.time
                });
            }
            if let Some(time) = details.last_end() {
                keep_first(&mut stats.latest_end, DatedTime { date, time }, |a, b| {
                    a.time > b.time
                });
            }
            let longest_break = details.longest_break();
            if longest_break > 0 {
                let candidate = DatedMinutes {
                    date,
                    minutes: longest_break,
                };
                keep_first(&mut stats.longest_break, candidate, |a, b| a.minutes > b.minutes);
            }

            let day = DatedMinutes {
                date,
                minutes: details.total_minutes,
            };
            keep_first(&mut stats.longest_day, day, |a, b| a.minutes > b.minutes);
            if details.total_minutes > self.rules.long_day_minutes {
                stats.long_days += 1;
            }
            if details.gross_total_minutes >= self.rules.threshold_minutes
                && details.total_break < self.rules.required_total_break
            {
                stats.break_violations += 1;
            }
        }

        if let Some(done) = streak {
            keep_first(&mut stats.longest_streak, done, |a, b| a.days > b.days);
        }
        close_week(&mut stats, week);
        tracing::debug!(year, booked_days = stats.booked_days, "computed yearly statistics");
        stats
    }
}
