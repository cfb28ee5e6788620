//! Work-time bookkeeping engine.
//!
//! This crate turns free-form day texts into validated time entries and
//! aggregates them:
//! - Parsing: one line per interval (`08:00 - 12:00`, `09:00 -`, `09:00`)
//! - Classification: whole-day categories such as vacation or sick leave
//! - Aggregation: gross time, breaks, statutory break deduction and compliance
//! - Periods: range totals, average day, yearly statistics, off-hours and
//!   home-office time
//!
//! Everything here is pure: callers pass in stored texts, holiday information
//! and the current time, and get plain data back.

mod aggregate;
mod compliance;
mod daily;
mod entry;
mod hours;
mod ledger;
pub mod rules;
mod settings;
pub mod special_day;
mod statistics;
pub mod wall_clock;
mod year_data;

pub use aggregate::{IntervalTotals, aggregate_intervals, break_gaps, longest_gap};
pub use compliance::{BreakCompliance, evaluate_break_compliance};
pub use daily::{
    DailyTimeDetails, calculate_time_details, calculate_time_details_with_rules,
    projected_end_time,
};
pub use entry::{EntryError, TimeEntry, ValidationError, parse_entries, parse_line};
pub use hours::{
    HomeOfficeSummary, Workplace, calculate_outside_regular_hours, classify_workplace,
    is_home_office,
};
pub use ledger::{AverageDay, DateRange, Ledger, Period, RangeSummary, is_weekend};
pub use rules::BreakRules;
pub use settings::{Settings, SettingsError};
pub use special_day::{SpecialDayType, UnknownSpecialDay, classify_day, classify_keyword};
pub use statistics::{DatedMinutes, DatedTime, Streak, WeekTotal, YearlyStatistics};
pub use year_data::{DATE_FORMAT, HolidayLookup, NoHolidays, YearData};
