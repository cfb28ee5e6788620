//! Daily detail calculation: the entry point for one day's raw text.

use chrono::NaiveTime;
use serde::Serialize;

use crate::aggregate::{aggregate_intervals, longest_gap};
use crate::compliance::{BreakCompliance, evaluate_break_compliance};
use crate::entry::{TimeEntry, ValidationError, parse_entries};
use crate::rules::BreakRules;
use crate::special_day::{SpecialDayType, classify_day};
use crate::wall_clock::{minutes_since_midnight, time_from_minutes};

/// Everything derived from one day's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyTimeDetails {
    pub time_entries: Vec<TimeEntry>,
    pub errors: Vec<ValidationError>,
    /// Net minutes after the break deduction.
    pub total_minutes: u32,
    pub total_break: u32,
    pub break_deduction: u32,
    pub gross_total_minutes: u32,
    pub special_day_type: Option<SpecialDayType>,
    pub break_compliance: BreakCompliance,
}

impl DailyTimeDetails {
    fn special(day_type: SpecialDayType, minutes: u32) -> Self {
        Self {
            time_entries: Vec::new(),
            errors: Vec::new(),
            total_minutes: minutes,
            total_break: 0,
            break_deduction: 0,
            gross_total_minutes: minutes,
            special_day_type: Some(day_type),
            break_compliance: BreakCompliance::exempt(),
        }
    }

    /// True if the day has at least one accepted entry.
    pub fn has_entries(&self) -> bool {
        !self.time_entries.is_empty()
    }

    pub fn first_start(&self) -> Option<NaiveTime> {
        self.time_entries.first().map(|entry| entry.start)
    }

    pub fn last_end(&self) -> Option<NaiveTime> {
        self.time_entries.last().map(|entry| entry.end)
    }

    /// Longest gap between entries, regardless of the compliance threshold.
    pub fn longest_break(&self) -> u32 {
        longest_gap(&self.time_entries)
    }

    /// True if the last entry is still running.
    pub fn is_in_progress(&self) -> bool {
        self.time_entries.last().is_some_and(|entry| entry.is_open)
    }
}

/// Calculates the details for one day with the default rules.
///
/// `reference` is the current wall-clock time, used to close open entries.
/// Special days count as `daily_target_minutes`; an empty day on a holiday
/// counts as zero.
pub fn calculate_time_details(
    text: &str,
    reference: Option<NaiveTime>,
    daily_target_minutes: u32,
    is_holiday: bool,
) -> DailyTimeDetails {
    calculate_time_details_with_rules(
        text,
        reference,
        daily_target_minutes,
        is_holiday,
        &BreakRules::default(),
    )
}

/// Like [`calculate_time_details`] with explicit thresholds.
pub fn calculate_time_details_with_rules(
    text: &str,
    reference: Option<NaiveTime>,
    daily_target_minutes: u32,
    is_holiday: bool,
    rules: &BreakRules,
) -> DailyTimeDetails {
    if let Some(day_type) = classify_day(text, is_holiday) {
        let minutes = match day_type {
            SpecialDayType::Holiday => 0,
            _ => daily_target_minutes,
        };
        return DailyTimeDetails::special(day_type, minutes);
    }

    let (time_entries, errors) = parse_entries(text, reference, rules);
    let totals = aggregate_intervals(&time_entries, rules);
    let break_compliance = evaluate_break_compliance(&time_entries, totals.gross_minutes, rules);

    DailyTimeDetails {
        time_entries,
        errors,
        total_minutes: totals.net_minutes,
        total_break: totals.total_break,
        break_deduction: totals.break_deduction,
        gross_total_minutes: totals.gross_minutes,
        special_day_type: None,
        break_compliance,
    }
}

/// Wall-clock time at which a running day reaches its target.
///
/// Accounts for the deduction that starts once gross time reaches the
/// threshold without enough break. Returns `None` if the day is not in
/// progress, the target is already reached, or it would be reached after
/// midnight.
pub fn projected_end_time(
    details: &DailyTimeDetails,
    daily_target_minutes: u32,
    rules: &BreakRules,
) -> Option<NaiveTime> {
    if !details.is_in_progress() || details.total_minutes >= daily_target_minutes {
        return None;
    }

    let deduction = rules.required_total_break.saturating_sub(details.total_break);
    let gross_needed = if daily_target_minutes < rules.threshold_minutes {
        daily_target_minutes
    } else {
        daily_target_minutes + deduction
    };
    let remaining = gross_needed.checked_sub(details.gross_total_minutes)?;
    let now = minutes_since_midnight(details.last_end()?);
    time_from_minutes(now + remaining)
}
