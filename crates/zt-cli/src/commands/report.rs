//! Report command for period totals.
//!
//! This module implements `zt report` with the period options
//! (--week, --month, --year, --all) and output formats (human-readable, JSON).

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use zt_core::{Ledger, Period, RangeSummary, wall_clock};
use zt_db::Database;

use super::util::{LedgerInputs, format_balance, parse_day};
use crate::Config;

/// One row of the per-day table.
#[derive(Debug, Serialize)]
pub struct DayRow {
    pub date: NaiveDate,
    pub total_minutes: u32,
    pub target_minutes: u32,
    pub label: Option<String>,
    pub has_errors: bool,
    pub break_violation: bool,
}

/// Computed report data.
#[derive(Debug, Serialize)]
pub struct ReportData {
    #[serde(flatten)]
    pub summary: RangeSummary,
    pub days: Vec<DayRow>,
}

fn period_word(period: Period) -> &'static str {
    match period {
        Period::Day => "day",
        Period::Week => "week",
        Period::Month => "month",
        Period::Year => "year",
        Period::AllTime => "history",
    }
}

/// Builds the report for the period around `reference`.
pub fn build_report(ledger: &Ledger<'_>, period: Period, reference: NaiveDate) -> ReportData {
    let summary = ledger.period_summary(period, reference);
    let days = summary
        .range
        .days()
        .filter_map(|date| {
            let target_minutes = ledger.target_for(date);
            let has_text = !ledger.data().get(date).trim().is_empty();
            if !has_text && target_minutes == 0 && !ledger.is_holiday(date) {
                return None;
            }
            let details = ledger.details(date);
            Some(DayRow {
                date,
                total_minutes: details.total_minutes,
                target_minutes,
                label: details
                    .special_day_type
                    .map(|day_type| day_type.label().to_string()),
                has_errors: !details.errors.is_empty(),
                break_violation: !details.break_compliance.is_compliant,
            })
        })
        .collect();

    ReportData { summary, days }
}

/// Formats the human-readable report.
pub fn format_report(report: &ReportData, period: Period) -> String {
    let mut output = String::new();
    let summary = &report.summary;
    let minutes = |m: u32| wall_clock::format_minutes(i64::from(m));

    writeln!(
        output,
        "TIME REPORT: {} to {}",
        summary.range.start, summary.range.end
    )
    .unwrap();
    writeln!(output).unwrap();

    if report.days.is_empty() {
        writeln!(output, "No days recorded this {}.", period_word(period)).unwrap();
        writeln!(output).unwrap();
    } else {
        for day in &report.days {
            let mut notes = Vec::new();
            if let Some(label) = &day.label {
                notes.push(label.clone());
            }
            if day.has_errors {
                notes.push("errors".to_string());
            }
            if day.break_violation {
                notes.push("break rules".to_string());
            }
            let notes = if notes.is_empty() {
                String::new()
            } else {
                format!("  [{}]", notes.join(", "))
            };
            writeln!(
                output,
                "  {}  {:>6} / {:>5}{notes}",
                day.date.format("%a %Y-%m-%d"),
                minutes(day.total_minutes),
                minutes(day.target_minutes),
            )
            .unwrap();
        }
        writeln!(output).unwrap();
    }

    writeln!(output, "Total:    {:>7}", minutes(summary.total_minutes)).unwrap();
    writeln!(output, "Target:   {:>7}", minutes(summary.target_minutes)).unwrap();
    writeln!(
        output,
        "Balance:  {:>7}",
        format_balance(summary.balance_minutes)
    )
    .unwrap();
    writeln!(output, "Days:     {:>7}", summary.booked_days).unwrap();

    if !summary.special_days.is_empty() {
        writeln!(output).unwrap();
        for (day_type, count) in &summary.special_days {
            writeln!(output, "  {:<14}{count}", day_type.label()).unwrap();
        }
    }
    if summary.days_with_errors > 0 {
        writeln!(output).unwrap();
        writeln!(
            output,
            "{} day(s) contain invalid lines. Run 'zt show <date>' for details.",
            summary.days_with_errors
        )
        .unwrap();
    }

    output
}

/// Runs the report command.
pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    config: &Config,
    period: Period,
    date: Option<&str>,
    json: bool,
    now: NaiveDateTime,
) -> Result<()> {
    let reference = match date {
        Some(date) => parse_day(date, now.date())?,
        None => now.date(),
    };
    let inputs = LedgerInputs::load(db, config)?;
    let ledger = inputs.ledger(now);
    let report = build_report(&ledger, period, reference);
    tracing::debug!(
        start = %report.summary.range.start,
        end = %report.summary.range.end,
        days = report.days.len(),
        "built report"
    );

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        write!(writer, "{}", format_report(&report, period))?;
    }
    Ok(())
}
