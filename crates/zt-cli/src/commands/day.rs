//! Day commands: `zt set`, `zt add`, `zt remove` and `zt show`.

use std::fmt::Write as _;
use std::io::{Read, Write};

use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use zt_core::{DailyTimeDetails, projected_end_time, wall_clock};
use zt_db::Database;

use super::util::{LedgerInputs, parse_day};
use crate::Config;

/// Details of one day as printed by `zt show --json`.
#[derive(Debug, Serialize)]
pub struct DayView {
    pub date: NaiveDate,
    pub is_holiday: bool,
    pub target_minutes: u32,
    #[serde(with = "wall_clock::hhmm_option")]
    pub projected_end: Option<NaiveTime>,
    pub outside_regular_minutes: u32,
    #[serde(flatten)]
    pub details: DailyTimeDetails,
}

/// Computes the view of one day from freshly loaded storage.
pub fn build_view(
    db: &Database,
    config: &Config,
    date: NaiveDate,
    now: NaiveDateTime,
) -> Result<DayView> {
    let inputs = LedgerInputs::load(db, config)?;
    let ledger = inputs.ledger(now);
    let details = ledger.details(date);
    let projected_end = projected_end_time(&details, ledger.daily_target_minutes(), ledger.rules());

    Ok(DayView {
        date,
        is_holiday: ledger.is_holiday(date),
        target_minutes: ledger.target_for(date),
        projected_end,
        outside_regular_minutes: ledger.outside_regular_hours(date),
        details,
    })
}

/// Formats the human-readable day view.
pub fn format_day(view: &DayView) -> String {
    let mut output = String::new();
    let details = &view.details;

    let holiday = if view.is_holiday { " (holiday)" } else { "" };
    writeln!(output, "DAY: {}{holiday}", view.date.format("%a %Y-%m-%d")).unwrap();

    if let Some(day_type) = details.special_day_type {
        writeln!(output, "{} ({day_type})", day_type.label()).unwrap();
    } else if details.time_entries.is_empty() && details.errors.is_empty() {
        writeln!(output, "No entries.").unwrap();
    }

    for entry in &details.time_entries {
        let open = if entry.is_open { " (running)" } else { "" };
        let reason = entry
            .reason
            .as_deref()
            .map(|reason| format!("  {reason}"))
            .unwrap_or_default();
        writeln!(
            output,
            "  {} - {}  {:>5}{open}{reason}",
            wall_clock::format_hhmm(entry.start),
            wall_clock::format_hhmm(entry.end),
            wall_clock::format_minutes(i64::from(entry.duration)),
        )
        .unwrap();
    }

    if !details.errors.is_empty() {
        writeln!(output).unwrap();
        writeln!(output, "ERRORS").unwrap();
        for error in &details.errors {
            writeln!(output, "  {error}").unwrap();
        }
    }

    let minutes = |m: u32| wall_clock::format_minutes(i64::from(m));
    writeln!(output).unwrap();
    writeln!(output, "Gross:      {:>6}", minutes(details.gross_total_minutes)).unwrap();
    writeln!(output, "Break:      {:>6}", minutes(details.total_break)).unwrap();
    writeln!(output, "Deduction:  {:>6}", minutes(details.break_deduction)).unwrap();
    writeln!(output, "Net:        {:>6}", minutes(details.total_minutes)).unwrap();
    writeln!(output, "Target:     {:>6}", minutes(view.target_minutes)).unwrap();
    if view.outside_regular_minutes > 0 {
        writeln!(output, "Off-hours:  {:>6}", minutes(view.outside_regular_minutes)).unwrap();
    }
    if let Some(end) = view.projected_end {
        writeln!(output, "Target reached at {}", wall_clock::format_hhmm(end)).unwrap();
    }

    let compliance = &details.break_compliance;
    if !compliance.is_compliant {
        writeln!(output).unwrap();
        writeln!(output, "BREAK RULES VIOLATED").unwrap();
        for violation in &compliance.violations {
            writeln!(output, "  - {violation}").unwrap();
        }
    }

    output
}

fn print_view<W: Write>(writer: &mut W, view: &DayView, json: bool) -> Result<()> {
    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(view)?)?;
    } else {
        write!(writer, "{}", format_day(view))?;
    }
    Ok(())
}

/// Runs `zt show`.
pub fn show<W: Write>(
    writer: &mut W,
    db: &Database,
    config: &Config,
    date: Option<&str>,
    json: bool,
    now: NaiveDateTime,
) -> Result<()> {
    let date = match date {
        Some(date) => parse_day(date, now.date())?,
        None => now.date(),
    };
    let view = build_view(db, config, date, now)?;
    print_view(writer, &view, json)
}

/// Runs `zt set`. Reads the text from `stdin` when no lines are given.
pub fn set<W: Write, R: Read>(
    writer: &mut W,
    stdin: &mut R,
    db: &Database,
    config: &Config,
    date: &str,
    lines: &[String],
    now: NaiveDateTime,
) -> Result<()> {
    let date = parse_day(date, now.date())?;
    let text = if lines.is_empty() {
        let mut text = String::new();
        stdin
            .read_to_string(&mut text)
            .context("failed to read day text from stdin")?;
        text
    } else {
        lines.join("\n")
    };
    db.set_day(date, text.trim())?;
    let view = build_view(db, config, date, now)?;
    print_view(writer, &view, false)
}

/// Runs `zt add`.
pub fn add<W: Write>(
    writer: &mut W,
    db: &Database,
    config: &Config,
    date: &str,
    line: &str,
    now: NaiveDateTime,
) -> Result<()> {
    let date = parse_day(date, now.date())?;
    if line.trim().is_empty() {
        bail!("line cannot be empty");
    }
    db.append_line(date, line)?;
    let view = build_view(db, config, date, now)?;
    print_view(writer, &view, false)
}

/// Runs `zt remove`.
pub fn remove<W: Write>(
    writer: &mut W,
    db: &Database,
    config: &Config,
    date: &str,
    line: &str,
    now: NaiveDateTime,
) -> Result<()> {
    let date = parse_day(date, now.date())?;
    if !db.remove_line(date, line)? {
        bail!("no line '{}' on {date}", line.trim());
    }
    let view = build_view(db, config, date, now)?;
    print_view(writer, &view, false)
}
