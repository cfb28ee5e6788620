//! `zt stats`: yearly statistics, average day and vacation balance.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDateTime, NaiveTime};
use serde::Serialize;
use zt_core::{AverageDay, DateRange, HomeOfficeSummary, YearlyStatistics, wall_clock};
use zt_db::Database;

use super::util::LedgerInputs;
use crate::Config;

/// Everything `zt stats` reports for one year.
#[derive(Debug, Serialize)]
pub struct StatsData {
    #[serde(flatten)]
    pub statistics: YearlyStatistics,
    pub average_day: Option<AverageDay>,
    pub outside_regular_minutes: u32,
    pub home_office: HomeOfficeSummary,
    pub vacation_days_taken: u32,
    pub vacation_days_remaining: i64,
}

pub fn build_stats(inputs: &LedgerInputs, year: i32, now: NaiveDateTime) -> Result<StatsData> {
    let range = DateRange::year(year).with_context(|| format!("year {year} out of range"))?;
    let ledger = inputs.ledger(now);
    let vacation_days_taken = ledger.vacation_days_taken(year);

    Ok(StatsData {
        statistics: ledger.yearly_statistics(year),
        average_day: ledger.average_day(range),
        outside_regular_minutes: ledger.outside_regular_hours_in(range),
        home_office: ledger.home_office_summary(range),
        vacation_days_taken,
        vacation_days_remaining: inputs.settings.remaining_vacation_days(vacation_days_taken),
    })
}

fn format_stats(stats: &StatsData) -> String {
    let mut output = String::new();
    let s = &stats.statistics;
    let minutes = |m: u32| wall_clock::format_minutes(i64::from(m));

    writeln!(output, "STATISTICS {}", s.year).unwrap();
    writeln!(output).unwrap();

    if s.booked_days == 0 {
        writeln!(output, "No working days recorded.").unwrap();
    } else {
        writeln!(output, "Working days:      {}", s.booked_days).unwrap();
        if let Some(first) = s.earliest_start {
            writeln!(
                output,
                "Earliest start:    {} on {}",
                wall_clock::format_hhmm(first.time),
                first.date
            )
            .unwrap();
        }
        if let Some(last) = s.latest_end {
            writeln!(
                output,
                "Latest end:        {} on {}",
                wall_clock::format_hhmm(last.time),
                last.date
            )
            .unwrap();
        }
        if let Some(day) = s.longest_day {
            writeln!(
                output,
                "Longest day:       {} on {}",
                minutes(day.minutes),
                day.date
            )
            .unwrap();
        }
        if let Some(pause) = s.longest_break {
            writeln!(output, "Longest break:     {} min on {}", pause.minutes, pause.date).unwrap();
        }
        if let Some(streak) = s.longest_streak {
            writeln!(
                output,
                "Longest streak:    {} days from {}",
                streak.days, streak.start
            )
            .unwrap();
        }
        if let Some(week) = s.best_week {
            writeln!(
                output,
                "Best week:         KW {} ({}) with {}",
                week.week,
                week.start,
                minutes(week.minutes)
            )
            .unwrap();
        }
        writeln!(output, "Days over 9h:      {}", s.long_days).unwrap();
        writeln!(output, "Break violations:  {}", s.break_violations).unwrap();
    }

    if let Some(avg) = &stats.average_day {
        let time =
            |t: Option<NaiveTime>| t.map_or_else(|| "-".to_string(), wall_clock::format_hhmm);
        writeln!(output).unwrap();
        writeln!(output, "AVERAGE DAY ({} days)", avg.days).unwrap();
        writeln!(output, "  Start:  {}", time(avg.start)).unwrap();
        writeln!(output, "  End:    {}", time(avg.end)).unwrap();
        writeln!(output, "  Break:  {} min", avg.break_minutes).unwrap();
        writeln!(output, "  Net:    {}", minutes(avg.total_minutes)).unwrap();
    }

    let home = &stats.home_office;
    writeln!(output).unwrap();
    writeln!(output, "Outside 06:00-19:00: {}", minutes(stats.outside_regular_minutes)).unwrap();
    writeln!(
        output,
        "Home office:         {} days, {} hybrid, {} office ({:.0}%)",
        home.home_office_days,
        home.hybrid_days,
        home.office_days,
        home.home_office_ratio() * 100.0
    )
    .unwrap();
    writeln!(
        output,
        "Vacation:            {} taken, {} remaining",
        stats.vacation_days_taken, stats.vacation_days_remaining
    )
    .unwrap();

    output
}

/// Runs the stats command.
pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    config: &Config,
    year: Option<i32>,
    json: bool,
    now: NaiveDateTime,
) -> Result<()> {
    let year = year.unwrap_or_else(|| now.year());
    let inputs = LedgerInputs::load(db, config)?;
    let stats = build_stats(&inputs, year, now)?;

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&stats)?)?;
    } else {
        write!(writer, "{}", format_stats(&stats))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn test_config() -> Config {
        Config {
            database_path: "unused.db".into(),
            country_code: "AT".to_string(),
            holiday_api_url: "http://localhost".to_string(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn now() -> NaiveDateTime {
        date(2025, 6, 1).and_hms_opt(10, 0, 0).unwrap()
    }

    fn seeded() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.set_day(date(2025, 3, 3), "07:30 - 12:00\n12:30 - 16:00")
            .unwrap();
        db.set_day(date(2025, 3, 4), "08:30 - 12:00 Homeoffice\n12:45 - 17:30 Homeoffice")
            .unwrap();
        db.set_day(date(2025, 3, 5), "urlaub").unwrap();
        db.set_day(date(2025, 3, 6), "urlaub").unwrap();
        db
    }

    #[test]
    fn stats_json_collects_everything() {
        let db = seeded();
        let mut output = Vec::new();
        run(&mut output, &db, &test_config(), None, true, now()).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&output).unwrap();

        assert_eq!(json["year"], 2025);
        assert_eq!(json["booked_days"], 2);
        assert_eq!(json["earliest_start"]["time"], "07:30");
        assert_eq!(json["latest_end"]["time"], "17:30");
        assert_eq!(json["longest_break"]["minutes"], 45);
        assert_eq!(json["average_day"]["days"], 2);
        assert_eq!(json["average_day"]["start"], "08:00");
        assert_eq!(json["home_office"]["home_office_days"], 1);
        assert_eq!(json["home_office"]["office_days"], 1);
        assert_eq!(json["vacation_days_taken"], 2);
        assert_eq!(json["vacation_days_remaining"], 23);
    }

    #[test]
    fn stats_human_for_empty_year() {
        let db = Database::open_in_memory().unwrap();
        let mut output = Vec::new();
        run(&mut output, &db, &test_config(), Some(2024), false, now()).unwrap();
        let output = String::from_utf8(output).unwrap();
        assert!(output.starts_with("STATISTICS 2024"));
        assert!(output.contains("No working days recorded."));
        assert!(output.contains("Vacation:            0 taken, 25 remaining"));
    }

    #[test]
    fn stats_human_lists_extremes() {
        let db = seeded();
        let mut output = Vec::new();
        run(&mut output, &db, &test_config(), Some(2025), false, now()).unwrap();
        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("Earliest start:    07:30 on 2025-03-03"));
        assert!(output.contains("Longest streak:    2 days from 2025-03-03"));
        assert!(output.contains("AVERAGE DAY (2 days)"));
    }
}
