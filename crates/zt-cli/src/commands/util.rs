//! Shared utilities for CLI commands.

use anyhow::{Context, Result};
use chrono::{Days, NaiveDate, NaiveDateTime};
use zt_core::{DATE_FORMAT, Ledger, Settings, YearData, wall_clock};
use zt_db::Database;
use zt_holidays::HolidayCalendar;

use crate::Config;

/// Parses a day argument: `yyyy-mm-dd`, `today` or `yesterday`.
pub fn parse_day(s: &str, today: NaiveDate) -> Result<NaiveDate> {
    match s.trim().to_lowercase().as_str() {
        "today" | "heute" => Ok(today),
        "yesterday" | "gestern" => today
            .checked_sub_days(Days::new(1))
            .context("date out of range"),
        other => NaiveDate::parse_from_str(other, DATE_FORMAT).with_context(|| {
            format!("Invalid date: {s}. Use yyyy-mm-dd, 'today' or 'yesterday'")
        }),
    }
}

/// Formats signed minutes with an explicit sign, e.g. `+1:30`.
pub fn format_balance(minutes: i64) -> String {
    if minutes > 0 {
        format!("+{}", wall_clock::format_minutes(minutes))
    } else {
        wall_clock::format_minutes(minutes)
    }
}

/// Everything loaded from storage that the engine needs.
pub struct LedgerInputs {
    pub data: YearData,
    pub holidays: HolidayCalendar,
    pub settings: Settings,
}

impl LedgerInputs {
    pub fn load(db: &Database, config: &Config) -> Result<Self> {
        let data = db.load_all().context("failed to load days")?;
        let country = config.country_code.trim().to_uppercase();
        let holidays = db
            .holiday_dates(&country)
            .map(HolidayCalendar::from_dates)
            .context("failed to load cached holidays")?;
        let settings = db.load_settings().context("failed to load settings")?;
        tracing::debug!(
            days = data.len(),
            holidays = holidays.len(),
            "loaded ledger inputs"
        );
        Ok(Self {
            data,
            holidays,
            settings,
        })
    }

    pub fn ledger(&self, now: NaiveDateTime) -> Ledger<'_> {
        Ledger::new(
            &self.data,
            &self.holidays,
            self.settings.daily_target_minutes(),
        )
        .at(now)
    }
}
