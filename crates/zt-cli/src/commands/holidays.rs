//! `zt holidays`: fetch public holidays into the local cache and list them.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::Datelike;
use zt_db::{Database, HolidayRecord};
use zt_holidays::{Client, Holiday, normalize_country};

use crate::Config;

/// Replaces the cached holidays of `year` with the fetched ones.
pub fn store(db: &mut Database, year: i32, country: &str, holidays: &[Holiday]) -> Result<usize> {
    let records: Vec<HolidayRecord> = holidays
        .iter()
        .filter(|holiday| holiday.date.year() == year)
        .map(|holiday| HolidayRecord {
            date: holiday.date,
            country_code: country.to_string(),
            local_name: holiday.local_name.clone(),
            name: holiday.name.clone(),
        })
        .collect();
    db.replace_holidays(year, country, &records)
        .context("failed to cache holidays")
}

/// Runs `zt holidays fetch`.
pub fn fetch<W: Write>(
    writer: &mut W,
    db: &mut Database,
    config: &Config,
    year: i32,
    country: Option<&str>,
) -> Result<()> {
    let country = normalize_country(country.unwrap_or(&config.country_code))?;
    let client = Client::new(config.holiday_api_url.clone())
        .context("failed to create holiday client")?;
    let runtime = tokio::runtime::Runtime::new().context("failed to initialize tokio runtime")?;
    let holidays = runtime
        .block_on(client.public_holidays(year, &country))
        .context("failed to fetch public holidays")?;

    let stored = store(db, year, &country, &holidays)?;
    writeln!(writer, "Cached {stored} holidays for {country} {year}.")?;
    Ok(())
}

/// Runs `zt holidays list`.
pub fn list<W: Write>(writer: &mut W, db: &Database, config: &Config, year: i32) -> Result<()> {
    let country = normalize_country(&config.country_code)?;
    let holidays = db
        .holidays_in_year(year, &country)
        .context("failed to load cached holidays")?;

    if holidays.is_empty() {
        writeln!(writer, "No holidays cached for {country} {year}.")?;
        writeln!(writer, "Hint: Run 'zt holidays fetch --year {year}' first.")?;
        return Ok(());
    }
    for holiday in holidays {
        writeln!(
            writer,
            "{}  {}",
            holiday.date.format("%a %Y-%m-%d"),
            holiday.local_name
        )?;
    }
    Ok(())
}
