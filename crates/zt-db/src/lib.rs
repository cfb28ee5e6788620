//! Storage layer for the work-time ledger.
//!
//! Persists one text per calendar day, the user settings blob and a cache of
//! public holidays using `rusqlite`.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! A `Database` instance can be moved between threads but cannot be shared
//! across threads without external synchronization.
//!
//! # Schema
//!
//! Dates are stored as TEXT in `yyyy-MM-dd` format, so lexicographic order
//! matches chronological order. `updated_at` columns hold RFC 3339 UTC
//! timestamps. Day texts are stored verbatim; the engine parses them on read.

use std::collections::HashSet;
use std::path::Path;

use chrono::{NaiveDate, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;
use zt_core::{DATE_FORMAT, DateRange, Settings, SettingsError, YearData};

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// The stored settings blob could not be decoded.
    #[error("invalid stored settings: {0}")]
    Settings(#[from] SettingsError),
    /// A stored holiday date could not be parsed.
    #[error("invalid holiday date: {date}")]
    HolidayDate {
        date: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// A stored day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayRecord {
    pub date: String,
    pub text: String,
    pub updated_at: String,
}

/// A cached public holiday.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolidayRecord {
    pub date: NaiveDate,
    pub country_code: String,
    pub local_name: String,
    pub name: String,
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

fn date_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The schema is initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database. Useful for testing.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            -- One free-form text per calendar day (yyyy-MM-dd)
            CREATE TABLE IF NOT EXISTS days (
                date TEXT PRIMARY KEY,
                text TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            -- Single settings blob (JSON)
            CREATE TABLE IF NOT EXISTS settings (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                data TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS holidays (
                date TEXT NOT NULL,
                country_code TEXT NOT NULL,
                local_name TEXT NOT NULL,
                name TEXT NOT NULL,
                PRIMARY KEY (date, country_code)
            );

            CREATE INDEX IF NOT EXISTS idx_holidays_country ON holidays(country_code);
            ",
        )?;
        Ok(())
    }

    /// Returns the stored text for a day.
    pub fn get_day(&self, date: NaiveDate) -> Result<Option<String>, DbError> {
        let text = self
            .conn
            .query_row(
                "SELECT text FROM days WHERE date = ?1",
                params![date_key(date)],
                |row| row.get(0),
            )
            .optional()?;
        Ok(text)
    }

    /// Replaces the text of a day. Blank text deletes the day.
    pub fn set_day(&self, date: NaiveDate, text: &str) -> Result<(), DbError> {
        if text.trim().is_empty() {
            self.conn
                .execute("DELETE FROM days WHERE date = ?1", params![date_key(date)])?;
            tracing::debug!(%date, "cleared day");
            return Ok(());
        }
        self.conn.execute(
            "
            INSERT INTO days (date, text, updated_at) VALUES (?1, ?2, ?3)
            ON CONFLICT(date) DO UPDATE SET text = excluded.text, updated_at = excluded.updated_at
            ",
            params![date_key(date), text, now_timestamp()],
        )?;
        tracing::debug!(%date, "stored day");
        Ok(())
    }

    /// Appends one line to a day and returns the new text.
    pub fn append_line(&self, date: NaiveDate, line: &str) -> Result<String, DbError> {
        let current = self.get_day(date)?.unwrap_or_default();
        let text = if current.trim().is_empty() {
            line.trim().to_string()
        } else {
            format!("{}\n{}", current.trim_end(), line.trim())
        };
        self.set_day(date, &text)?;
        Ok(text)
    }

    /// Removes the first line whose trimmed text equals `original_line`.
    ///
    /// Returns whether a line was removed.
    pub fn remove_line(&self, date: NaiveDate, original_line: &str) -> Result<bool, DbError> {
        let Some(current) = self.get_day(date)? else {
            return Ok(false);
        };
        let target = original_line.trim();
        let mut lines: Vec<&str> = current.lines().collect();
        let Some(index) = lines.iter().position(|line| line.trim() == target) else {
            return Ok(false);
        };
        lines.remove(index);
        self.set_day(date, &lines.join("\n"))?;
        Ok(true)
    }

    /// Lists stored days within the range, ordered by date.
    pub fn list_days_in_range(&self, range: DateRange) -> Result<Vec<DayRecord>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT date, text, updated_at FROM days WHERE date >= ?1 AND date <= ?2 ORDER BY date",
        )?;
        let rows = stmt.query_map(
            params![date_key(range.start), date_key(range.end)],
            |row| {
                Ok(DayRecord {
                    date: row.get(0)?,
                    text: row.get(1)?,
                    updated_at: row.get(2)?,
                })
            },
        )?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Loads every stored day. Rows with malformed date keys are skipped.
    pub fn load_all(&self) -> Result<YearData, DbError> {
        let mut stmt = self.conn.prepare("SELECT date, text FROM days ORDER BY date")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        let pairs = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(YearData::from_raw(pairs))
    }

    /// Loads the settings blob, falling back to defaults when none is stored.
    pub fn load_settings(&self) -> Result<Settings, DbError> {
        let data: Option<String> = self
            .conn
            .query_row("SELECT data FROM settings WHERE id = 1", [], |row| row.get(0))
            .optional()?;
        match data {
            Some(json) => Ok(Settings::from_json(&json)?),
            None => Ok(Settings::default()),
        }
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<(), DbError> {
        settings.validate()?;
        self.conn.execute(
            "
            INSERT INTO settings (id, data) VALUES (1, ?1)
            ON CONFLICT(id) DO UPDATE SET data = excluded.data
            ",
            params![settings.to_json()?],
        )?;
        Ok(())
    }

    /// Writes a backup in one transaction: every day of `days` is upserted,
    /// then the settings row is replaced.
    ///
    /// Days not present in `days` are left untouched. Nothing is written if
    /// any row fails or the settings are invalid.
    pub fn import_backup(
        &mut self,
        days: &YearData,
        settings: &Settings,
    ) -> Result<usize, DbError> {
        let tx = self.conn.transaction()?;
        let updated_at = now_timestamp();
        let mut written = 0;
        {
            let mut stmt = tx.prepare(
                "
                INSERT INTO days (date, text, updated_at) VALUES (?1, ?2, ?3)
                ON CONFLICT(date)
                DO UPDATE SET text = excluded.text, updated_at = excluded.updated_at
                ",
            )?;
            for (date, text) in days.iter() {
                written += stmt.execute(params![date_key(date), text, updated_at])?;
            }
        }
        settings.validate()?;
        tx.execute(
            "
            INSERT INTO settings (id, data) VALUES (1, ?1)
            ON CONFLICT(id) DO UPDATE SET data = excluded.data
            ",
            params![settings.to_json()?],
        )?;
        tx.commit()?;
        tracing::debug!(written, "imported backup");
        Ok(written)
    }

    /// Replaces the cached holidays of one year and country.
    pub fn replace_holidays(
        &mut self,
        year: i32,
        country_code: &str,
        holidays: &[HolidayRecord],
    ) -> Result<usize, DbError> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "DELETE FROM holidays WHERE country_code = ?1 AND substr(date, 1, 4) = ?2",
            params![country_code, format!("{year:04}")],
        )?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                "
                INSERT OR REPLACE INTO holidays (date, country_code, local_name, name)
                VALUES (?1, ?2, ?3, ?4)
                ",
            )?;
            for holiday in holidays {
                inserted += stmt.execute(params![
                    date_key(holiday.date),
                    country_code,
                    holiday.local_name,
                    holiday.name,
                ])?;
            }
        }
        tx.commit()?;
        tracing::debug!(year, country_code, inserted, "replaced cached holidays");
        Ok(inserted)
    }

    /// Cached holidays of one year and country, ordered by date.
    pub fn holidays_in_year(
        &self,
        year: i32,
        country_code: &str,
    ) -> Result<Vec<HolidayRecord>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT date, country_code, local_name, name FROM holidays
            WHERE country_code = ?1 AND substr(date, 1, 4) = ?2
            ORDER BY date
            ",
        )?;
        let rows = stmt.query_map(params![country_code, format!("{year:04}")], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut holidays = Vec::new();
        for row in rows {
            let (date, country_code, local_name, name) = row?;
            holidays.push(HolidayRecord {
                date: parse_date(&date)?,
                country_code,
                local_name,
                name,
            });
        }
        Ok(holidays)
    }

    /// All cached holiday dates of a country.
    pub fn holiday_dates(&self, country_code: &str) -> Result<HashSet<NaiveDate>, DbError> {
        let mut stmt = self
            .conn
            .prepare("SELECT date FROM holidays WHERE country_code = ?1")?;
        let rows = stmt.query_map(params![country_code], |row| row.get::<_, String>(0))?;
        let mut dates = HashSet::new();
        for row in rows {
            dates.insert(parse_date(&row?)?);
        }
        Ok(dates)
    }
}

fn parse_date(date: &str) -> Result<NaiveDate, DbError> {
    NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|source| DbError::HolidayDate {
        date: date.to_string(),
        source,
    })
}
