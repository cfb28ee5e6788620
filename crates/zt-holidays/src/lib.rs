//! Public holiday lookup for the work-time ledger.
//!
//! Fetches public holidays per year and country from a Nager.Date compatible
//! HTTP API and turns them into a [`HolidayLookup`] for the engine.

use std::collections::HashSet;
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use zt_core::HolidayLookup;

/// Default request timeout for API calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Public Nager.Date API.
pub const DEFAULT_API_URL: &str = "https://date.nager.at/api/v3";

/// Holiday client errors.
#[derive(Debug, Error)]
pub enum HolidayError {
    /// The base URL was empty.
    #[error("invalid API URL: {reason}")]
    InvalidUrl { reason: &'static str },
    /// The country code is not a two-letter code.
    #[error("invalid country code: {0}")]
    InvalidCountry(String),
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// API returned an error response.
    #[error("API error: {message}")]
    Api { message: String },
    /// Failed to parse response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// One public holiday as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holiday {
    pub date: NaiveDate,
    pub local_name: String,
    pub name: String,
    pub country_code: String,
}

/// Holiday API client.
///
/// Cloning shares the underlying HTTP connection pool.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl Client {
    /// Creates a client for the API at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, HolidayError> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(HolidayError::InvalidUrl {
                reason: "API URL cannot be empty",
            });
        }

        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(HolidayError::ClientBuild)?;

        Ok(Self { http, base_url })
    }

    fn holidays_url(&self, year: i32, country_code: &str) -> String {
        format!("{}/PublicHolidays/{year}/{country_code}", self.base_url)
    }

    /// Fetches the public holidays of `year` in `country_code`.
    pub async fn public_holidays(
        &self,
        year: i32,
        country_code: &str,
    ) -> Result<Vec<Holiday>, HolidayError> {
        let country_code = normalize_country(country_code)?;
        let url = self.holidays_url(year, &country_code);
        tracing::info!(year, country_code, "fetching public holidays");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(HolidayError::Api {
                message: format!("status {status}: {}", body.trim()),
            });
        }
        parse_holidays(&body)
    }
}

/// Uppercases a two-letter country code, rejecting anything else.
pub fn normalize_country(country_code: &str) -> Result<String, HolidayError> {
    let code = country_code.trim().to_uppercase();
    if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(HolidayError::InvalidCountry(country_code.to_string()));
    }
    Ok(code)
}

fn parse_holidays(body: &str) -> Result<Vec<Holiday>, HolidayError> {
    let mut holidays: Vec<Holiday> =
        serde_json::from_str(body).map_err(|err| HolidayError::InvalidResponse(err.to_string()))?;
    holidays.sort_by_key(|holiday| holiday.date);
    holidays.dedup_by_key(|holiday| holiday.date);
    Ok(holidays)
}

/// A set of holiday dates usable by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidayCalendar {
    dates: HashSet<NaiveDate>,
}

impl HolidayCalendar {
    pub fn from_holidays<'a>(holidays: impl IntoIterator<Item = &'a Holiday>) -> Self {
        Self::from_dates(holidays.into_iter().map(|holiday| holiday.date))
    }

    pub fn from_dates(dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            dates: dates.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

impl HolidayLookup for HolidayCalendar {
    fn is_holiday(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {"date":"2025-01-06","localName":"Heilige Drei Könige","name":"Epiphany","countryCode":"AT","fixed":true,"global":true,"counties":null,"launchYear":null,"types":["Public"]},
        {"date":"2025-01-01","localName":"Neujahr","name":"New Year's Day","countryCode":"AT","fixed":true,"global":true,"counties":null,"launchYear":null,"types":["Public"]},
        {"date":"2025-01-06","localName":"Heilige Drei Könige","name":"Epiphany","countryCode":"AT","fixed":true,"global":false,"counties":["AT-1"],"launchYear":null,"types":["Bank"]}
    ]"#;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn client_rejects_empty_url() {
        assert!(matches!(
            Client::new("  "),
            Err(HolidayError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client = Client::new("https://example.test/api/v3/").unwrap();
        assert_eq!(
            client.holidays_url(2025, "AT"),
            "https://example.test/api/v3/PublicHolidays/2025/AT"
        );
    }

    #[test]
    fn country_codes_are_normalized() {
        assert_eq!(normalize_country(" at ").unwrap(), "AT");
        assert!(matches!(
            normalize_country("AUT"),
            Err(HolidayError::InvalidCountry(_))
        ));
        assert!(normalize_country("A1").is_err());
    }

    #[test]
    fn parse_holidays_sorts_and_dedups() {
        let holidays = parse_holidays(SAMPLE).unwrap();
        assert_eq!(holidays.len(), 2);
        assert_eq!(holidays[0].local_name, "Neujahr");
        assert_eq!(holidays[1].date, date(2025, 1, 6));
        assert_eq!(holidays[1].country_code, "AT");
    }

    #[test]
    fn parse_holidays_rejects_invalid_json() {
        let err = parse_holidays("<html>").unwrap_err();
        assert!(matches!(err, HolidayError::InvalidResponse(_)));
    }

    #[test]
    fn calendar_answers_lookups() {
        let holidays = parse_holidays(SAMPLE).unwrap();
        let calendar = HolidayCalendar::from_holidays(&holidays);
        assert_eq!(calendar.len(), 2);
        assert!(calendar.is_holiday(date(2025, 1, 1)));
        assert!(!calendar.is_holiday(date(2025, 1, 2)));
    }
}
