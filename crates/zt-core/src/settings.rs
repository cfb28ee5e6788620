//! User settings persisted as one JSON blob.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Settings validation and decoding errors.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Weekly target hours outside 0..=168 or not finite.
    #[error("weekly target hours must be between 0 and 168, got {value}")]
    WeeklyHoursOutOfRange { value: f64 },
    /// The stored blob is not valid settings JSON.
    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Per-user settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Contracted hours per week, spread over five working days.
    pub weekly_target_hours: f64,
    /// Vacation days granted per year.
    pub vacation_days: u32,
    /// Dashboard card visibility by card id.
    pub cards: BTreeMap<String, bool>,
    /// Dashboard card order.
    pub layout: Vec<String>,
    /// Selected background gradient.
    pub gradient: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            weekly_target_hours: 38.5,
            vacation_days: 25,
            cards: BTreeMap::new(),
            layout: Vec::new(),
            gradient: None,
        }
    }
}

impl Settings {
    /// Decodes and validates a stored blob.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let value = self.weekly_target_hours;
        if !value.is_finite() || !(0.0..=168.0).contains(&value) {
            return Err(SettingsError::WeeklyHoursOutOfRange { value });
        }
        Ok(())
    }

    /// Daily target: a fifth of the weekly hours, rounded to whole minutes.
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "hours are clamped to 0..=168 before the cast"
    )]
    pub fn daily_target_minutes(&self) -> u32 {
        (self.weekly_target_hours.clamp(0.0, 168.0) * 60.0 / 5.0).round() as u32
    }

    /// Granted vacation days minus `taken`; negative when overdrawn.
    pub fn remaining_vacation_days(&self, taken: u32) -> i64 {
        i64::from(self.vacation_days) - i64::from(taken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_daily_target() {
        assert_eq!(Settings::default().daily_target_minutes(), 462);
        let forty = Settings {
            weekly_target_hours: 40.0,
            ..Default::default()
        };
        assert_eq!(forty.daily_target_minutes(), 480);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let settings = Settings::from_json(r#"{"vacation_days": 30}"#).unwrap();
        assert_eq!(settings.vacation_days, 30);
        assert!((settings.weekly_target_hours - 38.5).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_out_of_range_hours() {
        let err = Settings::from_json(r#"{"weekly_target_hours": 200}"#).unwrap_err();
        assert!(matches!(err, SettingsError::WeeklyHoursOutOfRange { .. }));
        assert!(Settings::from_json("{oops").is_err());
    }

    #[test]
    fn remaining_vacation_can_go_negative() {
        let settings = Settings::default();
        assert_eq!(settings.remaining_vacation_days(5), 20);
        assert_eq!(settings.remaining_vacation_days(27), -2);
    }

    #[test]
    fn json_roundtrip_keeps_layout() {
        let mut settings = Settings::default();
        settings.cards.insert("weekly".to_string(), false);
        settings.layout = vec!["today".to_string(), "weekly".to_string()];
        settings.gradient = Some("sunset".to_string());
        let parsed = Settings::from_json(&settings.to_json().unwrap()).unwrap();
        assert_eq!(parsed, settings);
    }
}
