//! `zt settings`: show or change the stored user settings.

use std::io::Write;

use anyhow::{Context, Result};
use zt_db::Database;

/// Fields to change; `None` leaves the stored value as is.
#[derive(Debug, Default)]
pub struct SettingsUpdate {
    pub weekly_hours: Option<f64>,
    pub vacation_days: Option<u32>,
    pub gradient: Option<String>,
}

/// Runs `zt settings show`.
pub fn show<W: Write>(writer: &mut W, db: &Database) -> Result<()> {
    let settings = db.load_settings().context("failed to load settings")?;
    writeln!(writer, "{}", serde_json::to_string_pretty(&settings)?)?;
    Ok(())
}

/// Runs `zt settings set`.
pub fn set<W: Write>(writer: &mut W, db: &Database, update: SettingsUpdate) -> Result<()> {
    let mut settings = db.load_settings().context("failed to load settings")?;
    if let Some(hours) = update.weekly_hours {
        settings.weekly_target_hours = hours;
    }
    if let Some(days) = update.vacation_days {
        settings.vacation_days = days;
    }
    if let Some(gradient) = update.gradient {
        settings.gradient = Some(gradient).filter(|name| !name.trim().is_empty());
    }
    db.save_settings(&settings)
        .context("failed to save settings")?;
    tracing::debug!(?settings, "saved settings");

    writeln!(
        writer,
        "Weekly target {}h ({} min per day), {} vacation days.",
        settings.weekly_target_hours,
        settings.daily_target_minutes(),
        settings.vacation_days
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_updates_only_given_fields() {
        let db = Database::open_in_memory().unwrap();
        let mut output = Vec::new();
        set(
            &mut output,
            &db,
            SettingsUpdate {
                weekly_hours: Some(40.0),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Weekly target 40h (480 min per day), 25 vacation days.\n"
        );

        let settings = db.load_settings().unwrap();
        assert!((settings.weekly_target_hours - 40.0).abs() < f64::EPSILON);
        assert_eq!(settings.vacation_days, 25);
    }

    #[test]
    fn set_rejects_impossible_hours() {
        let db = Database::open_in_memory().unwrap();
        let mut output = Vec::new();
        let err = set(
            &mut output,
            &db,
            SettingsUpdate {
                weekly_hours: Some(200.0),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("between 0 and 168"));
        assert!((db.load_settings().unwrap().weekly_target_hours - 38.5).abs() < f64::EPSILON);
    }

    #[test]
    fn show_prints_json() {
        let db = Database::open_in_memory().unwrap();
        let mut output = Vec::new();
        show(&mut output, &db).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(json["vacation_days"], 25);
        assert_eq!(json["weekly_target_hours"], 38.5);
    }
}
