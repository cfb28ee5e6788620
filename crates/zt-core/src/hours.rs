//! Off-hours work and home-office classification.

use chrono::NaiveDate;
use serde::Serialize;

use crate::entry::TimeEntry;
use crate::ledger::{DateRange, Ledger, is_weekend};
use crate::rules::BreakRules;
use crate::wall_clock::minutes_since_midnight;

/// Reason fragments that mark an entry as home office, lower-case.
const HOME_OFFICE_KEYWORDS: &[&str] = &["homeoffice", "home office", "home-office", "remote"];

/// Minutes of `entry` inside the `[start, end)` window.
fn minutes_inside(entry: &TimeEntry, window: (u32, u32)) -> u32 {
    let start = minutes_since_midnight(entry.start).max(window.0);
    let end = minutes_since_midnight(entry.end).min(window.1);
    end.saturating_sub(start)
}

/// Worked minutes outside the regular window.
///
/// On weekends and holidays every worked minute counts.
pub fn calculate_outside_regular_hours(
    entries: &[TimeEntry],
    date: NaiveDate,
    is_holiday: bool,
    rules: &BreakRules,
) -> u32 {
    let gross: u32 = entries.iter().map(|entry| entry.duration).sum();
    if is_holiday || is_weekend(date) {
        return gross;
    }
    let inside: u32 = entries
        .iter()
        .map(|entry| minutes_inside(entry, rules.regular_hours))
        .sum();
    gross - inside
}

/// Where a day was worked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Workplace {
    HomeOffice,
    Office,
    Hybrid,
}

pub fn is_home_office(entry: &TimeEntry) -> bool {
    entry.reason.as_deref().is_some_and(|reason| {
        let reason = reason.to_lowercase();
        reason == "ho" || HOME_OFFICE_KEYWORDS.iter().any(|kw| reason.contains(kw))
    })
}

/// Classifies a day by its entries. `None` without entries.
pub fn classify_workplace(entries: &[TimeEntry]) -> Option<Workplace> {
    let home = entries.iter().filter(|entry| is_home_office(entry)).count();
    match (home, entries.len()) {
        (_, 0) => None,
        (0, _) => Some(Workplace::Office),
        (h, n) if h == n => Some(Workplace::HomeOffice),
        _ => Some(Workplace::Hybrid),
    }
}

/// Home-office totals over a range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HomeOfficeSummary {
    pub home_office_days: u32,
    pub office_days: u32,
    pub hybrid_days: u32,
    pub home_office_minutes: u32,
    pub office_minutes: u32,
    /// Home-office minutes inside the regular window.
    pub home_office_regular_minutes: u32,
    /// Home-office minutes outside the regular window.
    pub home_office_outside_minutes: u32,
}

impl HomeOfficeSummary {
    /// Share of gross worked minutes spent in home office, 0.0 to 1.0.
    pub fn home_office_ratio(&self) -> f64 {
        let total = self.home_office_minutes + self.office_minutes;
        if total == 0 {
            return 0.0;
        }
        f64::from(self.home_office_minutes) / f64::from(total)
    }

    fn add_day(&mut self, entries: &[TimeEntry], rules: &BreakRules) {
        match classify_workplace(entries) {
            Some(Workplace::HomeOffice) => self.home_office_days += 1,
            Some(Workplace::Office) => self.office_days += 1,
            Some(Workplace::Hybrid) => self.hybrid_days += 1,
            None => return,
        }
        for entry in entries {
            if is_home_office(entry) {
                let inside = minutes_inside(entry, rules.regular_hours);
                self.home_office_minutes += entry.duration;
                self.home_office_regular_minutes += inside;
                self.home_office_outside_minutes += entry.duration - inside;
            } else {
                self.office_minutes += entry.duration;
            }
        }
    }
}

impl Ledger<'_> {
    /// Minutes worked outside regular hours on `date`.
    pub fn outside_regular_hours(&self, date: NaiveDate) -> u32 {
        let details = self.details(date);
        calculate_outside_regular_hours(
            &details.time_entries,
            date,
            self.is_holiday(date),
            &self.rules,
        )
    }

    /// Sum of [`Self::outside_regular_hours`] over the range.
    pub fn outside_regular_hours_in(&self, range: DateRange) -> u32 {
        self.data
            .iter()
            .filter(|(date, _)| range.contains(*date))
            .map(|(date, _)| self.outside_regular_hours(date))
            .sum()
    }

    pub fn home_office_summary(&self, range: DateRange) -> HomeOfficeSummary {
        let mut summary = HomeOfficeSummary::default();
        for (date, _) in self.data.iter().filter(|(date, _)| range.contains(*date)) {
            summary.add_day(&self.details(date).time_entries, &self.rules);
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::parse_entries;
    use crate::year_data::{NoHolidays, YearData};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entries(text: &str) -> Vec<TimeEntry> {
        parse_entries(text, None, &BreakRules::default()).0
    }

    #[test]
    fn weekday_counts_only_early_and_late_minutes() {
        // 2025-03-05 is a Wednesday.
        let e = entries("05:00 - 07:00\n12:00 - 13:00\n18:30 - 20:15");
        let rules = BreakRules::default();
        assert_eq!(calculate_outside_regular_hours(&e, date(2025, 3, 5), false, &rules), 60 + 75);
    }

    #[test]
    fn sunday_counts_everything() {
        // 2025-03-09 is a Sunday.
        let e = entries("09:00 - 12:00");
        let rules = BreakRules::default();
        assert_eq!(calculate_outside_regular_hours(&e, date(2025, 3, 9), false, &rules), 180);
    }

    #[test]
    fn holiday_counts_everything() {
        let e = entries("09:00 - 12:00");
        let rules = BreakRules::default();
        assert_eq!(calculate_outside_regular_hours(&e, date(2025, 3, 5), true, &rules), 180);
    }

    #[test]
    fn workplace_classification() {
        assert_eq!(classify_workplace(&[]), None);
        assert_eq!(
            classify_workplace(&entries("08:00 - 12:00 Homeoffice\n13:00 - 16:00 HO")),
            Some(Workplace::HomeOffice)
        );
        assert_eq!(
            classify_workplace(&entries("08:00 - 12:00")),
            Some(Workplace::Office)
        );
        assert_eq!(
            classify_workplace(&entries("08:00 - 12:00 Home Office\n13:00 - 16:00")),
            Some(Workplace::Hybrid)
        );
    }

    #[test]
    fn reasons_without_keyword_are_office() {
        let e = entries("08:00 - 12:00 Kundentermin");
        assert!(!is_home_office(&e[0]));
    }

    #[test]
    fn ledger_home_office_summary() {
        let data = YearData::from_raw([
            ("2025-03-03", "05:00 - 08:00 Homeoffice\n09:00 - 12:00"),
            ("2025-03-04", "08:00 - 12:00 homeoffice"),
            ("2025-03-05", "08:00 - 12:00"),
            ("2025-03-06", "urlaub"),
        ]);
        let ledger = Ledger::new(&data, &NoHolidays, 480);
        let summary = ledger.home_office_summary(DateRange::week_of(date(2025, 3, 3)));
        assert_eq!(summary.hybrid_days, 1);
        assert_eq!(summary.home_office_days, 1);
        assert_eq!(summary.office_days, 1);
        assert_eq!(summary.home_office_minutes, 180 + 240);
        assert_eq!(summary.office_minutes, 180 + 240);
        assert_eq!(summary.home_office_outside_minutes, 60);
        assert_eq!(summary.home_office_regular_minutes, 120 + 240);
        assert!((summary.home_office_ratio() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn ledger_outside_hours_over_range() {
        let data = YearData::from_raw([
            ("2025-03-07", "18:00 - 20:00"),
            ("2025-03-08", "10:00 - 11:00"),
        ]);
        let ledger = Ledger::new(&data, &NoHolidays, 480);
        assert_eq!(ledger.outside_regular_hours(date(2025, 3, 7)), 60);
        assert_eq!(
            ledger.outside_regular_hours_in(DateRange::week_of(date(2025, 3, 7))),
            120
        );
    }
}
