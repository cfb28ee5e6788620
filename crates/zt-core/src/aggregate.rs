//! Gross time, breaks and the statutory break deduction for one day.

use crate::entry::TimeEntry;
use crate::rules::BreakRules;
use crate::wall_clock::minutes_between;

/// Totals for a sorted, non-overlapping list of entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntervalTotals {
    /// Sum of entry durations.
    pub gross_minutes: u32,
    /// Sum of the gaps between consecutive entries.
    pub total_break: u32,
    /// Unpaid minutes deducted for an insufficient break.
    pub break_deduction: u32,
    /// `gross_minutes - break_deduction`.
    pub net_minutes: u32,
}

/// Gaps between consecutive entries. Entries must be sorted by start.
pub fn break_gaps(entries: &[TimeEntry]) -> impl Iterator<Item = u32> + '_ {
    entries
        .windows(2)
        .map(|pair| minutes_between(pair[0].end, pair[1].start))
}

/// Longest single gap; zero for fewer than two entries.
pub fn longest_gap(entries: &[TimeEntry]) -> u32 {
    break_gaps(entries).max().unwrap_or(0)
}

/// Computes gross, break and net minutes.
///
/// When gross time reaches the rules' threshold and the reported break is
/// shorter than required, the shortfall is deducted.
pub fn aggregate_intervals(entries: &[TimeEntry], rules: &BreakRules) -> IntervalTotals {
    let gross_minutes = entries.iter().map(|entry| entry.duration).sum();
    let total_break = break_gaps(entries).sum();
    let break_deduction = rules.deduction_for(gross_minutes, total_break);

    IntervalTotals {
        gross_minutes,
        total_break,
        break_deduction,
        net_minutes: gross_minutes - break_deduction.min(gross_minutes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::parse_entries;

    fn totals(text: &str) -> IntervalTotals {
        let rules = BreakRules::default();
        let (entries, errors) = parse_entries(text, None, &rules);
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
        aggregate_intervals(&entries, &rules)
    }

    #[test]
    fn empty_day_is_zero() {
        assert_eq!(totals(""), IntervalTotals::default());
    }

    #[test]
    fn lunch_break_covers_requirement() {
        let t = totals("08:00 - 12:00\n13:00 - 17:00");
        assert_eq!(t.gross_minutes, 480);
        assert_eq!(t.total_break, 60);
        assert_eq!(t.break_deduction, 0);
        assert_eq!(t.net_minutes, 480);
    }

    #[test]
    fn missing_break_is_deducted() {
        let t = totals("08:00 - 14:30");
        assert_eq!(t.gross_minutes, 390);
        assert_eq!(t.break_deduction, 30);
        assert_eq!(t.net_minutes, 360);
    }

    #[test]
    fn short_break_deducts_shortfall() {
        let t = totals("08:00 - 12:00\n12:15 - 16:00");
        assert_eq!(t.total_break, 15);
        assert_eq!(t.break_deduction, 15);
        assert_eq!(t.net_minutes, t.gross_minutes - 15);
    }

    #[test]
    fn below_threshold_no_deduction() {
        let t = totals("08:00 - 13:59");
        assert_eq!(t.gross_minutes, 359);
        assert_eq!(t.break_deduction, 0);
    }

    #[test]
    fn longest_gap_picks_max() {
        let rules = BreakRules::default();
        let (entries, _) =
            parse_entries("08:00 - 09:00\n09:05 - 10:00\n10:40 - 12:00", None, &rules);
        assert_eq!(longest_gap(&entries), 40);
        assert_eq!(longest_gap(&entries[..1]), 0);
    }
}
