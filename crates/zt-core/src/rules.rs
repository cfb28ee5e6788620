//! Statutory thresholds used by the engine.
//!
//! The defaults model Austrian working-time law. Every threshold is a named
//! constant and can be overridden through [`BreakRules`].

use chrono::NaiveTime;

/// Gross minutes from which a break is legally required (6 hours).
pub const BREAK_THRESHOLD_MINUTES: u32 = 360;

/// Total break minutes required once the threshold is reached.
pub const REQUIRED_TOTAL_BREAK_MINUTES: u32 = 30;

/// Minimum length of at least one contiguous break.
pub const MINIMUM_SINGLE_BREAK_MINUTES: u32 = 10;

/// Grace period for bare start times that lie slightly in the future.
pub const FUTURE_TOLERANCE_MINUTES: u32 = 2;

/// Days with more net minutes than this count as long days (9 hours).
pub const LONG_DAY_MINUTES: u32 = 540;

/// Start of the regular working window (06:00).
pub const REGULAR_HOURS_START_MINUTES: u32 = 6 * 60;

/// End of the regular working window (19:00).
pub const REGULAR_HOURS_END_MINUTES: u32 = 19 * 60;

/// Thresholds for break deduction, break compliance and statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakRules {
    /// Gross minutes at which deduction and compliance checks start.
    /// Default: 360.
    pub threshold_minutes: u32,

    /// Required total break once the threshold is reached.
    /// Default: 30.
    pub required_total_break: u32,

    /// Required length of the longest contiguous break.
    /// Default: 10.
    pub minimum_single_break: u32,

    /// How far a bare start time may lie ahead of the reference time.
    /// Default: 2.
    pub future_tolerance_minutes: u32,

    /// Net minutes above which a day counts as long.
    /// Default: 540.
    pub long_day_minutes: u32,

    /// Regular working window as minutes since midnight, `[start, end)`.
    /// Default: 06:00..19:00.
    pub regular_hours: (u32, u32),
}

impl Default for BreakRules {
    fn default() -> Self {
        Self {
            threshold_minutes: BREAK_THRESHOLD_MINUTES,
            required_total_break: REQUIRED_TOTAL_BREAK_MINUTES,
            minimum_single_break: MINIMUM_SINGLE_BREAK_MINUTES,
            future_tolerance_minutes: FUTURE_TOLERANCE_MINUTES,
            long_day_minutes: LONG_DAY_MINUTES,
            regular_hours: (REGULAR_HOURS_START_MINUTES, REGULAR_HOURS_END_MINUTES),
        }
    }
}

impl BreakRules {
    /// Minutes deducted from `gross` when the reported break is too short.
    pub fn deduction_for(&self, gross: u32, total_break: u32) -> u32 {
        if gross >= self.threshold_minutes {
            self.required_total_break.saturating_sub(total_break)
        } else {
            0
        }
    }

    /// Returns true if `time` lies inside the regular working window.
    pub fn is_regular_time(&self, time: NaiveTime) -> bool {
        let minutes = crate::wall_clock::minutes_since_midnight(time);
        (self.regular_hours.0..self.regular_hours.1).contains(&minutes)
    }
}
