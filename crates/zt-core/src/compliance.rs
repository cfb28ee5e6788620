//! Break-law compliance for one day.
//!
//! Beyond the break threshold a day needs a minimum total break and at least
//! one contiguous break of a minimum length. This is independent of the
//! automatic deduction, which only looks at the total.

use serde::Serialize;

use crate::aggregate::break_gaps;
use crate::entry::TimeEntry;
use crate::rules::BreakRules;

/// Result of the two-part break check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakCompliance {
    pub has_required_total_break: bool,
    pub has_minimum_single_break: bool,
    pub total_break_minutes: u32,
    pub longest_single_break: u32,
    pub is_compliant: bool,
    pub violations: Vec<String>,
}

impl BreakCompliance {
    /// A day without any legal requirement.
    pub const fn exempt() -> Self {
        Self {
            has_required_total_break: true,
            has_minimum_single_break: true,
            total_break_minutes: 0,
            longest_single_break: 0,
            is_compliant: true,
            violations: Vec::new(),
        }
    }
}

impl Default for BreakCompliance {
    fn default() -> Self {
        Self::exempt()
    }
}

/// Evaluates break compliance for sorted entries with the given gross time.
pub fn evaluate_break_compliance(
    entries: &[TimeEntry],
    gross_minutes: u32,
    rules: &BreakRules,
) -> BreakCompliance {
    if gross_minutes < rules.threshold_minutes {
        return BreakCompliance::exempt();
    }

    let (total_break_minutes, longest_single_break) =
        break_gaps(entries).fold((0, 0), |(total, longest), gap| (total + gap, longest.max(gap)));

    let has_required_total_break = total_break_minutes >= rules.required_total_break;
    let has_minimum_single_break = longest_single_break >= rules.minimum_single_break;

    let mut violations = Vec::new();
    if !has_required_total_break {
        violations.push(format!(
            "Pausen insgesamt {total_break_minutes} Minuten, mindestens {} Minuten erforderlich",
            rules.required_total_break
        ));
    }
    if !has_minimum_single_break {
        violations.push(format!(
            "Keine zusammenhängende Pause von mindestens {} Minuten",
            rules.minimum_single_break
        ));
    }

    BreakCompliance {
        has_required_total_break,
        has_minimum_single_break,
        total_break_minutes,
        longest_single_break,
        is_compliant: has_required_total_break && has_minimum_single_break,
        violations,
    }
}
