// crates/curtail-core/src/runtime/resolver.rs
// ============================================================================
// Module: Curtail Restriction Resolver
// Description: Percentage-in-force lookup and cap arithmetic.
// Purpose: Answer "what is the cap for this baseline on this day".
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Resolution scans a schedule's periods in ascending order and keeps the
//! percentage of the latest period starting on or before the requested day.
//! [`Restriction`] maintains the ordering, so no sorting happens here.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::DayIndex;
use crate::core::MAX_PERCENTAGE;
use crate::core::Restriction;

// ============================================================================
// SECTION: Resolution
// ============================================================================

/// Returns the restriction percentage in force on `day`.
///
/// Missing schedules, empty schedules, and days before the first period all
/// resolve to `0`.
#[must_use]
pub fn resolve_percentage(restriction: Option<&Restriction>, day: DayIndex) -> f64 {
    let Some(restriction) = restriction else {
        return 0.0;
    };
    let mut current = 0.0;
    for period in restriction.periods() {
        if period.effective_index() > day {
            break;
        }
        current = period.percentage;
    }
    current
}

/// Computes `baseline * (1 - percentage / 100)`.
///
/// A baseline that is zero, negative, or not finite yields a cap of `0`.
/// The percentage is clamped to `0..=100`, so the cap never goes negative
/// or above the baseline.
#[must_use]
pub fn compute_cap(baseline: f64, percentage: f64) -> f64 {
    if !baseline.is_finite() || baseline <= 0.0 {
        return 0.0;
    }
    let percentage = if percentage.is_nan() { 0.0 } else { percentage.clamp(0.0, MAX_PERCENTAGE) };
    baseline * (MAX_PERCENTAGE - percentage) / MAX_PERCENTAGE
}

/// Resolves the percentage for `day` and returns `(percentage, cap)`.
#[must_use]
pub fn cap_for_day(baseline: f64, restriction: Option<&Restriction>, day: DayIndex) -> (f64, f64) {
    let percentage = resolve_percentage(restriction, day);
    (percentage, compute_cap(baseline, percentage))
}

/// Returns the cap for each of the first `days` day indices.
#[must_use]
pub fn cap_series(baseline: f64, restriction: Option<&Restriction>, days: usize) -> Vec<f64> {
    (0 .. days)
        .map_while(|slot| DayIndex::try_from(slot).ok())
        .map(|day| cap_for_day(baseline, restriction, day).1)
        .collect()
}
