// crates/curtail-core/src/runtime/evaluator.rs
// ============================================================================
// Module: Curtail Violation Evaluator
// Description: Per-subscriber compliance checks under two policies.
// Purpose: Turn readings and resolved caps into violation amounts.
// Dependencies: crate::core, crate::runtime::resolver, serde
// ============================================================================

//! ## Overview
//! Two policies are supported:
//! - [`EvaluationPolicy::LastReading`] compares the most recent valid reading
//!   against the cap in force on that day.
//! - [`EvaluationPolicy::Consecutive`] takes the `window` most recent valid
//!   readings and reports a violation only when every one of them exceeds its
//!   own day's cap.
//!
//! Subscribers without a positive baseline have no applicable cap and are
//! reported compliant. Subscribers without enough valid readings are
//! excluded rather than classified.
//!
//! ## Invariants
//! - Violation percentages are `amount / limit * 100`, forced to `0` when the
//!   limit is not positive.
//! - Day lists are ordered newest first.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::DayIndex;
use crate::core::Restriction;
use crate::core::Subscriber;
use crate::runtime::resolver::cap_for_day;

// ============================================================================
// SECTION: Policy
// ============================================================================

/// Smallest window the consecutive policy scores.
pub const MIN_CONSECUTIVE_WINDOW: usize = 2;

/// Selects how violations are detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum EvaluationPolicy {
    /// Instantaneous check on the most recent valid reading.
    LastReading,
    /// All of the most recent `window` valid readings must exceed their caps.
    Consecutive {
        /// Number of valid readings scored; at least [`MIN_CONSECUTIVE_WINDOW`].
        window: usize,
    },
}

// ============================================================================
// SECTION: Outcomes
// ============================================================================

/// One scored day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayCap {
    /// Day index of the reading.
    pub day: DayIndex,
    /// Recorded consumption.
    pub value: f64,
    /// Restriction percentage in force.
    pub percentage: f64,
    /// Cap derived from the subscriber baseline.
    pub cap: f64,
}

impl DayCap {
    /// Returns true when the reading exceeds the cap.
    #[must_use]
    pub fn exceeds(&self) -> bool {
        self.value > self.cap
    }
}

/// Detected violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Most recent scored day.
    pub day: DayIndex,
    /// Reading (or mean of readings) compared against the limit.
    pub calculated_value: f64,
    /// Cap (or mean of caps) in force.
    pub effective_limit: f64,
    /// `calculated_value - effective_limit`.
    pub violation_amount: f64,
    /// Amount as a percentage of the limit.
    pub violation_pct: f64,
    /// Scored days, newest first.
    pub days: Vec<DayCap>,
}

/// Compliant outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Compliance {
    /// Most recent scored day.
    pub day: DayIndex,
    /// Reading (or mean of readings) compared against the limit.
    pub calculated_value: f64,
    /// Cap (or mean of caps) in force.
    pub effective_limit: f64,
    /// True when the subscriber has no positive baseline.
    pub uncapped: bool,
    /// Scored days, newest first.
    pub days: Vec<DayCap>,
}

/// Why a subscriber was left out of classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ExclusionReason {
    /// The series holds no valid reading.
    NoReadings,
    /// Fewer valid readings than the scoring window.
    InsufficientHistory {
        /// Valid readings found.
        available: usize,
        /// Readings the window requires.
        required: usize,
    },
}

/// Result of evaluating one subscriber.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum Assessment {
    /// Consumption exceeds the cap.
    Violation(Violation),
    /// Consumption within the cap, or no cap applies.
    Compliant(Compliance),
    /// Not classified.
    Excluded(ExclusionReason),
}

impl Assessment {
    /// Returns the violation, if any.
    #[must_use]
    pub const fn violation(&self) -> Option<&Violation> {
        match self {
            Self::Violation(violation) => Some(violation),
            Self::Compliant(_) | Self::Excluded(_) => None,
        }
    }

    /// Returns true for [`Assessment::Violation`].
    #[must_use]
    pub const fn is_violation(&self) -> bool {
        matches!(self, Self::Violation(_))
    }
}

// ============================================================================
// SECTION: Evaluation
// ============================================================================

/// Evaluates `subscriber` under `policy`.
#[must_use]
pub fn evaluate(
    subscriber: &Subscriber,
    restriction: Option<&Restriction>,
    policy: EvaluationPolicy,
) -> Assessment {
    match policy {
        EvaluationPolicy::LastReading => evaluate_last_reading(subscriber, restriction),
        EvaluationPolicy::Consecutive {
            window,
        } => evaluate_consecutive(subscriber, restriction, window),
    }
}

/// Evaluates the most recent valid reading against that day's cap.
#[must_use]
pub fn evaluate_last_reading(
    subscriber: &Subscriber,
    restriction: Option<&Restriction>,
) -> Assessment {
    let Some((day, value)) = subscriber.readings.last_valid() else {
        return Assessment::Excluded(ExclusionReason::NoReadings);
    };
    let scored = score_day(subscriber.baseline_or_zero(), restriction, day, value);
    if !subscriber.has_baseline() || !scored.exceeds() {
        return compliant(subscriber, vec![scored], scored.value, scored.cap);
    }
    violation(vec![scored], scored.value, scored.cap)
}

/// Evaluates the `window` most recent valid readings; every one must exceed
/// its own day's cap for a violation.
///
/// Windows below [`MIN_CONSECUTIVE_WINDOW`] are never scored: the subscriber
/// is excluded with `required` set to the minimum window.
#[must_use]
pub fn evaluate_consecutive(
    subscriber: &Subscriber,
    restriction: Option<&Restriction>,
    window: usize,
) -> Assessment {
    if subscriber.readings.last_valid().is_none() {
        return Assessment::Excluded(ExclusionReason::NoReadings);
    }
    let recent = subscriber.readings.recent_valid(window);
    if window < MIN_CONSECUTIVE_WINDOW || recent.len() < window {
        return Assessment::Excluded(ExclusionReason::InsufficientHistory {
            available: recent.len(),
            required: window.max(MIN_CONSECUTIVE_WINDOW),
        });
    }
    let baseline = subscriber.baseline_or_zero();
    let days: Vec<DayCap> = recent
        .into_iter()
        .map(|(day, value)| score_day(baseline, restriction, day, value))
        .collect();
    let calculated_value = mean(days.iter().map(|scored| scored.value));
    let effective_limit = mean(days.iter().map(|scored| scored.cap));
    if !subscriber.has_baseline() || !days.iter().all(DayCap::exceeds) {
        return compliant(subscriber, days, calculated_value, effective_limit);
    }
    violation(days, calculated_value, effective_limit)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the cap for one reading.
fn score_day(
    baseline: f64,
    restriction: Option<&Restriction>,
    day: DayIndex,
    value: f64,
) -> DayCap {
    let (percentage, cap) = cap_for_day(baseline, restriction, day);
    DayCap {
        day,
        value,
        percentage,
        cap,
    }
}

/// Builds a violation from scored days and aggregate figures.
fn violation(days: Vec<DayCap>, calculated_value: f64, effective_limit: f64) -> Assessment {
    let violation_amount = calculated_value - effective_limit;
    Assessment::Violation(Violation {
        day: newest_day(&days),
        calculated_value,
        effective_limit,
        violation_amount,
        violation_pct: ratio_pct(violation_amount, effective_limit),
        days,
    })
}

/// Builds a compliant outcome from scored days and aggregate figures.
fn compliant(
    subscriber: &Subscriber,
    days: Vec<DayCap>,
    calculated_value: f64,
    effective_limit: f64,
) -> Assessment {
    Assessment::Compliant(Compliance {
        day: newest_day(&days),
        calculated_value,
        effective_limit,
        uncapped: !subscriber.has_baseline(),
        days,
    })
}

/// Day index of the first (newest) scored day.
fn newest_day(days: &[DayCap]) -> DayIndex {
    days.first().map_or(0, |scored| scored.day)
}

/// `amount / limit * 100`, or `0` when the limit is not positive.
fn ratio_pct(amount: f64, limit: f64) -> f64 {
    if limit > 0.0 { amount / limit * 100.0 } else { 0.0 }
}

/// Arithmetic mean; `0` for an empty input.
#[allow(clippy::cast_precision_loss, reason = "Scoring windows are far below 2^52 entries.")]
fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0_usize), |(sum, count), value| (sum + value, count + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}
