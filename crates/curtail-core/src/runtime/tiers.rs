// crates/curtail-core/src/runtime/tiers.rs
// ============================================================================
// Module: Curtail Action Tiers
// Description: Violation percentage to enforcement action mapping.
// Purpose: Classify violations into warning, pressure, and cutoff tiers.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Tiers are half-open on the left and closed on the right:
//! `(0, warning]` is a warning notice, `(warning, pressure]` a pressure
//! reduction and anything above `pressure` a supply cutoff.
//!
//! ## Invariants
//! - Editing through [`ActionThresholds::set_warning_limit`] and
//!   [`ActionThresholds::set_pressure_limit`] keeps `warning < pressure`.
//! - Classification never fails; with inverted thresholds any percentage
//!   above both limits is a cutoff.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Gap kept between thresholds when one edit pushes the other.
pub const THRESHOLD_STEP: f64 = 1.0;

/// Default warning threshold in percent.
const DEFAULT_WARNING_LIMIT: f64 = 20.0;

/// Default pressure-reduction threshold in percent.
const DEFAULT_PRESSURE_LIMIT: f64 = 50.0;

// ============================================================================
// SECTION: Tiers
// ============================================================================

/// Enforcement action for a violating subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionTier {
    /// Written warning.
    WarningNotice,
    /// Supply pressure reduction.
    PressureReduction,
    /// Supply cutoff.
    SupplyCutoff,
}

impl ActionTier {
    /// Stable snake-case label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WarningNotice => "warning_notice",
            Self::PressureReduction => "pressure_reduction",
            Self::SupplyCutoff => "supply_cutoff",
        }
    }
}

impl fmt::Display for ActionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Thresholds
// ============================================================================

/// Operator-configured tier limits, both in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActionThresholds {
    /// Upper bound (inclusive) of the warning tier.
    pub warning_limit: f64,
    /// Upper bound (inclusive) of the pressure-reduction tier.
    pub pressure_limit: f64,
}

impl Default for ActionThresholds {
    fn default() -> Self {
        Self {
            warning_limit: DEFAULT_WARNING_LIMIT,
            pressure_limit: DEFAULT_PRESSURE_LIMIT,
        }
    }
}

impl ActionThresholds {
    /// Creates thresholds as given, without reordering.
    #[must_use]
    pub const fn new(warning_limit: f64, pressure_limit: f64) -> Self {
        Self {
            warning_limit,
            pressure_limit,
        }
    }

    /// Returns true when `warning_limit < pressure_limit`.
    #[must_use]
    pub fn is_ordered(&self) -> bool {
        self.warning_limit < self.pressure_limit
    }

    /// Sets the warning limit (negative or NaN becomes `0`), pushing the
    /// pressure limit up when needed.
    pub fn set_warning_limit(&mut self, warning_limit: f64) {
        self.warning_limit = warning_limit.max(0.0);
        if self.warning_limit >= self.pressure_limit {
            self.pressure_limit = self.warning_limit + THRESHOLD_STEP;
        }
    }

    /// Sets the pressure limit, pushing the warning limit down when needed.
    /// The warning limit never drops below zero, so a non-positive pressure
    /// limit is raised to [`THRESHOLD_STEP`].
    pub fn set_pressure_limit(&mut self, pressure_limit: f64) {
        self.pressure_limit =
            if pressure_limit > 0.0 { pressure_limit } else { THRESHOLD_STEP };
        if self.warning_limit >= self.pressure_limit {
            self.warning_limit = (self.pressure_limit - THRESHOLD_STEP).max(0.0);
        }
    }

    /// Classifies `violation_pct`; see [`classify_action`].
    #[must_use]
    pub fn classify(&self, violation_pct: f64) -> Option<ActionTier> {
        classify_action(violation_pct, self)
    }
}

/// Maps a violation percentage to its tier. Non-positive or NaN
/// percentages have no tier.
#[must_use]
pub fn classify_action(violation_pct: f64, thresholds: &ActionThresholds) -> Option<ActionTier> {
    if violation_pct.is_nan() || violation_pct <= 0.0 {
        return None;
    }
    if violation_pct <= thresholds.warning_limit {
        Some(ActionTier::WarningNotice)
    } else if violation_pct <= thresholds.pressure_limit {
        Some(ActionTier::PressureReduction)
    } else {
        Some(ActionTier::SupplyCutoff)
    }
}
