// crates/curtail-core/src/core/series.rs
// ============================================================================
// Module: Curtail Consumption Series
// Description: Daily consumption readings indexed by day index.
// Purpose: Distinguish missing readings from legitimate zero consumption.
// Dependencies: crate::core::calendar, serde
// ============================================================================

//! ## Overview
//! A [`DailySeries`] stores one slot per [`DayIndex`] starting at the epoch.
//! A slot holds no data when it is `None` or when the stored value is
//! negative or non-finite (legacy `-1` sentinels). A stored `0.0` is a valid
//! reading.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::calendar::DayIndex;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Raw slot value; `None` means no reading was recorded.
pub type Reading = Option<f64>;

/// Daily consumption readings starting at day index `0`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DailySeries {
    /// Slot `i` holds the reading for day index `i`.
    readings: Vec<Reading>,
}

impl DailySeries {
    /// Wraps raw readings.
    #[must_use]
    pub const fn new(readings: Vec<Reading>) -> Self {
        Self {
            readings,
        }
    }

    /// Builds a series from plain values; negative or non-finite values count as missing.
    #[must_use]
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Self {
        Self::new(values.into_iter().map(Some).collect())
    }

    /// Returns true when `value` counts as a recorded reading.
    #[must_use]
    pub fn is_valid(value: f64) -> bool {
        value.is_finite() && value >= 0.0
    }

    /// Number of slots, including missing days.
    #[must_use]
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// Returns true when the series has no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Returns the valid reading for `index`, if any.
    #[must_use]
    pub fn get(&self, index: DayIndex) -> Option<f64> {
        let slot = usize::try_from(index).ok()?;
        self.readings.get(slot).copied().flatten().filter(|value| Self::is_valid(*value))
    }

    /// Records `reading` at `index`, padding skipped days with `None`.
    /// Negative indices are ignored.
    pub fn set(&mut self, index: DayIndex, reading: Reading) {
        let Ok(slot) = usize::try_from(index) else {
            return;
        };
        if slot >= self.readings.len() {
            self.readings.resize(slot + 1, None);
        }
        self.readings[slot] = reading;
    }

    /// Iterates valid `(index, value)` pairs from the most recent backwards.
    pub fn valid_readings_rev(&self) -> impl Iterator<Item = (DayIndex, f64)> + '_ {
        self.readings.iter().enumerate().rev().filter_map(|(slot, reading)| {
            let value = reading.filter(|value| Self::is_valid(*value))?;
            Some((DayIndex::try_from(slot).ok()?, value))
        })
    }

    /// Returns the most recent valid reading.
    #[must_use]
    pub fn last_valid(&self) -> Option<(DayIndex, f64)> {
        self.valid_readings_rev().next()
    }

    /// Returns up to `count` most recent valid readings, newest first.
    #[must_use]
    pub fn recent_valid(&self, count: usize) -> Vec<(DayIndex, f64)> {
        self.valid_readings_rev().take(count).collect()
    }
}

impl From<Vec<Reading>> for DailySeries {
    fn from(readings: Vec<Reading>) -> Self {
        Self::new(readings)
    }
}
