// crates/curtail-core/src/core/subscriber.rs
// ============================================================================
// Module: Curtail Subscriber Records
// Description: Subscriber master data consumed by the evaluator.
// Dependencies: crate::core::{identifiers, series}, serde
// ============================================================================

//! ## Overview
//! A [`Subscriber`] bundles the fields the evaluator reads: the tariff that
//! selects a restriction schedule, the baseline used as the cap multiplier,
//! and the daily consumption series. The record is never mutated during
//! evaluation.

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::SubscriberId;
use crate::core::identifiers::TariffCode;
use crate::core::series::DailySeries;

/// Subscriber record supplied by the import layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscriber {
    /// Stable subscriber identifier.
    pub id: SubscriberId,
    /// Display name used in reports.
    #[serde(default)]
    pub name: String,
    /// Tariff code selecting the restriction schedule.
    pub tariff: TariffCode,
    /// Reference daily consumption; `None` when not yet recorded.
    #[serde(default)]
    pub baseline: Option<f64>,
    /// Daily readings starting at the epoch.
    #[serde(default)]
    pub readings: DailySeries,
}

impl Subscriber {
    /// Returns the baseline, treating a missing value as `0`.
    #[must_use]
    pub fn baseline_or_zero(&self) -> f64 {
        self.baseline.unwrap_or(0.0)
    }

    /// Returns true when the baseline can produce a positive cap.
    #[must_use]
    pub fn has_baseline(&self) -> bool {
        self.baseline.is_some_and(|value| value.is_finite() && value > 0.0)
    }
}
