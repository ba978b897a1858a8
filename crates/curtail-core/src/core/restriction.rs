// crates/curtail-core/src/core/restriction.rs
// ============================================================================
// Module: Curtail Restriction Schedules
// Description: Effective-dated restriction percentages per tariff.
// Purpose: Keep restriction periods ordered and unique so resolution is a scan.
// Dependencies: crate::core::{calendar, identifiers}, serde, thiserror
// ============================================================================

//! ## Overview
//! A [`Restriction`] holds the piecewise schedule for one tariff: each
//! [`RestrictionPeriod`] sets the percentage in force from its date until a
//! later period supersedes it. A [`RestrictionBook`] maps tariffs to their
//! schedules and carries the operator editing rules.
//!
//! ## Invariants
//! - Periods are sorted by `effective_from` and unique per date; writing an
//!   existing date overwrites its percentage.
//! - The seed period on [`EPOCH`] cannot be removed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::calendar::CalendarDate;
use crate::core::calendar::DayIndex;
use crate::core::calendar::EPOCH;
use crate::core::identifiers::TariffCode;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Upper bound for restriction percentages.
pub const MAX_PERCENTAGE: f64 = 100.0;

// ============================================================================
// SECTION: Periods
// ============================================================================

/// Restriction percentage taking effect on a given date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RestrictionPeriod {
    /// First day the percentage applies.
    pub effective_from: CalendarDate,
    /// Percentage of the baseline withheld, `0..=100`.
    pub percentage: f64,
}

impl RestrictionPeriod {
    /// Day index on which this period starts.
    #[must_use]
    pub fn effective_index(&self) -> DayIndex {
        self.effective_from.to_index()
    }
}

// ============================================================================
// SECTION: Restriction
// ============================================================================

/// Restriction schedule for one tariff.
///
/// # Invariants
/// - `periods` is strictly ascending by `effective_from`.
/// - Deserialized periods carry percentages within `0..=100`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RestrictionRecord")]
pub struct Restriction {
    /// Tariff the schedule applies to.
    tariff: TariffCode,
    /// Ordered, date-unique periods.
    periods: Vec<RestrictionPeriod>,
}

/// Wire shape accepted before the ordering invariant is restored.
#[derive(Deserialize)]
struct RestrictionRecord {
    /// Tariff the schedule applies to.
    tariff: TariffCode,
    /// Periods in any order, possibly with repeated dates.
    #[serde(default)]
    periods: Vec<RestrictionPeriod>,
}

impl TryFrom<RestrictionRecord> for Restriction {
    type Error = RestrictionError;

    fn try_from(record: RestrictionRecord) -> Result<Self, Self::Error> {
        for period in &record.periods {
            validate_percentage(period.percentage)?;
        }
        Ok(Self::from_periods(record.tariff, record.periods))
    }
}

impl Restriction {
    /// Creates a restriction with no periods (resolves to 0%).
    #[must_use]
    pub const fn new(tariff: TariffCode) -> Self {
        Self {
            tariff,
            periods: Vec::new(),
        }
    }

    /// Builds a schedule from unordered periods. Later entries win on
    /// duplicate dates.
    #[must_use]
    pub fn from_periods(
        tariff: TariffCode,
        periods: impl IntoIterator<Item = RestrictionPeriod>,
    ) -> Self {
        let mut restriction = Self::new(tariff);
        for period in periods {
            restriction.put(period);
        }
        restriction
    }

    /// Migrates a legacy flat percentage into a single seed period on [`EPOCH`].
    ///
    /// # Errors
    ///
    /// Returns [`RestrictionError::PercentageOutOfRange`] for invalid percentages.
    pub fn from_legacy_percentage(
        tariff: TariffCode,
        percentage: f64,
    ) -> Result<Self, RestrictionError> {
        let mut restriction = Self::new(tariff);
        restriction.upsert_period(EPOCH, percentage)?;
        Ok(restriction)
    }

    /// Returns the tariff code.
    #[must_use]
    pub const fn tariff(&self) -> &TariffCode {
        &self.tariff
    }

    /// Returns the periods in ascending date order.
    #[must_use]
    pub fn periods(&self) -> &[RestrictionPeriod] {
        &self.periods
    }

    /// Returns true when no periods are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// Adds a period or overwrites the percentage for an existing date.
    /// Returns the replaced percentage, if any.
    ///
    /// # Errors
    ///
    /// Returns [`RestrictionError::PercentageOutOfRange`] for invalid percentages.
    pub fn upsert_period(
        &mut self,
        effective_from: CalendarDate,
        percentage: f64,
    ) -> Result<Option<f64>, RestrictionError> {
        validate_percentage(percentage)?;
        Ok(self.put(RestrictionPeriod {
            effective_from,
            percentage,
        }))
    }

    /// Removes the period starting on `effective_from`.
    ///
    /// # Errors
    ///
    /// Returns [`RestrictionError::SeedPeriodProtected`] for the epoch period
    /// and [`RestrictionError::PeriodNotFound`] when no period starts on that date.
    pub fn remove_period(
        &mut self,
        effective_from: CalendarDate,
    ) -> Result<RestrictionPeriod, RestrictionError> {
        if effective_from == EPOCH {
            return Err(RestrictionError::SeedPeriodProtected {
                tariff: self.tariff.clone(),
            });
        }
        match self.periods.binary_search_by_key(&effective_from, |period| period.effective_from) {
            Ok(position) => Ok(self.periods.remove(position)),
            Err(_) => Err(RestrictionError::PeriodNotFound {
                tariff: self.tariff.clone(),
                effective_from,
            }),
        }
    }

    /// Inserts a period at its ordered position without validation.
    fn put(&mut self, period: RestrictionPeriod) -> Option<f64> {
        match self
            .periods
            .binary_search_by_key(&period.effective_from, |existing| existing.effective_from)
        {
            Ok(position) => {
                let slot = &mut self.periods[position];
                let previous = slot.percentage;
                slot.percentage = period.percentage;
                Some(previous)
            }
            Err(position) => {
                self.periods.insert(position, period);
                None
            }
        }
    }
}

/// Checks that `percentage` is finite and within `0..=MAX_PERCENTAGE`.
///
/// # Errors
///
/// Returns [`RestrictionError::PercentageOutOfRange`] otherwise.
pub fn validate_percentage(percentage: f64) -> Result<(), RestrictionError> {
    if percentage.is_finite() && (0.0 ..= MAX_PERCENTAGE).contains(&percentage) {
        Ok(())
    } else {
        Err(RestrictionError::PercentageOutOfRange {
            percentage,
        })
    }
}

// ============================================================================
// SECTION: Restriction Book
// ============================================================================

/// All configured restriction schedules keyed by tariff.
///
/// # Invariants
/// - Every key equals the tariff of the schedule stored under it; on
///   deserialize the map is rebuilt from the schedules' own tariffs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BookRecord", into = "BookRecord")]
pub struct RestrictionBook {
    /// Schedules keyed by tariff code.
    restrictions: BTreeMap<TariffCode, Restriction>,
}

impl RestrictionBook {
    /// Creates an empty book.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            restrictions: BTreeMap::new(),
        }
    }

    /// Stores a schedule, returning the one it replaced.
    pub fn insert(&mut self, restriction: Restriction) -> Option<Restriction> {
        self.restrictions.insert(restriction.tariff.clone(), restriction)
    }

    /// Returns the schedule for `tariff`, if configured.
    #[must_use]
    pub fn get(&self, tariff: &TariffCode) -> Option<&Restriction> {
        self.restrictions.get(tariff)
    }

    /// Adds or overwrites a period, creating the tariff's schedule on first use.
    ///
    /// # Errors
    ///
    /// Returns [`RestrictionError::PercentageOutOfRange`] for invalid percentages.
    pub fn upsert_period(
        &mut self,
        tariff: &TariffCode,
        effective_from: CalendarDate,
        percentage: f64,
    ) -> Result<Option<f64>, RestrictionError> {
        validate_percentage(percentage)?;
        self.restrictions
            .entry(tariff.clone())
            .or_insert_with(|| Restriction::new(tariff.clone()))
            .upsert_period(effective_from, percentage)
    }

    /// Removes a period from a tariff's schedule.
    ///
    /// # Errors
    ///
    /// Returns [`RestrictionError::UnknownTariff`] when the tariff has no
    /// schedule, otherwise the errors of [`Restriction::remove_period`].
    pub fn remove_period(
        &mut self,
        tariff: &TariffCode,
        effective_from: CalendarDate,
    ) -> Result<RestrictionPeriod, RestrictionError> {
        self.restrictions
            .get_mut(tariff)
            .ok_or_else(|| RestrictionError::UnknownTariff {
                tariff: tariff.clone(),
            })?
            .remove_period(effective_from)
    }

    /// Number of configured tariffs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.restrictions.len()
    }

    /// Returns true when no tariff is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.restrictions.is_empty()
    }

    /// Iterates schedules in tariff order.
    pub fn iter(&self) -> impl Iterator<Item = &Restriction> {
        self.restrictions.values()
    }
}

/// Wire shape of a book: schedules keyed by tariff.
type BookRecord = BTreeMap<TariffCode, Restriction>;

impl From<BookRecord> for RestrictionBook {
    fn from(record: BookRecord) -> Self {
        record.into_values().collect()
    }
}

impl From<RestrictionBook> for BookRecord {
    fn from(book: RestrictionBook) -> Self {
        book.restrictions
    }
}

impl FromIterator<Restriction> for RestrictionBook {
    fn from_iter<I: IntoIterator<Item = Restriction>>(iter: I) -> Self {
        let mut book = Self::new();
        for restriction in iter {
            book.insert(restriction);
        }
        book
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised by restriction editing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RestrictionError {
    /// Percentage not finite or outside `0..=100`.
    #[error("restriction percentage {percentage} is outside 0..=100")]
    PercentageOutOfRange {
        /// Rejected percentage.
        percentage: f64,
    },
    /// Attempt to remove the epoch seed period.
    #[error("the seed period of tariff {tariff} cannot be removed")]
    SeedPeriodProtected {
        /// Tariff whose seed period was targeted.
        tariff: TariffCode,
    },
    /// No period starts on the requested date.
    #[error("tariff {tariff} has no period starting {effective_from}")]
    PeriodNotFound {
        /// Tariff searched.
        tariff: TariffCode,
        /// Requested start date.
        effective_from: CalendarDate,
    },
    /// Tariff has no schedule.
    #[error("no restriction configured for tariff {tariff}")]
    UnknownTariff {
        /// Requested tariff.
        tariff: TariffCode,
    },
}
