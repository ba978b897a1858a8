// crates/curtail-core/src/core/calendar.rs
// ============================================================================
// Module: Curtail Calendar Model
// Description: Single-year calendar arithmetic and day-index conversion.
// Purpose: Single source of truth for month lengths and the epoch offset.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Curtail tracks one Persian calendar year. Months 1-6 have 31 days, months
//! 7-11 have 30 days and month 12 has 29 days; leap years are not modeled.
//! Dates map onto a contiguous [`DayIndex`] where `0` is the epoch
//! `1404/09/28` and the modeled range ends on the last day of month 12.
//!
//! Two API families are exposed:
//! - [`date_to_index`] and [`index_to_date`] accept untrusted text and never
//!   fail; they degrade to [`INVALID_INDEX`] and [`OUT_OF_RANGE`] sentinels.
//! - [`CalendarDate`] is the validated, strongly typed form used by
//!   restriction schedules and config.
//!
//! ## Invariants
//! - `date_to_index(&index_to_date(i)) == i` for every `i` in `0..=LAST_INDEX`.
//! - Negative indices and indices past [`LAST_INDEX`] render as [`OUT_OF_RANGE`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Zero-based day offset from [`EPOCH`]. Negative values precede the epoch.
pub type DayIndex = i64;

/// The only calendar year the model supports.
pub const REFERENCE_YEAR: u16 = 1404;

/// Day index `0`.
pub const EPOCH: CalendarDate = CalendarDate {
    year: REFERENCE_YEAR,
    month: 9,
    day: 28,
};

/// One-based day-of-year of [`EPOCH`].
pub const EPOCH_DAY_OF_YEAR: DayIndex = 274;

/// Last day index inside the modeled year (`1404/12/29`).
pub const LAST_INDEX: DayIndex = 91;

/// Sentinel returned by [`date_to_index`] for unparseable input.
pub const INVALID_INDEX: DayIndex = -1;

/// Sentinel returned by [`index_to_date`] for indices outside the modeled range.
pub const OUT_OF_RANGE: &str = "Out of Range";

/// Number of months in the calendar year.
const MONTHS_PER_YEAR: u8 = 12;

// ============================================================================
// SECTION: Month Rules
// ============================================================================

/// Returns the length of `month`, or `None` when the month does not exist.
#[must_use]
pub const fn month_length(month: u8) -> Option<u8> {
    match month {
        1 ..= 6 => Some(31),
        7 ..= 11 => Some(30),
        12 => Some(29),
        _ => None,
    }
}

/// Sums the lengths of every month before `month`.
fn days_before_month(month: u8) -> DayIndex {
    (1 .. month).filter_map(month_length).map(DayIndex::from).sum()
}

// ============================================================================
// SECTION: Sentinel Conversions
// ============================================================================

/// Converts a `YYYY/MM/DD` (or `YYYY-MM-DD`) string into a day index.
///
/// The year is implied by the single-year model and does not take part in
/// the arithmetic. Returns [`INVALID_INDEX`] when the input is not exactly
/// three all-digit parts or when the month does not exist. Callers must also
/// treat any other negative result as out of range.
#[must_use]
pub fn date_to_index(input: &str) -> DayIndex {
    let Some([_, month, day]) = numeric_parts(input) else {
        return INVALID_INDEX;
    };
    let Ok(month) = u8::try_from(month) else {
        return INVALID_INDEX;
    };
    if month_length(month).is_none() {
        return INVALID_INDEX;
    }
    days_before_month(month) + DayIndex::from(day) - EPOCH_DAY_OF_YEAR
}

/// Converts a day index into its canonical `YYYY/MM/DD` string.
///
/// Returns [`OUT_OF_RANGE`] for negative indices and for indices past the
/// last day of month 12.
#[must_use]
pub fn index_to_date(index: DayIndex) -> String {
    CalendarDate::from_index(index)
        .map_or_else(|| OUT_OF_RANGE.to_string(), |date| date.to_string())
}

/// Splits lenient date text into three numeric parts.
fn numeric_parts(input: &str) -> Option<[u32; 3]> {
    let normalized = input.trim().replace('-', "/");
    let mut parts = [0_u32; 3];
    let mut count = 0_usize;
    for part in normalized.split('/') {
        if part.is_empty() || !part.bytes().all(|byte| byte.is_ascii_digit()) {
            return None;
        }
        let slot = parts.get_mut(count)?;
        *slot = part.parse().ok()?;
        count += 1;
    }
    (count == parts.len()).then_some(parts)
}

// ============================================================================
// SECTION: Typed Dates
// ============================================================================

/// Validated calendar date within the reference year.
///
/// # Invariants
/// - `year == REFERENCE_YEAR`, `month` in `1..=12`, `day` within the month.
/// - Field order makes the derived ordering chronological.
/// - Serializes as the canonical zero-padded `YYYY/MM/DD` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CalendarDate {
    /// Calendar year.
    year: u16,
    /// Month number, one-based.
    month: u8,
    /// Day of month, one-based.
    day: u8,
}

impl CalendarDate {
    /// Builds a date from its components.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError`] when the year is unsupported or the month or
    /// day falls outside the calendar.
    pub fn new(year: u16, month: u8, day: u8) -> Result<Self, CalendarError> {
        if year != REFERENCE_YEAR {
            return Err(CalendarError::UnsupportedYear {
                year,
            });
        }
        let Some(length) = month_length(month) else {
            return Err(CalendarError::MonthOutOfRange {
                month,
            });
        };
        if day == 0 || day > length {
            return Err(CalendarError::DayOutOfRange {
                month,
                day,
            });
        }
        Ok(Self {
            year,
            month,
            day,
        })
    }

    /// Parses canonical `YYYY/MM/DD` text. `-` separators are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::Malformed`] unless the text is four digits,
    /// two digits and two digits, then applies [`CalendarDate::new`] checks.
    pub fn parse(input: &str) -> Result<Self, CalendarError> {
        let normalized = input.trim().replace('-', "/");
        let widths: Vec<usize> = normalized.split('/').map(str::len).collect();
        if widths != [4, 2, 2] || !normalized.bytes().all(|b| b.is_ascii_digit() || b == b'/') {
            return Err(CalendarError::Malformed(input.to_string()));
        }
        let Some([year, month, day]) = numeric_parts(&normalized) else {
            return Err(CalendarError::Malformed(input.to_string()));
        };
        let malformed = || CalendarError::Malformed(input.to_string());
        Self::new(
            u16::try_from(year).map_err(|_| malformed())?,
            u8::try_from(month).map_err(|_| malformed())?,
            u8::try_from(day).map_err(|_| malformed())?,
        )
    }

    /// Returns the date at `index`, or `None` outside `0..=LAST_INDEX`.
    #[must_use]
    pub fn from_index(index: DayIndex) -> Option<Self> {
        if index < 0 {
            return None;
        }
        let mut remaining = index;
        let mut month = EPOCH.month;
        let mut day = EPOCH.day;
        while let Some(length) = month_length(month) {
            let left_in_month = DayIndex::from(length) - DayIndex::from(day) + 1;
            if remaining < left_in_month {
                let day = u8::try_from(DayIndex::from(day) + remaining).ok()?;
                return Some(Self {
                    year: REFERENCE_YEAR,
                    month,
                    day,
                });
            }
            remaining -= left_in_month;
            if month == MONTHS_PER_YEAR {
                break;
            }
            month += 1;
            day = 1;
        }
        None
    }

    /// Returns the calendar year.
    #[must_use]
    pub const fn year(&self) -> u16 {
        self.year
    }

    /// Returns the one-based month.
    #[must_use]
    pub const fn month(&self) -> u8 {
        self.month
    }

    /// Returns the one-based day of month.
    #[must_use]
    pub const fn day(&self) -> u8 {
        self.day
    }

    /// Returns the one-based day of the year.
    #[must_use]
    pub fn day_of_year(&self) -> DayIndex {
        days_before_month(self.month) + DayIndex::from(self.day)
    }

    /// Returns the day index of this date relative to [`EPOCH`].
    #[must_use]
    pub fn to_index(&self) -> DayIndex {
        self.day_of_year() - EPOCH_DAY_OF_YEAR
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}/{:02}/{:02}", self.year, self.month, self.day)
    }
}

impl FromStr for CalendarDate {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CalendarDate {
    type Error = CalendarError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CalendarDate> for String {
    fn from(value: CalendarDate) -> Self {
        value.to_string()
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Validation failures for typed calendar dates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    /// Text did not match `YYYY/MM/DD`.
    #[error("malformed date '{0}': expected YYYY/MM/DD")]
    Malformed(String),
    /// Year other than the reference year.
    #[error("unsupported year {year}: only {REFERENCE_YEAR} is modeled")]
    UnsupportedYear {
        /// Year supplied by the caller.
        year: u16,
    },
    /// Month outside `1..=12`.
    #[error("month {month} is outside 1..=12")]
    MonthOutOfRange {
        /// Month supplied by the caller.
        month: u8,
    },
    /// Day outside the month's length.
    #[error("day {day} does not exist in month {month}")]
    DayOutOfRange {
        /// Month supplied by the caller.
        month: u8,
        /// Day supplied by the caller.
        day: u8,
    },
}
