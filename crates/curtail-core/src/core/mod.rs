// crates/curtail-core/src/core/mod.rs
// ============================================================================
// Module: Curtail Core Types
// Description: Canonical calendar, identifier, restriction, and series types.
// Purpose: Provide stable, serializable records shared by every Curtail layer.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Core types describe the single-year calendar, tariff restriction schedules,
//! and subscriber consumption records. They are the canonical input shapes for
//! the runtime evaluator and for any config or import layer built on top.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod calendar;
pub mod identifiers;
pub mod restriction;
pub mod series;
pub mod subscriber;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use calendar::CalendarDate;
pub use calendar::CalendarError;
pub use calendar::DayIndex;
pub use calendar::EPOCH;
pub use calendar::EPOCH_DAY_OF_YEAR;
pub use calendar::INVALID_INDEX;
pub use calendar::LAST_INDEX;
pub use calendar::OUT_OF_RANGE;
pub use calendar::REFERENCE_YEAR;
pub use calendar::date_to_index;
pub use calendar::index_to_date;
pub use calendar::month_length;
pub use identifiers::SubscriberId;
pub use identifiers::TariffCode;
pub use restriction::MAX_PERCENTAGE;
pub use restriction::Restriction;
pub use restriction::RestrictionBook;
pub use restriction::RestrictionError;
pub use restriction::RestrictionPeriod;
pub use restriction::validate_percentage;
pub use series::DailySeries;
pub use series::Reading;
pub use subscriber::Subscriber;
