// crates/curtail-core/src/lib.rs
// ============================================================================
// Module: Curtail Core Library
// Description: Public API surface for the Curtail core.
// Purpose: Expose calendar, restriction, and violation evaluation primitives.
// Dependencies: crate::{core, runtime}
// ============================================================================

//! ## Overview
//! Curtail core converts calendar dates into contiguous day indices, resolves
//! the restriction percentage in force for a tariff on a given day, and
//! classifies subscribers by how far their gas consumption exceeds the
//! resulting cap. Every function is pure: callers pass in all records and the
//! core never holds state between calls.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use runtime::ActionThresholds;
pub use runtime::ActionTier;
pub use runtime::Assessment;
pub use runtime::Compliance;
pub use runtime::DayCap;
pub use runtime::EvaluationPolicy;
pub use runtime::ExclusionReason;
pub use runtime::MIN_CONSECUTIVE_WINDOW;
pub use runtime::ReportSummary;
pub use runtime::SubscriberAssessment;
pub use runtime::THRESHOLD_STEP;
pub use runtime::Violation;
pub use runtime::ViolationReport;
pub use runtime::cap_for_day;
pub use runtime::cap_series;
pub use runtime::classify_action;
pub use runtime::compute_cap;
pub use runtime::evaluate;
pub use runtime::evaluate_all;
pub use runtime::evaluate_consecutive;
pub use runtime::evaluate_last_reading;
pub use runtime::resolve_percentage;
