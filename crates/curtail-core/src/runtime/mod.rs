// crates/curtail-core/src/runtime/mod.rs
// ============================================================================
// Module: Curtail Runtime
// Description: Restriction resolution, violation evaluation, and reporting.
// Purpose: Compose calendar and restriction types into compliance outcomes.
// Dependencies: crate::core, rayon, serde, tracing
// ============================================================================

//! ## Overview
//! The runtime resolves the cap for any (tariff, day) pair, evaluates each
//! subscriber under the selected [`EvaluationPolicy`], and maps violation
//! percentages onto [`ActionTier`]s. All entry points are pure functions over
//! caller-owned records.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod evaluator;
pub mod report;
pub mod resolver;
pub mod tiers;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use evaluator::Assessment;
pub use evaluator::Compliance;
pub use evaluator::DayCap;
pub use evaluator::EvaluationPolicy;
pub use evaluator::ExclusionReason;
pub use evaluator::MIN_CONSECUTIVE_WINDOW;
pub use evaluator::Violation;
pub use evaluator::evaluate;
pub use evaluator::evaluate_consecutive;
pub use evaluator::evaluate_last_reading;
pub use report::ReportSummary;
pub use report::SubscriberAssessment;
pub use report::ViolationReport;
pub use report::evaluate_all;
pub use resolver::cap_for_day;
pub use resolver::cap_series;
pub use resolver::compute_cap;
pub use resolver::resolve_percentage;
pub use tiers::ActionThresholds;
pub use tiers::ActionTier;
pub use tiers::THRESHOLD_STEP;
pub use tiers::classify_action;
