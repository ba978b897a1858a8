// crates/curtail-config/src/lib.rs
// ============================================================================
// Module: Curtail Config Library
// Description: Canonical config model, validation, and example generation.
// Purpose: Single source of truth for curtail.toml semantics.
// Dependencies: curtail-core, serde, toml
// ============================================================================

//! ## Overview
//! `curtail-config` defines the operator configuration for Curtail: the
//! evaluation policy, the action thresholds, and the restriction schedule of
//! every tariff. Loading is strict and fails closed; a validated config
//! converts directly into the core's [`curtail_core::RestrictionBook`],
//! [`curtail_core::EvaluationPolicy`], and [`curtail_core::ActionThresholds`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use examples::config_toml_example;
