// crates/curtail-cli/src/lib.rs
// ============================================================================
// Module: Curtail CLI Library
// Description: Shared helpers for the Curtail command-line interface.
// Purpose: Provide reusable components (i18n) for the CLI binary and tests.
// Dependencies: Standard library.
// ============================================================================

//! ## Overview
//! This library houses the localized message catalog used by the `curtail`
//! binary. The entry point (`src/main.rs`) routes every user-facing string
//! through [`t!`](crate::t) so English and Persian output stay in step.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// Internationalization helpers and message catalog.
pub mod i18n;

#[cfg(test)]
mod tests;
