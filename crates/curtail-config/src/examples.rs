// crates/curtail-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration payload.
// Purpose: Deterministic example for docs and `curtail config example`.
// Dependencies: std
// ============================================================================

//! ## Overview
//! The example exercises every section, including a legacy flat-percentage
//! restriction, and must always pass validation.

/// Returns a canonical example `curtail.toml` configuration.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r#"[evaluation]
policy = "consecutive"
window_days = 3

[thresholds]
warning_limit = 20.0
pressure_limit = 50.0

[[restrictions]]
tariff = "industrial"
periods = [
  { effective_from = "1404/09/28", percentage = 30.0 },
  { effective_from = "1404/10/15", percentage = 50.0 },
]

[[restrictions]]
tariff = "greenhouse"
periods = [
  { effective_from = "1404/09/28", percentage = 10.0 },
]

[[restrictions]]
tariff = "bakery"
percentage = 25.0
"#,
    )
}
