// crates/curtail-core/tests/report.rs
// ============================================================================
// Module: Violation Report Tests
// Description: Batch evaluation ordering, tiering, and summary counts.
// Purpose: Ensure batch output is deterministic and complete.
// Dependencies: curtail-core, serde_json
// ============================================================================
//! ## Overview
//! Runs the parallel batch evaluator over a small fleet and checks ordering,
//! tier assignment, SMS eligibility, and serialized shape.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use curtail_core::ActionThresholds;
use curtail_core::ActionTier;
use curtail_core::DailySeries;
use curtail_core::EvaluationPolicy;
use curtail_core::Restriction;
use curtail_core::RestrictionBook;
use curtail_core::Subscriber;
use curtail_core::SubscriberId;
use curtail_core::TariffCode;
use curtail_core::evaluate_all;

fn subscriber(id: &str, tariff: &str, baseline: f64, values: &[f64]) -> Subscriber {
    Subscriber {
        id: SubscriberId::new(id),
        name: format!("Plant {id}"),
        tariff: TariffCode::new(tariff),
        baseline: Some(baseline),
        readings: DailySeries::from_values(values.iter().copied()),
    }
}

fn book() -> RestrictionBook {
    [Restriction::from_legacy_percentage(TariffCode::new("steel"), 30.0).unwrap()]
        .into_iter()
        .collect()
}

fn fleet() -> Vec<Subscriber> {
    vec![
        // 4000 vs 3500 -> 14.29%
        subscriber("b", "steel", 5000.0, &[4000.0]),
        // 6000 vs 3500 -> 71.43%
        subscriber("a", "steel", 5000.0, &[6000.0]),
        // 3000 vs 3500 -> compliant
        subscriber("c", "steel", 5000.0, &[3000.0]),
        // no data
        subscriber("d", "steel", 5000.0, &[-1.0]),
        // unconfigured tariff: 1000 cap, 1300 -> 30%
        subscriber("e", "glass", 1000.0, &[1300.0]),
    ]
}

#[test]
fn report_orders_violations_by_percentage() {
    let report =
        evaluate_all(&fleet(), &book(), EvaluationPolicy::LastReading, ActionThresholds::default());
    let order: Vec<&str> = report.assessments.iter().map(|entry| entry.id.as_str()).collect();
    assert_eq!(order, vec!["a", "e", "b", "c", "d"]);
}

#[test]
fn report_assigns_tiers_and_counts() {
    let report =
        evaluate_all(&fleet(), &book(), EvaluationPolicy::LastReading, ActionThresholds::default());
    assert_eq!(report.summary.evaluated, 5);
    assert_eq!(report.summary.violating, 3);
    assert_eq!(report.summary.compliant, 1);
    assert_eq!(report.summary.excluded, 1);
    assert_eq!(report.summary.warning_notice, 1);
    assert_eq!(report.summary.pressure_reduction, 1);
    assert_eq!(report.summary.supply_cutoff, 1);

    let cutoff: Vec<&str> =
        report.in_tier(ActionTier::SupplyCutoff).map(|entry| entry.id.as_str()).collect();
    assert_eq!(cutoff, vec!["a"]);
    assert_eq!(report.sms_recipients().len(), 3);
    assert_eq!(report.violations().count(), 3);
}

#[test]
fn consecutive_policy_flows_through_batch() {
    let subscribers = vec![
        subscriber("x", "steel", 5000.0, &[3600.0, 3700.0, 3550.0]),
        subscriber("y", "steel", 5000.0, &[3600.0, 3600.0, 3000.0]),
        subscriber("z", "steel", 5000.0, &[9000.0]),
    ];
    let report = evaluate_all(
        &subscribers,
        &book(),
        EvaluationPolicy::Consecutive {
            window: 3,
        },
        ActionThresholds::default(),
    );
    let violating: Vec<&str> = report.violations().map(|entry| entry.id.as_str()).collect();
    assert_eq!(violating, vec!["x"]);
    assert_eq!(report.summary.excluded, 1);
    assert_eq!(report.assessments[0].tier, Some(ActionTier::WarningNotice));
}

#[test]
fn report_serializes_tagged_outcomes() {
    let report =
        evaluate_all(&fleet(), &book(), EvaluationPolicy::LastReading, ActionThresholds::default());
    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["policy"]["policy"], "last_reading");
    assert_eq!(value["assessments"][0]["assessment"]["status"], "violation");
    assert_eq!(value["assessments"][0]["tier"], "supply_cutoff");
    assert_eq!(value["assessments"][4]["assessment"]["detail"]["reason"], "no_readings");
}

#[test]
fn empty_fleet_produces_empty_report() {
    let report = evaluate_all(
        &[],
        &RestrictionBook::new(),
        EvaluationPolicy::LastReading,
        ActionThresholds::default(),
    );
    assert!(report.assessments.is_empty());
    assert_eq!(report.summary.evaluated, 0);
}
