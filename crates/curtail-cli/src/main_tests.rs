// crates/curtail-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Main Helpers Tests
// Description: Unit tests for argument parsing, overrides, and rendering.
// Purpose: Ensure CLI helpers resolve inputs and fail closed on bad files.
// Dependencies: curtail-cli main helpers
// ============================================================================

//! ## Overview
//! Exercises locale and policy resolution, bounded subscriber reads, and the
//! text and JSON report renderers.

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

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;

use clap::Parser;
use curtail_config::CurtailConfig;
use curtail_config::config_toml_example;
use curtail_core::DailySeries;
use curtail_core::EvaluationPolicy;
use curtail_core::Subscriber;
use curtail_core::SubscriberId;
use curtail_core::TariffCode;
use curtail_core::ViolationReport;
use curtail_core::evaluate_all;
use tempfile::NamedTempFile;

use super::Cli;
use super::Commands;
use super::DateCommand;
use super::LangArg;
use super::Locale;
use super::OutputFormat;
use super::PolicyArg;
use super::ReadLimitError;
use super::config_summary;
use super::read_bytes_with_limit;
use super::read_subscribers;
use super::render_json;
use super::render_text;
use super::resolve_locale;
use super::resolve_policy;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

fn subscriber(id: &str, tariff: &str, baseline: f64, values: &[f64]) -> Subscriber {
    Subscriber {
        id: SubscriberId::new(id),
        name: format!("Plant {id}"),
        tariff: TariffCode::new(tariff),
        baseline: Some(baseline),
        readings: DailySeries::from_values(values.iter().copied()),
    }
}

fn sample_report() -> ViolationReport {
    let config = CurtailConfig::from_toml(
        r#"
[[restrictions]]
tariff = "industrial"
percentage = 50.0
"#,
    )
    .unwrap();
    let book = config.restriction_book().unwrap();
    let subscribers = vec![
        subscriber("s-1", "industrial", 1000.0, &[560.0]),
        subscriber("s-2", "industrial", 1000.0, &[900.0]),
        subscriber("s-3", "industrial", 1000.0, &[400.0]),
        Subscriber {
            id: SubscriberId::new("s-4"),
            name: String::new(),
            tariff: TariffCode::new("industrial"),
            baseline: Some(1000.0),
            readings: DailySeries::default(),
        },
    ];
    evaluate_all(&subscribers, &book, EvaluationPolicy::LastReading, config.thresholds())
}

// ============================================================================
// SECTION: Argument Parsing
// ============================================================================

#[test]
fn from_index_accepts_negative_values() {
    let cli = Cli::try_parse_from(["curtail", "date", "from-index", "-3"]).unwrap();
    match cli.command {
        Some(Commands::Date {
            command: DateCommand::FromIndex(command),
        }) => assert_eq!(command.index, -3),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn evaluate_defaults_to_text_output() {
    let cli = Cli::try_parse_from(["curtail", "evaluate", "--subscribers", "subs.json"]).unwrap();
    match cli.command {
        Some(Commands::Evaluate(command)) => {
            assert_eq!(command.format, OutputFormat::Text);
            assert_eq!(command.policy, None);
            assert_eq!(command.window, None);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn evaluate_parses_policy_override() {
    let cli = Cli::try_parse_from([
        "curtail",
        "--lang",
        "fa",
        "evaluate",
        "--subscribers",
        "subs.json",
        "--policy",
        "consecutive",
        "--window",
        "5",
        "--format",
        "json",
    ])
    .unwrap();
    assert!(matches!(cli.lang, Some(LangArg::Fa)));
    match cli.command {
        Some(Commands::Evaluate(command)) => {
            assert_eq!(command.policy, Some(PolicyArg::Consecutive));
            assert_eq!(command.window, Some(5));
            assert_eq!(command.format, OutputFormat::Json);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn cap_requires_tariff() {
    assert!(Cli::try_parse_from(["curtail", "cap", "--baseline", "10", "--date", "1404/10/01"])
        .is_err());
}

// ============================================================================
// SECTION: Locale Resolution
// ============================================================================

#[test]
fn lang_flag_wins_over_environment() {
    assert_eq!(resolve_locale(Some(LangArg::En), Some("fa")).unwrap(), Locale::En);
    assert_eq!(resolve_locale(Some(LangArg::Fa), None).unwrap(), Locale::Fa);
}

#[test]
fn environment_locale_is_parsed() {
    assert_eq!(resolve_locale(None, Some("fa_IR.UTF-8")).unwrap(), Locale::Fa);
    assert_eq!(resolve_locale(None, None).unwrap(), Locale::En);
}

#[test]
fn invalid_environment_locale_is_rejected() {
    let err = resolve_locale(None, Some("klingon")).unwrap_err();
    assert!(err.to_string().contains("CURTAIL_LANG"));
}

// ============================================================================
// SECTION: Policy Overrides
// ============================================================================

#[test]
fn configured_policy_is_kept_without_overrides() {
    let configured = EvaluationPolicy::Consecutive {
        window: 4,
    };
    assert_eq!(resolve_policy(configured, None, None).unwrap(), configured);
}

#[test]
fn window_alone_selects_consecutive() {
    let resolved = resolve_policy(EvaluationPolicy::LastReading, None, Some(6)).unwrap();
    assert_eq!(
        resolved,
        EvaluationPolicy::Consecutive {
            window: 6
        }
    );
}

#[test]
fn consecutive_flag_keeps_configured_window() {
    let configured = EvaluationPolicy::Consecutive {
        window: 7,
    };
    let resolved = resolve_policy(configured, Some(PolicyArg::Consecutive), None).unwrap();
    assert_eq!(resolved, configured);
}

#[test]
fn consecutive_flag_falls_back_to_default_window() {
    let resolved =
        resolve_policy(EvaluationPolicy::LastReading, Some(PolicyArg::Consecutive), None).unwrap();
    assert_eq!(
        resolved,
        EvaluationPolicy::Consecutive {
            window: 3
        }
    );
}

#[test]
fn last_reading_flag_overrides_consecutive_config() {
    let configured = EvaluationPolicy::Consecutive {
        window: 3,
    };
    let resolved = resolve_policy(configured, Some(PolicyArg::LastReading), Some(4)).unwrap();
    assert_eq!(resolved, EvaluationPolicy::LastReading);
}

#[test]
fn window_outside_range_is_rejected() {
    for window in [0, 1, 93] {
        let err = resolve_policy(EvaluationPolicy::LastReading, None, Some(window)).unwrap_err();
        assert!(err.to_string().contains("--window"), "window {window}: {err}");
    }
}

// ============================================================================
// SECTION: Bounded Reads
// ============================================================================

#[test]
fn read_bytes_with_limit_rejects_oversized_files() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&[b'x'; 32]).unwrap();
    let err = read_bytes_with_limit(file.path(), 16).unwrap_err();
    match err {
        ReadLimitError::TooLarge {
            size,
            limit,
        } => {
            assert_eq!(size, 32);
            assert_eq!(limit, 16);
        }
        ReadLimitError::Io(err) => panic!("unexpected io error: {err}"),
    }
}

#[test]
fn read_bytes_with_limit_accepts_exact_size() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&[b'x'; 16]).unwrap();
    let bytes = read_bytes_with_limit(file.path(), 16).unwrap();
    assert_eq!(bytes.len(), 16);
}

#[test]
fn read_subscribers_parses_export() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(
        br#"[
  { "id": "s-1", "name": "Mill", "tariff": "industrial", "baseline": 1000.0,
    "readings": [900.0, null, 950.0] },
  { "id": "s-2", "tariff": "greenhouse" }
]"#,
    )
    .unwrap();
    let subscribers = read_subscribers(file.path()).unwrap();
    assert_eq!(subscribers.len(), 2);
    assert_eq!(subscribers[0].readings.last_valid(), Some((2, 950.0)));
    assert_eq!(subscribers[1].baseline, None);
    assert!(subscribers[1].readings.is_empty());
}

#[test]
fn read_subscribers_reports_parse_errors() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(br#"{ "id": "not-a-list" }"#).unwrap();
    let err = read_subscribers(file.path()).unwrap_err();
    assert!(err.to_string().contains("Failed to parse subscribers file"));
}

#[test]
fn read_subscribers_reports_missing_file() {
    let err = read_subscribers(std::path::Path::new("/nonexistent/subscribers.json")).unwrap_err();
    assert!(err.to_string().contains("Failed to read subscribers file"));
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

#[test]
fn text_report_lists_violations_in_order() {
    let text = render_text(&sample_report());
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4, "{text}");
    assert!(lines[0].starts_with("s-2 (Plant s-2)"), "{text}");
    assert!(lines[0].contains("(80.00%)"), "{text}");
    assert!(lines[0].contains("action=supply cutoff"), "{text}");
    assert!(lines[1].starts_with("s-1 (Plant s-1)"), "{text}");
    assert!(lines[1].contains("action=warning notice"), "{text}");
    assert_eq!(lines[2], "Evaluated 4: 2 violating, 1 compliant, 1 excluded.");
    assert!(lines[3].ends_with("SMS recipients: 2."), "{text}");
}

#[test]
fn text_report_without_violations_says_so() {
    let report = evaluate_all(
        &[subscriber("s-1", "unrestricted", 1000.0, &[200.0])],
        &curtail_core::RestrictionBook::new(),
        EvaluationPolicy::LastReading,
        curtail_core::ActionThresholds::default(),
    );
    let text = render_text(&report);
    assert!(text.starts_with("No violations."), "{text}");
}

#[test]
fn json_report_carries_sms_recipients() {
    let json = render_json(&sample_report()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let recipients = value["sms_recipients"].as_array().unwrap();
    assert_eq!(recipients.len(), 2);
    assert_eq!(recipients[0], "s-2");
    assert_eq!(value["report"]["summary"]["evaluated"], 4);
}

#[test]
fn config_summary_lists_tariffs() {
    let config = CurtailConfig::from_toml(&config_toml_example()).unwrap();
    let book = config.restriction_book().unwrap();
    let summary = config_summary(config.policy(), config.thresholds(), &book);
    assert!(summary.contains("3 consecutive days"), "{summary}");
    assert!(summary.contains("bakery, greenhouse, industrial"), "{summary}");
}
