// crates/curtail-cli/src/main.rs
// ============================================================================
// Module: Curtail CLI Entry Point
// Description: Command dispatcher for calendar, cap, and violation workflows.
// Purpose: Provide a safe, localized CLI over the curtailment engine.
// Dependencies: clap, curtail-core, curtail-config, serde, thiserror, tracing.
// ============================================================================

//! ## Overview
//! The `curtail` binary converts Persian calendar dates to day indices,
//! reports the effective daily cap of a tariff, and evaluates a subscriber
//! export against the configured restriction schedules. All user-facing
//! strings are routed through the i18n catalog; diagnostics go to stderr
//! through `tracing`, filtered by `CURTAIL_LOG`.
//!
//! Inputs are untrusted: files are read with hard size limits and parsed
//! strictly.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use curtail_cli::i18n::Locale;
use curtail_cli::i18n::set_locale;
use curtail_cli::t;
use curtail_config::CurtailConfig;
use curtail_config::DEFAULT_WINDOW_DAYS;
use curtail_config::MAX_WINDOW_DAYS;
use curtail_config::MIN_WINDOW_DAYS;
use curtail_config::config_toml_example;
use curtail_core::ActionThresholds;
use curtail_core::ActionTier;
use curtail_core::CalendarDate;
use curtail_core::DayIndex;
use curtail_core::EvaluationPolicy;
use curtail_core::RestrictionBook;
use curtail_core::Subscriber;
use curtail_core::SubscriberId;
use curtail_core::TariffCode;
use curtail_core::ViolationReport;
use curtail_core::cap_for_day;
use curtail_core::date_to_index;
use curtail_core::evaluate_all;
use curtail_core::index_to_date;
use serde::Serialize;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum size of a subscriber export file.
const MAX_SUBSCRIBERS_BYTES: usize = 16 * 1024 * 1024;
/// Environment variable for CLI locale selection.
const LANG_ENV: &str = "CURTAIL_LANG";
/// Environment variable holding the log filter directives.
const LOG_ENV: &str = "CURTAIL_LOG";
/// Log filter used when `CURTAIL_LOG` is unset or invalid.
const DEFAULT_LOG_FILTER: &str = "warn";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "curtail", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Preferred output language (overrides `CURTAIL_LANG`).
    #[arg(long, value_enum, value_name = "LANG", global = true)]
    lang: Option<LangArg>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Calendar date and day-index conversion.
    Date {
        /// Selected date subcommand.
        #[command(subcommand)]
        command: DateCommand,
    },
    /// Print the effective cap of a tariff on a date.
    Cap(CapCommand),
    /// Evaluate a subscriber export for violations.
    Evaluate(EvaluateCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Date conversion subcommands.
#[derive(Subcommand, Debug)]
enum DateCommand {
    /// Convert a `YYYY/MM/DD` date to its day index.
    ToIndex(DateToIndexCommand),
    /// Convert a day index back to its date.
    FromIndex(DateFromIndexCommand),
}

/// Arguments for `date to-index`.
#[derive(Args, Debug)]
struct DateToIndexCommand {
    /// Date in `YYYY/MM/DD` (or `YYYY-MM-DD`) form.
    #[arg(value_name = "DATE")]
    date: String,
}

/// Arguments for `date from-index`.
#[derive(Args, Debug)]
struct DateFromIndexCommand {
    /// Day index counted from the epoch.
    #[arg(value_name = "INDEX", allow_negative_numbers = true)]
    index: DayIndex,
}

/// Arguments for `cap`.
#[derive(Args, Debug)]
struct CapCommand {
    /// Config file path (defaults to `CURTAIL_CONFIG` or `curtail.toml`).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Tariff code to resolve.
    #[arg(long, value_name = "TARIFF")]
    tariff: String,
    /// Subscriber baseline consumption.
    #[arg(long, value_name = "BASELINE")]
    baseline: f64,
    /// Date in canonical `YYYY/MM/DD` form.
    #[arg(long, value_name = "DATE")]
    date: String,
}

/// Arguments for `evaluate`.
#[derive(Args, Debug)]
struct EvaluateCommand {
    /// Config file path (defaults to `CURTAIL_CONFIG` or `curtail.toml`).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// JSON array of subscriber records.
    #[arg(long, value_name = "FILE")]
    subscribers: PathBuf,
    /// Overrides the configured evaluation policy.
    #[arg(long, value_enum, value_name = "POLICY")]
    policy: Option<PolicyArg>,
    /// Overrides the scoring window; implies the consecutive policy.
    #[arg(long, value_name = "DAYS")]
    window: Option<usize>,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a config file.
    Validate(ConfigValidateCommand),
    /// Print a complete example config.
    Example,
}

/// Arguments for `config validate`.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Config file path (defaults to `CURTAIL_CONFIG` or `curtail.toml`).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Policy selections accepted on the command line.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum PolicyArg {
    /// Check the most recent valid reading.
    LastReading,
    /// Require every day of the window to exceed its cap.
    Consecutive,
}

/// Report output formats.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Localized human-readable lines.
    Text,
    /// Pretty-printed JSON report.
    Json,
}

/// Supported CLI language selections.
#[derive(ValueEnum, Copy, Clone, Debug)]
enum LangArg {
    /// English.
    En,
    /// Persian.
    Fa,
}

impl From<LangArg> for Locale {
    fn from(value: LangArg) -> Self {
        match value {
            LangArg::En => Self::En,
            LangArg::Fa => Self::Fa,
        }
    }
}

/// JSON payload emitted by `evaluate --format json`.
#[derive(Serialize)]
struct EvaluationOutput<'a> {
    /// Full batch report.
    report: &'a ViolationReport,
    /// Subscribers that should receive an SMS notice.
    sms_recipients: Vec<&'a SubscriberId>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for localized error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a localized message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

/// Errors raised while reading bounded input files.
#[derive(Debug)]
enum ReadLimitError {
    /// Underlying I/O failure.
    Io(std::io::Error),
    /// File exceeds the configured limit.
    TooLarge {
        /// Observed size in bytes.
        size: u64,
        /// Maximum allowed bytes.
        limit: usize,
    },
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let env_lang = std::env::var(LANG_ENV).ok();
    let locale = resolve_locale(cli.lang, env_lang.as_deref())?;
    set_locale(locale);
    init_tracing();
    if locale != Locale::En {
        write_stderr_line(&t!("i18n.disclaimer.machine_translated"))
            .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    }

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Date {
            command,
        } => command_date(&command),
        Commands::Cap(command) => command_cap(&command),
        Commands::Evaluate(command) => command_evaluate(&command),
        Commands::Config {
            command,
        } => command_config(&command),
    }
}

/// Installs the stderr log subscriber.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Prints top-level help.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Date Commands
// ============================================================================

/// Dispatches date subcommands.
fn command_date(command: &DateCommand) -> CliResult<ExitCode> {
    let line = match command {
        DateCommand::ToIndex(command) => date_to_index(&command.date).to_string(),
        DateCommand::FromIndex(command) => index_to_date(command.index),
    };
    write_stdout_line(&line).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Cap Command
// ============================================================================

/// Executes `cap`.
fn command_cap(command: &CapCommand) -> CliResult<ExitCode> {
    if !command.baseline.is_finite() || command.baseline < 0.0 {
        return Err(CliError::new(t!("cap.baseline_invalid", value = command.baseline)));
    }
    let date = CalendarDate::parse(&command.date)
        .map_err(|err| CliError::new(t!("date.invalid", date = command.date, error = err)))?;
    let config = load_config(command.config.as_deref())?;
    let book = restriction_book(&config)?;
    let tariff = TariffCode::new(command.tariff.as_str());
    let restriction = book.get(&tariff);
    if restriction.is_none() {
        tracing::warn!(tariff = %tariff, "tariff has no restriction schedule; cap equals baseline");
    }
    let index = date.to_index();
    let (percentage, cap) = cap_for_day(command.baseline, restriction, index);
    write_stdout_line(&t!(
        "cap.result",
        tariff = tariff,
        date = date,
        index = index,
        percentage = format_amount(percentage),
        cap = format_amount(cap),
    ))
    .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Evaluate Command
// ============================================================================

/// Executes `evaluate`.
fn command_evaluate(command: &EvaluateCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let book = restriction_book(&config)?;
    let policy = resolve_policy(config.policy(), command.policy, command.window)?;
    let subscribers = read_subscribers(&command.subscribers)?;
    tracing::info!(
        subscribers = subscribers.len(),
        tariffs = book.len(),
        policy = %policy_label(policy),
        "evaluating subscriber export"
    );
    let report = evaluate_all(&subscribers, &book, policy, config.thresholds());
    let output = match command.format {
        OutputFormat::Json => render_json(&report)?,
        OutputFormat::Text => render_text(&report),
    };
    write_stdout_line(&output).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Combines the configured policy with command-line overrides.
///
/// `--window` alone switches to the consecutive policy; it is ignored when
/// `--policy last-reading` is given explicitly.
fn resolve_policy(
    configured: EvaluationPolicy,
    policy: Option<PolicyArg>,
    window: Option<usize>,
) -> CliResult<EvaluationPolicy> {
    if let Some(value) = window {
        if !(MIN_WINDOW_DAYS ..= MAX_WINDOW_DAYS).contains(&value) {
            return Err(CliError::new(t!(
                "evaluate.window_invalid",
                min = MIN_WINDOW_DAYS,
                max = MAX_WINDOW_DAYS,
                value = value,
            )));
        }
    }
    let configured_window = match configured {
        EvaluationPolicy::Consecutive {
            window,
        } => Some(window),
        EvaluationPolicy::LastReading => None,
    };
    let resolved = match policy {
        Some(PolicyArg::LastReading) => {
            if window.is_some() {
                tracing::warn!("--window has no effect with the last-reading policy");
            }
            EvaluationPolicy::LastReading
        }
        Some(PolicyArg::Consecutive) => EvaluationPolicy::Consecutive {
            window: window.or(configured_window).unwrap_or(DEFAULT_WINDOW_DAYS),
        },
        None => match window {
            Some(window) => EvaluationPolicy::Consecutive {
                window,
            },
            None => configured,
        },
    };
    Ok(resolved)
}

/// Reads and parses a subscriber export.
fn read_subscribers(path: &Path) -> CliResult<Vec<Subscriber>> {
    let bytes = read_bytes_with_limit(path, MAX_SUBSCRIBERS_BYTES).map_err(|err| match err {
        ReadLimitError::Io(err) => {
            CliError::new(t!("evaluate.read_failed", path = path.display(), error = err))
        }
        ReadLimitError::TooLarge {
            size,
            limit,
        } => CliError::new(t!(
            "evaluate.too_large",
            path = path.display(),
            size = size,
            limit = limit
        )),
    })?;
    serde_json::from_slice(&bytes).map_err(|err| {
        CliError::new(t!("evaluate.parse_failed", path = path.display(), error = err))
    })
}

/// Renders the report as pretty-printed JSON.
fn render_json(report: &ViolationReport) -> CliResult<String> {
    let output = EvaluationOutput {
        report,
        sms_recipients: report.sms_recipients().into_iter().map(|entry| &entry.id).collect(),
    };
    serde_json::to_string_pretty(&output)
        .map_err(|err| CliError::new(t!("evaluate.serialize_failed", error = err)))
}

/// Renders the report as localized text lines.
fn render_text(report: &ViolationReport) -> String {
    let mut lines = Vec::new();
    for entry in report.violations() {
        let Some(violation) = entry.assessment.violation() else {
            continue;
        };
        lines.push(t!(
            "evaluate.text.violation",
            id = entry.id,
            name = entry.name,
            tariff = entry.tariff,
            date = index_to_date(violation.day),
            value = format_amount(violation.calculated_value),
            limit = format_amount(violation.effective_limit),
            amount = format_amount(violation.violation_amount),
            pct = format_amount(violation.violation_pct),
            tier = tier_label(entry.tier),
        ));
    }
    if lines.is_empty() {
        lines.push(t!("evaluate.text.no_violations"));
    }
    let summary = &report.summary;
    lines.push(t!(
        "evaluate.text.summary",
        evaluated = summary.evaluated,
        violating = summary.violating,
        compliant = summary.compliant,
        excluded = summary.excluded,
    ));
    lines.push(t!(
        "evaluate.text.tiers",
        warning = summary.warning_notice,
        pressure = summary.pressure_reduction,
        cutoff = summary.supply_cutoff,
        sms = report.sms_recipients().len(),
    ));
    lines.join("\n")
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: &ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(command) => command_config_validate(command),
        ConfigCommand::Example => {
            write_stdout_line(config_toml_example().trim_end())
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Executes `config validate`.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let book = restriction_book(&config)?;
    write_stdout_line(&t!("config.validate.ok"))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line(&config_summary(config.policy(), config.thresholds(), &book))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Formats the one-line config summary printed after validation.
fn config_summary(
    policy: EvaluationPolicy,
    thresholds: ActionThresholds,
    book: &RestrictionBook,
) -> String {
    let tariffs: Vec<&str> =
        book.iter().map(|restriction| restriction.tariff().as_str()).collect();
    t!(
        "config.validate.summary",
        policy = policy_label(policy),
        warning = format_amount(thresholds.warning_limit),
        pressure = format_amount(thresholds.pressure_limit),
        tariffs = tariffs.join(", "),
    )
}

/// Loads and validates the config file.
fn load_config(path: Option<&Path>) -> CliResult<CurtailConfig> {
    CurtailConfig::load(path).map_err(|err| CliError::new(t!("config.load_failed", error = err)))
}

/// Builds the restriction book from a validated config.
fn restriction_book(config: &CurtailConfig) -> CliResult<RestrictionBook> {
    config.restriction_book().map_err(|err| CliError::new(t!("config.load_failed", error = err)))
}

// ============================================================================
// SECTION: Locale and Labels
// ============================================================================

/// Resolves the CLI locale from flags or environment.
fn resolve_locale(lang: Option<LangArg>, env_lang: Option<&str>) -> CliResult<Locale> {
    if let Some(lang) = lang {
        return Ok(lang.into());
    }
    if let Some(value) = env_lang {
        return Locale::parse(value).ok_or_else(|| {
            CliError::new(t!("i18n.lang.invalid_env", env = LANG_ENV, value = value))
        });
    }
    Ok(Locale::En)
}

/// Localized name of an action tier.
fn tier_label(tier: Option<ActionTier>) -> String {
    match tier {
        Some(ActionTier::WarningNotice) => t!("tier.warning_notice"),
        Some(ActionTier::PressureReduction) => t!("tier.pressure_reduction"),
        Some(ActionTier::SupplyCutoff) => t!("tier.supply_cutoff"),
        None => t!("tier.none"),
    }
}

/// Localized name of an evaluation policy.
fn policy_label(policy: EvaluationPolicy) -> String {
    match policy {
        EvaluationPolicy::LastReading => t!("policy.last_reading"),
        EvaluationPolicy::Consecutive {
            window,
        } => t!("policy.consecutive", window = window),
    }
}

/// Formats a quantity with two decimals.
fn format_amount(value: f64) -> String {
    format!("{value:.2}")
}

// ============================================================================
// SECTION: Input Helpers
// ============================================================================

/// Reads a file from disk while enforcing a hard size limit.
fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let file = File::open(path).map_err(ReadLimitError::Io)?;
    let size = file.metadata().map_err(ReadLimitError::Io)?.len();
    let limit = u64::try_from(max_bytes).map_err(|_| ReadLimitError::TooLarge {
        size,
        limit: max_bytes,
    })?;
    if size > limit {
        return Err(ReadLimitError::TooLarge {
            size,
            limit: max_bytes,
        });
    }

    let mut bytes = Vec::new();
    file.take(limit.saturating_add(1)).read_to_end(&mut bytes).map_err(ReadLimitError::Io)?;
    if bytes.len() > max_bytes {
        return Err(ReadLimitError::TooLarge {
            size: u64::try_from(bytes.len()).unwrap_or(u64::MAX),
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats a localized output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
