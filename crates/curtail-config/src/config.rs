// crates/curtail-config/src/config.rs
// ============================================================================
// Module: Curtail Configuration
// Description: Configuration loading and validation for Curtail.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: curtail-core, serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Restriction dates must be canonical `YYYY/MM/DD` strings inside the
//! modeled year, percentages must lie in `0..=100`, and thresholds must be
//! ordered. Legacy restrictions that carry a single flat `percentage` are
//! migrated into a seed period on the epoch date.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use curtail_core::ActionThresholds;
use curtail_core::CalendarDate;
use curtail_core::EvaluationPolicy;
use curtail_core::MIN_CONSECUTIVE_WINDOW;
use curtail_core::Restriction;
use curtail_core::RestrictionBook;
use curtail_core::RestrictionPeriod;
use curtail_core::TariffCode;
use curtail_core::validate_percentage;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "curtail.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "CURTAIL_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Smallest consecutive-day scoring window.
pub const MIN_WINDOW_DAYS: usize = MIN_CONSECUTIVE_WINDOW;
/// Largest consecutive-day scoring window (every day of the modeled range).
pub const MAX_WINDOW_DAYS: usize = 92;
/// Default consecutive-day scoring window.
pub const DEFAULT_WINDOW_DAYS: usize = 3;
/// Default warning threshold in percent.
const DEFAULT_WARNING_LIMIT: f64 = 20.0;
/// Default pressure-reduction threshold in percent.
const DEFAULT_PRESSURE_LIMIT: f64 = 50.0;
/// Maximum number of configured tariffs.
pub(crate) const MAX_RESTRICTIONS: usize = 1024;
/// Maximum number of periods per tariff.
pub(crate) const MAX_PERIODS_PER_TARIFF: usize = 128;
/// Maximum length of a tariff code.
pub(crate) const MAX_TARIFF_LENGTH: usize = 64;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Curtail operator configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CurtailConfig {
    /// Violation policy selection.
    #[serde(default)]
    pub evaluation: EvaluationConfig,
    /// Action tier thresholds.
    #[serde(default)]
    pub thresholds: ThresholdsConfig,
    /// Restriction schedule per tariff.
    #[serde(default)]
    pub restrictions: Vec<RestrictionConfig>,
}

impl CurtailConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.evaluation.validate()?;
        self.thresholds.validate()?;
        if self.restrictions.len() > MAX_RESTRICTIONS {
            return Err(ConfigError::Invalid(format!(
                "restrictions exceeds max entries ({MAX_RESTRICTIONS})"
            )));
        }
        let mut seen = BTreeSet::new();
        for restriction in &self.restrictions {
            restriction.validate()?;
            if !seen.insert(restriction.tariff.trim()) {
                return Err(ConfigError::Invalid(format!(
                    "restrictions: duplicate tariff {}",
                    restriction.tariff.trim()
                )));
            }
        }
        Ok(())
    }

    /// Returns the configured evaluation policy.
    #[must_use]
    pub const fn policy(&self) -> EvaluationPolicy {
        self.evaluation.policy()
    }

    /// Returns the configured action thresholds.
    #[must_use]
    pub const fn thresholds(&self) -> ActionThresholds {
        ActionThresholds::new(self.thresholds.warning_limit, self.thresholds.pressure_limit)
    }

    /// Builds the restriction book for every configured tariff.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a restriction entry is invalid.
    pub fn restriction_book(&self) -> Result<RestrictionBook, ConfigError> {
        self.restrictions.iter().map(RestrictionConfig::to_restriction).collect()
    }
}

// ============================================================================
// SECTION: Evaluation
// ============================================================================

/// Violation policy selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    /// Instantaneous check on the latest valid reading.
    #[default]
    LastReading,
    /// Every reading in the scoring window must exceed its cap.
    Consecutive,
}

/// Evaluation section.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EvaluationConfig {
    /// Selected policy.
    #[serde(default)]
    pub policy: PolicyKind,
    /// Scoring window for the consecutive policy.
    #[serde(default = "default_window_days")]
    pub window_days: usize,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            policy: PolicyKind::default(),
            window_days: default_window_days(),
        }
    }
}

impl EvaluationConfig {
    /// Validates the scoring window.
    fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_WINDOW_DAYS ..= MAX_WINDOW_DAYS).contains(&self.window_days) {
            return Err(ConfigError::Invalid(format!(
                "evaluation.window_days must be between {MIN_WINDOW_DAYS} and {MAX_WINDOW_DAYS}"
            )));
        }
        Ok(())
    }

    /// Converts the section into the core policy value.
    #[must_use]
    pub const fn policy(&self) -> EvaluationPolicy {
        match self.policy {
            PolicyKind::LastReading => EvaluationPolicy::LastReading,
            PolicyKind::Consecutive => EvaluationPolicy::Consecutive {
                window: self.window_days,
            },
        }
    }
}

/// Returns the default scoring window.
const fn default_window_days() -> usize {
    DEFAULT_WINDOW_DAYS
}

// ============================================================================
// SECTION: Thresholds
// ============================================================================

/// Threshold section, both limits in percent.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ThresholdsConfig {
    /// Upper bound (inclusive) of the warning tier.
    #[serde(default = "default_warning_limit")]
    pub warning_limit: f64,
    /// Upper bound (inclusive) of the pressure-reduction tier.
    #[serde(default = "default_pressure_limit")]
    pub pressure_limit: f64,
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        Self {
            warning_limit: default_warning_limit(),
            pressure_limit: default_pressure_limit(),
        }
    }
}

impl ThresholdsConfig {
    /// Validates threshold ordering and range.
    fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in
            [("warning_limit", self.warning_limit), ("pressure_limit", self.pressure_limit)]
        {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "thresholds.{field} must be a finite, non-negative percentage"
                )));
            }
        }
        if self.warning_limit >= self.pressure_limit {
            return Err(ConfigError::Invalid(
                "thresholds.warning_limit must be below thresholds.pressure_limit".to_string(),
            ));
        }
        Ok(())
    }
}

/// Returns the default warning threshold.
const fn default_warning_limit() -> f64 {
    DEFAULT_WARNING_LIMIT
}

/// Returns the default pressure threshold.
const fn default_pressure_limit() -> f64 {
    DEFAULT_PRESSURE_LIMIT
}

// ============================================================================
// SECTION: Restrictions
// ============================================================================

/// Restriction entry for one tariff.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RestrictionConfig {
    /// Tariff code.
    pub tariff: String,
    /// Effective-dated periods.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub periods: Option<Vec<PeriodConfig>>,
    /// Legacy flat percentage; mutually exclusive with `periods`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
}

/// One effective-dated period.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PeriodConfig {
    /// Canonical `YYYY/MM/DD` start date.
    pub effective_from: String,
    /// Restriction percentage, `0..=100`.
    pub percentage: f64,
}

impl RestrictionConfig {
    /// Validates the tariff code, period shape, dates, and percentages.
    fn validate(&self) -> Result<(), ConfigError> {
        let tariff = self.tariff.trim();
        if tariff.is_empty() {
            return Err(ConfigError::Invalid("restrictions.tariff must be non-empty".to_string()));
        }
        if tariff.len() > MAX_TARIFF_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "restrictions.tariff {tariff} exceeds {MAX_TARIFF_LENGTH} bytes"
            )));
        }
        match (&self.periods, self.percentage) {
            (Some(_), Some(_)) => Err(ConfigError::Invalid(format!(
                "restrictions.{tariff}: set either periods or percentage, not both"
            ))),
            (None, None) => Err(ConfigError::Invalid(format!(
                "restrictions.{tariff}: periods or percentage is required"
            ))),
            (None, Some(percentage)) => check_percentage(tariff, percentage),
            (Some(periods), None) => {
                if periods.len() > MAX_PERIODS_PER_TARIFF {
                    return Err(ConfigError::Invalid(format!(
                        "restrictions.{tariff}.periods exceeds max entries \
                         ({MAX_PERIODS_PER_TARIFF})"
                    )));
                }
                let mut dates = BTreeSet::new();
                for period in periods {
                    let date = parse_date(tariff, &period.effective_from)?;
                    check_percentage(tariff, period.percentage)?;
                    if !dates.insert(date) {
                        return Err(ConfigError::Invalid(format!(
                            "restrictions.{tariff}.periods: duplicate effective_from {date}"
                        )));
                    }
                }
                Ok(())
            }
        }
    }

    /// Converts the entry into a core restriction schedule.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for invalid dates or percentages.
    pub fn to_restriction(&self) -> Result<Restriction, ConfigError> {
        let tariff_text = self.tariff.trim();
        let tariff = TariffCode::new(tariff_text);
        if let Some(percentage) = self.percentage {
            return Restriction::from_legacy_percentage(tariff, percentage)
                .map_err(|err| ConfigError::Invalid(format!("restrictions.{tariff_text}: {err}")));
        }
        let mut periods = Vec::new();
        for period in self.periods.iter().flatten() {
            check_percentage(tariff_text, period.percentage)?;
            periods.push(RestrictionPeriod {
                effective_from: parse_date(tariff_text, &period.effective_from)?,
                percentage: period.percentage,
            });
        }
        Ok(Restriction::from_periods(tariff, periods))
    }
}

/// Parses a canonical period date.
fn parse_date(tariff: &str, value: &str) -> Result<CalendarDate, ConfigError> {
    CalendarDate::parse(value).map_err(|err| {
        ConfigError::Invalid(format!("restrictions.{tariff}.effective_from: {err}"))
    })
}

/// Checks a restriction percentage.
fn check_percentage(tariff: &str, percentage: f64) -> Result<(), ConfigError> {
    validate_percentage(percentage)
        .map_err(|err| ConfigError::Invalid(format!("restrictions.{tariff}: {err}")))
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}
