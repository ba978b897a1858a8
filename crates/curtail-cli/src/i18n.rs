// crates/curtail-cli/src/i18n.rs
// ============================================================================
// Module: CLI Internationalization Helpers
// Description: Message catalog and translation utilities for the CLI.
// Purpose: Centralize user-facing strings in English and Persian.
// Dependencies: Standard library collections.
// ============================================================================

//! ## Overview
//! Every line the `curtail` binary prints is looked up in a per-locale
//! catalog through the [`t!`](crate::t) macro. Operators in the field read
//! Persian; audit tooling and logs stay in English.
//!
//! ## Invariants
//! - The catalogs are initialized once and read-only thereafter.
//! - Missing keys fall back to English and then to the key itself.
//! - Both catalogs carry the same key set.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Supported CLI locales.
///
/// # Invariants
/// - [`Locale::En`] is the default fallback locale.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Locale {
    /// English (default).
    En,
    /// Persian.
    Fa,
}

impl Locale {
    /// Returns the canonical locale label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Fa => "fa",
        }
    }

    /// Attempts to parse a locale value (case-insensitive, tolerant of region tags).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        let normalized = value.to_ascii_lowercase();
        let lang = normalized.split(['-', '_', '.']).next().unwrap_or("");
        match lang {
            "en" => Some(Self::En),
            "fa" | "per" | "fas" => Some(Self::Fa),
            _ => None,
        }
    }
}

/// Ordered list of supported CLI locales.
pub const SUPPORTED_LOCALES: &[Locale] = &[Locale::En, Locale::Fa];

/// A formatted message argument captured by the [`macro@crate::t`] macro.
///
/// # Invariants
/// - `key` matches a placeholder name without braces (for example, `tariff`).
#[derive(Clone)]
pub struct MessageArg {
    /// The placeholder name used in message templates.
    pub key: &'static str,
    /// The formatted value substituted for this placeholder.
    pub value: String,
}

impl MessageArg {
    /// Constructs a new [`MessageArg`] from a key and displayable value.
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Locale Selection
// ============================================================================

/// Global locale selection for CLI output.
static CURRENT_LOCALE: OnceLock<Locale> = OnceLock::new();

/// Sets the CLI locale. Only the first call wins.
pub fn set_locale(locale: Locale) {
    let _ = CURRENT_LOCALE.set(locale);
}

/// Returns the current CLI locale (defaults to English).
#[must_use]
pub fn current_locale() -> Locale {
    CURRENT_LOCALE.get().copied().unwrap_or(Locale::En)
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// English catalog entries.
const CATALOG_EN: &[(&str, &str)] = &[
    ("main.version", "curtail {version}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "output"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
    ("config.load_failed", "Failed to load config: {error}"),
    ("config.validate.ok", "Config is valid."),
    (
        "config.validate.summary",
        "Policy: {policy}; thresholds: warning up to {warning}%, pressure reduction up to \
         {pressure}%; tariffs: {tariffs}",
    ),
    ("date.invalid", "Invalid date {date}: {error}"),
    ("cap.baseline_invalid", "Baseline must be a finite, non-negative number (got {value})."),
    (
        "cap.result",
        "Tariff {tariff} on {date} (day {index}): restriction {percentage}%, cap {cap}",
    ),
    ("evaluate.window_invalid", "--window must be between {min} and {max} (got {value})."),
    ("evaluate.read_failed", "Failed to read subscribers file {path}: {error}"),
    (
        "evaluate.too_large",
        "Subscribers file {path} is {size} bytes, above the {limit} byte limit.",
    ),
    ("evaluate.parse_failed", "Failed to parse subscribers file {path}: {error}"),
    ("evaluate.serialize_failed", "Failed to serialize report: {error}"),
    (
        "evaluate.text.violation",
        "{id} ({name}) tariff={tariff} day={date} value={value} limit={limit} excess={amount} \
         ({pct}%) action={tier}",
    ),
    ("evaluate.text.no_violations", "No violations."),
    (
        "evaluate.text.summary",
        "Evaluated {evaluated}: {violating} violating, {compliant} compliant, {excluded} excluded.",
    ),
    (
        "evaluate.text.tiers",
        "Warning notices: {warning}; pressure reductions: {pressure}; supply cutoffs: {cutoff}; \
         SMS recipients: {sms}.",
    ),
    ("policy.last_reading", "last reading"),
    ("policy.consecutive", "{window} consecutive days"),
    ("tier.warning_notice", "warning notice"),
    ("tier.pressure_reduction", "pressure reduction"),
    ("tier.supply_cutoff", "supply cutoff"),
    ("tier.none", "none"),
    ("i18n.lang.invalid_env", "Invalid value for {env}: {value}. Expected 'en' or 'fa'."),
    (
        "i18n.disclaimer.machine_translated",
        "Note: non-English output may be machine translated and imprecise.",
    ),
];

/// Persian catalog entries.
const CATALOG_FA: &[(&str, &str)] = &[
    ("main.version", "curtail نسخه {version}"),
    ("output.stream.stdout", "خروجی استاندارد"),
    ("output.stream.stderr", "خروجی خطا"),
    ("output.stream.unknown", "خروجی"),
    ("output.write_failed", "نوشتن در {stream} ناموفق بود: {error}"),
    ("config.load_failed", "بارگذاری پیکربندی ناموفق بود: {error}"),
    ("config.validate.ok", "پیکربندی معتبر است."),
    (
        "config.validate.summary",
        "سیاست: {policy}؛ آستانه‌ها: اخطار تا {warning}٪، کاهش فشار تا {pressure}٪؛ تعرفه‌ها: \
         {tariffs}",
    ),
    ("date.invalid", "تاریخ نامعتبر {date}: {error}"),
    ("cap.baseline_invalid", "مصرف پایه باید عددی متناهی و نامنفی باشد (مقدار: {value})."),
    (
        "cap.result",
        "تعرفه {tariff} در {date} (روز {index}): محدودیت {percentage}٪، سقف مجاز {cap}",
    ),
    ("evaluate.window_invalid", "--window باید بین {min} و {max} باشد (مقدار: {value})."),
    ("evaluate.read_failed", "خواندن فایل مشترکین {path} ناموفق بود: {error}"),
    (
        "evaluate.too_large",
        "حجم فایل مشترکین {path} برابر {size} بایت و بیش از سقف {limit} بایت است.",
    ),
    ("evaluate.parse_failed", "تجزیه فایل مشترکین {path} ناموفق بود: {error}"),
    ("evaluate.serialize_failed", "تولید گزارش ناموفق بود: {error}"),
    (
        "evaluate.text.violation",
        "{id} ({name}) تعرفه={tariff} روز={date} مصرف={value} سقف={limit} مازاد={amount} \
         ({pct}٪) اقدام={tier}",
    ),
    ("evaluate.text.no_violations", "تخلفی یافت نشد."),
    (
        "evaluate.text.summary",
        "{evaluated} مشترک بررسی شد: {violating} متخلف، {compliant} مطابق، {excluded} مستثنا.",
    ),
    (
        "evaluate.text.tiers",
        "اخطار: {warning}؛ کاهش فشار: {pressure}؛ قطع گاز: {cutoff}؛ گیرندگان پیامک: {sms}.",
    ),
    ("policy.last_reading", "آخرین قرائت"),
    ("policy.consecutive", "{window} روز متوالی"),
    ("tier.warning_notice", "اخطار"),
    ("tier.pressure_reduction", "کاهش فشار"),
    ("tier.supply_cutoff", "قطع گاز"),
    ("tier.none", "بدون اقدام"),
    ("i18n.lang.invalid_env", "مقدار نامعتبر برای {env}: {value}. مقادیر مجاز 'en' یا 'fa' است."),
    (
        "i18n.disclaimer.machine_translated",
        "توجه: خروجی غیرانگلیسی ممکن است ترجمه ماشینی و نادقیق باشد.",
    ),
];

/// Returns the message catalog for the requested locale.
pub(crate) fn catalog_for(locale: Locale) -> &'static HashMap<&'static str, &'static str> {
    static CATALOG_EN_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    static CATALOG_FA_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    match locale {
        Locale::En => CATALOG_EN_MAP.get_or_init(|| CATALOG_EN.iter().copied().collect()),
        Locale::Fa => CATALOG_FA_MAP.get_or_init(|| CATALOG_FA.iter().copied().collect()),
    }
}

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Translates `key` using the selected locale while substituting `args`.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    translate_in(current_locale(), key, args)
}

/// Translates `key` in an explicit locale.
#[must_use]
pub fn translate_in(locale: Locale, key: &str, args: Vec<MessageArg>) -> String {
    let template = catalog_for(locale)
        .get(key)
        .copied()
        .or_else(|| catalog_for(Locale::En).get(key).copied())
        .unwrap_or(key);
    let mut result = template.to_string();
    for arg in args {
        let placeholder = format!("{{{}}}", arg.key);
        result = result.replace(&placeholder, &arg.value);
    }
    result
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Formats a localized message from a key and named arguments.
///
/// # Arguments
///
/// - `$key` must match a catalog entry.
/// - Named arguments are substituted into `{placeholder}` positions.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::i18n::translate($key, args)
    }};
}
