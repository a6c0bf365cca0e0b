//! Presentation helpers for KPI values and statuses.
//!
//! Percent inputs are always fractions: `format_percentage(0.25)` renders
//! `25.0%`. Rounding is midpoint-away-from-zero at the requested precision.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::KpiError;
use crate::KpiResult;
use crate::kpi::{KpiCalculationResult, KpiStatus, KpiUnit, KpiValue};
use crate::types::{Currency, Money, Rate};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Separator and symbol-placement conventions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Locale {
    #[default]
    EnUs,
    EnGb,
    DeDe,
    FrFr,
}

impl Locale {
    fn thousands_separator(self) -> char {
        match self {
            Self::EnUs | Self::EnGb => ',',
            Self::DeDe => '.',
            Self::FrFr => '\u{202f}',
        }
    }

    fn decimal_separator(self) -> char {
        match self {
            Self::EnUs | Self::EnGb => '.',
            Self::DeDe | Self::FrFr => ',',
        }
    }

    fn symbol_after_amount(self) -> bool {
        matches!(self, Self::DeDe | Self::FrFr)
    }
}

impl FromStr for Locale {
    type Err = KpiError;

    /// Accepts `en-us`, `en_GB`, `de-DE` and similar spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "en-us" => Ok(Self::EnUs),
            "en-gb" => Ok(Self::EnGb),
            "de-de" => Ok(Self::DeDe),
            "fr-fr" => Ok(Self::FrFr),
            _ => Err(KpiError::InvalidInput {
                field: "locale".into(),
                reason: format!("'{s}' is not one of en-us, en-gb, de-de, fr-fr"),
            }),
        }
    }
}

/// How negative amounts are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegativeStyle {
    /// `-$1,234.56`
    #[default]
    Minus,
    /// `($1,234.56)`
    Parentheses,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    pub currency: Currency,
    pub locale: Locale,
    pub negative_style: NegativeStyle,
    /// Overrides the currency's minor units when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_decimals: Option<u32>,
    pub percent_decimals: u32,
    pub multiple_decimals: u32,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            currency: Currency::USD,
            locale: Locale::EnUs,
            negative_style: NegativeStyle::Minus,
            currency_decimals: None,
            percent_decimals: 1,
            multiple_decimals: 2,
        }
    }
}

/// Upper bound on any configured precision.
pub const MAX_DECIMALS: u32 = 10;

// ---------------------------------------------------------------------------
// Number formatting
// ---------------------------------------------------------------------------

/// Format a monetary amount with grouping, currency symbol and sign style.
pub fn format_currency(amount: Money, options: &FormatOptions) -> String {
    let decimals = options
        .currency_decimals
        .unwrap_or_else(|| options.currency.minor_units());
    let (negative, body) = grouped(amount, decimals, options.locale);
    let symbol = options.currency.symbol();
    let unsigned = if options.locale.symbol_after_amount() {
        format!("{body} {}", symbol.trim_end())
    } else {
        format!("{symbol}{body}")
    };
    apply_sign(negative, unsigned, options.negative_style)
}

/// Format a fraction as a percentage (0.0625 → `6.3%` at one decimal).
///
/// Renders `N/A` when the rate is too large to scale to a percentage.
pub fn format_percentage(rate: Rate, options: &FormatOptions) -> String {
    try_format_percentage(rate, options).unwrap_or_else(|_| KpiValue::SENTINEL.to_string())
}

/// Like [`format_percentage`], but reports an out-of-range rate as an error.
pub fn try_format_percentage(rate: Rate, options: &FormatOptions) -> KpiResult<String> {
    let percent = rate
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or_else(|| KpiError::InvalidInput {
            field: "rate".into(),
            reason: format!("{rate} is too large to express as a percentage"),
        })?;
    let (negative, body) = grouped(percent, options.percent_decimals, options.locale);
    let sign = if negative { "-" } else { "" };
    Ok(format!("{sign}{body}%"))
}

/// Format a multiple (2.5 → `2.50x`).
pub fn format_multiple(value: Decimal, options: &FormatOptions) -> String {
    let (negative, body) = grouped(value, options.multiple_decimals, options.locale);
    let sign = if negative { "-" } else { "" };
    format!("{sign}{body}x")
}

pub fn format_days(value: Decimal, options: &FormatOptions) -> String {
    let (negative, body) = grouped(value, 0, options.locale);
    let sign = if negative { "-" } else { "" };
    format!("{sign}{body} days")
}

pub fn format_months(value: Decimal, options: &FormatOptions) -> String {
    let (negative, body) = grouped(value, 1, options.locale);
    let sign = if negative { "-" } else { "" };
    format!("{sign}{body} months")
}

/// Format a number according to a KPI unit.
pub fn format_for_unit(value: Decimal, unit: KpiUnit, options: &FormatOptions) -> String {
    match unit {
        KpiUnit::Multiple => format_multiple(value, options),
        KpiUnit::Percent => format_percentage(value, options),
        KpiUnit::Days => format_days(value, options),
        KpiUnit::Months => format_months(value, options),
    }
}

/// Display string for a KPI result: its number in its unit, or its text.
pub fn format_kpi_value(result: &KpiCalculationResult, options: &FormatOptions) -> String {
    match &result.value {
        KpiValue::Number(n) => format_for_unit(*n, result.unit, options),
        KpiValue::Text(t) => t.clone(),
    }
}

// ---------------------------------------------------------------------------
// Status presentation
// ---------------------------------------------------------------------------

/// Color token for a status badge.
pub fn status_color(status: KpiStatus) -> &'static str {
    match status {
        KpiStatus::Good => "green",
        KpiStatus::Warning => "yellow",
        KpiStatus::Critical => "red",
        KpiStatus::Unavailable => "gray",
    }
}

/// CSS classes for a status card background.
pub fn status_background(status: KpiStatus) -> &'static str {
    match status {
        KpiStatus::Good => "bg-green-50 border-green-200 text-green-800",
        KpiStatus::Warning => "bg-yellow-50 border-yellow-200 text-yellow-800",
        KpiStatus::Critical => "bg-red-50 border-red-200 text-red-800",
        KpiStatus::Unavailable => "bg-gray-50 border-gray-200 text-gray-500",
    }
}

pub fn status_label(status: KpiStatus) -> &'static str {
    match status {
        KpiStatus::Good => "Good",
        KpiStatus::Warning => "Warning",
        KpiStatus::Critical => "Critical",
        KpiStatus::Unavailable => "N/A",
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Round, then render the absolute value with locale separators.
/// Returns whether the rounded value is negative.
fn grouped(value: Decimal, decimals: u32, locale: Locale) -> (bool, String) {
    let decimals = decimals.min(MAX_DECIMALS);
    let rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded < Decimal::ZERO;
    let plain = format!("{:.*}", decimals as usize, rounded.abs());

    let (int_part, frac_part) = match plain.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (plain.as_str(), None),
    };

    let mut out = group_digits(int_part, locale.thousands_separator());
    if let Some(frac) = frac_part {
        out.push(locale.decimal_separator());
        out.push_str(frac);
    }
    (negative, out)
}

fn group_digits(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}

fn apply_sign(negative: bool, unsigned: String, style: NegativeStyle) -> String {
    match (negative, style) {
        (false, _) => unsigned,
        (true, NegativeStyle::Minus) => format!("-{unsigned}"),
        (true, NegativeStyle::Parentheses) => format!("({unsigned})"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[test]
    fn test_format_currency_default() {
        let opts = FormatOptions::default();
        assert_eq!(format_currency(dec!(1234567.89), &opts), "$1,234,567.89");
        assert_eq!(format_currency(dec!(0), &opts), "$0.00");
        assert_eq!(format_currency(dec!(999.995), &opts), "$1,000.00");
        assert_eq!(format_currency(dec!(12), &opts), "$12.00");
    }

    #[test]
    fn test_format_currency_round_trip() {
        let opts = FormatOptions::default();
        let formatted = format_currency(dec!(1234567.89), &opts);
        let stripped: String = formatted.chars().filter(|c| *c != '$' && *c != ',').collect();
        assert_eq!(Decimal::from_str(&stripped).unwrap(), dec!(1234567.89));
    }

    #[test]
    fn test_format_currency_negative_styles() {
        let mut opts = FormatOptions::default();
        assert_eq!(format_currency(dec!(-1500), &opts), "-$1,500.00");
        opts.negative_style = NegativeStyle::Parentheses;
        assert_eq!(format_currency(dec!(-1500), &opts), "($1,500.00)");
        // Rounds to zero, so no sign.
        assert_eq!(format_currency(dec!(-0.001), &opts), "$0.00");
    }

    #[test]
    fn test_format_currency_locales() {
        let opts = FormatOptions {
            currency: Currency::EUR,
            locale: Locale::DeDe,
            ..Default::default()
        };
        assert_eq!(format_currency(dec!(1234567.891), &opts), "1.234.567,89 €");

        let gbp = FormatOptions {
            currency: Currency::GBP,
            locale: Locale::EnGb,
            ..Default::default()
        };
        assert_eq!(format_currency(dec!(-42.5), &gbp), "-£42.50");

        let jpy = FormatOptions {
            currency: Currency::JPY,
            ..Default::default()
        };
        assert_eq!(format_currency(dec!(1234.5), &jpy), "¥1,235");
    }

    #[test]
    fn test_format_percentage_is_fraction_based() {
        let opts = FormatOptions::default();
        assert_eq!(format_percentage(dec!(0.0625), &opts), "6.3%");
        assert_eq!(format_percentage(dec!(0.25), &opts), "25.0%");
        assert_eq!(format_percentage(dec!(-0.1), &opts), "-10.0%");
        let precise = FormatOptions {
            percent_decimals: 2,
            ..Default::default()
        };
        assert_eq!(format_percentage(dec!(0.0625), &precise), "6.25%");
    }

    #[test]
    fn test_format_multiple_days_months() {
        let opts = FormatOptions::default();
        assert_eq!(format_multiple(dec!(2.5), &opts), "2.50x");
        assert_eq!(format_days(dec!(43.8), &opts), "44 days");
        assert_eq!(format_months(dec!(7.25), &opts), "7.3 months");
    }

    #[test]
    fn test_status_mappings_are_distinct() {
        let all = [
            KpiStatus::Good,
            KpiStatus::Warning,
            KpiStatus::Critical,
            KpiStatus::Unavailable,
        ];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(status_color(*a), status_color(*b));
                assert_ne!(status_background(*a), status_background(*b));
                assert_ne!(status_label(*a), status_label(*b));
            }
        }
        assert_eq!(status_color(KpiStatus::Critical), "red");
        assert_eq!(status_label(KpiStatus::Unavailable), "N/A");
    }

    #[test]
    fn test_group_digits() {
        assert_eq!(group_digits("1", ','), "1");
        assert_eq!(group_digits("123", ','), "123");
        assert_eq!(group_digits("1234", ','), "1,234");
        assert_eq!(group_digits("123456", ','), "123,456");
        assert_eq!(group_digits("1234567", ','), "1,234,567");
    }

    #[test]
    fn test_locale_from_str() {
        assert_eq!(Locale::from_str("de_DE").unwrap(), Locale::DeDe);
        assert_eq!(Locale::from_str(" EN-gb ").unwrap(), Locale::EnGb);
        let err = Locale::from_str("pt-br").unwrap_err();
        assert!(matches!(err, KpiError::InvalidInput { .. }));
    }

    #[test]
    fn test_percentage_overflow_is_not_a_panic() {
        let opts = FormatOptions::default();
        let huge = dec!(1_000_000_000_000_000_000_000_000_000);
        assert_eq!(format_percentage(huge, &opts), "N/A");
        let err = try_format_percentage(huge, &opts).unwrap_err();
        assert!(matches!(err, KpiError::InvalidInput { .. }));
        assert_eq!(try_format_percentage(dec!(0.25), &opts).unwrap(), "25.0%");
    }
}
