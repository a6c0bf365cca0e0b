use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use smb_kpi_core::format::{
    format_currency, format_kpi_value, format_percentage, status_background, status_color,
    FormatOptions, Locale, NegativeStyle,
};
use smb_kpi_core::kpi::{KpiId, KpiStatus};
use smb_kpi_core::statements::FinancialStatementSnapshot;
use smb_kpi_core::{calculate_kpis, Currency, KpiConfig};
use std::str::FromStr;

fn strip_currency(formatted: &str) -> Decimal {
    let cleaned: String = formatted
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    Decimal::from_str(&cleaned).unwrap()
}

#[test]
fn test_currency_round_trip_to_cents() {
    let opts = FormatOptions::default();
    for amount in [
        dec!(1234567.89),
        dec!(0.01),
        dec!(-987654.321),
        dec!(1000000),
    ] {
        let formatted = format_currency(amount, &opts);
        assert_eq!(strip_currency(&formatted), amount.round_dp(2), "{formatted}");
    }
}

#[test]
fn test_currency_parentheses_for_losses() {
    let opts = FormatOptions {
        negative_style: NegativeStyle::Parentheses,
        ..Default::default()
    };
    assert_eq!(format_currency(dec!(-1234567.89), &opts), "($1,234,567.89)");
    assert_eq!(format_currency(dec!(1234567.89), &opts), "$1,234,567.89");
}

#[test]
fn test_currency_french_locale() {
    let opts = FormatOptions {
        currency: Currency::EUR,
        locale: Locale::FrFr,
        ..Default::default()
    };
    assert_eq!(format_currency(dec!(1234.5), &opts), "1\u{202f}234,50 €");
}

#[test]
fn test_percentage_scales_fractions() {
    let opts = FormatOptions::default();
    assert_eq!(format_percentage(dec!(0.52), &opts), "52.0%");
    assert_eq!(format_percentage(dec!(1.5), &opts), "150.0%");
}

#[test]
fn test_kpi_values_render_by_unit() {
    let mut s = FinancialStatementSnapshot {
        period: "2024".into(),
        ..Default::default()
    };
    s.balance_sheet.current_assets = Some(dec!(500_000));
    s.balance_sheet.current_liabilities = Some(dec!(200_000));
    s.income_statement.total_revenue = Some(dec!(1_000_000));
    s.income_statement.net_income = Some(dec!(62_500));

    let config = KpiConfig::default();
    let out = calculate_kpis(&[s], &config);
    let k = &out.result.kpis;
    assert_eq!(format_kpi_value(&k[&KpiId::CurrentRatio], &config.format), "2.50x");
    assert_eq!(format_kpi_value(&k[&KpiId::NetMargin], &config.format), "6.3%");
    assert_eq!(format_kpi_value(&k[&KpiId::QuickRatio], &config.format), "N/A");
}

#[test]
fn test_status_tokens_for_ui() {
    assert_eq!(status_color(KpiStatus::Good), "green");
    assert_eq!(status_color(KpiStatus::Warning), "yellow");
    assert!(status_background(KpiStatus::Critical).contains("bg-red"));
    assert!(status_background(KpiStatus::Unavailable).contains("bg-gray"));
}
