#![cfg(feature = "trends")]

use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use smb_kpi_core::kpi::KpiId;
use smb_kpi_core::statements::{FinancialStatementSnapshot, StatementField};
use smb_kpi_core::trend::{analyze_trends, TrendDirection};
use smb_kpi_core::KpiConfig;

fn month(period: &str, revenue: Decimal, net_income: Decimal, cash: Decimal) -> FinancialStatementSnapshot {
    let mut s = FinancialStatementSnapshot {
        period: period.into(),
        company_name: "Northwind Trading".into(),
        days_in_period: Some(30),
        ..Default::default()
    };
    s.income_statement.total_revenue = Some(revenue);
    s.income_statement.net_income = Some(net_income);
    s.balance_sheet.cash = Some(cash);
    s
}

#[test]
fn test_jan_feb_revenue_growth() {
    let out = analyze_trends(
        &[
            month("2024-01", dec!(800_000), dec!(40_000), dec!(100_000)),
            month("2024-02", dec!(850_000), dec!(40_200), dec!(90_000)),
        ],
        &KpiConfig::default(),
    );
    let report = &out.result;
    assert_eq!(report.periods, vec!["2024-01", "2024-02"]);

    let revenue = &report.line_items[&StatementField::TotalRevenue];
    assert_eq!(revenue.direction, TrendDirection::Increasing);
    assert_eq!(revenue.growth_rate, Some(dec!(0.0625)));

    // 0.5% change is inside the default 1% band.
    let net = &report.line_items[&StatementField::NetIncome];
    assert_eq!(net.direction, TrendDirection::Stable);
    assert_eq!(net.improving, None);

    let cash = &report.line_items[&StatementField::Cash];
    assert_eq!(cash.direction, TrendDirection::Decreasing);
    assert_eq!(cash.improving, Some(false));

    let growth = &report.kpis[&KpiId::RevenueGrowth];
    assert_eq!(growth.points[1].value, Some(dec!(0.0625)));
}

#[test]
fn test_net_margin_series_over_quarter() {
    let out = analyze_trends(
        &[
            month("2024-01", dec!(100_000), dec!(5_000), dec!(1)),
            month("2024-02", dec!(100_000), dec!(7_000), dec!(1)),
            month("2024-03", dec!(100_000), dec!(9_000), dec!(1)),
        ],
        &KpiConfig::default(),
    );
    let margin = &out.result.kpis[&KpiId::NetMargin];
    assert_eq!(margin.direction, TrendDirection::Increasing);
    assert_eq!(margin.improving, Some(true));
    assert_eq!(margin.change, Some(dec!(0.04)));
    let values: Vec<_> = margin.points.iter().map(|p| p.value).collect();
    assert_eq!(values, vec![Some(dec!(0.05)), Some(dec!(0.07)), Some(dec!(0.09))]);
}

#[test]
fn test_custom_stable_band() {
    let config = KpiConfig {
        stable_band: dec!(0.10),
        ..Default::default()
    };
    let out = analyze_trends(
        &[
            month("2024-01", dec!(800_000), dec!(1), dec!(1)),
            month("2024-02", dec!(850_000), dec!(1), dec!(1)),
        ],
        &config,
    );
    let revenue = &out.result.line_items[&StatementField::TotalRevenue];
    assert_eq!(revenue.direction, TrendDirection::Stable);
}

#[test]
fn test_trend_report_json_keys() {
    let out = analyze_trends(
        &[month("2024-01", dec!(1), dec!(1), dec!(1))],
        &KpiConfig::default(),
    );
    let value = serde_json::to_value(&out.result).unwrap();
    assert_eq!(value["line_items"]["total_revenue"]["direction"], "insufficient_data");
    assert!(value["kpis"]["current_ratio"].is_object());
}
