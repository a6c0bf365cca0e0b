use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use smb_kpi_core::kpi::{KpiId, KpiStatus, KpiValue, UnavailableReason};
use smb_kpi_core::statements::FinancialStatementSnapshot;
use smb_kpi_core::{calculate_kpis, run_kpi_request, KpiConfig, KpiError, KpiRequest};

// ===========================================================================
// Fixtures
// ===========================================================================

fn full_year(period: &str, revenue: Decimal) -> FinancialStatementSnapshot {
    let mut s = FinancialStatementSnapshot {
        period: period.into(),
        company_name: "Northwind Trading".into(),
        ..Default::default()
    };
    let bs = &mut s.balance_sheet;
    bs.total_assets = Some(dec!(1_000_000));
    bs.current_assets = Some(dec!(500_000));
    bs.non_current_assets = Some(dec!(500_000));
    bs.total_liabilities = Some(dec!(400_000));
    bs.current_liabilities = Some(dec!(200_000));
    bs.non_current_liabilities = Some(dec!(200_000));
    bs.total_equity = Some(dec!(600_000));
    bs.cash = Some(dec!(150_000));
    bs.accounts_receivable = Some(dec!(120_000));
    bs.inventory = Some(dec!(100_000));
    bs.accounts_payable = Some(dec!(80_000));
    bs.short_term_debt = Some(dec!(50_000));
    bs.long_term_debt = Some(dec!(200_000));
    bs.retained_earnings = Some(dec!(250_000));

    let is = &mut s.income_statement;
    is.total_revenue = Some(revenue);
    is.cost_of_goods_sold = Some(dec!(480_000));
    is.gross_profit = Some(revenue - dec!(480_000));
    is.operating_expenses = Some(dec!(200_000));
    is.operating_income = Some(revenue - dec!(680_000));
    is.interest_expense = Some(dec!(15_000));
    is.tax_expense = Some(dec!(25_000));
    is.net_income = Some(revenue - dec!(720_000));

    let cf = &mut s.cash_flow;
    cf.operating_cash_flow = Some(dec!(140_000));
    cf.investing_cash_flow = Some(dec!(-40_000));
    cf.financing_cash_flow = Some(dec!(-30_000));
    cf.net_cash_flow = Some(dec!(70_000));
    s
}

fn number(value: &KpiValue) -> Decimal {
    value.as_number().expect("numeric KPI value")
}

// ===========================================================================
// Core properties
// ===========================================================================

#[test]
fn test_current_ratio_scenario() {
    let out = calculate_kpis(&[full_year("2024-12-31", dec!(1_000_000))], &KpiConfig::default());
    let r = &out.result.kpis[&KpiId::CurrentRatio];
    assert_eq!(number(&r.value), dec!(2.5));
    assert_eq!(r.status, KpiStatus::Good);
    assert_eq!(r.source, vec!["current_assets", "current_liabilities"]);
    assert_eq!(
        r.calculation,
        "current_assets / current_liabilities = 500000 / 200000 = 2.5"
    );
}

#[test]
fn test_current_ratio_equals_quotient_across_inputs() {
    let pairs = [
        (dec!(1), dec!(3)),
        (dec!(123_456.78), dec!(9_876.54)),
        (dec!(0), dec!(10)),
        (dec!(750_000), dec!(1_000_000)),
    ];
    for (ca, cl) in pairs {
        let mut s = full_year("2024", dec!(1_000_000));
        s.balance_sheet.current_assets = Some(ca);
        s.balance_sheet.current_liabilities = Some(cl);
        let out = calculate_kpis(&[s], &KpiConfig::default());
        let got = number(&out.result.kpis[&KpiId::CurrentRatio].value);
        assert!((got - ca / cl).abs() < dec!(0.000000001), "{ca}/{cl} gave {got}");
    }
}

#[test]
fn test_zero_current_liabilities_is_unavailable_not_infinite() {
    let mut s = full_year("2024", dec!(1_000_000));
    s.balance_sheet.current_liabilities = Some(Decimal::ZERO);
    let out = calculate_kpis(&[s], &KpiConfig::default());

    for id in [
        KpiId::CurrentRatio,
        KpiId::QuickRatio,
        KpiId::CashRatio,
        KpiId::OperatingCashFlowRatio,
    ] {
        let r = &out.result.kpis[&id];
        assert_eq!(r.status, KpiStatus::Unavailable, "{id}");
        assert_eq!(r.reason, Some(UnavailableReason::DivisionByZero), "{id}");
        assert_eq!(r.value, KpiValue::Text("N/A".into()), "{id}");
    }
    // Unrelated KPIs still computed.
    assert_eq!(out.result.kpis[&KpiId::DebtToEquity].status, KpiStatus::Good);
    assert_eq!(out.result.kpis[&KpiId::GrossMargin].status, KpiStatus::Good);
}

#[test]
fn test_missing_field_isolated_to_dependent_kpis() {
    let json = r#"{
        "period": "2024",
        "balance_sheet": {
            "total_assets": 1000000,
            "total_liabilities": 400000,
            "total_equity": 600000,
            "current_assets": "NaN",
            "current_liabilities": 200000
        },
        "income_statement": { "total_revenue": 900000, "net_income": 90000 }
    }"#;
    let snap: FinancialStatementSnapshot = serde_json::from_str(json).unwrap();
    let out = calculate_kpis(&[snap], &KpiConfig::default());
    let kpis = &out.result.kpis;

    let cr = &kpis[&KpiId::CurrentRatio];
    assert_eq!(cr.status, KpiStatus::Unavailable);
    assert_eq!(cr.reason, Some(UnavailableReason::MissingField));
    assert!(cr.explanation.contains("current_assets"));

    assert_eq!(number(&kpis[&KpiId::NetMargin].value), dec!(0.1));
    assert_eq!(kpis[&KpiId::NetMargin].status, KpiStatus::Good);
    assert_eq!(number(&kpis[&KpiId::ReturnOnAssets].value), dec!(0.09));
    assert_eq!(kpis[&KpiId::DebtRatio].status, KpiStatus::Good);
}

#[test]
fn test_idempotent_results() {
    let series = [
        full_year("2023-12-31", dec!(800_000)),
        full_year("2024-12-31", dec!(850_000)),
    ];
    let config = KpiConfig::default();
    let a = calculate_kpis(&series, &config);
    let b = calculate_kpis(&series, &config);
    assert_eq!(a.result, b.result);
    assert_eq!(
        serde_json::to_string(&a.result).unwrap(),
        serde_json::to_string(&b.result).unwrap()
    );
}

#[test]
fn test_revenue_growth_two_periods() {
    let out = calculate_kpis(
        &[
            full_year("2024-01-31", dec!(800_000)),
            full_year("2024-02-29", dec!(850_000)),
        ],
        &KpiConfig::default(),
    );
    let r = &out.result.kpis[&KpiId::RevenueGrowth];
    assert_eq!(number(&r.value), dec!(0.0625));
    // 6.25% sits between the 0% warning cut and the 10% target.
    assert_eq!(r.status, KpiStatus::Warning);
    assert_eq!(r.source, vec!["total_revenue", "prior.total_revenue"]);
}

#[test]
fn test_revenue_growth_single_period_unavailable() {
    let out = calculate_kpis(&[full_year("2024", dec!(850_000))], &KpiConfig::default());
    let r = &out.result.kpis[&KpiId::RevenueGrowth];
    assert_eq!(r.status, KpiStatus::Unavailable);
    assert_eq!(r.reason, Some(UnavailableReason::InsufficientHistory));
}

// ===========================================================================
// Catalog values on a full statement
// ===========================================================================

#[test]
fn test_full_statement_values() {
    let out = calculate_kpis(&[full_year("2024", dec!(1_000_000))], &KpiConfig::default());
    let k = &out.result.kpis;

    // (500k - 100k) / 200k = 2
    assert_eq!(number(&k[&KpiId::QuickRatio].value), dec!(2));
    // 150k / 200k = 0.75
    assert_eq!(number(&k[&KpiId::CashRatio].value), dec!(0.75));
    // (500k - 200k) / 1M = 0.3
    assert_eq!(number(&k[&KpiId::WorkingCapitalRatio].value), dec!(0.3));
    // 520k / 1M = 0.52
    assert_eq!(number(&k[&KpiId::GrossMargin].value), dec!(0.52));
    // 320k / 1M = 0.32
    assert_eq!(number(&k[&KpiId::OperatingMargin].value), dec!(0.32));
    // 280k / 1M = 0.28
    assert_eq!(number(&k[&KpiId::NetMargin].value), dec!(0.28));
    // 280k / 600k
    assert_eq!(
        number(&k[&KpiId::ReturnOnEquity].value),
        dec!(280_000) / dec!(600_000)
    );
    // 320k / 15k
    assert_eq!(
        number(&k[&KpiId::InterestCoverage].value),
        dec!(320_000) / dec!(15_000)
    );
    // 480k / 100k = 4.8
    assert_eq!(number(&k[&KpiId::InventoryTurnover].value), dec!(4.8));
    assert_eq!(k[&KpiId::InventoryTurnover].status, KpiStatus::Warning);
    // 120k / 1M × 365 = 43.8
    assert_eq!(number(&k[&KpiId::DaysSalesOutstanding].value), dec!(43.8));
    assert_eq!(k[&KpiId::DaysSalesOutstanding].status, KpiStatus::Good);
    // (140k - 40k) / 1M = 0.1
    assert_eq!(number(&k[&KpiId::FreeCashFlowMargin].value), dec!(0.1));
    // Net cash flow positive.
    assert_eq!(
        k[&KpiId::CashRunway].value,
        KpiValue::Text("Cash-flow positive".into())
    );
    assert_eq!(k[&KpiId::CashRunway].status, KpiStatus::Good);
}

#[test]
fn test_cash_runway_when_burning() {
    let mut s = full_year("2024-03", dec!(90_000));
    s.days_in_period = Some(31);
    s.balance_sheet.cash = Some(dec!(60_000));
    s.cash_flow.net_cash_flow = Some(dec!(-15_000));
    let out = calculate_kpis(&[s], &KpiConfig::default());
    let r = &out.result.kpis[&KpiId::CashRunway];
    let expected = dec!(60_000) / (dec!(15_000) * dec!(30.4375) / dec!(31));
    assert_eq!(number(&r.value), expected);
    // ≈ 4.07 months: past the warning cut but not the critical one
    assert_eq!(r.status, KpiStatus::Critical);
    assert!(r.source.contains(&"days_in_period".to_string()));
}

#[test]
fn test_negative_equity_unavailable_not_good() {
    let mut s = full_year("2024", dec!(1_000_000));
    s.balance_sheet.total_liabilities = Some(dec!(1_100_000));
    s.balance_sheet.total_equity = Some(dec!(-100_000));
    let out = calculate_kpis(&[s], &KpiConfig::default());
    for id in [KpiId::DebtToEquity, KpiId::ReturnOnEquity] {
        let r = &out.result.kpis[&id];
        assert_eq!(r.status, KpiStatus::Unavailable, "{id}");
        assert_eq!(r.reason, Some(UnavailableReason::NegativeBase), "{id}");
    }
    assert_eq!(out.result.kpis[&KpiId::DebtRatio].status, KpiStatus::Critical);
}

#[test]
fn test_absurd_magnitude_not_classified_good() {
    let mut s = full_year("2024", dec!(1_000_000));
    s.income_statement.interest_expense = Some(dec!(0.01));
    let out = calculate_kpis(&[s], &KpiConfig::default());
    let r = &out.result.kpis[&KpiId::InterestCoverage];
    assert_eq!(r.status, KpiStatus::Unavailable);
    assert_eq!(r.reason, Some(UnavailableReason::OutOfRangeValue));
}

#[test]
fn test_identity_mismatch_warns_but_computes() {
    let mut s = full_year("2024", dec!(1_000_000));
    s.balance_sheet.total_equity = Some(dec!(100_000));
    let out = calculate_kpis(&[s], &KpiConfig::default());
    assert!(out.warnings.iter().any(|w| w.contains("total_liabilities + total_equity")));
    assert_eq!(out.result.kpis[&KpiId::CurrentRatio].status, KpiStatus::Good);
}

// ===========================================================================
// JSON request surface
// ===========================================================================

#[test]
fn test_request_round_trip_through_json() {
    let request = KpiRequest {
        snapshots: vec![full_year("2024", dec!(1_000_000))],
        config: KpiConfig::default(),
    };
    let json = serde_json::to_string(&request).unwrap();
    let parsed: KpiRequest = serde_json::from_str(&json).unwrap();
    let out = run_kpi_request(&parsed).unwrap();
    assert_eq!(out.result.company_name, "Northwind Trading");
    assert_eq!(out.metadata.precision, "rust_decimal_128bit");
    assert!(!out.methodology.is_empty());
}

#[test]
fn test_request_with_invalid_override_rejected() {
    let json = r#"{
        "snapshots": [],
        "config": {
            "threshold_overrides": {
                "current_ratio": { "good": "0.5", "warning": "1.0", "critical": "2.0" }
            }
        }
    }"#;
    let request: KpiRequest = serde_json::from_str(json).unwrap();
    match run_kpi_request(&request).unwrap_err() {
        KpiError::InvalidConfig { field, .. } => {
            assert_eq!(field, "threshold_overrides.current_ratio")
        }
        other => panic!("Expected InvalidConfig, got {other:?}"),
    }
}

#[test]
fn test_report_serializes_status_and_keys() {
    let out = calculate_kpis(&[full_year("2024", dec!(1_000_000))], &KpiConfig::default());
    let value = serde_json::to_value(&out).unwrap();
    let cr = &value["result"]["kpis"]["current_ratio"];
    assert_eq!(cr["status"], "good");
    assert_eq!(cr["unit"], "multiple");
    assert_eq!(cr["direction"], "higher_is_better");
    assert_eq!(cr["threshold"]["good"], "2.0");
    assert!(cr.get("reason").is_none());
}

#[test]
fn test_amounts_near_decimal_max_do_not_abort_report() {
    let json = r#"[{
        "period": "2024",
        "balance_sheet": {
            "total_assets": "1000000",
            "total_liabilities": "50000000000000000000000000000",
            "total_equity": "50000000000000000000000000000"
        },
        "income_statement": {
            "total_revenue": "50000000000000000000000000000",
            "cost_of_goods_sold": "-50000000000000000000000000000",
            "gross_profit": "1"
        }
    }]"#;
    let snapshots: Vec<FinancialStatementSnapshot> = serde_json::from_str(json).unwrap();
    let out = calculate_kpis(&snapshots, &KpiConfig::default());

    assert_eq!(out.result.kpis.len(), 19);
    let debt_ratio = &out.result.kpis[&KpiId::DebtRatio];
    assert_eq!(debt_ratio.status, KpiStatus::Unavailable);
    assert_eq!(debt_ratio.reason, Some(UnavailableReason::OutOfRangeValue));
    assert_eq!(out.result.kpis[&KpiId::DebtToEquity].status, KpiStatus::Good);

    assert!(out
        .warnings
        .iter()
        .any(|w| w.contains("accounting identity could not be verified")));
    assert!(out
        .warnings
        .iter()
        .any(|w| w.contains("gross_profit could not be verified")));
}
