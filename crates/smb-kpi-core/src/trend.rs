//! Multi-period trend analysis.
//!
//! Every catalog KPI is re-evaluated for each period (with the period before
//! it as the prior), giving one series per KPI. A handful of headline line
//! items are tracked as raw series as well.

use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use crate::config::KpiConfig;
use crate::kpi::calculator::evaluate;
use crate::kpi::{kpi_catalog, Direction, KpiId, KpiStatus};
use crate::statements::{FinancialStatementSnapshot, StatementField};
use crate::types::{with_metadata, ComputationOutput, Rate};

/// Line items tracked alongside the KPIs.
const TRACKED_LINE_ITEMS: &[StatementField] = &[
    StatementField::TotalRevenue,
    StatementField::NetIncome,
    StatementField::Cash,
    StatementField::OperatingCashFlow,
];

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
    InsufficientData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub period: String,
    /// Absent when the value could not be computed for this period
    pub value: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesTrend {
    pub points: Vec<TrendPoint>,
    pub direction: TrendDirection,
    /// Last available value minus first available value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change: Option<Decimal>,
    /// Relative change between the final two periods
    #[serde(skip_serializing_if = "Option::is_none")]
    pub growth_rate: Option<Rate>,
    /// Per-period compound growth between the first and last available values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compound_growth: Option<Rate>,
    /// Whether the movement is in the favourable direction; absent when stable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub improving: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendReport {
    pub company_name: String,
    pub periods: Vec<String>,
    pub line_items: BTreeMap<StatementField, SeriesTrend>,
    pub kpis: BTreeMap<KpiId, SeriesTrend>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Build per-KPI and per-line-item trends over a chronological series.
pub fn analyze_trends(
    snapshots: &[FinancialStatementSnapshot],
    config: &KpiConfig,
) -> ComputationOutput<TrendReport> {
    let start = Instant::now();
    let _span = tracing::debug_span!("analyze_trends", periods = snapshots.len()).entered();
    let mut warnings = Vec::new();
    if snapshots.len() < 2 {
        warnings.push("At least two periods are needed to classify a trend.".to_string());
    }

    let periods: Vec<String> = snapshots.iter().map(|s| s.period.clone()).collect();

    let line_items = TRACKED_LINE_ITEMS
        .iter()
        .map(|field| {
            let values: Vec<Option<Decimal>> = snapshots.iter().map(|s| s.value(*field)).collect();
            let trend = build_trend(&periods, values, Direction::HigherIsBetter, config.stable_band);
            (*field, trend)
        })
        .collect();

    let kpis = kpi_catalog()
        .iter()
        .map(|def| {
            let values: Vec<Option<Decimal>> = snapshots
                .iter()
                .enumerate()
                .map(|(i, snap)| {
                    let prior = i.checked_sub(1).and_then(|j| snapshots.get(j));
                    let result = evaluate(def, Some(snap), prior, config);
                    if result.status == KpiStatus::Unavailable {
                        None
                    } else {
                        result.value.as_number()
                    }
                })
                .collect();
            let trend = build_trend(&periods, values, def.direction, config.stable_band);
            tracing::debug!(kpi = %def.id, direction = ?trend.direction, "trend classified");
            (def.id, trend)
        })
        .collect();

    let report = TrendReport {
        company_name: snapshots
            .last()
            .map(|s| s.company_name.clone())
            .unwrap_or_default(),
        periods,
        line_items,
        kpis,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "stable_band": config.stable_band.to_string(),
        "direction_basis": "first and last available values",
        "growth_rate_basis": "final two periods",
        "gaps": "periods where a value is unavailable are skipped"
    });

    with_metadata(
        "Period-over-period trend classification",
        &assumptions,
        warnings,
        elapsed,
        report,
    )
}

/// Classify a series of optional values.
///
/// Returns `(direction, change, growth_rate, compound_growth)`.
pub fn classify_series(
    values: &[Option<Decimal>],
    stable_band: Rate,
) -> (TrendDirection, Option<Decimal>, Option<Rate>, Option<Rate>) {
    let available: Vec<(usize, Decimal)> = values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|v| (i, v)))
        .collect();

    let growth_rate = match values {
        [.., Some(prev), Some(last)] => relative_change(*prev, *last),
        _ => None,
    };

    let (Some(&(first_idx, first)), Some(&(last_idx, last))) = (available.first(), available.last())
    else {
        return (TrendDirection::InsufficientData, None, growth_rate, None);
    };
    if first_idx == last_idx {
        return (TrendDirection::InsufficientData, None, growth_rate, None);
    }

    let Some(change) = last.checked_sub(first) else {
        return (TrendDirection::InsufficientData, None, growth_rate, None);
    };
    let direction = match relative_change(first, last) {
        Some(rel) if rel.abs() < stable_band => TrendDirection::Stable,
        None if change.is_zero() => TrendDirection::Stable,
        _ if change > Decimal::ZERO => TrendDirection::Increasing,
        _ => TrendDirection::Decreasing,
    };

    let compound_growth = compound_growth(first, last, (last_idx - first_idx) as u32);

    (direction, Some(change), growth_rate, compound_growth)
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn build_trend(
    periods: &[String],
    values: Vec<Option<Decimal>>,
    favourable: Direction,
    stable_band: Rate,
) -> SeriesTrend {
    let (direction, change, growth_rate, compound_growth) = classify_series(&values, stable_band);
    let improving = match (direction, favourable) {
        (TrendDirection::Increasing, Direction::HigherIsBetter)
        | (TrendDirection::Decreasing, Direction::LowerIsBetter) => Some(true),
        (TrendDirection::Increasing, Direction::LowerIsBetter)
        | (TrendDirection::Decreasing, Direction::HigherIsBetter) => Some(false),
        _ => None,
    };
    let points = periods
        .iter()
        .zip(values)
        .map(|(period, value)| TrendPoint {
            period: period.clone(),
            value,
        })
        .collect();
    SeriesTrend {
        points,
        direction,
        change,
        growth_rate,
        compound_growth,
        improving,
    }
}

/// (to − from) / |from|; `None` when `from` is zero.
fn relative_change(from: Decimal, to: Decimal) -> Option<Rate> {
    if from.is_zero() {
        return None;
    }
    to.checked_sub(from)?.checked_div(from.abs())
}

/// (last / first)^(1 / periods) − 1, for strictly positive endpoints.
fn compound_growth(first: Decimal, last: Decimal, periods: u32) -> Option<Rate> {
    if first <= Decimal::ZERO || last <= Decimal::ZERO || periods == 0 {
        return None;
    }
    let ratio = last.checked_div(first)?;
    if periods == 1 {
        return Some(ratio - Decimal::ONE);
    }
    let root = ratio.checked_powd(Decimal::ONE / Decimal::from(periods))?;
    Some(root - Decimal::ONE)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn month(period: &str, revenue: Decimal) -> FinancialStatementSnapshot {
        let mut s = FinancialStatementSnapshot {
            period: period.into(),
            company_name: "Acme Ltd".into(),
            days_in_period: Some(30),
            ..Default::default()
        };
        s.income_statement.total_revenue = Some(revenue);
        s
    }

    #[test]
    fn test_revenue_increasing() {
        let out = analyze_trends(
            &[month("2024-01", dec!(800_000)), month("2024-02", dec!(850_000))],
            &KpiConfig::default(),
        );
        let t = &out.result.line_items[&StatementField::TotalRevenue];
        assert_eq!(t.direction, TrendDirection::Increasing);
        assert_eq!(t.growth_rate, Some(dec!(0.0625)));
        assert_eq!(t.change, Some(dec!(50_000)));
        assert_eq!(t.compound_growth, Some(dec!(0.0625)));
        assert_eq!(t.improving, Some(true));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_stable_within_band() {
        let values = [Some(dec!(100)), Some(dec!(100.5))];
        let (direction, change, _, _) = classify_series(&values, dec!(0.01));
        assert_eq!(direction, TrendDirection::Stable);
        assert_eq!(change, Some(dec!(0.5)));
    }

    #[test]
    fn test_gaps_are_skipped() {
        let values = [Some(dec!(100)), None, Some(dec!(80)), None];
        let (direction, change, growth, _) = classify_series(&values, dec!(0.01));
        assert_eq!(direction, TrendDirection::Decreasing);
        assert_eq!(change, Some(dec!(-20)));
        // Final two periods are not both present.
        assert_eq!(growth, None);
    }

    #[test]
    fn test_single_point_insufficient() {
        let (direction, change, growth, compound) = classify_series(&[Some(dec!(5))], dec!(0.01));
        assert_eq!(direction, TrendDirection::InsufficientData);
        assert_eq!((change, growth, compound), (None, None, None));
    }

    #[test]
    fn test_from_zero_base() {
        let values = [Some(dec!(0)), Some(dec!(10))];
        let (direction, _, growth, compound) = classify_series(&values, dec!(0.01));
        assert_eq!(direction, TrendDirection::Increasing);
        assert_eq!(growth, None);
        assert_eq!(compound, None);
    }

    #[test]
    fn test_negative_base_uses_magnitude() {
        // A loss shrinking from -100 to -50 is an increase.
        let values = [Some(dec!(-100)), Some(dec!(-50))];
        let (direction, _, growth, _) = classify_series(&values, dec!(0.01));
        assert_eq!(direction, TrendDirection::Increasing);
        assert_eq!(growth, Some(dec!(0.5)));
    }

    #[test]
    fn test_compound_growth_multi_period() {
        let g = compound_growth(dec!(100), dec!(121), 2).unwrap();
        assert!((g - dec!(0.1)).abs() < dec!(0.000001), "got {g}");
    }

    #[test]
    fn test_kpi_trend_improving_respects_direction() {
        let mut a = month("2024-01", dec!(100_000));
        a.balance_sheet.total_liabilities = Some(dec!(300_000));
        a.balance_sheet.total_equity = Some(dec!(100_000));
        let mut b = month("2024-02", dec!(100_000));
        b.balance_sheet.total_liabilities = Some(dec!(200_000));
        b.balance_sheet.total_equity = Some(dec!(100_000));

        let out = analyze_trends(&[a, b], &KpiConfig::default());
        let de = &out.result.kpis[&KpiId::DebtToEquity];
        assert_eq!(de.direction, TrendDirection::Decreasing);
        assert_eq!(de.improving, Some(true));

        let growth = &out.result.kpis[&KpiId::RevenueGrowth];
        // Only the second period has a prior.
        assert_eq!(growth.points[0].value, None);
        assert_eq!(growth.points[1].value, Some(dec!(0)));
        assert_eq!(growth.direction, TrendDirection::InsufficientData);
    }

    #[test]
    fn test_single_snapshot_warns() {
        let out = analyze_trends(&[month("2024-01", dec!(1))], &KpiConfig::default());
        assert_eq!(out.warnings.len(), 1);
    }
}
