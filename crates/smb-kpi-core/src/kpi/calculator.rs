use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use super::catalog::{kpi_catalog, KpiCategory, KpiDefinition, KpiId, KpiInputs, KpiUnit, KpiValue};
use super::status::{Direction, KpiStatus, Thresholds, Unavailable, UnavailableReason};
use crate::config::KpiConfig;
use crate::format::format_for_unit;
use crate::quality::check_data_quality;
use crate::statements::FinancialStatementSnapshot;
use crate::types::{with_metadata, ComputationOutput};
use crate::KpiResult;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// A calculation request as received over JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KpiRequest {
    /// Chronological order, most recent last
    pub snapshots: Vec<FinancialStatementSnapshot>,
    #[serde(default)]
    pub config: KpiConfig,
}

impl KpiRequest {
    /// Parse a JSON request and validate its configuration.
    pub fn from_json_str(json: &str) -> KpiResult<Self> {
        let request: KpiRequest = serde_json::from_str(json)?;
        request.config.validate()?;
        Ok(request)
    }
}

/// The assessed value of one KPI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KpiCalculationResult {
    pub name: String,
    pub category: KpiCategory,
    pub unit: KpiUnit,
    pub direction: Direction,
    pub value: KpiValue,
    pub status: KpiStatus,
    /// The arithmetic actually performed, operands included
    pub calculation: String,
    /// Every field consulted, in order
    pub source: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<Thresholds>,
    pub explanation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<UnavailableReason>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KpiSummary {
    pub good: u32,
    pub warning: u32,
    pub critical: u32,
    pub unavailable: u32,
    /// (100 × good + 50 × warning) / assessed, absent when nothing was assessed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_score: Option<Decimal>,
    pub overall_status: KpiStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KpiReport {
    pub company_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    pub kpis: BTreeMap<KpiId, KpiCalculationResult>,
    pub summary: KpiSummary,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the full KPI catalog for the latest snapshot in `snapshots`.
///
/// Never fails: each KPI that cannot be assessed is reported as
/// `unavailable` with a reason, independently of the others. Data-quality
/// findings are returned as envelope warnings.
pub fn calculate_kpis(
    snapshots: &[FinancialStatementSnapshot],
    config: &KpiConfig,
) -> ComputationOutput<KpiReport> {
    let start = Instant::now();
    let _span = tracing::debug_span!("calculate_kpis", periods = snapshots.len()).entered();

    let warnings: Vec<String> = check_data_quality(snapshots, config.identity_tolerance)
        .into_iter()
        .map(|issue| issue.message)
        .collect();

    let current = snapshots.last();
    let prior = snapshots.len().checked_sub(2).and_then(|i| snapshots.get(i));

    let kpis: BTreeMap<KpiId, KpiCalculationResult> = kpi_catalog()
        .iter()
        .map(|def| (def.id, evaluate(def, current, prior, config)))
        .collect();

    let summary = summarize(&kpis);
    tracing::debug!(
        good = summary.good,
        warning = summary.warning,
        critical = summary.critical,
        unavailable = summary.unavailable,
        "kpi report assembled"
    );

    let report = KpiReport {
        company_name: current.map(|s| s.company_name.clone()).unwrap_or_default(),
        period: current.map(|s| s.period.clone()),
        kpis,
        summary,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "latest_period": "last snapshot in the sequence",
        "percent_values": "fractions (0.25 = 25%)",
        "annualized": ["return_on_assets", "return_on_equity", "asset_turnover",
                       "inventory_turnover", "operating_cash_flow_ratio"],
        "days_per_year": 365,
        "plausibility_limit": config.plausibility_limit.to_string(),
        "unavailable_is_not_critical": true,
        "format": config.format
    });

    with_metadata(
        "SMB financial ratio analysis (threshold classification per KPI)",
        &assumptions,
        warnings,
        elapsed,
        report,
    )
}

/// Validate the request's configuration, then calculate.
pub fn run_kpi_request(request: &KpiRequest) -> KpiResult<ComputationOutput<KpiReport>> {
    request.config.validate()?;
    Ok(calculate_kpis(&request.snapshots, &request.config))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Evaluate one definition against a period (and its predecessor).
pub(crate) fn evaluate(
    def: &KpiDefinition,
    current: Option<&FinancialStatementSnapshot>,
    prior: Option<&FinancialStatementSnapshot>,
    config: &KpiConfig,
) -> KpiCalculationResult {
    let thresholds = config.thresholds_for(def);

    let Some(current) = current else {
        let source = def.source_fields.iter().map(|f| f.to_string()).collect();
        let missing = Unavailable {
            reason: UnavailableReason::MissingField,
            detail: "No snapshot supplied".into(),
        };
        return unavailable(def, thresholds, source, missing);
    };

    let mut inputs = KpiInputs::new(current, prior);
    let outcome = (def.compute)(&mut inputs);
    let source = inputs.into_source();

    let computed = match outcome {
        Ok(computed) => computed,
        Err(why) => {
            tracing::debug!(kpi = %def.id, reason = ?why.reason, "kpi unavailable");
            return unavailable(def, thresholds, source, why);
        }
    };

    let (status, explanation) = match (&computed.value, computed.fixed_status) {
        (KpiValue::Text(text), Some(status)) => {
            (status, format!("{}: {}. {}", def.name, text, def.description))
        }
        (KpiValue::Number(v), fixed) => {
            if v.abs() > config.plausibility_limit {
                let why = Unavailable::out_of_range(format!(
                    "{} of {} exceeds the plausibility limit of {}; check the inputs",
                    def.name,
                    v.round_dp(2).normalize(),
                    config.plausibility_limit.normalize()
                ));
                tracing::debug!(kpi = %def.id, value = %v, "kpi implausible");
                let mut result = unavailable(def, thresholds, source, why);
                result.calculation = computed.calculation;
                return result;
            }
            let status = fixed.unwrap_or_else(|| thresholds.classify(*v, def.direction));
            (status, explain(def, *v, status, &thresholds, config))
        }
        (KpiValue::Text(text), None) => {
            let why = Unavailable::out_of_range(format!("non-numeric result \"{text}\""));
            return unavailable(def, thresholds, source, why);
        }
    };

    tracing::debug!(kpi = %def.id, status = %status, "kpi evaluated");

    KpiCalculationResult {
        name: def.name.to_string(),
        category: def.category,
        unit: def.unit,
        direction: def.direction,
        value: computed.value,
        status,
        calculation: computed.calculation,
        source,
        threshold: Some(thresholds),
        explanation,
        reason: None,
    }
}

fn unavailable(
    def: &KpiDefinition,
    thresholds: Thresholds,
    source: Vec<String>,
    why: Unavailable,
) -> KpiCalculationResult {
    KpiCalculationResult {
        name: def.name.to_string(),
        category: def.category,
        unit: def.unit,
        direction: def.direction,
        value: KpiValue::unavailable(),
        status: KpiStatus::Unavailable,
        calculation: why.detail.clone(),
        source,
        threshold: Some(thresholds),
        explanation: format!("{} cannot be assessed: {}.", def.name, why.detail),
        reason: Some(why.reason),
    }
}

fn explain(
    def: &KpiDefinition,
    value: Decimal,
    status: KpiStatus,
    thresholds: &Thresholds,
    config: &KpiConfig,
) -> String {
    let show = |v: Decimal| format_for_unit(v, def.unit, &config.format);
    let side = match def.direction {
        Direction::HigherIsBetter => "below",
        Direction::LowerIsBetter => "above",
    };
    match status {
        KpiStatus::Good => format!(
            "{} of {} meets the {} target. {}",
            def.name,
            show(value),
            show(thresholds.good),
            def.description
        ),
        KpiStatus::Warning => format!(
            "{} of {} is {side} the {} target but within the {} warning level. {}",
            def.name,
            show(value),
            show(thresholds.good),
            show(thresholds.warning),
            def.description
        ),
        _ => {
            let severe = match def.direction {
                Direction::HigherIsBetter => value < thresholds.critical,
                Direction::LowerIsBetter => value > thresholds.critical,
            };
            let tail = if severe {
                format!(", and past the {} critical level", show(thresholds.critical))
            } else {
                String::new()
            };
            format!(
                "{} of {} is {side} the {} warning level{tail}. {}",
                def.name,
                show(value),
                show(thresholds.warning),
                def.description
            )
        }
    }
}

fn summarize(kpis: &BTreeMap<KpiId, KpiCalculationResult>) -> KpiSummary {
    let count = |status: KpiStatus| kpis.values().filter(|r| r.status == status).count() as u32;
    let good = count(KpiStatus::Good);
    let warning = count(KpiStatus::Warning);
    let critical = count(KpiStatus::Critical);
    let unavailable = count(KpiStatus::Unavailable);

    let assessed = good + warning + critical;
    let health_score = if assessed == 0 {
        None
    } else {
        let points = Decimal::from(good) * dec!(100) + Decimal::from(warning) * dec!(50);
        Some((points / Decimal::from(assessed)).round_dp(1))
    };
    let overall_status = match health_score {
        None => KpiStatus::Unavailable,
        Some(score) if score >= dec!(75) => KpiStatus::Good,
        Some(score) if score >= dec!(45) => KpiStatus::Warning,
        Some(_) => KpiStatus::Critical,
    };

    KpiSummary {
        good,
        warning,
        critical,
        unavailable,
        health_score,
        overall_status,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
