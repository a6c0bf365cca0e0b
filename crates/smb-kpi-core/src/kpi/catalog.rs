//! The KPI definition table.
//!
//! Each entry declares its formula, unit, direction and threshold table as
//! data. Adding a KPI means adding a `KpiId` variant, a compute function and a
//! row in [`CATALOG`]; the calculator iterates the table and never branches on
//! individual KPIs.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::status::{Direction, KpiStatus, Thresholds, Unavailable};
use crate::statements::{FinancialStatementSnapshot, StatementField};
use crate::types::Money;

use StatementField as F;

/// Average month length used to turn a period's burn into a monthly burn.
const AVG_DAYS_PER_MONTH: Decimal = dec!(30.4375);

/// Days in the year used when annualizing flow-over-stock ratios.
const DAYS_PER_YEAR: u32 = 365;

// ---------------------------------------------------------------------------
// Identifiers and descriptive enums
// ---------------------------------------------------------------------------

/// Every KPI the engine computes. Declaration order is report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KpiId {
    CurrentRatio,
    QuickRatio,
    CashRatio,
    WorkingCapitalRatio,
    GrossMargin,
    OperatingMargin,
    NetMargin,
    ReturnOnAssets,
    ReturnOnEquity,
    DebtToEquity,
    DebtRatio,
    InterestCoverage,
    AssetTurnover,
    InventoryTurnover,
    DaysSalesOutstanding,
    OperatingCashFlowRatio,
    FreeCashFlowMargin,
    CashRunway,
    RevenueGrowth,
}

impl KpiId {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CurrentRatio => "current_ratio",
            Self::QuickRatio => "quick_ratio",
            Self::CashRatio => "cash_ratio",
            Self::WorkingCapitalRatio => "working_capital_ratio",
            Self::GrossMargin => "gross_margin",
            Self::OperatingMargin => "operating_margin",
            Self::NetMargin => "net_margin",
            Self::ReturnOnAssets => "return_on_assets",
            Self::ReturnOnEquity => "return_on_equity",
            Self::DebtToEquity => "debt_to_equity",
            Self::DebtRatio => "debt_ratio",
            Self::InterestCoverage => "interest_coverage",
            Self::AssetTurnover => "asset_turnover",
            Self::InventoryTurnover => "inventory_turnover",
            Self::DaysSalesOutstanding => "days_sales_outstanding",
            Self::OperatingCashFlowRatio => "operating_cash_flow_ratio",
            Self::FreeCashFlowMargin => "free_cash_flow_margin",
            Self::CashRunway => "cash_runway",
            Self::RevenueGrowth => "revenue_growth",
        }
    }
}

impl std::fmt::Display for KpiId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KpiCategory {
    Liquidity,
    Profitability,
    Leverage,
    Efficiency,
    CashFlow,
    Growth,
}

/// Unit of a KPI value. `Percent` values are fractions (0.25 = 25%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KpiUnit {
    Multiple,
    Percent,
    Days,
    Months,
}

/// A KPI value: a number, or explanatory text when no number applies.
///
/// Both variants serialize as JSON strings (`"2.5"`, `"N/A"`,
/// `"Cash-flow positive"`). Consumers tell them apart by the result's
/// `status` and `reason`, not by the JSON type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KpiValue {
    Number(Decimal),
    Text(String),
}

impl KpiValue {
    /// Placeholder carried by every unavailable KPI.
    pub const SENTINEL: &'static str = "N/A";

    pub fn unavailable() -> Self {
        Self::Text(Self::SENTINEL.to_string())
    }

    pub fn as_number(&self) -> Option<Decimal> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Definition table
// ---------------------------------------------------------------------------

pub type ComputeFn = fn(&mut KpiInputs<'_>) -> Result<Computed, Unavailable>;

/// One row of the catalog.
#[derive(Clone, Serialize)]
pub struct KpiDefinition {
    pub id: KpiId,
    pub name: &'static str,
    pub category: KpiCategory,
    pub unit: KpiUnit,
    pub direction: Direction,
    pub thresholds: Thresholds,
    pub source_fields: &'static [StatementField],
    pub uses_prior_period: bool,
    pub description: &'static str,
    #[serde(skip)]
    pub compute: ComputeFn,
}

impl std::fmt::Debug for KpiDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KpiDefinition")
            .field("id", &self.id)
            .field("unit", &self.unit)
            .field("direction", &self.direction)
            .field("thresholds", &self.thresholds)
            .finish_non_exhaustive()
    }
}

/// The immutable catalog of every KPI, in report order.
pub static CATALOG: &[KpiDefinition] = &[
    // -- Liquidity -----------------------------------------------------------
    KpiDefinition {
        id: KpiId::CurrentRatio,
        name: "Current Ratio",
        category: KpiCategory::Liquidity,
        unit: KpiUnit::Multiple,
        direction: Direction::HigherIsBetter,
        thresholds: Thresholds::new(dec!(2.0), dec!(1.0), dec!(0.5)),
        source_fields: &[F::CurrentAssets, F::CurrentLiabilities],
        uses_prior_period: false,
        description: "Ability to cover short-term obligations with short-term assets.",
        compute: current_ratio,
    },
    KpiDefinition {
        id: KpiId::QuickRatio,
        name: "Quick Ratio",
        category: KpiCategory::Liquidity,
        unit: KpiUnit::Multiple,
        direction: Direction::HigherIsBetter,
        thresholds: Thresholds::new(dec!(1.0), dec!(0.7), dec!(0.5)),
        source_fields: &[F::CurrentAssets, F::Inventory, F::CurrentLiabilities],
        uses_prior_period: false,
        description: "Liquidity excluding inventory, which may be slow to convert to cash.",
        compute: quick_ratio,
    },
    KpiDefinition {
        id: KpiId::CashRatio,
        name: "Cash Ratio",
        category: KpiCategory::Liquidity,
        unit: KpiUnit::Multiple,
        direction: Direction::HigherIsBetter,
        thresholds: Thresholds::new(dec!(0.5), dec!(0.2), dec!(0.1)),
        source_fields: &[F::Cash, F::CurrentLiabilities],
        uses_prior_period: false,
        description: "Share of current liabilities payable from cash on hand.",
        compute: cash_ratio,
    },
    KpiDefinition {
        id: KpiId::WorkingCapitalRatio,
        name: "Working Capital Ratio",
        category: KpiCategory::Liquidity,
        unit: KpiUnit::Percent,
        direction: Direction::HigherIsBetter,
        thresholds: Thresholds::new(dec!(0.20), dec!(0.10), dec!(0)),
        source_fields: &[F::CurrentAssets, F::CurrentLiabilities, F::TotalAssets],
        uses_prior_period: false,
        description: "Net working capital relative to the size of the balance sheet.",
        compute: working_capital_ratio,
    },
    // -- Profitability -------------------------------------------------------
    KpiDefinition {
        id: KpiId::GrossMargin,
        name: "Gross Margin",
        category: KpiCategory::Profitability,
        unit: KpiUnit::Percent,
        direction: Direction::HigherIsBetter,
        thresholds: Thresholds::new(dec!(0.40), dec!(0.20), dec!(0.10)),
        source_fields: &[F::GrossProfit, F::TotalRevenue, F::CostOfGoodsSold],
        uses_prior_period: false,
        description: "Revenue retained after direct costs of goods sold.",
        compute: gross_margin,
    },
    KpiDefinition {
        id: KpiId::OperatingMargin,
        name: "Operating Margin",
        category: KpiCategory::Profitability,
        unit: KpiUnit::Percent,
        direction: Direction::HigherIsBetter,
        thresholds: Thresholds::new(dec!(0.15), dec!(0.05), dec!(0)),
        source_fields: &[F::OperatingIncome, F::TotalRevenue],
        uses_prior_period: false,
        description: "Operating profit earned per unit of revenue.",
        compute: operating_margin,
    },
    KpiDefinition {
        id: KpiId::NetMargin,
        name: "Net Profit Margin",
        category: KpiCategory::Profitability,
        unit: KpiUnit::Percent,
        direction: Direction::HigherIsBetter,
        thresholds: Thresholds::new(dec!(0.10), dec!(0.05), dec!(0)),
        source_fields: &[F::NetIncome, F::TotalRevenue],
        uses_prior_period: false,
        description: "Bottom-line profit earned per unit of revenue.",
        compute: net_margin,
    },
    KpiDefinition {
        id: KpiId::ReturnOnAssets,
        name: "Return on Assets",
        category: KpiCategory::Profitability,
        unit: KpiUnit::Percent,
        direction: Direction::HigherIsBetter,
        thresholds: Thresholds::new(dec!(0.05), dec!(0.02), dec!(0)),
        source_fields: &[F::NetIncome, F::TotalAssets],
        uses_prior_period: false,
        description: "Annualized net income generated per unit of assets.",
        compute: return_on_assets,
    },
    KpiDefinition {
        id: KpiId::ReturnOnEquity,
        name: "Return on Equity",
        category: KpiCategory::Profitability,
        unit: KpiUnit::Percent,
        direction: Direction::HigherIsBetter,
        thresholds: Thresholds::new(dec!(0.15), dec!(0.08), dec!(0)),
        source_fields: &[F::NetIncome, F::TotalEquity],
        uses_prior_period: false,
        description: "Annualized net income generated on owners' equity.",
        compute: return_on_equity,
    },
    // -- Leverage ------------------------------------------------------------
    KpiDefinition {
        id: KpiId::DebtToEquity,
        name: "Debt to Equity",
        category: KpiCategory::Leverage,
        unit: KpiUnit::Multiple,
        direction: Direction::LowerIsBetter,
        thresholds: Thresholds::new(dec!(1.0), dec!(2.0), dec!(3.0)),
        source_fields: &[F::TotalLiabilities, F::TotalEquity],
        uses_prior_period: false,
        description: "Liabilities carried per unit of owners' equity.",
        compute: debt_to_equity,
    },
    KpiDefinition {
        id: KpiId::DebtRatio,
        name: "Debt Ratio",
        category: KpiCategory::Leverage,
        unit: KpiUnit::Percent,
        direction: Direction::LowerIsBetter,
        thresholds: Thresholds::new(dec!(0.50), dec!(0.70), dec!(0.90)),
        source_fields: &[F::TotalLiabilities, F::TotalAssets],
        uses_prior_period: false,
        description: "Share of assets financed by liabilities.",
        compute: debt_ratio,
    },
    KpiDefinition {
        id: KpiId::InterestCoverage,
        name: "Interest Coverage",
        category: KpiCategory::Leverage,
        unit: KpiUnit::Multiple,
        direction: Direction::HigherIsBetter,
        thresholds: Thresholds::new(dec!(5.0), dec!(2.0), dec!(1.0)),
        source_fields: &[F::OperatingIncome, F::InterestExpense],
        uses_prior_period: false,
        description: "How many times operating income covers interest expense.",
        compute: interest_coverage,
    },
    // -- Efficiency ----------------------------------------------------------
    KpiDefinition {
        id: KpiId::AssetTurnover,
        name: "Asset Turnover",
        category: KpiCategory::Efficiency,
        unit: KpiUnit::Multiple,
        direction: Direction::HigherIsBetter,
        thresholds: Thresholds::new(dec!(1.0), dec!(0.5), dec!(0.25)),
        source_fields: &[F::TotalRevenue, F::TotalAssets],
        uses_prior_period: false,
        description: "Annualized revenue generated per unit of assets.",
        compute: asset_turnover,
    },
    KpiDefinition {
        id: KpiId::InventoryTurnover,
        name: "Inventory Turnover",
        category: KpiCategory::Efficiency,
        unit: KpiUnit::Multiple,
        direction: Direction::HigherIsBetter,
        thresholds: Thresholds::new(dec!(6), dec!(3), dec!(1.5)),
        source_fields: &[F::CostOfGoodsSold, F::Inventory],
        uses_prior_period: false,
        description: "Times inventory is sold through per year.",
        compute: inventory_turnover,
    },
    KpiDefinition {
        id: KpiId::DaysSalesOutstanding,
        name: "Days Sales Outstanding",
        category: KpiCategory::Efficiency,
        unit: KpiUnit::Days,
        direction: Direction::LowerIsBetter,
        thresholds: Thresholds::new(dec!(45), dec!(60), dec!(90)),
        source_fields: &[F::AccountsReceivable, F::TotalRevenue],
        uses_prior_period: false,
        description: "Average number of days taken to collect receivables.",
        compute: days_sales_outstanding,
    },
    // -- Cash flow -----------------------------------------------------------
    KpiDefinition {
        id: KpiId::OperatingCashFlowRatio,
        name: "Operating Cash Flow Ratio",
        category: KpiCategory::CashFlow,
        unit: KpiUnit::Multiple,
        direction: Direction::HigherIsBetter,
        thresholds: Thresholds::new(dec!(1.0), dec!(0.5), dec!(0.2)),
        source_fields: &[F::OperatingCashFlow, F::CurrentLiabilities],
        uses_prior_period: false,
        description: "Annualized operating cash flow relative to current liabilities.",
        compute: operating_cash_flow_ratio,
    },
    KpiDefinition {
        id: KpiId::FreeCashFlowMargin,
        name: "Free Cash Flow Margin",
        category: KpiCategory::CashFlow,
        unit: KpiUnit::Percent,
        direction: Direction::HigherIsBetter,
        thresholds: Thresholds::new(dec!(0.10), dec!(0), dec!(-0.10)),
        source_fields: &[F::OperatingCashFlow, F::InvestingCashFlow, F::TotalRevenue],
        uses_prior_period: false,
        description: "Cash left after operating and investing activities, per unit of revenue.",
        compute: free_cash_flow_margin,
    },
    KpiDefinition {
        id: KpiId::CashRunway,
        name: "Cash Runway",
        category: KpiCategory::CashFlow,
        unit: KpiUnit::Months,
        direction: Direction::HigherIsBetter,
        thresholds: Thresholds::new(dec!(12), dec!(6), dec!(3)),
        source_fields: &[F::Cash, F::NetCashFlow],
        uses_prior_period: false,
        description: "Months the cash balance lasts at the current net burn.",
        compute: cash_runway,
    },
    // -- Growth --------------------------------------------------------------
    KpiDefinition {
        id: KpiId::RevenueGrowth,
        name: "Revenue Growth",
        category: KpiCategory::Growth,
        unit: KpiUnit::Percent,
        direction: Direction::HigherIsBetter,
        thresholds: Thresholds::new(dec!(0.10), dec!(0), dec!(-0.10)),
        source_fields: &[F::TotalRevenue],
        uses_prior_period: true,
        description: "Period-over-period change in total revenue.",
        compute: revenue_growth,
    },
];

/// The full KPI catalog.
pub fn kpi_catalog() -> &'static [KpiDefinition] {
    CATALOG
}

/// Look up a single definition.
pub fn definition(id: KpiId) -> Option<&'static KpiDefinition> {
    CATALOG.iter().find(|d| d.id == id)
}

// ---------------------------------------------------------------------------
// Compute inputs and outputs
// ---------------------------------------------------------------------------

/// Field access for a compute function. Records every field consulted, in
/// order, so results can name their sources.
pub struct KpiInputs<'a> {
    current: &'a FinancialStatementSnapshot,
    prior: Option<&'a FinancialStatementSnapshot>,
    source: Vec<String>,
}

impl<'a> KpiInputs<'a> {
    pub fn new(
        current: &'a FinancialStatementSnapshot,
        prior: Option<&'a FinancialStatementSnapshot>,
    ) -> Self {
        Self {
            current,
            prior,
            source: Vec::new(),
        }
    }

    /// Read fields from the current period; all must be present.
    pub fn require<const N: usize>(
        &mut self,
        fields: [StatementField; N],
    ) -> Result<[Money; N], Unavailable> {
        let snapshot = self.current;
        self.collect(snapshot, fields, "")
    }

    /// Read fields from the prior period; all must be present.
    pub fn require_prior<const N: usize>(
        &mut self,
        fields: [StatementField; N],
    ) -> Result<[Money; N], Unavailable> {
        match self.prior {
            Some(prior) => self.collect(prior, fields, "prior."),
            None => {
                for field in fields {
                    self.source.push(format!("prior.{field}"));
                }
                Err(Unavailable::insufficient_history())
            }
        }
    }

    /// Check a current-period field without recording it as a source.
    pub fn peek(&self, field: StatementField) -> Option<Money> {
        self.current.value(field)
    }

    /// Period length in days, recorded as a source.
    pub fn days_in_period(&mut self) -> u32 {
        self.note("days_in_period");
        self.current.days_in_period()
    }

    /// Scale a flow-over-stock ratio to a full year.
    ///
    /// Returns the scaled value and the suffix to append to the calculation
    /// string; annual periods are returned unchanged.
    pub fn annualize(&mut self, value: Decimal) -> Result<(Decimal, String), Unavailable> {
        let days = self.current.days_in_period();
        if days == DAYS_PER_YEAR {
            return Ok((value, String::new()));
        }
        self.note("days_in_period");
        let factor = Decimal::from(DAYS_PER_YEAR) / Decimal::from(days);
        let scaled = checked(value.checked_mul(factor), "annualized value")?;
        Ok((
            scaled,
            format!(" × {DAYS_PER_YEAR}/{days} = {}", show(scaled)),
        ))
    }

    pub fn note(&mut self, label: &str) {
        if !self.source.iter().any(|s| s == label) {
            self.source.push(label.to_string());
        }
    }

    pub fn into_source(self) -> Vec<String> {
        self.source
    }

    fn collect<const N: usize>(
        &mut self,
        snapshot: &FinancialStatementSnapshot,
        fields: [StatementField; N],
        prefix: &str,
    ) -> Result<[Money; N], Unavailable> {
        let mut missing = Vec::new();
        for field in fields {
            let label = format!("{prefix}{field}");
            if snapshot.value(field).is_none() {
                missing.push(label.clone());
            }
            self.note(&label);
        }
        if !missing.is_empty() {
            return Err(Unavailable::missing(&missing));
        }
        Ok(fields.map(|f| snapshot.value(f).unwrap_or_default()))
    }
}

/// A successfully computed KPI, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Computed {
    pub value: KpiValue,
    pub calculation: String,
    /// Set when the value is not a number and the status is decided by the
    /// compute function itself.
    pub fixed_status: Option<KpiStatus>,
}

impl Computed {
    pub fn number(value: Decimal, calculation: String) -> Self {
        Self {
            value: KpiValue::Number(value),
            calculation,
            fixed_status: None,
        }
    }

    pub fn text(text: &str, status: KpiStatus, calculation: String) -> Self {
        Self {
            value: KpiValue::Text(text.to_string()),
            calculation,
            fixed_status: Some(status),
        }
    }
}

// ---------------------------------------------------------------------------
// Arithmetic helpers
// ---------------------------------------------------------------------------

/// Render an operand for a calculation string.
pub(crate) fn show(value: Decimal) -> String {
    value.round_dp(6).normalize().to_string()
}

/// Divide, refusing zero and negative bases.
fn divide(numerator: Decimal, denominator: Decimal, base: &str) -> Result<Decimal, Unavailable> {
    if denominator.is_zero() {
        return Err(Unavailable::division_by_zero(base));
    }
    if denominator.is_sign_negative() {
        return Err(Unavailable::negative_base(base));
    }
    numerator
        .checked_div(denominator)
        .ok_or_else(|| Unavailable::out_of_range(format!("{base} division overflowed")))
}

/// Lift a checked operation into an out-of-range failure.
fn checked(value: Option<Decimal>, what: &str) -> Result<Decimal, Unavailable> {
    value.ok_or_else(|| Unavailable::out_of_range(format!("{what} overflowed")))
}

/// `numerator / denominator` over two current-period fields.
fn ratio(
    inputs: &mut KpiInputs<'_>,
    numerator: StatementField,
    denominator: StatementField,
) -> Result<(Decimal, String), Unavailable> {
    let [n, d] = inputs.require([numerator, denominator])?;
    let value = divide(n, d, denominator.as_str())?;
    Ok((
        value,
        format!(
            "{numerator} / {denominator} = {} / {} = {}",
            show(n),
            show(d),
            show(value)
        ),
    ))
}

fn simple_ratio(
    inputs: &mut KpiInputs<'_>,
    numerator: StatementField,
    denominator: StatementField,
) -> Result<Computed, Unavailable> {
    let (value, calculation) = ratio(inputs, numerator, denominator)?;
    Ok(Computed::number(value, calculation))
}

fn annualized_ratio(
    inputs: &mut KpiInputs<'_>,
    numerator: StatementField,
    denominator: StatementField,
) -> Result<Computed, Unavailable> {
    let (value, mut calculation) = ratio(inputs, numerator, denominator)?;
    let (value, suffix) = inputs.annualize(value)?;
    calculation.push_str(&suffix);
    Ok(Computed::number(value, calculation))
}

// ---------------------------------------------------------------------------
// Compute functions
// ---------------------------------------------------------------------------

fn current_ratio(inputs: &mut KpiInputs<'_>) -> Result<Computed, Unavailable> {
    simple_ratio(inputs, F::CurrentAssets, F::CurrentLiabilities)
}

fn quick_ratio(inputs: &mut KpiInputs<'_>) -> Result<Computed, Unavailable> {
    let [ca, inv, cl] = inputs.require([F::CurrentAssets, F::Inventory, F::CurrentLiabilities])?;
    let quick_assets = checked(ca.checked_sub(inv), "current_assets - inventory")?;
    let value = divide(quick_assets, cl, F::CurrentLiabilities.as_str())?;
    Ok(Computed::number(
        value,
        format!(
            "(current_assets - inventory) / current_liabilities = ({} - {}) / {} = {}",
            show(ca),
            show(inv),
            show(cl),
            show(value)
        ),
    ))
}

fn cash_ratio(inputs: &mut KpiInputs<'_>) -> Result<Computed, Unavailable> {
    simple_ratio(inputs, F::Cash, F::CurrentLiabilities)
}

fn working_capital_ratio(inputs: &mut KpiInputs<'_>) -> Result<Computed, Unavailable> {
    let [ca, cl, ta] = inputs.require([F::CurrentAssets, F::CurrentLiabilities, F::TotalAssets])?;
    let working_capital = checked(ca.checked_sub(cl), "working capital")?;
    let value = divide(working_capital, ta, F::TotalAssets.as_str())?;
    Ok(Computed::number(
        value,
        format!(
            "(current_assets - current_liabilities) / total_assets = ({} - {}) / {} = {}",
            show(ca),
            show(cl),
            show(ta),
            show(value)
        ),
    ))
}

fn gross_margin(inputs: &mut KpiInputs<'_>) -> Result<Computed, Unavailable> {
    if inputs.peek(F::GrossProfit).is_some() {
        return simple_ratio(inputs, F::GrossProfit, F::TotalRevenue);
    }
    // Derive gross profit when the statement omits it.
    let [revenue, cogs] = inputs.require([F::TotalRevenue, F::CostOfGoodsSold])?;
    let gross_profit = checked(revenue.checked_sub(cogs), "gross profit")?;
    let value = divide(gross_profit, revenue, F::TotalRevenue.as_str())?;
    Ok(Computed::number(
        value,
        format!(
            "(total_revenue - cost_of_goods_sold) / total_revenue = ({} - {}) / {} = {}",
            show(revenue),
            show(cogs),
            show(revenue),
            show(value)
        ),
    ))
}

fn operating_margin(inputs: &mut KpiInputs<'_>) -> Result<Computed, Unavailable> {
    simple_ratio(inputs, F::OperatingIncome, F::TotalRevenue)
}

fn net_margin(inputs: &mut KpiInputs<'_>) -> Result<Computed, Unavailable> {
    simple_ratio(inputs, F::NetIncome, F::TotalRevenue)
}

fn return_on_assets(inputs: &mut KpiInputs<'_>) -> Result<Computed, Unavailable> {
    annualized_ratio(inputs, F::NetIncome, F::TotalAssets)
}

fn return_on_equity(inputs: &mut KpiInputs<'_>) -> Result<Computed, Unavailable> {
    annualized_ratio(inputs, F::NetIncome, F::TotalEquity)
}

fn debt_to_equity(inputs: &mut KpiInputs<'_>) -> Result<Computed, Unavailable> {
    simple_ratio(inputs, F::TotalLiabilities, F::TotalEquity)
}

fn debt_ratio(inputs: &mut KpiInputs<'_>) -> Result<Computed, Unavailable> {
    simple_ratio(inputs, F::TotalLiabilities, F::TotalAssets)
}

fn interest_coverage(inputs: &mut KpiInputs<'_>) -> Result<Computed, Unavailable> {
    simple_ratio(inputs, F::OperatingIncome, F::InterestExpense)
}

fn asset_turnover(inputs: &mut KpiInputs<'_>) -> Result<Computed, Unavailable> {
    annualized_ratio(inputs, F::TotalRevenue, F::TotalAssets)
}

fn inventory_turnover(inputs: &mut KpiInputs<'_>) -> Result<Computed, Unavailable> {
    annualized_ratio(inputs, F::CostOfGoodsSold, F::Inventory)
}

fn days_sales_outstanding(inputs: &mut KpiInputs<'_>) -> Result<Computed, Unavailable> {
    let [ar, revenue] = inputs.require([F::AccountsReceivable, F::TotalRevenue])?;
    let days = inputs.days_in_period();
    let share = divide(ar, revenue, F::TotalRevenue.as_str())?;
    let value = checked(share.checked_mul(Decimal::from(days)), "days sales outstanding")?;
    Ok(Computed::number(
        value,
        format!(
            "accounts_receivable / total_revenue × days_in_period = {} / {} × {} = {}",
            show(ar),
            show(revenue),
            days,
            show(value)
        ),
    ))
}

fn operating_cash_flow_ratio(inputs: &mut KpiInputs<'_>) -> Result<Computed, Unavailable> {
    annualized_ratio(inputs, F::OperatingCashFlow, F::CurrentLiabilities)
}

fn free_cash_flow_margin(inputs: &mut KpiInputs<'_>) -> Result<Computed, Unavailable> {
    let [ocf, icf, revenue] =
        inputs.require([F::OperatingCashFlow, F::InvestingCashFlow, F::TotalRevenue])?;
    let free_cash_flow = checked(ocf.checked_add(icf), "free cash flow")?;
    let value = divide(free_cash_flow, revenue, F::TotalRevenue.as_str())?;
    Ok(Computed::number(
        value,
        format!(
            "(operating_cash_flow + investing_cash_flow) / total_revenue = ({} + {}) / {} = {}",
            show(ocf),
            show(icf),
            show(revenue),
            show(value)
        ),
    ))
}

fn cash_runway(inputs: &mut KpiInputs<'_>) -> Result<Computed, Unavailable> {
    let [cash, net_cash_flow] = inputs.require([F::Cash, F::NetCashFlow])?;
    let days = inputs.days_in_period();
    if cash < Decimal::ZERO {
        return Err(Unavailable::negative_base(F::Cash.as_str()));
    }
    if net_cash_flow >= Decimal::ZERO {
        return Ok(Computed::text(
            "Cash-flow positive",
            KpiStatus::Good,
            format!(
                "net_cash_flow = {} ≥ 0; cash balance is not being consumed",
                show(net_cash_flow)
            ),
        ));
    }
    let monthly_burn = checked(
        (-net_cash_flow)
            .checked_mul(AVG_DAYS_PER_MONTH)
            .and_then(|b| b.checked_div(Decimal::from(days))),
        "monthly burn",
    )?;
    let value = divide(cash, monthly_burn, "monthly burn")?;
    Ok(Computed::number(
        value,
        format!(
            "cash / (-net_cash_flow × {} / days_in_period) = {} / ({} × {} / {}) = {}",
            show(AVG_DAYS_PER_MONTH),
            show(cash),
            show(-net_cash_flow),
            show(AVG_DAYS_PER_MONTH),
            days,
            show(value)
        ),
    ))
}

fn revenue_growth(inputs: &mut KpiInputs<'_>) -> Result<Computed, Unavailable> {
    let [current] = inputs.require([F::TotalRevenue])?;
    let [prior] = inputs.require_prior([F::TotalRevenue])?;
    let delta = checked(current.checked_sub(prior), "revenue change")?;
    let value = divide(delta, prior, "prior.total_revenue")?;
    Ok(Computed::number(
        value,
        format!(
            "(total_revenue - prior.total_revenue) / prior.total_revenue = ({} - {}) / {} = {}",
            show(current),
            show(prior),
            show(prior),
            show(value)
        ),
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
