//! Periodic financial-statement snapshots consumed by the KPI engine.
//!
//! Every amount is optional. Upstream document extraction frequently yields
//! gaps, `null`s, or JavaScript `NaN`s; those deserialize to `None` so one bad
//! cell never rejects the whole snapshot.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

use crate::types::Money;

/// Default reporting period length when a snapshot does not declare one.
pub const DEFAULT_DAYS_IN_PERIOD: u32 = 365;

// ---------------------------------------------------------------------------
// Statement records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BalanceSheet {
    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub total_assets: Option<Money>,
    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub current_assets: Option<Money>,
    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub non_current_assets: Option<Money>,
    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub total_liabilities: Option<Money>,
    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub current_liabilities: Option<Money>,
    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub non_current_liabilities: Option<Money>,
    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub total_equity: Option<Money>,
    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub cash: Option<Money>,
    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub accounts_receivable: Option<Money>,
    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub inventory: Option<Money>,
    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub accounts_payable: Option<Money>,
    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub short_term_debt: Option<Money>,
    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub long_term_debt: Option<Money>,
    /// Signed; accumulated deficits are negative.
    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub retained_earnings: Option<Money>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncomeStatement {
    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub total_revenue: Option<Money>,
    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub cost_of_goods_sold: Option<Money>,
    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub gross_profit: Option<Money>,
    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub operating_expenses: Option<Money>,
    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub operating_income: Option<Money>,
    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub interest_expense: Option<Money>,
    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub tax_expense: Option<Money>,
    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub net_income: Option<Money>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CashFlowStatement {
    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub operating_cash_flow: Option<Money>,
    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub investing_cash_flow: Option<Money>,
    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub financing_cash_flow: Option<Money>,
    #[serde(default, deserialize_with = "lenient_amount", skip_serializing_if = "Option::is_none")]
    pub net_cash_flow: Option<Money>,
}

/// One reporting period's full set of statements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialStatementSnapshot {
    /// Period identifier, e.g. "2024-01-31", "2024-02" or "FY2023"
    pub period: String,
    #[serde(default)]
    pub company_name: String,
    /// Length of the period in days (31 for a month, 365 for a year)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_in_period: Option<u32>,
    #[serde(default)]
    pub balance_sheet: BalanceSheet,
    #[serde(default)]
    pub income_statement: IncomeStatement,
    #[serde(default)]
    pub cash_flow: CashFlowStatement,
}

impl FinancialStatementSnapshot {
    /// Look up a single line item by field identifier.
    pub fn value(&self, field: StatementField) -> Option<Money> {
        use StatementField::*;
        let bs = &self.balance_sheet;
        let is = &self.income_statement;
        let cf = &self.cash_flow;
        match field {
            TotalAssets => bs.total_assets,
            CurrentAssets => bs.current_assets,
            NonCurrentAssets => bs.non_current_assets,
            TotalLiabilities => bs.total_liabilities,
            CurrentLiabilities => bs.current_liabilities,
            NonCurrentLiabilities => bs.non_current_liabilities,
            TotalEquity => bs.total_equity,
            Cash => bs.cash,
            AccountsReceivable => bs.accounts_receivable,
            Inventory => bs.inventory,
            AccountsPayable => bs.accounts_payable,
            ShortTermDebt => bs.short_term_debt,
            LongTermDebt => bs.long_term_debt,
            RetainedEarnings => bs.retained_earnings,
            TotalRevenue => is.total_revenue,
            CostOfGoodsSold => is.cost_of_goods_sold,
            GrossProfit => is.gross_profit,
            OperatingExpenses => is.operating_expenses,
            OperatingIncome => is.operating_income,
            InterestExpense => is.interest_expense,
            TaxExpense => is.tax_expense,
            NetIncome => is.net_income,
            OperatingCashFlow => cf.operating_cash_flow,
            InvestingCashFlow => cf.investing_cash_flow,
            FinancingCashFlow => cf.financing_cash_flow,
            NetCashFlow => cf.net_cash_flow,
        }
    }

    pub fn days_in_period(&self) -> u32 {
        match self.days_in_period {
            Some(days) if days > 0 => days,
            _ => DEFAULT_DAYS_IN_PERIOD,
        }
    }

    /// Parse the period label as a date, if it looks like one.
    ///
    /// Accepts `YYYY-MM-DD` and `YYYY-MM` (read as the first of the month).
    pub fn period_date(&self) -> Option<NaiveDate> {
        let label = self.period.trim();
        NaiveDate::parse_from_str(label, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(&format!("{label}-01"), "%Y-%m-%d"))
            .ok()
    }

    /// totalAssets − (totalLiabilities + totalEquity). `None` when a term is
    /// absent or the arithmetic overflows.
    pub fn accounting_identity_gap(&self) -> Option<Money> {
        let bs = &self.balance_sheet;
        let claims = bs.total_liabilities?.checked_add(bs.total_equity?)?;
        bs.total_assets?.checked_sub(claims)
    }
}

// ---------------------------------------------------------------------------
// Field identifiers
// ---------------------------------------------------------------------------

/// Identifier for every line item a KPI may consult.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementField {
    TotalAssets,
    CurrentAssets,
    NonCurrentAssets,
    TotalLiabilities,
    CurrentLiabilities,
    NonCurrentLiabilities,
    TotalEquity,
    Cash,
    AccountsReceivable,
    Inventory,
    AccountsPayable,
    ShortTermDebt,
    LongTermDebt,
    RetainedEarnings,
    TotalRevenue,
    CostOfGoodsSold,
    GrossProfit,
    OperatingExpenses,
    OperatingIncome,
    InterestExpense,
    TaxExpense,
    NetIncome,
    OperatingCashFlow,
    InvestingCashFlow,
    FinancingCashFlow,
    NetCashFlow,
}

impl StatementField {
    /// Fields that must never be negative on a well-formed statement.
    pub const NON_NEGATIVE: &'static [StatementField] = &[
        Self::TotalAssets,
        Self::CurrentAssets,
        Self::NonCurrentAssets,
        Self::TotalLiabilities,
        Self::CurrentLiabilities,
        Self::NonCurrentLiabilities,
        Self::Cash,
        Self::AccountsReceivable,
        Self::Inventory,
        Self::AccountsPayable,
        Self::ShortTermDebt,
        Self::LongTermDebt,
        Self::TotalRevenue,
        Self::CostOfGoodsSold,
        Self::OperatingExpenses,
        Self::InterestExpense,
    ];

    pub fn as_str(self) -> &'static str {
        use StatementField::*;
        match self {
            TotalAssets => "total_assets",
            CurrentAssets => "current_assets",
            NonCurrentAssets => "non_current_assets",
            TotalLiabilities => "total_liabilities",
            CurrentLiabilities => "current_liabilities",
            NonCurrentLiabilities => "non_current_liabilities",
            TotalEquity => "total_equity",
            Cash => "cash",
            AccountsReceivable => "accounts_receivable",
            Inventory => "inventory",
            AccountsPayable => "accounts_payable",
            ShortTermDebt => "short_term_debt",
            LongTermDebt => "long_term_debt",
            RetainedEarnings => "retained_earnings",
            TotalRevenue => "total_revenue",
            CostOfGoodsSold => "cost_of_goods_sold",
            GrossProfit => "gross_profit",
            OperatingExpenses => "operating_expenses",
            OperatingIncome => "operating_income",
            InterestExpense => "interest_expense",
            TaxExpense => "tax_expense",
            NetIncome => "net_income",
            OperatingCashFlow => "operating_cash_flow",
            InvestingCashFlow => "investing_cash_flow",
            FinancingCashFlow => "financing_cash_flow",
            NetCashFlow => "net_cash_flow",
        }
    }
}

impl std::fmt::Display for StatementField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Lenient amount parsing
// ---------------------------------------------------------------------------

/// Deserialize an amount, mapping anything that is not a finite number to `None`.
///
/// Accepts JSON numbers (including exponent form), numeric strings with
/// optional thousands separators, and `null`. `"NaN"`, `"Infinity"`, empty
/// strings, booleans and nested values all become `None`.
pub fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<Money>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(parse_amount(&raw))
}

/// Parse a single JSON amount with the same leniency as [`lenient_amount`].
pub fn parse_amount(raw: &serde_json::Value) -> Option<Money> {
    match raw {
        serde_json::Value::Number(n) => parse_decimal_text(&n.to_string()),
        serde_json::Value::String(s) => parse_decimal_text(&s.replace(',', "")),
        _ => None,
    }
}

fn parse_decimal_text(text: &str) -> Option<Decimal> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
