//! Non-fatal consistency checks over a snapshot series.
//!
//! Nothing here rejects input. Each finding becomes a warning string that
//! rides along in the computation envelope.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::statements::{FinancialStatementSnapshot, StatementField};
use crate::types::Rate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityIssueKind {
    EmptySeries,
    AccountingIdentity,
    NegativeAmount,
    GrossProfitMismatch,
    PeriodOrder,
    /// Amounts too large for a consistency check to be computed.
    Overflow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityIssue {
    pub kind: QualityIssueKind,
    /// Period the issue was found in; absent for series-level issues
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    pub message: String,
}

/// Run every check over the series. `tolerance` is the relative gap
/// (fraction of the reference amount) tolerated before flagging.
pub fn check_data_quality(
    snapshots: &[FinancialStatementSnapshot],
    tolerance: Rate,
) -> Vec<QualityIssue> {
    let mut issues = Vec::new();

    if snapshots.is_empty() {
        issues.push(QualityIssue {
            kind: QualityIssueKind::EmptySeries,
            period: None,
            message: "No snapshots supplied; every KPI is unavailable.".into(),
        });
    }

    for snap in snapshots {
        check_identity(snap, tolerance, &mut issues);
        check_negative_amounts(snap, &mut issues);
        check_gross_profit(snap, tolerance, &mut issues);
    }
    check_period_order(snapshots, &mut issues);

    for issue in &issues {
        tracing::warn!(kind = ?issue.kind, period = ?issue.period, "{}", issue.message);
    }
    issues
}

/// An allowance too large to represent cannot be exceeded by any gap.
fn exceeds(gap: Decimal, reference: Decimal, tolerance: Rate) -> bool {
    reference
        .abs()
        .checked_mul(tolerance)
        .is_some_and(|allowed| gap.abs() > allowed)
}

fn overflow(snap: &FinancialStatementSnapshot, check: &str) -> QualityIssue {
    QualityIssue {
        kind: QualityIssueKind::Overflow,
        period: Some(snap.period.clone()),
        message: format!(
            "{}: {check} could not be verified; amounts exceed decimal range",
            snap.period
        ),
    }
}

fn check_identity(snap: &FinancialStatementSnapshot, tolerance: Rate, issues: &mut Vec<QualityIssue>) {
    let bs = &snap.balance_sheet;
    let (Some(total_assets), Some(_), Some(_)) =
        (bs.total_assets, bs.total_liabilities, bs.total_equity)
    else {
        return;
    };
    let Some(gap) = snap.accounting_identity_gap() else {
        issues.push(overflow(snap, "the accounting identity"));
        return;
    };
    if exceeds(gap, total_assets, tolerance) {
        issues.push(QualityIssue {
            kind: QualityIssueKind::AccountingIdentity,
            period: Some(snap.period.clone()),
            message: format!(
                "{}: total_assets differs from total_liabilities + total_equity by {}",
                snap.period,
                gap.normalize()
            ),
        });
    }
}

fn check_negative_amounts(snap: &FinancialStatementSnapshot, issues: &mut Vec<QualityIssue>) {
    for field in StatementField::NON_NEGATIVE {
        if let Some(v) = snap.value(*field) {
            if v < Decimal::ZERO {
                issues.push(QualityIssue {
                    kind: QualityIssueKind::NegativeAmount,
                    period: Some(snap.period.clone()),
                    message: format!("{}: {} is negative ({})", snap.period, field, v.normalize()),
                });
            }
        }
    }
}

fn check_gross_profit(snap: &FinancialStatementSnapshot, tolerance: Rate, issues: &mut Vec<QualityIssue>) {
    let is = &snap.income_statement;
    let (Some(revenue), Some(cogs), Some(gross)) =
        (is.total_revenue, is.cost_of_goods_sold, is.gross_profit)
    else {
        return;
    };
    let Some(gap) = revenue
        .checked_sub(cogs)
        .and_then(|derived| gross.checked_sub(derived))
    else {
        issues.push(overflow(snap, "gross_profit"));
        return;
    };
    if exceeds(gap, revenue, tolerance) {
        issues.push(QualityIssue {
            kind: QualityIssueKind::GrossProfitMismatch,
            period: Some(snap.period.clone()),
            message: format!(
                "{}: gross_profit differs from total_revenue - cost_of_goods_sold by {}",
                snap.period,
                gap.normalize()
            ),
        });
    }
}

/// Only periods that parse as dates are compared.
fn check_period_order(snapshots: &[FinancialStatementSnapshot], issues: &mut Vec<QualityIssue>) {
    let dated: Vec<_> = snapshots
        .iter()
        .filter_map(|s| s.period_date().map(|d| (d, &s.period)))
        .collect();
    for pair in dated.windows(2) {
        let (prev_date, prev_label) = pair[0];
        let (date, label) = pair[1];
        if date <= prev_date {
            issues.push(QualityIssue {
                kind: QualityIssueKind::PeriodOrder,
                period: Some(label.clone()),
                message: format!(
                    "{label} does not follow {prev_label}; snapshots should be oldest first"
                ),
            });
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
