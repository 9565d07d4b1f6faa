// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Totals and KPIs derived from records on demand.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{BudgetLine, FinanceRecord, RecordType, Status};
use crate::tax::compute_totals;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSummary {
    pub records: usize,
    pub income_subtotal: Decimal,
    pub income_net: Decimal,
    pub expense_subtotal: Decimal,
    pub expense_net: Decimal,
    /// GST charged on income.
    pub gst_output: Decimal,
    /// GST paid on expenses.
    pub gst_input: Decimal,
    /// TDS withheld by clients on income.
    pub tds_receivable: Decimal,
    /// TDS we withhold on expenses.
    pub tds_payable: Decimal,
    pub profit: Decimal,
    /// Net income not yet paid.
    pub outstanding: Decimal,
    pub overdue: usize,
}

/// Aggregate `records`, optionally restricted to one `YYYY-MM`. Cancelled
/// records are left out.
pub fn summarize(records: &[FinanceRecord], month: Option<&str>) -> LedgerSummary {
    let mut s = LedgerSummary::default();
    for record in records {
        if record.status == Status::Cancelled {
            continue;
        }
        if let Some(m) = month {
            if record.month() != m {
                continue;
            }
        }
        let t = compute_totals(record);
        s.records += 1;
        match record.r#type {
            RecordType::Income => {
                s.income_subtotal += t.subtotal;
                s.income_net += t.net;
                s.gst_output += t.gst_add;
                s.tds_receivable += t.tds;
                if record.status != Status::Paid {
                    s.outstanding += t.net;
                }
            }
            RecordType::Expense => {
                s.expense_subtotal += t.subtotal;
                s.expense_net += t.net;
                s.gst_input += t.gst_add;
                s.tds_payable += t.tds;
            }
        }
        if record.status == Status::Overdue {
            s.overdue += 1;
        }
    }
    s.profit = s.income_subtotal - s.expense_subtotal;
    s
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetReport {
    pub month: String,
    pub revenue_target: Decimal,
    pub revenue_actual: Decimal,
    pub expense_cap: Decimal,
    pub expense_actual: Decimal,
    pub fixed_costs: Decimal,
    /// Recorded expenses plus planned fixed costs.
    pub committed: Decimal,
    pub over_cap: bool,
    pub gross_margin_target_pct: Decimal,
    /// `None` when there is no revenue to measure against, or when the
    /// ratio is too large to represent.
    pub gross_margin_pct: Option<Decimal>,
}

pub fn budget_report(budget: &BudgetLine, records: &[FinanceRecord]) -> BudgetReport {
    let s = summarize(records, Some(&budget.month));
    let fixed = budget.fixed_costs.total();
    let committed = s.expense_subtotal + fixed;
    let gross_margin_pct = (s.income_subtotal - s.expense_subtotal)
        .checked_div(s.income_subtotal)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map(|pct| pct.round_dp(2));
    BudgetReport {
        month: budget.month.clone(),
        revenue_target: budget.revenue_target,
        revenue_actual: s.income_subtotal,
        expense_cap: budget.expense_cap,
        expense_actual: s.expense_subtotal,
        fixed_costs: fixed,
        committed,
        over_cap: !budget.expense_cap.is_zero() && committed > budget.expense_cap,
        gross_margin_target_pct: budget.gross_margin_target_pct,
        gross_margin_pct,
    }
}
