// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{
    AMOUNT_MAX, Category, Choice, Currency, Frequency, GST_RATE_MAX, PaymentMethod, RecordType,
    Status, TDS_RATE_MAX,
};
use crate::normalize::as_items;
use crate::store::{BUDGETS_KEY, Store, TXS_KEY};
use crate::utils::{lenient_decimal, lenient_month, maybe_print_json, pretty_table};
use anyhow::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub issue: String,
    pub detail: String,
}

fn issue(kind: &str, detail: String) -> Issue {
    Issue {
        issue: kind.to_string(),
        detail,
    }
}

/// Read-only scan of stored data for entries the normalizer would drop,
/// default or clamp. Nothing is written.
pub fn diagnose<S: Store>(store: &S) -> Result<Vec<Issue>> {
    let mut rows = Vec::new();

    let raw_txs = store.get(TXS_KEY)?;
    if raw_txs.as_ref().is_some_and(|v| !v.is_array()) {
        rows.push(issue("txs_not_array", TXS_KEY.to_string()));
    }
    let mut seen: HashMap<String, usize> = HashMap::new();
    for (idx, raw) in as_items(raw_txs.as_ref()).iter().enumerate() {
        let Some(obj) = raw.as_object() else {
            rows.push(issue("record_not_object", format!("#{}", idx)));
            continue;
        };
        let id = match obj.get("id") {
            Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            _ => {
                rows.push(issue("record_without_id", format!("#{}", idx)));
                continue;
            }
        };
        *seen.entry(id.clone()).or_insert(0) += 1;

        check_choice::<RecordType>(&mut rows, &id, obj.get("type"), "type");
        check_choice::<Status>(&mut rows, &id, obj.get("status"), "status");
        check_choice::<Category>(&mut rows, &id, obj.get("category"), "category");
        check_choice::<PaymentMethod>(&mut rows, &id, obj.get("paymentMethod"), "paymentMethod");
        check_choice::<Currency>(&mut rows, &id, obj.get("currency"), "currency");
        check_rate(&mut rows, &id, obj.get("gstRate"), "gstRate", GST_RATE_MAX);
        check_rate(&mut rows, &id, obj.get("tdsRate"), "tdsRate", TDS_RATE_MAX);
        if let Some(amount) = number(obj.get("amount")) {
            if amount.abs() > Decimal::from(AMOUNT_MAX) {
                rows.push(issue(
                    "amount_out_of_range",
                    format!("{}: amount={} will be clamped to ±{}", id, amount, AMOUNT_MAX),
                ));
            }
        }
        if let Some(rec) = obj.get("recurring").and_then(Value::as_object) {
            if rec.get("enabled") == Some(&Value::Bool(true)) {
                check_choice::<Frequency>(&mut rows, &id, rec.get("freq"), "recurring.freq");
            }
        }
    }
    let mut dupes: Vec<_> = seen.into_iter().filter(|(_, n)| *n > 1).collect();
    dupes.sort();
    for (id, n) in dupes {
        rows.push(issue("duplicate_id", format!("{} x{}", id, n)));
    }

    let raw_budgets = store.get(BUDGETS_KEY)?;
    let mut months: HashMap<String, usize> = HashMap::new();
    for (idx, raw) in as_items(raw_budgets.as_ref()).iter().enumerate() {
        match raw.get("month").and_then(Value::as_str).and_then(lenient_month) {
            Some(m) => *months.entry(m).or_insert(0) += 1,
            None => rows.push(issue("budget_without_month", format!("#{}", idx))),
        }
    }
    let mut dup_months: Vec<_> = months.into_iter().filter(|(_, n)| *n > 1).collect();
    dup_months.sort();
    for (m, n) in dup_months {
        rows.push(issue("duplicate_budget_month", format!("{} x{}", m, n)));
    }
    Ok(rows)
}

fn check_choice<C: Choice>(rows: &mut Vec<Issue>, id: &str, v: Option<&Value>, field: &str) {
    if let Some(Value::String(s)) = v {
        if !s.trim().is_empty() && C::parse(s).is_none() {
            rows.push(issue(
                "unknown_value",
                format!("{}: {}='{}' will use the default", id, field, s),
            ));
        }
    }
}

fn number(v: Option<&Value>) -> Option<Decimal> {
    match v {
        Some(Value::Number(n)) => lenient_decimal(&n.to_string()),
        Some(Value::String(s)) => lenient_decimal(s),
        _ => None,
    }
}

fn check_rate(rows: &mut Vec<Issue>, id: &str, v: Option<&Value>, field: &str, max: u32) {
    if let Some(rate) = number(v) {
        if rate < Decimal::ZERO || rate > Decimal::from(max) {
            rows.push(issue(
                "rate_out_of_range",
                format!("{}: {}={} will be clamped to 0..={}", id, field, rate, max),
            ));
        }
    }
}

pub fn handle<S: Store>(store: &S, m: &clap::ArgMatches) -> Result<()> {
    let rows = diagnose(store)?;
    if maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &rows)? {
        return Ok(());
    }
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        let data = rows.into_iter().map(|r| vec![r.issue, r.detail]).collect();
        println!("{}", pretty_table(&["Issue", "Detail"], data));
    }
    Ok(())
}
