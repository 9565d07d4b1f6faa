// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, TimeZone, Utc};
use finledger::merge::{merge, merge_budgets, merge_with_stats};
use finledger::models::{BudgetLine, Currency, FinanceRecord};
use finledger::normalize::{ContextDefaults, normalize, normalize_budget};
use rust_decimal::Decimal;
use serde_json::json;

fn rec(id: &str, updated_at: &str, description: &str) -> FinanceRecord {
    let ctx = ContextDefaults {
        currency: Currency::Inr,
        today: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
        now: Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap(),
    };
    normalize(
        &json!({
            "id": id,
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": updated_at,
            "description": description
        }),
        &ctx,
    )
    .unwrap()
}

fn budget(month: &str, revenue: i64) -> BudgetLine {
    normalize_budget(&json!({"month": month, "revenueTarget": revenue})).unwrap()
}

#[test]
fn newer_incoming_replaces_existing() {
    let existing = vec![rec("a", "2024-01-01T00:00:00Z", "old")];
    let incoming = vec![rec("a", "2024-02-01T00:00:00Z", "new")];
    let (out, stats) = merge_with_stats(existing, incoming);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].description, "new");
    assert_eq!(stats.replaced, 1);
}

#[test]
fn newer_existing_survives_stale_incoming() {
    let existing = vec![rec("a", "2024-02-01T00:00:00Z", "local")];
    let incoming = vec![rec("a", "2024-01-01T00:00:00Z", "stale")];
    let (out, stats) = merge_with_stats(existing, incoming);
    assert_eq!(out[0].description, "local");
    assert_eq!(stats.kept, 1);
    assert_eq!(stats.replaced, 0);
}

#[test]
fn equal_timestamps_prefer_incoming() {
    let at = "2024-01-10T12:00:00Z";
    let out = merge(vec![rec("a", at, "local")], vec![rec("a", at, "imported")]);
    assert_eq!(out[0].description, "imported");
}

#[test]
fn union_keeps_existing_order_and_appends_new_ids() {
    let existing = vec![
        rec("a", "2024-01-01T00:00:00Z", ""),
        rec("b", "2024-01-01T00:00:00Z", ""),
    ];
    let incoming = vec![
        rec("c", "2024-01-01T00:00:00Z", ""),
        rec("a", "2024-01-05T00:00:00Z", "edited"),
        rec("d", "2024-01-01T00:00:00Z", ""),
    ];
    let (out, stats) = merge_with_stats(existing, incoming);
    let ids: Vec<&str> = out.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["a", "b", "c", "d"]);
    assert_eq!(out[0].description, "edited");
    assert_eq!(stats.added, 2);
    assert_eq!(stats.replaced, 1);
}

#[test]
fn duplicate_ids_within_incoming_collapse() {
    let incoming = vec![
        rec("a", "2024-01-03T00:00:00Z", "third"),
        rec("a", "2024-01-01T00:00:00Z", "first"),
    ];
    let out = merge(Vec::new(), incoming);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].description, "third");
}

#[test]
fn merge_is_a_no_op_on_identical_sets() {
    let set = vec![
        rec("a", "2024-01-01T00:00:00Z", "x"),
        rec("b", "2024-01-02T00:00:00Z", "y"),
    ];
    let out = merge(set.clone(), set.clone());
    assert_eq!(out, set);
}

#[test]
fn budgets_replace_by_month_and_sort() {
    let existing = vec![budget("2024-03", 100), budget("2024-01", 50)];
    let incoming = vec![budget("2024-03", 300), budget("2024-02", 75)];
    let out = merge_budgets(existing, incoming);
    let months: Vec<&str> = out.iter().map(|b| b.month.as_str()).collect();
    assert_eq!(months, ["2024-01", "2024-02", "2024-03"]);
    assert_eq!(out[2].revenue_target, Decimal::from(300));
}
