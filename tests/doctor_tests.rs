// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use finledger::commands::doctor::diagnose;
use finledger::store::{BUDGETS_KEY, MemoryStore, TXS_KEY};
use serde_json::json;

fn kinds(store: &MemoryStore) -> Vec<String> {
    diagnose(store).unwrap().into_iter().map(|i| i.issue).collect()
}

#[test]
fn clean_store_has_no_issues() {
    let store = MemoryStore::new().with(
        TXS_KEY,
        json!([{"id": "a", "status": "Paid", "gstRate": 18, "category": "Rent"}]),
    );
    assert!(kinds(&store).is_empty());
    assert!(kinds(&MemoryStore::new()).is_empty());
}

#[test]
fn reports_what_normalization_would_change() {
    let store = MemoryStore::new()
        .with(
            TXS_KEY,
            json!([
                {"id": "a", "status": "Archived", "gstRate": "35"},
                {"id": "a", "tdsRate": -1},
                {"amount": 5},
                "junk",
                {"id": "b", "recurring": {"enabled": true, "freq": "Fortnightly"}}
            ]),
        )
        .with(
            BUDGETS_KEY,
            json!([{"month": "2024-03"}, {"month": "2024-03-15"}, {"revenueTarget": 1}]),
        );
    let found = kinds(&store);
    assert_eq!(
        found,
        [
            "unknown_value",
            "rate_out_of_range",
            "rate_out_of_range",
            "record_without_id",
            "record_not_object",
            "unknown_value",
            "duplicate_id",
            "budget_without_month",
            "duplicate_budget_month",
        ]
    );
}

#[test]
fn non_array_records_are_flagged() {
    let store = MemoryStore::new().with(TXS_KEY, json!({"id": "a"}));
    assert_eq!(kinds(&store), ["txs_not_array"]);
}

#[test]
fn oversized_amounts_are_flagged() {
    let store = MemoryStore::new().with(
        TXS_KEY,
        json!([
            {"id": "a", "amount": "79228162514264337593543950335"},
            {"id": "b", "amount": "-2000000000000000"},
            {"id": "c", "amount": "1000000000000000"}
        ]),
    );
    let found = diagnose(&store).unwrap();
    let ids: Vec<_> = found.iter().map(|i| (i.issue.as_str(), &i.detail[..1])).collect();
    assert_eq!(ids, [("amount_out_of_range", "a"), ("amount_out_of_range", "b")]);
}
