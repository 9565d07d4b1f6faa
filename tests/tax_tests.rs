// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, TimeZone, Utc};
use finledger::models::{AMOUNT_MAX, Currency, FinanceRecord};
use finledger::normalize::{ContextDefaults, normalize};
use finledger::tax::compute_totals;
use rust_decimal::Decimal;
use serde_json::json;

fn record(amount: &str, gst: &str, included: bool, tds: &str) -> FinanceRecord {
    let ctx = ContextDefaults {
        currency: Currency::Inr,
        today: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
        now: Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap(),
    };
    normalize(
        &json!({"id": "t", "amount": amount, "gstRate": gst, "gstIncluded": included, "tdsRate": tds}),
        &ctx,
    )
    .unwrap()
}

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

#[test]
fn gst_added_then_tds_withheld_from_subtotal() {
    let t = compute_totals(&record("1000", "18", false, "10"));
    assert_eq!(t.base, d("1000"));
    assert_eq!(t.gst_add, d("180"));
    assert_eq!(t.subtotal, d("1180"));
    assert_eq!(t.tds, d("118"));
    assert_eq!(t.net, d("1062"));
}

#[test]
fn gst_included_adds_nothing() {
    let t = compute_totals(&record("1000", "18", true, "10"));
    assert_eq!(t.gst_add, Decimal::ZERO);
    assert_eq!(t.subtotal, d("1000"));
    assert_eq!(t.tds, d("100"));
    assert_eq!(t.net, d("900"));
}

#[test]
fn zero_rates_pass_amount_through() {
    let t = compute_totals(&record("2500.75", "0", false, "0"));
    assert_eq!(t.subtotal, d("2500.75"));
    assert_eq!(t.net, d("2500.75"));
}

#[test]
fn fractional_results_keep_full_precision() {
    let t = compute_totals(&record("999.99", "18", false, "2"));
    assert_eq!(t.gst_add, d("179.9982"));
    assert_eq!(t.subtotal, d("1179.9882"));
    assert_eq!(t.tds, d("23.599764"));
    assert_eq!(t.net, d("1156.388436"));
}

#[test]
fn totals_identity_holds() {
    let amounts = ["0", "1", "99.5", "1000", "123456.78"];
    let gst = ["0", "5", "12", "18", "28"];
    let tds = ["0", "1", "10", "20"];
    for a in amounts {
        for g in gst {
            for t in tds {
                for included in [false, true] {
                    let r = record(a, g, included, t);
                    let totals = compute_totals(&r);
                    let hundred = Decimal::ONE_HUNDRED;
                    assert_eq!(
                        totals.net,
                        r.amount + totals.gst_add - totals.subtotal * r.tds_rate / hundred
                    );
                    assert!(totals.net <= totals.subtotal);
                    assert!(totals.subtotal <= r.amount * (Decimal::ONE + r.gst_rate / hundred));
                }
            }
        }
    }
}

#[test]
fn oversized_amounts_are_bounded_before_tax() {
    let r = record("79228162514264337593543950335", "28", false, "10");
    assert_eq!(r.amount, Decimal::from(AMOUNT_MAX));
    let t = compute_totals(&r);
    assert_eq!(t.gst_add, d("280000000000000"));
    assert_eq!(t.subtotal, d("1280000000000000"));
    assert_eq!(t.tds, d("128000000000000"));
    assert_eq!(t.net, d("1152000000000000"));

    let r = record("-79228162514264337593543950335", "28", false, "20");
    assert_eq!(r.amount, -Decimal::from(AMOUNT_MAX));
    let t = compute_totals(&r);
    assert_eq!(t.net, d("-1024000000000000"));
}
