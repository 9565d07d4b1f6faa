// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, TimeZone, Utc};
use finledger::commands::transactions;
use finledger::models::{Category, Frequency, PaymentMethod, RecordType, Status};
use finledger::store::{MemoryStore, TXS_KEY};
use finledger::{Engine, FixedClock, cli};
use rust_decimal::Decimal;
use serde_json::json;

fn setup() -> Engine<MemoryStore> {
    let now = Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap();
    let store = MemoryStore::new().with(
        TXS_KEY,
        json!([
            {"id": "t1", "date": "2024-03-01", "amount": "10", "status": "Pending",
             "createdAt": "2024-03-01T08:00:00Z"},
            {"id": "t2", "date": "2024-03-03", "amount": "20", "status": "Paid",
             "createdAt": "2024-03-03T08:00:00Z"},
            {"id": "t3", "date": "2024-03-03", "amount": "30", "status": "Pending",
             "createdAt": "2024-03-03T09:00:00Z"},
            {"id": "t4", "date": "2024-02-20", "amount": "40", "status": "Pending",
             "createdAt": "2024-02-20T08:00:00Z"}
        ]),
    );
    Engine::open(store, FixedClock(now)).unwrap()
}

fn tx(engine: &mut Engine<MemoryStore>, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["finledger", "tx"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    let (_, tx_m) = matches.subcommand().unwrap();
    transactions::handle(engine, tx_m)
}

#[test]
fn list_orders_newest_first_and_respects_limit() {
    let engine = setup();
    let matches =
        cli::build_cli().get_matches_from(vec!["finledger", "tx", "list", "--limit", "3"]);
    let (_, tx_m) = matches.subcommand().unwrap();
    let (_, list_m) = tx_m.subcommand().unwrap();

    let rows = transactions::query_rows(&engine, list_m).unwrap();
    let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["t3", "t2", "t1"]);
}

#[test]
fn list_filters_by_month_and_status() {
    let engine = setup();
    let matches = cli::build_cli().get_matches_from(vec![
        "finledger", "tx", "list", "--month", "2024-03", "--status", "pending",
    ]);
    let (_, tx_m) = matches.subcommand().unwrap();
    let (_, list_m) = tx_m.subcommand().unwrap();

    let rows = transactions::query_rows(&engine, list_m).unwrap();
    let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["t3", "t1"]);
}

#[test]
fn add_records_taxes_and_schedule() {
    let mut engine = setup();
    tx(
        &mut engine,
        &[
            "add", "--id", "inv-9", "--type", "Income", "--date", "2024-03-10", "--amount",
            "1,000", "--gst", "18", "--tds", "10", "--category", "consulting", "--method",
            "upi", "--client", "Acme", "--due", "2024-03-25", "--recurring", "Quarterly",
        ],
    )
    .unwrap();

    let r = engine.record("inv-9").unwrap();
    assert_eq!(r.r#type, RecordType::Income);
    assert_eq!(r.amount, Decimal::from(1000));
    assert_eq!(r.gst_rate, Decimal::from(18));
    assert!(!r.gst_included);
    assert_eq!(r.category, Category::Consulting);
    assert_eq!(r.payment_method, PaymentMethod::Upi);
    assert_eq!(r.client_name.as_deref(), Some("Acme"));
    assert_eq!(r.due_date, NaiveDate::from_ymd_opt(2024, 3, 25));
    assert_eq!(r.recurring.as_ref().unwrap().freq, Frequency::Quarterly);
}

#[test]
fn add_with_gst_included_flag() {
    let mut engine = setup();
    tx(
        &mut engine,
        &["add", "--id", "x", "--amount", "118", "--gst", "18", "--gst-included"],
    )
    .unwrap();
    let r = engine.record("x").unwrap();
    assert!(r.gst_included);
    assert_eq!(r.r#type, RecordType::Expense);
}

#[test]
fn add_rejects_bad_date_and_amount() {
    let mut engine = setup();
    let err = tx(&mut engine, &["add", "--amount", "10", "--date", "03/10/2024"]).unwrap_err();
    assert!(err.to_string().contains("Invalid date"));
    let err = tx(&mut engine, &["add", "--amount", "ten"]).unwrap_err();
    assert!(err.to_string().contains("Invalid decimal"));
    assert_eq!(engine.records().len(), 4);
}

#[test]
fn status_command_applies_lifecycle_rules() {
    let mut engine = setup();
    tx(&mut engine, &["status", "--id", "t1", "--to", "Paid"]).unwrap();
    assert_eq!(engine.record("t1").unwrap().status, Status::Paid);

    let err = tx(&mut engine, &["status", "--id", "t3", "--to", "Overdue"]).unwrap_err();
    assert!(err.to_string().contains("Invalid status transition"));
    assert_eq!(engine.record("t3").unwrap().status, Status::Pending);
}

#[test]
fn rm_deletes_record() {
    let mut engine = setup();
    tx(&mut engine, &["rm", "--id", " t2 "]).unwrap();
    assert!(engine.record("t2").is_none());
    assert!(tx(&mut engine, &["rm", "--id", "t2"]).is_err());
}
