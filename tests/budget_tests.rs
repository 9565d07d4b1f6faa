// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{TimeZone, Utc};
use finledger::commands::budgets;
use finledger::models::AMOUNT_MAX;
use finledger::store::{MemoryStore, TXS_KEY};
use finledger::summary::{budget_report, summarize};
use finledger::{Engine, FixedClock, cli};
use rust_decimal::Decimal;
use serde_json::json;

fn setup() -> Engine<MemoryStore> {
    let now = Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap();
    let store = MemoryStore::new().with(
        TXS_KEY,
        json!([
            {"id": "inc", "type": "Income", "status": "Pending", "date": "2024-03-02",
             "amount": 1000, "gstRate": 18, "tdsRate": 10},
            {"id": "exp", "type": "Expense", "status": "Paid", "date": "2024-03-05",
             "amount": 500, "gstRate": 18},
            {"id": "void", "type": "Income", "status": "Cancelled", "date": "2024-03-07",
             "amount": 999},
            {"id": "feb", "type": "Income", "status": "Paid", "date": "2024-02-10",
             "amount": 300}
        ]),
    );
    Engine::open(store, FixedClock(now)).unwrap()
}

fn d(n: i64) -> Decimal {
    Decimal::from(n)
}

fn budget(engine: &mut Engine<MemoryStore>, args: &[&str]) {
    let mut argv = vec!["finledger", "budget", "set"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    let (_, budget_m) = matches.subcommand().unwrap();
    budgets::handle(engine, budget_m).unwrap();
}

#[test]
fn month_summary_splits_gst_and_tds() {
    let engine = setup();
    let s = summarize(engine.records(), Some("2024-03"));
    assert_eq!(s.records, 2);
    assert_eq!(s.income_subtotal, d(1180));
    assert_eq!(s.income_net, d(1062));
    assert_eq!(s.gst_output, d(180));
    assert_eq!(s.tds_receivable, d(118));
    assert_eq!(s.expense_subtotal, d(590));
    assert_eq!(s.gst_input, d(90));
    assert_eq!(s.tds_payable, Decimal::ZERO);
    assert_eq!(s.profit, d(590));
    assert_eq!(s.outstanding, d(1062));
}

#[test]
fn unfiltered_summary_skips_only_cancelled() {
    let engine = setup();
    let s = summarize(engine.records(), None);
    assert_eq!(s.records, 3);
    assert_eq!(s.income_subtotal, d(1480));
}

#[test]
fn set_keeps_unspecified_fields() {
    let mut engine = setup();
    budget(&mut engine, &["--month", "2024-03", "--revenue", "2000", "--rent", "300"]);
    budget(
        &mut engine,
        &["--month", "2024-03-01", "--cap", "1000", "--salaries", "200"],
    );

    let line = engine.budget("2024-03").unwrap();
    assert_eq!(line.revenue_target, d(2000));
    assert_eq!(line.expense_cap, d(1000));
    assert_eq!(line.fixed_costs.rent, d(300));
    assert_eq!(line.fixed_costs.salaries, d(200));
    assert_eq!(engine.budgets().len(), 1);
}

#[test]
fn budget_report_compares_actuals() {
    let mut engine = setup();
    budget(
        &mut engine,
        &[
            "--month", "2024-03", "--revenue", "2000", "--cap", "1000", "--margin", "40",
            "--rent", "300", "--salaries", "200",
        ],
    );
    let line = engine.budget("2024-03").unwrap();
    let report = budget_report(line, engine.records());

    assert_eq!(report.revenue_actual, d(1180));
    assert_eq!(report.expense_actual, d(590));
    assert_eq!(report.fixed_costs, d(500));
    assert_eq!(report.committed, d(1090));
    assert!(report.over_cap);
    assert_eq!(report.gross_margin_pct, Some(d(50)));
    assert_eq!(report.gross_margin_target_pct, d(40));
}

#[test]
fn margin_target_is_clamped() {
    let mut engine = setup();
    budget(&mut engine, &["--month", "2024-04", "--margin", "95"]);
    assert_eq!(engine.budget("2024-04").unwrap().gross_margin_target_pct, d(80));
    let report = budget_report(engine.budget("2024-04").unwrap(), engine.records());
    assert_eq!(report.gross_margin_pct, None);
    assert!(report.over_cap);
}

#[test]
fn extreme_amounts_summarize_without_overflow() {
    let now = Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap();
    let store = MemoryStore::new().with(
        TXS_KEY,
        json!([
            {"id": "big-in", "type": "Income", "status": "Paid", "date": "2024-05-02",
             "amount": "79228162514264337593543950335", "gstRate": 28, "tdsRate": 20},
            {"id": "big-out", "type": "Expense", "status": "Paid", "date": "2024-05-03",
             "amount": "79228162514264337593543950335", "gstRate": 28},
            {"id": "dust", "type": "Income", "status": "Paid", "date": "2024-06-01",
             "amount": "0.0000000000000000000000000001"},
            {"id": "big-jun", "type": "Expense", "status": "Paid", "date": "2024-06-02",
             "amount": "79228162514264337593543950335", "gstRate": 28}
        ]),
    );
    let mut engine = Engine::open(store, FixedClock(now)).unwrap();

    let s = summarize(engine.records(), Some("2024-05"));
    assert_eq!(s.income_subtotal, d(1_280_000_000_000_000));
    assert_eq!(s.expense_subtotal, d(1_280_000_000_000_000));
    assert_eq!(s.profit, Decimal::ZERO);

    engine
        .upsert_budget(&json!({"month": "2024-06", "expenseCap": "5000000000000000", "revenueTarget": 5}))
        .unwrap();
    let line = engine.budget("2024-06").unwrap();
    assert_eq!(line.expense_cap, Decimal::from(AMOUNT_MAX));
    let report = budget_report(line, engine.records());
    assert_eq!(report.expense_actual, d(1_280_000_000_000_000));
    assert_eq!(report.gross_margin_pct, None);
    assert!(report.over_cap);
}
