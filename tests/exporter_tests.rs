// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{TimeZone, Utc};
use finledger::commands::exporter;
use finledger::csv_codec::EXPORT_COLUMNS;
use finledger::models::AuditAction;
use finledger::store::{MemoryStore, TXS_KEY};
use finledger::{Engine, FixedClock, cli};
use serde_json::{Value, json};
use tempfile::tempdir;

fn engine() -> Engine<MemoryStore> {
    let now = Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap();
    let store = MemoryStore::new().with(
        TXS_KEY,
        json!([
            {"id": "a", "date": "2024-03-01", "amount": "100", "description": "Venue, hall B"},
            {"id": "b", "date": "2024-03-02", "amount": "50"}
        ]),
    );
    Engine::open(store, FixedClock(now)).unwrap()
}

#[test]
fn export_rejects_unknown_format() {
    let mut engine = engine();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("out.txt");
    let out_str = out_path.to_str().unwrap().to_string();

    let matches = cli::build_cli().get_matches_from(vec![
        "finledger",
        "export",
        "--format",
        "xml",
        "--out",
        &out_str,
    ]);
    let (_, export_m) = matches.subcommand().unwrap();
    let err = exporter::handle(&mut engine, export_m).unwrap_err();
    assert!(err.to_string().contains("Unknown format"));
    assert!(!out_path.exists());
}

#[test]
fn csv_export_writes_fixed_header() {
    let mut engine = engine();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("ledger.csv");
    let out_str = out_path.to_str().unwrap().to_string();

    let matches =
        cli::build_cli().get_matches_from(vec!["finledger", "export", "--out", &out_str]);
    let (_, export_m) = matches.subcommand().unwrap();
    exporter::handle(&mut engine, export_m).unwrap();

    let text = std::fs::read_to_string(&out_path).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next().unwrap(), EXPORT_COLUMNS.join(","));
    assert!(lines.next().unwrap().contains("\"Venue, hall B\""));
    assert_eq!(
        engine.audit().entries().next_back().unwrap().action,
        AuditAction::ExportCsv
    );
}

#[test]
fn json_export_writes_backup_document() {
    let mut engine = engine();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("backup.json");
    let out_str = out_path.to_str().unwrap().to_string();

    let matches = cli::build_cli().get_matches_from(vec![
        "finledger",
        "export",
        "--format",
        " JSON ",
        "--out",
        &out_str,
    ]);
    let (_, export_m) = matches.subcommand().unwrap();
    exporter::handle(&mut engine, export_m).unwrap();

    let doc: Value = serde_json::from_str(&std::fs::read_to_string(&out_path).unwrap()).unwrap();
    assert_eq!(doc["txs"].as_array().unwrap().len(), 2);
    assert!(doc["budgets"].is_array());
    assert!(doc["settings"].is_object());
}
