// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{TimeZone, Utc};
use finledger::commands::importer;
use finledger::store::MemoryStore;
use finledger::{Engine, FixedClock, cli};
use std::io::Write;
use tempfile::NamedTempFile;

fn engine() -> Engine<MemoryStore> {
    let now = Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap();
    Engine::open(MemoryStore::new(), FixedClock(now)).unwrap()
}

fn run_import(engine: &mut Engine<MemoryStore>, kind: &str, path: &str) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from(vec!["finledger", "import", kind, "--path", path]);
    let (_, import_m) = matches.subcommand().unwrap();
    importer::handle(engine, import_m)
}

#[test]
fn importer_trims_cli_path_argument() {
    let mut engine = engine();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "id,date,type,amount,gstRate,category\ninv-1,2024-03-01,Income,1000,18,Consulting"
    )
    .unwrap();
    file.flush().unwrap();

    let path = file.path().to_str().unwrap().to_string();
    let padded = format!("  {}  ", path);
    run_import(&mut engine, "csv", &padded).unwrap();

    assert_eq!(engine.records().len(), 1);
    assert_eq!(engine.records()[0].id, "inv-1");
}

#[test]
fn csv_without_data_rows_fails() {
    let mut engine = engine();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "id,date,amount").unwrap();
    file.flush().unwrap();

    let err = run_import(&mut engine, "csv", file.path().to_str().unwrap()).unwrap_err();
    let msg = format!("{:#}", err);
    assert!(msg.contains("at least one data row"), "unexpected error: {msg}");
    assert!(engine.records().is_empty());
}

#[test]
fn json_backup_is_imported() {
    let mut engine = engine();
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"txs": [{{"id": "a", "amount": "10"}}], "budgets": [{{"month": "2024-03"}}]}}"#
    )
    .unwrap();
    file.flush().unwrap();

    run_import(&mut engine, "json", file.path().to_str().unwrap()).unwrap();
    assert_eq!(engine.records().len(), 1);
    assert_eq!(engine.budgets().len(), 1);
}

#[test]
fn missing_file_is_reported() {
    let mut engine = engine();
    let err = run_import(&mut engine, "json", "/definitely/not/here.json").unwrap_err();
    assert!(err.to_string().contains("/definitely/not/here.json"));
}
