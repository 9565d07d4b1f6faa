// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::{Engine, ImportReport};
use crate::store::Store;
use anyhow::{Context, Result};

pub fn handle<S: Store>(engine: &mut Engine<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("csv", sub)) => import_csv(engine, sub),
        Some(("json", sub)) => import_json(engine, sub),
        _ => Ok(()),
    }
}

fn read_input(sub: &clap::ArgMatches) -> Result<(String, String)> {
    let path = sub
        .get_one::<String>("path")
        .context("--path is required")?
        .trim()
        .to_string();
    let text = std::fs::read_to_string(&path).with_context(|| format!("Open {}", path))?;
    Ok((path, text))
}

fn import_csv<S: Store>(engine: &mut Engine<S>, sub: &clap::ArgMatches) -> Result<()> {
    let (path, text) = read_input(sub)?;
    let report = engine
        .import_csv(&text)
        .with_context(|| format!("Import CSV {}", path))?;
    print_report(&path, &report);
    Ok(())
}

fn import_json<S: Store>(engine: &mut Engine<S>, sub: &clap::ArgMatches) -> Result<()> {
    let (path, text) = read_input(sub)?;
    let report = engine
        .import_json(&text)
        .with_context(|| format!("Import JSON {}", path))?;
    print_report(&path, &report);
    Ok(())
}

fn print_report(path: &str, report: &ImportReport) {
    println!(
        "Imported {} from {}: {} added, {} replaced, {} kept (newer locally), {} dropped",
        report.parsed, path, report.added, report.replaced, report.kept, report.dropped
    );
    if report.budgets > 0 {
        println!("Merged {} budget line(s)", report.budgets);
    }
}
