// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::BootstrapReport;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;

pub fn handle(report: &BootstrapReport, m: &clap::ArgMatches) -> Result<()> {
    if maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), report)? {
        return Ok(());
    }
    let rows = vec![
        vec!["Records loaded".into(), report.loaded.to_string()],
        vec!["Dropped (no id)".into(), report.dropped.to_string()],
        vec!["Marked overdue".into(), report.overdue_marked.to_string()],
        vec!["Recurring instances".into(), report.spawned.to_string()],
        vec!["Schedules advanced".into(), report.sources_advanced.to_string()],
    ];
    println!("{}", pretty_table(&["Pass", "Count"], rows));
    Ok(())
}
