// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::Engine;
use crate::models::AuditEntry;
use crate::store::Store;
use crate::utils::{fmt_instant, maybe_print_json, pretty_table};
use anyhow::Result;

pub fn handle<S: Store>(engine: &Engine<S>, m: &clap::ArgMatches) -> Result<()> {
    if let Some(("list", sub)) = m.subcommand() {
        list(engine, sub)?;
    }
    Ok(())
}

fn list<S: Store>(engine: &Engine<S>, sub: &clap::ArgMatches) -> Result<()> {
    let limit = sub.get_one::<usize>("limit").copied().unwrap_or(50);
    let entries: Vec<&AuditEntry> = engine.audit().entries().rev().take(limit).collect();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &entries)? {
        return Ok(());
    }
    let rows = entries
        .iter()
        .map(|e| {
            vec![
                fmt_instant(&e.at),
                e.actor_role.clone(),
                e.action.to_string(),
                e.detail.clone(),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["At", "Role", "Action", "Detail"], rows));
    Ok(())
}
