// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::clamp_audit_limit;
use crate::engine::Engine;
use crate::models::{Choice, Currency};
use crate::store::Store;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{Result, anyhow};

pub fn handle<S: Store>(engine: &mut Engine<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => show(engine, sub)?,
        Some(("set", sub)) => set(engine, sub)?,
        _ => {}
    }
    Ok(())
}

fn show<S: Store>(engine: &Engine<S>, sub: &clap::ArgMatches) -> Result<()> {
    let cfg = engine.config();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), cfg)? {
        return Ok(());
    }
    let rows = vec![
        vec!["currency".into(), cfg.currency.to_string()],
        vec!["overdueRuleDays".into(), cfg.overdue_rule_days.to_string()],
        vec!["auditLimit".into(), cfg.audit_limit.to_string()],
        vec!["actorRole".into(), cfg.actor_role.clone()],
    ];
    println!("{}", pretty_table(&["Setting", "Value"], rows));
    Ok(())
}

fn set<S: Store>(engine: &mut Engine<S>, sub: &clap::ArgMatches) -> Result<()> {
    let mut cfg = engine.config().clone();
    if let Some(raw) = sub.get_one::<String>("currency") {
        cfg.currency = Currency::parse(raw).ok_or_else(|| anyhow!("Unknown currency '{}'", raw))?;
    }
    if let Some(days) = sub.get_one::<i64>("overdue_days") {
        if *days < 0 {
            return Err(anyhow!("--overdue-days must be >= 0"));
        }
        cfg.overdue_rule_days = *days;
    }
    if let Some(limit) = sub.get_one::<i64>("audit_limit") {
        cfg.audit_limit = clamp_audit_limit(*limit);
    }
    engine.update_settings(cfg)?;
    let cfg = engine.config();
    println!(
        "Settings saved: currency {}, overdue after {} day(s), audit keeps {}",
        cfg.currency, cfg.overdue_rule_days, cfg.audit_limit
    );
    Ok(())
}
