// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::Engine;
use crate::store::Store;
use crate::utils::{maybe_print_json, parse_decimal, parse_month, pretty_table};
use anyhow::{Context, Result};
use serde_json::{Map, Value};

pub fn handle<S: Store>(engine: &mut Engine<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(engine, sub)?,
        Some(("list", sub)) => list(engine, sub)?,
        _ => {}
    }
    Ok(())
}

fn set<S: Store>(engine: &mut Engine<S>, sub: &clap::ArgMatches) -> Result<()> {
    let month = parse_month(sub.get_one::<String>("month").context("--month is required")?)?;
    let mut obj = Map::new();
    obj.insert("month".into(), Value::String(month.clone()));

    let existing = engine.budget(&month).cloned();
    let mut costs = Map::new();
    for (flag, key) in [
        ("revenue", "revenueTarget"),
        ("cap", "expenseCap"),
        ("margin", "grossMarginTargetPct"),
    ] {
        if let Some(v) = sub.get_one::<String>(flag) {
            obj.insert(key.into(), Value::String(parse_decimal(v)?.to_string()));
        }
    }
    for key in ["rent", "salaries", "marketing", "misc", "logistics", "compliance"] {
        if let Some(v) = sub.get_one::<String>(key) {
            costs.insert(key.into(), Value::String(parse_decimal(v)?.to_string()));
        }
    }

    // Unspecified fields keep their current values.
    if let Some(prev) = existing {
        let prev = serde_json::to_value(&prev)?;
        if let Value::Object(prev) = prev {
            for (k, v) in prev {
                if k == "fixedCosts" {
                    if let Value::Object(prev_costs) = v {
                        for (ck, cv) in prev_costs {
                            costs.entry(ck).or_insert(cv);
                        }
                    }
                } else {
                    obj.entry(k).or_insert(v);
                }
            }
        }
    }
    obj.insert("fixedCosts".into(), Value::Object(costs));

    let line = engine.upsert_budget(&Value::Object(obj))?;
    println!(
        "Budget set for {}: revenue target {}, expense cap {}, margin target {}%, fixed costs {}",
        line.month,
        line.revenue_target,
        line.expense_cap,
        line.gross_margin_target_pct,
        line.fixed_costs.total()
    );
    Ok(())
}

fn list<S: Store>(engine: &Engine<S>, sub: &clap::ArgMatches) -> Result<()> {
    let budgets = engine.budgets();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &budgets)? {
        return Ok(());
    }
    let data: Vec<Vec<String>> = budgets
        .iter()
        .rev()
        .map(|b| {
            vec![
                b.month.clone(),
                format!("{:.2}", b.revenue_target),
                format!("{:.2}", b.expense_cap),
                format!("{}%", b.gross_margin_target_pct),
                format!("{:.2}", b.fixed_costs.total()),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Month", "Revenue target", "Expense cap", "Margin target", "Fixed costs"],
            data
        )
    );
    Ok(())
}
