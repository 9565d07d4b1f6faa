// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::Engine;
use crate::store::Store;
use crate::summary::{budget_report, summarize};
use crate::utils::{fmt_money, maybe_print_json, parse_month, pretty_table};
use anyhow::{Context, Result, anyhow};

pub fn handle<S: Store>(engine: &Engine<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(engine, sub)?,
        Some(("budget", sub)) => budget(engine, sub)?,
        _ => {}
    }
    Ok(())
}

fn summary<S: Store>(engine: &Engine<S>, sub: &clap::ArgMatches) -> Result<()> {
    let month = match sub.get_one::<String>("month") {
        Some(m) => Some(parse_month(m)?),
        None => None,
    };
    let s = summarize(engine.records(), month.as_deref());
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        return Ok(());
    }
    let ccy = engine.config().currency.to_string();
    let rows = vec![
        vec!["Income (incl. GST)".into(), fmt_money(&s.income_subtotal, &ccy)],
        vec!["Income net of TDS".into(), fmt_money(&s.income_net, &ccy)],
        vec!["Expense (incl. GST)".into(), fmt_money(&s.expense_subtotal, &ccy)],
        vec!["Expense net of TDS".into(), fmt_money(&s.expense_net, &ccy)],
        vec!["GST output".into(), fmt_money(&s.gst_output, &ccy)],
        vec!["GST input".into(), fmt_money(&s.gst_input, &ccy)],
        vec!["TDS receivable".into(), fmt_money(&s.tds_receivable, &ccy)],
        vec!["TDS payable".into(), fmt_money(&s.tds_payable, &ccy)],
        vec!["Profit".into(), fmt_money(&s.profit, &ccy)],
        vec!["Outstanding".into(), fmt_money(&s.outstanding, &ccy)],
        vec!["Overdue records".into(), s.overdue.to_string()],
    ];
    println!("{}", pretty_table(&["Metric", "Value"], rows));
    Ok(())
}

fn budget<S: Store>(engine: &Engine<S>, sub: &clap::ArgMatches) -> Result<()> {
    let month = parse_month(sub.get_one::<String>("month").context("--month is required")?)?;
    let line = engine
        .budget(&month)
        .ok_or_else(|| anyhow!("No budget set for {}", month))?;
    let r = budget_report(line, engine.records());
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &r)? {
        return Ok(());
    }
    let margin = r
        .gross_margin_pct
        .map(|p| format!("{}%", p))
        .unwrap_or_else(|| "n/a".to_string());
    let rows = vec![
        vec![
            "Revenue".into(),
            format!("{:.2}", r.revenue_target),
            format!("{:.2}", r.revenue_actual),
        ],
        vec![
            "Expenses + fixed costs".into(),
            format!("{:.2}", r.expense_cap),
            format!("{:.2}", r.committed),
        ],
        vec![
            "Gross margin".into(),
            format!("{}%", r.gross_margin_target_pct),
            margin,
        ],
    ];
    println!("{}", pretty_table(&["Line", "Budget", "Actual"], rows));
    if r.over_cap {
        println!("Over the expense cap for {}", r.month);
    }
    Ok(())
}
