// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::Engine;
use crate::models::{Choice, Status};
use crate::store::Store;
use crate::tax::compute_totals;
use crate::utils::{maybe_print_json, parse_date, parse_decimal, parse_month, pretty_table};
use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use serde_json::{Map, Value, json};
use uuid::Uuid;

pub fn handle<S: Store>(engine: &mut Engine<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(engine, sub)?,
        Some(("list", sub)) => list(engine, sub)?,
        Some(("status", sub)) => set_status(engine, sub)?,
        Some(("rm", sub)) => remove(engine, sub)?,
        _ => {}
    }
    Ok(())
}

/// Raw record object from `tx add` arguments. Validation of free-form
/// values is left to the normalizer; dates and numbers are checked here so
/// typos fail loudly instead of falling back.
pub fn raw_from_args(sub: &clap::ArgMatches) -> Result<Value> {
    let arg = |name: &str| {
        sub.get_one::<String>(name)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };

    let mut obj = Map::new();
    let id = arg("id").unwrap_or_else(|| Uuid::new_v4().to_string());
    obj.insert("id".into(), Value::String(id));

    let amount = arg("amount").context("--amount is required")?;
    parse_decimal(&amount)?;
    obj.insert("amount".into(), Value::String(amount));

    for (flag, key) in [("date", "date"), ("due", "dueDate")] {
        if let Some(d) = arg(flag) {
            obj.insert(key.into(), Value::String(parse_date(&d)?.to_string()));
        }
    }
    for (flag, key) in [("gst", "gstRate"), ("tds", "tdsRate")] {
        if let Some(v) = arg(flag) {
            parse_decimal(&v)?;
            obj.insert(key.into(), Value::String(v));
        }
    }
    for (flag, key) in [
        ("type", "type"),
        ("currency", "currency"),
        ("category", "category"),
        ("description", "description"),
        ("client", "clientName"),
        ("vendor", "vendorName"),
        ("event", "eventTitle"),
        ("method", "paymentMethod"),
        ("status", "status"),
        ("invoice", "invoiceNo"),
        ("note", "notes"),
    ] {
        if let Some(v) = arg(flag) {
            obj.insert(key.into(), Value::String(v));
        }
    }
    obj.insert("gstIncluded".into(), Value::Bool(sub.get_flag("gst_included")));
    if let Some(freq) = arg("recurring") {
        obj.insert("recurring".into(), json!({"enabled": true, "freq": freq}));
    }
    Ok(Value::Object(obj))
}

fn add<S: Store>(engine: &mut Engine<S>, sub: &clap::ArgMatches) -> Result<()> {
    let raw = raw_from_args(sub)?;
    let record = engine.upsert_record(&raw)?;
    let t = compute_totals(&record);
    println!(
        "Recorded {} {} {} on {} (net {:.2}, id {})",
        record.r#type, record.currency, record.amount, record.date, t.net, record.id
    );
    Ok(())
}

fn set_status<S: Store>(engine: &mut Engine<S>, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").context("--id is required")?.trim();
    let raw = sub.get_one::<String>("to").context("--to is required")?;
    let status = Status::parse(raw).ok_or_else(|| anyhow!("Unknown status '{}'", raw))?;
    let record = engine.set_status(id, status)?;
    println!("{} is now {}", record.id, record.status);
    Ok(())
}

fn remove<S: Store>(engine: &mut Engine<S>, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").context("--id is required")?.trim();
    engine.delete_record(id)?;
    println!("Removed record {}", id);
    Ok(())
}

fn list<S: Store>(engine: &Engine<S>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(engine, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.r#type.clone(),
                    r.status.clone(),
                    r.category.clone(),
                    r.description.clone(),
                    r.amount.clone(),
                    r.gst.clone(),
                    r.tds.clone(),
                    r.net.clone(),
                    r.currency.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &[
                    "Date",
                    "Type",
                    "Status",
                    "Category",
                    "Description",
                    "Amount",
                    "GST",
                    "TDS",
                    "Net",
                    "CCY"
                ],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    pub r#type: String,
    pub status: String,
    pub category: String,
    pub description: String,
    pub amount: String,
    pub gst: String,
    pub tds: String,
    pub net: String,
    pub currency: String,
}

pub fn query_rows<S: Store>(
    engine: &Engine<S>,
    sub: &clap::ArgMatches,
) -> Result<Vec<TransactionRow>> {
    let month = match sub.get_one::<String>("month") {
        Some(m) => Some(parse_month(m)?),
        None => None,
    };
    let status = match sub.get_one::<String>("status") {
        Some(s) => Some(Status::parse(s).ok_or_else(|| anyhow!("Unknown status '{}'", s))?),
        None => None,
    };

    let mut records: Vec<_> = engine
        .records()
        .iter()
        .filter(|r| month.as_deref().is_none_or(|m| r.month() == m))
        .filter(|r| status.is_none_or(|s| r.status == s))
        .collect();
    records.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.created_at.cmp(&a.created_at)));
    if let Some(limit) = sub.get_one::<usize>("limit") {
        records.truncate(*limit);
    }

    Ok(records
        .into_iter()
        .map(|r| {
            let t = compute_totals(r);
            TransactionRow {
                id: r.id.clone(),
                date: r.date.to_string(),
                r#type: r.r#type.to_string(),
                status: r.status.to_string(),
                category: r.category.to_string(),
                description: r.description.clone(),
                amount: format!("{:.2}", t.base),
                gst: format!("{:.2}", t.gst_add),
                tds: format!("{:.2}", t.tds),
                net: format!("{:.2}", t.net),
                currency: r.currency.to_string(),
            }
        })
        .collect())
}
