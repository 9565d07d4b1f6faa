// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Header-driven CSV import and fixed-column CSV export.

use csv::{QuoteStyle, ReaderBuilder, WriterBuilder};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

use crate::error::{EngineError, EngineResult};
use crate::models::FinanceRecord;
use crate::utils::fmt_instant;

/// Every export carries these headers, in this order.
pub const EXPORT_COLUMNS: &[&str] = &[
    "id",
    "date",
    "type",
    "status",
    "currency",
    "amount",
    "gstRate",
    "gstIncluded",
    "tdsRate",
    "category",
    "description",
    "clientName",
    "vendorName",
    "paymentMethod",
    "dueDate",
    "recurringEnabled",
    "recurringFreq",
    "recurringNextRun",
    "notes",
    "createdAt",
    "updatedAt",
    "eventTitle",
    "invoiceNo",
    "referenceId",
];

/// One data row, keyed by the columns the caller asked for. Columns the
/// file did not carry read as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    fields: BTreeMap<String, String>,
}

impl RawRow {
    pub fn get(&self, column: &str) -> &str {
        self.fields.get(column).map(String::as_str).unwrap_or("")
    }

    /// Untyped object ready for the normalizer. Empty cells are left out so
    /// field fallbacks apply.
    pub fn to_value(&self) -> Value {
        let obj: Map<String, Value> = self
            .fields
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        Value::Object(obj)
    }
}

/// Parse `text` and project each row onto `columns`.
///
/// Headers are matched exactly first, then ignoring ASCII case; unknown
/// headers are ignored. Input with fewer than two non-blank lines is
/// rejected with [`EngineError::InsufficientRows`] so "nothing to import"
/// is distinguishable from an empty result.
pub fn parse_csv(text: &str, columns: &[&str]) -> EngineResult<Vec<RawRow>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let found = text.lines().filter(|l| !l.trim().is_empty()).count();
    if found < 2 {
        return Err(EngineError::InsufficientRows { found });
    }

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let index = column_index(&headers, columns);

    let mut rows = Vec::new();
    for (line, result) in rdr.records().enumerate() {
        let rec = match result {
            Ok(rec) => rec,
            Err(err) => {
                tracing::warn!(row = line + 1, error = %err, "skipping unreadable CSV row");
                continue;
            }
        };
        if rec.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let fields = columns
            .iter()
            .map(|col| {
                let value = index
                    .get(*col)
                    .and_then(|idx| rec.get(*idx))
                    .map(|v| v.trim().to_string())
                    .unwrap_or_default();
                (col.to_string(), value)
            })
            .collect();
        rows.push(RawRow { fields });
    }
    Ok(rows)
}

fn column_index(headers: &[String], columns: &[&str]) -> HashMap<String, usize> {
    let mut index = HashMap::new();
    for col in columns {
        let pos = headers
            .iter()
            .position(|h| h == col)
            .or_else(|| headers.iter().position(|h| h.eq_ignore_ascii_case(col)));
        if let Some(pos) = pos {
            index.insert(col.to_string(), pos);
        }
    }
    index
}

/// Serialize `rows` under `columns`. Cells holding a comma, quote or
/// newline are quoted with embedded quotes doubled; short rows are padded.
pub fn write_csv(rows: &[Vec<String>], columns: &[&str]) -> EngineResult<String> {
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .from_writer(Vec::new());
    wtr.write_record(columns)?;
    for row in rows {
        let cells = (0..columns.len()).map(|i| row.get(i).map(String::as_str).unwrap_or(""));
        wtr.write_record(cells)?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|err| EngineError::Csv(err.into_error().into()))?;
    String::from_utf8(bytes).map_err(|err| EngineError::InvalidInput(err.to_string()))
}

/// Cells of `record` in [`EXPORT_COLUMNS`] order.
pub fn record_to_row(record: &FinanceRecord) -> Vec<String> {
    let opt = |v: &Option<String>| v.clone().unwrap_or_default();
    let recurring = record.recurring.as_ref().filter(|r| r.enabled);
    vec![
        record.id.clone(),
        record.date.to_string(),
        record.r#type.to_string(),
        record.status.to_string(),
        record.currency.to_string(),
        record.amount.to_string(),
        record.gst_rate.to_string(),
        record.gst_included.to_string(),
        record.tds_rate.to_string(),
        record.category.to_string(),
        record.description.clone(),
        opt(&record.client_name),
        opt(&record.vendor_name),
        record.payment_method.to_string(),
        record.due_date.map(|d| d.to_string()).unwrap_or_default(),
        recurring.is_some().to_string(),
        recurring.map(|r| r.freq.to_string()).unwrap_or_default(),
        recurring
            .and_then(|r| r.next_run)
            .map(|d| d.to_string())
            .unwrap_or_default(),
        opt(&record.notes),
        fmt_instant(&record.created_at),
        fmt_instant(&record.updated_at),
        opt(&record.event_title),
        opt(&record.invoice_no),
        opt(&record.reference_id),
    ]
}

pub fn export_records(records: &[FinanceRecord]) -> EngineResult<String> {
    let rows: Vec<Vec<String>> = records.iter().map(record_to_row).collect();
    write_csv(&rows, EXPORT_COLUMNS)
}
