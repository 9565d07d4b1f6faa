// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The single boundary where untyped data becomes typed ledger values.
//!
//! Store rehydration, CSV import, JSON import and single-record edits all
//! come through here. A record is rejected only when it has no usable
//! `id`; every other field has a fallback:
//!
//! | field            | fallback                         |
//! |------------------|----------------------------------|
//! | `type`           | `Expense`                        |
//! | `status`         | `Planned`                        |
//! | `category`       | `Other`                          |
//! | `paymentMethod`  | `Bank`                           |
//! | `currency`       | [`ContextDefaults::currency`]    |
//! | numbers          | `0` (rates clamped after parse)  |
//! | `date`           | [`ContextDefaults::today`]       |
//! | `createdAt`      | [`ContextDefaults::now`]         |
//! | `updatedAt`      | `createdAt`                      |
//! | `recurring.freq` | `Monthly`                        |

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::models::{
    AMOUNT_MAX, AuditAction, AuditEntry, BudgetLine, Category, Choice, Currency, FinanceRecord,
    FixedCosts, Frequency, GST_RATE_MAX, MARGIN_PCT_MAX, PaymentMethod, RecordType, Recurring, Status,
    TDS_RATE_MAX,
};
use crate::utils::{lenient_date, lenient_decimal, lenient_instant, lenient_month};

/// Values substituted for missing fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextDefaults {
    pub currency: Currency,
    pub today: NaiveDate,
    pub now: DateTime<Utc>,
}

/// Outcome of normalizing a batch: the typed items plus how many inputs
/// were dropped for lack of an identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized<T> {
    pub items: Vec<T>,
    pub dropped: usize,
}

impl<T> Default for Normalized<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            dropped: 0,
        }
    }
}

/// Coerce one untyped value into a [`FinanceRecord`].
pub fn normalize(raw: &Value, ctx: &ContextDefaults) -> Option<FinanceRecord> {
    let obj = raw.as_object()?;
    let id = identity(obj)?;

    let created_at = field(obj, &["createdAt", "created_at"])
        .and_then(instant)
        .unwrap_or(ctx.now);
    let updated_at = field(obj, &["updatedAt", "updated_at"])
        .and_then(instant)
        .unwrap_or(created_at);

    Some(FinanceRecord {
        id,
        r#type: choice::<RecordType>(obj, &["type", "kind"]).unwrap_or_default(),
        status: choice::<Status>(obj, &["status"]).unwrap_or_default(),
        amount: decimal(obj, &["amount"]).map(bounded).unwrap_or(Decimal::ZERO),
        currency: choice(obj, &["currency"]).unwrap_or(ctx.currency),
        gst_rate: clamp_pct(decimal(obj, &["gstRate", "gst_rate", "gst"]), GST_RATE_MAX),
        gst_included: field(obj, &["gstIncluded", "gst_included"])
            .and_then(boolean)
            .unwrap_or(false),
        tds_rate: clamp_pct(decimal(obj, &["tdsRate", "tds_rate", "tds"]), TDS_RATE_MAX),
        date: field(obj, &["date"]).and_then(date).unwrap_or(ctx.today),
        due_date: field(obj, &["dueDate", "due_date"]).and_then(date),
        created_at,
        updated_at,
        category: choice::<Category>(obj, &["category"]).unwrap_or_default(),
        description: field(obj, &["description", "desc"])
            .and_then(text)
            .unwrap_or_default(),
        client_name: field(obj, &["clientName", "client_name", "client"]).and_then(text),
        vendor_name: field(obj, &["vendorName", "vendor_name", "vendor"]).and_then(text),
        event_title: field(obj, &["eventTitle", "event_title", "event"]).and_then(text),
        payment_method: choice::<PaymentMethod>(obj, &["paymentMethod", "payment_method"])
            .unwrap_or_default(),
        invoice_no: field(obj, &["invoiceNo", "invoice_no"]).and_then(text),
        reference_id: field(obj, &["referenceId", "reference_id"]).and_then(text),
        notes: field(obj, &["notes", "note"]).and_then(text),
        recurring: recurring(obj),
    })
}

pub fn normalize_records(raw: &[Value], ctx: &ContextDefaults) -> Normalized<FinanceRecord> {
    batch(raw, |v| normalize(v, ctx))
}

/// Coerce one untyped value into a [`BudgetLine`]; `None` without a
/// resolvable month.
pub fn normalize_budget(raw: &Value) -> Option<BudgetLine> {
    let obj = raw.as_object()?;
    let month = field(obj, &["month"])
        .and_then(text)
        .and_then(|m| lenient_month(&m))?;

    let costs = field(obj, &["fixedCosts", "fixed_costs"]).and_then(Value::as_object);
    let cost = |key: &str| {
        costs
            .and_then(|c| decimal(c, &[key]))
            .or_else(|| decimal(obj, &[key]))
            .map(non_negative)
            .unwrap_or(Decimal::ZERO)
    };

    Some(BudgetLine {
        month,
        revenue_target: decimal(obj, &["revenueTarget", "revenue_target"])
            .map(non_negative)
            .unwrap_or(Decimal::ZERO),
        expense_cap: decimal(obj, &["expenseCap", "expense_cap"])
            .map(non_negative)
            .unwrap_or(Decimal::ZERO),
        gross_margin_target_pct: clamp_pct(
            decimal(obj, &["grossMarginTargetPct", "gross_margin_target_pct"]),
            MARGIN_PCT_MAX,
        ),
        fixed_costs: FixedCosts {
            rent: cost("rent"),
            salaries: cost("salaries"),
            marketing: cost("marketing"),
            misc: cost("misc"),
            logistics: cost("logistics"),
            compliance: cost("compliance"),
        },
    })
}

pub fn normalize_budgets(raw: &[Value]) -> Normalized<BudgetLine> {
    batch(raw, normalize_budget)
}

/// Coerce one untyped value into an [`AuditEntry`].
pub fn normalize_audit(raw: &Value, ctx: &ContextDefaults) -> Option<AuditEntry> {
    let obj = raw.as_object()?;
    Some(AuditEntry {
        id: identity(obj)?,
        at: field(obj, &["at", "timestamp"])
            .and_then(instant)
            .unwrap_or(ctx.now),
        actor_role: field(obj, &["actorRole", "actor_role", "role"])
            .and_then(text)
            .unwrap_or_else(|| crate::config::SYSTEM_ACTOR.to_string()),
        action: choice::<AuditAction>(obj, &["action"]).unwrap_or_default(),
        detail: field(obj, &["detail", "details"])
            .and_then(text)
            .unwrap_or_default(),
    })
}

pub fn normalize_audit_entries(raw: &[Value], ctx: &ContextDefaults) -> Normalized<AuditEntry> {
    batch(raw, |v| normalize_audit(v, ctx))
}

/// Items of a stored collection; anything but an array reads as empty.
pub fn as_items(value: Option<&Value>) -> &[Value] {
    match value {
        Some(Value::Array(items)) => items.as_slice(),
        _ => &[],
    }
}

fn batch<T>(raw: &[Value], mut f: impl FnMut(&Value) -> Option<T>) -> Normalized<T> {
    let mut out = Normalized::default();
    for (idx, v) in raw.iter().enumerate() {
        match f(v) {
            Some(item) => out.items.push(item),
            None => {
                tracing::debug!(index = idx, "dropping entry without identity");
                out.dropped += 1;
            }
        }
    }
    out
}

fn identity(obj: &Map<String, Value>) -> Option<String> {
    field(obj, &["id", "_id", "txId"]).and_then(|v| match v {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn recurring(obj: &Map<String, Value>) -> Option<Recurring> {
    let (enabled, freq, next_run) = match field(obj, &["recurring"]).and_then(Value::as_object) {
        Some(r) => (
            field(r, &["enabled"]).and_then(boolean),
            field(r, &["freq", "frequency"]),
            field(r, &["nextRun", "next_run"]),
        ),
        None => (
            field(obj, &["recurringEnabled", "recurring_enabled"]).and_then(boolean),
            field(obj, &["recurringFreq", "recurring_freq"]),
            field(obj, &["recurringNextRun", "recurring_next_run"]),
        ),
    };
    if enabled != Some(true) {
        return None;
    }
    Some(Recurring {
        enabled: true,
        freq: freq
            .and_then(Value::as_str)
            .and_then(Frequency::parse)
            .unwrap_or_default(),
        next_run: next_run.and_then(date),
    })
}

fn field<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find(|v| !v.is_null())
}

fn choice<C: Choice>(obj: &Map<String, Value>, keys: &[&str]) -> Option<C> {
    field(obj, keys).and_then(Value::as_str).and_then(C::parse)
}

fn decimal(obj: &Map<String, Value>, keys: &[&str]) -> Option<Decimal> {
    field(obj, keys).and_then(|v| match v {
        Value::Number(n) => lenient_decimal(&n.to_string()),
        Value::String(s) => lenient_decimal(s),
        _ => None,
    })
}

fn text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn boolean(v: &Value) -> Option<bool> {
    match v {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" | "1" | "on" => Some(true),
            "false" | "no" | "n" | "0" | "off" | "" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn date(v: &Value) -> Option<NaiveDate> {
    v.as_str().and_then(lenient_date)
}

fn instant(v: &Value) -> Option<DateTime<Utc>> {
    match v {
        Value::String(s) => lenient_instant(s),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

fn clamp_pct(value: Option<Decimal>, max: u32) -> Decimal {
    value
        .unwrap_or(Decimal::ZERO)
        .clamp(Decimal::ZERO, Decimal::from(max))
}

fn bounded(d: Decimal) -> Decimal {
    let max = Decimal::from(AMOUNT_MAX);
    d.clamp(-max, max)
}

fn non_negative(d: Decimal) -> Decimal {
    bounded(d).max(Decimal::ZERO)
}

