// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::FinanceRecord;

/// Derived monetary fields of one record. Never stored; recomputed on
/// every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub base: Decimal,
    pub gst_rate: Decimal,
    pub gst_add: Decimal,
    pub subtotal: Decimal,
    pub tds_rate: Decimal,
    pub tds: Decimal,
    pub net: Decimal,
}

/// GST is added on top of `amount` unless already included in it; TDS is
/// withheld from the post-GST subtotal either way. Full decimal precision,
/// round only for display.
pub fn compute_totals(record: &FinanceRecord) -> Totals {
    let hundred = Decimal::ONE_HUNDRED;
    let base = record.amount;
    let gst_add = if record.gst_included {
        Decimal::ZERO
    } else {
        base * record.gst_rate / hundred
    };
    let subtotal = base + gst_add;
    let tds = subtotal * record.tds_rate / hundred;
    Totals {
        base,
        gst_rate: record.gst_rate,
        gst_add,
        subtotal,
        tds_rate: record.tds_rate,
        tds,
        net: subtotal - tds,
    }
}
