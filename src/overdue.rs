// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, NaiveDate, Utc};

use crate::models::{FinanceRecord, Status};

/// Whether `record` should be `Overdue` on `today` given a grace period.
/// `Paid` and `Cancelled` never qualify.
pub fn is_past_due(record: &FinanceRecord, today: NaiveDate, grace_days: i64) -> bool {
    if record.status.is_terminal() {
        return false;
    }
    match record.due_date {
        Some(due) => (today - due).num_days() > grace_days,
        None => false,
    }
}

/// Move past-due, non-terminal records to `Overdue` and bump their
/// `updatedAt`. Returns the ids that changed; a second run on the same
/// data returns nothing.
pub fn scan(
    records: &mut [FinanceRecord],
    today: NaiveDate,
    grace_days: i64,
    now: DateTime<Utc>,
) -> Vec<String> {
    let mut marked = Vec::new();
    for record in records.iter_mut() {
        if record.status == Status::Overdue || !is_past_due(record, today, grace_days) {
            continue;
        }
        tracing::debug!(id = %record.id, from = %record.status, "marking overdue");
        record.status = Status::Overdue;
        record.updated_at = record.updated_at.max(now);
        marked.push(record.id.clone());
    }
    marked
}
