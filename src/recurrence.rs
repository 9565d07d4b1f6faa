// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Instantiates due recurring records.
//!
//! For each source whose `recurring.nextRun` is on or before today, one
//! instance is spawned per missed period and `nextRun` is moved past
//! today. Spawned instances and updated sources come back in the same
//! record set so they are persisted by a single write.

use std::collections::VecDeque;

use chrono::{DateTime, Days, Months, NaiveDate, Utc};

use crate::merge::merge;
use crate::models::{FinanceRecord, Frequency, Status};

/// Next occurrence after `date`. Month steps use calendar arithmetic and
/// clamp to the last day of a shorter month, so `2024-01-31` becomes
/// `2024-02-29` and then `2024-03-29`.
pub fn advance(date: NaiveDate, freq: Frequency) -> Option<NaiveDate> {
    match freq.months() {
        Some(months) => date.checked_add_months(Months::new(months)),
        None => date.checked_add_days(Days::new(7)),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecurrenceRun {
    pub spawned: Vec<FinanceRecord>,
    /// Sources whose `nextRun` moved (spawned or seeded).
    pub advanced: Vec<String>,
}

impl RecurrenceRun {
    pub fn is_noop(&self) -> bool {
        self.spawned.is_empty() && self.advanced.is_empty()
    }
}

/// Most instances spawned for one source in one pass. A schedule that is
/// further behind keeps only its latest periods.
pub const MAX_CATCH_UP: usize = 120;

/// Run one recurrence pass over `records`.
///
/// A source enabled without a `nextRun` is only seeded with `date + freq`
/// in this pass; it spawns from the next pass on.
pub fn run(
    mut records: Vec<FinanceRecord>,
    today: NaiveDate,
    now: DateTime<Utc>,
    mut new_id: impl FnMut() -> String,
) -> (Vec<FinanceRecord>, RecurrenceRun) {
    let mut outcome = RecurrenceRun::default();

    for source in records.iter_mut() {
        let Some(rule) = source.recurring.clone().filter(|r| r.enabled) else {
            continue;
        };
        let Some(first) = rule.next_run else {
            let seeded = advance(source.date, rule.freq);
            if let Some(r) = source.recurring.as_mut() {
                r.next_run = seeded;
            }
            source.updated_at = source.updated_at.max(now);
            outcome.advanced.push(source.id.clone());
            continue;
        };

        let mut due = VecDeque::with_capacity(MAX_CATCH_UP);
        let mut skipped = 0usize;
        let mut next = Some(first);
        while let Some(run_date) = next.filter(|d| *d <= today) {
            if due.len() == MAX_CATCH_UP {
                due.pop_front();
                skipped += 1;
            }
            due.push_back(run_date);
            next = advance(run_date, rule.freq);
            if next.is_none() {
                tracing::warn!(id = %source.id, "recurrence schedule overflowed the calendar");
            }
        }
        if due.is_empty() {
            continue;
        }
        if skipped > 0 {
            tracing::warn!(
                id = %source.id,
                skipped,
                kept = MAX_CATCH_UP,
                "recurrence schedule too far behind, oldest periods skipped"
            );
        }

        for run_date in due {
            outcome.spawned.push(spawn(source, run_date, now, new_id()));
        }
        if let Some(r) = source.recurring.as_mut() {
            r.next_run = next;
        }
        source.updated_at = source.updated_at.max(now);
        outcome.advanced.push(source.id.clone());
    }

    if outcome.spawned.is_empty() {
        return (records, outcome);
    }
    tracing::info!(
        spawned = outcome.spawned.len(),
        sources = outcome.advanced.len(),
        "recurring instances created"
    );
    let merged = merge(records, outcome.spawned.clone());
    (merged, outcome)
}

fn spawn(
    source: &FinanceRecord,
    run_date: NaiveDate,
    now: DateTime<Utc>,
    id: String,
) -> FinanceRecord {
    let due_offset = source.due_date.map(|due| due - source.date);
    FinanceRecord {
        id,
        status: Status::Planned,
        date: run_date,
        due_date: due_offset.and_then(|offset| run_date.checked_add_signed(offset)),
        created_at: now,
        updated_at: now,
        invoice_no: None,
        reference_id: None,
        recurring: None,
        ..source.clone()
    }
}
