// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Last-write-wins union of record sets.
//!
//! Records are keyed by `id`. When both sides carry an id, the one with the
//! later `updatedAt` replaces the other whole; on a tie the incoming copy
//! wins. Output keeps `existing` order and appends new ids in `incoming`
//! order. Duplicate ids inside one side collapse under the same rule.

use std::collections::HashMap;

use crate::models::{BudgetLine, FinanceRecord};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Incoming ids not present before.
    pub added: usize,
    /// Incoming records that replaced an existing one.
    pub replaced: usize,
    /// Incoming records discarded because the existing copy was newer.
    pub kept: usize,
}

pub fn merge(existing: Vec<FinanceRecord>, incoming: Vec<FinanceRecord>) -> Vec<FinanceRecord> {
    merge_with_stats(existing, incoming).0
}

pub fn merge_with_stats(
    existing: Vec<FinanceRecord>,
    incoming: Vec<FinanceRecord>,
) -> (Vec<FinanceRecord>, MergeStats) {
    let mut out: Vec<FinanceRecord> = Vec::with_capacity(existing.len() + incoming.len());
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut stats = MergeStats::default();

    for record in existing {
        upsert(&mut out, &mut index, record);
    }
    for record in incoming {
        match upsert(&mut out, &mut index, record) {
            Outcome::Added => stats.added += 1,
            Outcome::Replaced => stats.replaced += 1,
            Outcome::Kept => stats.kept += 1,
        }
    }
    (out, stats)
}

enum Outcome {
    Added,
    Replaced,
    Kept,
}

fn upsert(
    out: &mut Vec<FinanceRecord>,
    index: &mut HashMap<String, usize>,
    record: FinanceRecord,
) -> Outcome {
    match index.get(&record.id) {
        Some(&pos) => {
            if record.updated_at >= out[pos].updated_at {
                out[pos] = record;
                Outcome::Replaced
            } else {
                Outcome::Kept
            }
        }
        None => {
            index.insert(record.id.clone(), out.len());
            out.push(record);
            Outcome::Added
        }
    }
}

/// Budget lines are keyed by month; the incoming line replaces an existing
/// one for the same month. Result is sorted by month.
pub fn merge_budgets(existing: Vec<BudgetLine>, incoming: Vec<BudgetLine>) -> Vec<BudgetLine> {
    let mut by_month: std::collections::BTreeMap<String, BudgetLine> = existing
        .into_iter()
        .map(|b| (b.month.clone(), b))
        .collect();
    for line in incoming {
        by_month.insert(line.month.clone(), line);
    }
    by_month.into_values().collect()
}
