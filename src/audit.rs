// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, Utc};
use std::collections::{HashSet, VecDeque};
use uuid::Uuid;

use crate::config::clamp_audit_limit;
use crate::models::{AuditAction, AuditEntry};

/// Append-only log that keeps the most recent `limit` entries. Older
/// entries are dropped, not archived.
#[derive(Debug, Clone)]
pub struct AuditLog {
    entries: VecDeque<AuditEntry>,
    limit: usize,
}

impl AuditLog {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            limit: clamp_audit_limit(limit as i64),
        }
    }

    /// Builds a log from stored entries (oldest first), skipping repeated
    /// ids and trimming to `limit`.
    pub fn from_entries(entries: Vec<AuditEntry>, limit: usize) -> Self {
        let mut log = Self::new(limit);
        log.extend(entries);
        log
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push(&mut self, entry: AuditEntry) {
        self.entries.push_back(entry);
        while self.entries.len() > self.limit {
            self.entries.pop_front();
        }
    }

    pub fn record(
        &mut self,
        at: DateTime<Utc>,
        actor_role: &str,
        action: AuditAction,
        detail: impl Into<String>,
    ) -> &AuditEntry {
        self.push(AuditEntry {
            id: Uuid::new_v4().to_string(),
            at,
            actor_role: actor_role.to_string(),
            action,
            detail: detail.into(),
        });
        &self.entries[self.entries.len() - 1]
    }

    /// Appends entries whose id is not yet in the log, then re-sorts by
    /// timestamp so imported history interleaves with local history.
    pub fn extend(&mut self, incoming: Vec<AuditEntry>) {
        let mut seen: HashSet<String> = self.entries.iter().map(|e| e.id.clone()).collect();
        let mut all: Vec<AuditEntry> = self.entries.drain(..).collect();
        for entry in incoming {
            if seen.insert(entry.id.clone()) {
                all.push(entry);
            }
        }
        all.sort_by(|a, b| a.at.cmp(&b.at));
        for entry in all {
            self.push(entry);
        }
    }

    /// Oldest first.
    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &AuditEntry> {
        self.entries.iter()
    }

    pub fn to_vec(&self) -> Vec<AuditEntry> {
        self.entries.iter().cloned().collect()
    }
}
