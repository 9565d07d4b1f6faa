// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Session-level entry point shared by every surface.
//!
//! [`Engine::open`] rehydrates the store through the normalizer;
//! [`Engine::bootstrap`] runs the overdue and recurrence passes and writes
//! the result back. Imports, exports and single-record edits go through
//! the same normalizer and merge rules.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::audit::AuditLog;
use crate::config::{EngineConfig, SYSTEM_ACTOR};
use crate::csv_codec::{self, EXPORT_COLUMNS};
use crate::error::{EngineError, EngineResult};
use crate::merge::{merge_budgets, merge_with_stats};
use crate::models::{
    AuditAction, AuditEntry, BACKUP_VERSION, Backup, BudgetLine, FinanceRecord, Status,
};
use crate::normalize::{
    ContextDefaults, as_items, normalize, normalize_audit_entries, normalize_budget,
    normalize_budgets, normalize_records,
};
use crate::store::{AUDIT_KEY, BUDGETS_KEY, SETTINGS_KEY, Store, TXS_KEY};
use crate::{overdue, recurrence};

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    /// Calendar day of [`Clock::now`] in UTC, so record dates and
    /// timestamps never disagree near midnight.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapReport {
    pub loaded: usize,
    pub dropped: usize,
    pub overdue_marked: usize,
    pub spawned: usize,
    pub sources_advanced: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub parsed: usize,
    pub dropped: usize,
    pub added: usize,
    pub replaced: usize,
    pub kept: usize,
    pub budgets: usize,
}

pub struct Engine<S: Store> {
    store: S,
    clock: Box<dyn Clock>,
    config: EngineConfig,
    settings: Option<Value>,
    records: Vec<FinanceRecord>,
    budgets: Vec<BudgetLine>,
    audit: AuditLog,
    load_dropped: usize,
}

impl<S: Store> Engine<S> {
    /// Read and normalize everything under the engine's keys. Nothing is
    /// written back until a mutating call.
    pub fn open(store: S, clock: impl Clock + 'static) -> EngineResult<Self> {
        let settings = store.get(SETTINGS_KEY)?;
        let config = EngineConfig::from_settings(settings.as_ref());
        let mut engine = Self {
            store,
            clock: Box::new(clock),
            audit: AuditLog::new(config.audit_limit),
            config,
            settings,
            records: Vec::new(),
            budgets: Vec::new(),
            load_dropped: 0,
        };
        engine.reload()?;
        Ok(engine)
    }

    /// Re-read the store, discarding in-memory state.
    pub fn reload(&mut self) -> EngineResult<()> {
        let ctx = self.context();

        let raw = self.store.get(TXS_KEY)?;
        let txs = normalize_records(as_items(raw.as_ref()), &ctx);
        if txs.dropped > 0 {
            tracing::warn!(dropped = txs.dropped, "stored records without an id were dropped");
        }
        // Collapses duplicate ids left behind by older writers.
        let (records, _) = merge_with_stats(Vec::new(), txs.items);

        let raw = self.store.get(BUDGETS_KEY)?;
        let budgets = normalize_budgets(as_items(raw.as_ref()));

        let raw = self.store.get(AUDIT_KEY)?;
        let audit = normalize_audit_entries(as_items(raw.as_ref()), &ctx);

        self.records = records;
        self.budgets = merge_budgets(Vec::new(), budgets.items);
        self.audit = AuditLog::from_entries(audit.items, self.config.audit_limit);
        self.load_dropped = txs.dropped;
        tracing::debug!(records = self.records.len(), budgets = self.budgets.len(), "ledger loaded");
        Ok(())
    }

    /// Acting role stamped on user-triggered audit entries.
    pub fn with_actor(mut self, role: &str) -> Self {
        let role = role.trim();
        if !role.is_empty() {
            self.config.actor_role = role.to_string();
        }
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn records(&self) -> &[FinanceRecord] {
        &self.records
    }

    pub fn record(&self, id: &str) -> Option<&FinanceRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn budgets(&self) -> &[BudgetLine] {
        &self.budgets
    }

    pub fn budget(&self, month: &str) -> Option<&BudgetLine> {
        self.budgets.iter().find(|b| b.month == month)
    }

    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Records dropped by the last load for lack of an id.
    pub fn load_dropped(&self) -> usize {
        self.load_dropped
    }

    pub fn context(&self) -> ContextDefaults {
        ContextDefaults {
            currency: self.config.currency,
            today: self.clock.today(),
            now: self.clock.now(),
        }
    }

    /// Session start: overdue fix-ups, then recurring instances, then one
    /// write of the record set. Safe to call repeatedly.
    pub fn bootstrap(&mut self) -> EngineResult<BootstrapReport> {
        let now = self.clock.now();
        let today = self.clock.today();
        let mut report = BootstrapReport {
            loaded: self.records.len(),
            dropped: self.load_dropped,
            ..Default::default()
        };

        let grace = self.config.overdue_rule_days;
        let mut marked = overdue::scan(&mut self.records, today, grace, now);

        let records = std::mem::take(&mut self.records);
        let (records, run) = recurrence::run(records, today, now, || Uuid::new_v4().to_string());
        self.records = records;
        if !run.spawned.is_empty() {
            // Catch-up instances can already be past due.
            marked.extend(overdue::scan(&mut self.records, today, grace, now));
        }
        report.overdue_marked = marked.len();
        report.spawned = run.spawned.len();
        report.sources_advanced = run.advanced.len();

        if marked.is_empty() && run.is_noop() {
            tracing::debug!("bootstrap: nothing to update");
            return Ok(report);
        }

        self.persist_records()?;
        if !marked.is_empty() {
            self.audit.record(
                now,
                SYSTEM_ACTOR,
                AuditAction::OverdueMarked,
                format!("{} record(s) marked overdue: {}", marked.len(), marked.join(", ")),
            );
        }
        if !run.spawned.is_empty() {
            self.audit.record(
                now,
                SYSTEM_ACTOR,
                AuditAction::RecurringSpawned,
                format!(
                    "{} recurring instance(s) created from {} source(s)",
                    run.spawned.len(),
                    run.advanced.len()
                ),
            );
        }
        self.persist_audit()?;
        tracing::info!(
            overdue = report.overdue_marked,
            spawned = report.spawned,
            "bootstrap complete"
        );
        Ok(report)
    }

    pub fn import_csv(&mut self, text: &str) -> EngineResult<ImportReport> {
        let rows = csv_codec::parse_csv(text, EXPORT_COLUMNS)?;
        let raw: Vec<Value> = rows.iter().map(|r| r.to_value()).collect();
        let ctx = self.context();
        let normalized = normalize_records(&raw, &ctx);

        let mut report = ImportReport {
            parsed: rows.len(),
            dropped: normalized.dropped,
            ..Default::default()
        };
        self.merge_incoming(normalized.items, &mut report);
        self.persist_records()?;
        self.log(
            AuditAction::ImportCsv,
            format!(
                "CSV import: {} row(s), {} added, {} replaced, {} dropped",
                report.parsed, report.added, report.replaced, report.dropped
            ),
        )?;
        tracing::info!(?report, "CSV import finished");
        Ok(report)
    }

    /// Import a backup document. Missing top-level keys read as empty; a
    /// bare array is taken as a list of records.
    pub fn import_json(&mut self, text: &str) -> EngineResult<ImportReport> {
        let doc: Value = serde_json::from_str(text)?;
        let ctx = self.context();

        let (txs, budgets, audit, settings) = match &doc {
            Value::Array(items) => (items.as_slice(), &[][..], &[][..], None),
            Value::Object(obj) => (
                as_items(obj.get("txs")),
                as_items(obj.get("budgets")),
                as_items(obj.get("audit")),
                obj.get("settings").filter(|s| s.is_object()),
            ),
            _ => {
                return Err(EngineError::InvalidInput(
                    "backup must be a JSON object or array".to_string(),
                ));
            }
        };

        let normalized = normalize_records(txs, &ctx);
        let mut report = ImportReport {
            parsed: txs.len(),
            dropped: normalized.dropped,
            ..Default::default()
        };
        self.merge_incoming(normalized.items, &mut report);
        self.persist_records()?;

        let budgets = normalize_budgets(budgets);
        if !budgets.items.is_empty() {
            report.budgets = budgets.items.len();
            let existing = std::mem::take(&mut self.budgets);
            self.budgets = merge_budgets(existing, budgets.items);
            self.persist_budgets()?;
        }

        if let Some(settings) = settings {
            let role = std::mem::take(&mut self.config.actor_role);
            self.config = EngineConfig::from_settings(Some(settings));
            self.config.actor_role = role;
            self.settings = Some(settings.clone());
            self.store.set(SETTINGS_KEY, settings.clone())?;
        }

        let imported_audit = normalize_audit_entries(audit, &ctx);
        self.audit = AuditLog::from_entries(self.audit.to_vec(), self.config.audit_limit);
        self.audit.extend(imported_audit.items);

        self.log(
            AuditAction::ImportJson,
            format!(
                "JSON import: {} record(s), {} added, {} replaced, {} dropped, {} budget line(s)",
                report.parsed, report.added, report.replaced, report.dropped, report.budgets
            ),
        )?;
        tracing::info!(?report, "JSON import finished");
        Ok(report)
    }

    pub fn export_csv(&mut self) -> EngineResult<String> {
        let text = csv_codec::export_records(&self.records)?;
        self.log(
            AuditAction::ExportCsv,
            format!("CSV export: {} record(s)", self.records.len()),
        )?;
        Ok(text)
    }

    pub fn export_json(&mut self) -> EngineResult<String> {
        let backup = self.backup();
        let text = serde_json::to_string_pretty(&backup)?;
        self.log(
            AuditAction::ExportJson,
            format!("JSON export: {} record(s)", backup.txs.len()),
        )?;
        Ok(text)
    }

    pub fn backup(&self) -> Backup {
        Backup {
            version: BACKUP_VERSION,
            exported_at: self.clock.now(),
            settings: self
                .settings
                .clone()
                .unwrap_or_else(|| Value::Object(Default::default())),
            budgets: self.budgets.clone(),
            txs: self.records.clone(),
            audit: self.audit.to_vec(),
        }
    }

    /// Create or edit one record from untyped input.
    ///
    /// The stored copy's engine-owned fields win: an edit cannot introduce
    /// `Overdue`, an edit left at `Planned` keeps a stored `Overdue`, and an
    /// active schedule keeps its `nextRun`. `updatedAt` never moves
    /// backwards.
    pub fn upsert_record(&mut self, raw: &Value) -> EngineResult<FinanceRecord> {
        let ctx = self.context();
        let mut incoming = normalize(raw, &ctx)
            .ok_or_else(|| EngineError::InvalidInput("record has no id".to_string()))?;

        let previous = self.records.iter().position(|r| r.id == incoming.id);
        let action = match previous {
            Some(pos) => {
                let prev = &self.records[pos];
                incoming.created_at = prev.created_at;
                incoming.updated_at = ctx.now.max(prev.updated_at);
                if incoming.status == Status::Overdue && prev.status != Status::Overdue {
                    incoming.status = prev.status;
                } else if prev.status == Status::Overdue && incoming.status == Status::Planned {
                    incoming.status = Status::Overdue;
                }
                if let (Some(new_rule), Some(old_rule)) =
                    (incoming.recurring.as_mut(), prev.recurring.as_ref())
                {
                    if old_rule.enabled && old_rule.next_run.is_some() {
                        new_rule.next_run = old_rule.next_run;
                    }
                }
                self.records[pos] = incoming.clone();
                AuditAction::RecordUpdated
            }
            None => {
                if incoming.status == Status::Overdue {
                    incoming.status = Status::Planned;
                }
                incoming.created_at = ctx.now;
                incoming.updated_at = ctx.now;
                self.records.push(incoming.clone());
                AuditAction::RecordCreated
            }
        };

        self.persist_records()?;
        self.log(action, format!("{} {}", incoming.r#type, incoming.id))?;
        Ok(incoming)
    }

    /// Explicit user status change. `Overdue` is derived and cannot be set
    /// directly.
    pub fn set_status(&mut self, id: &str, status: Status) -> EngineResult<FinanceRecord> {
        let now = self.clock.now();
        let record = self
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| EngineError::NotFound(id.to_string()))?;
        let from = record.status;
        if status == Status::Overdue && from != Status::Overdue {
            return Err(EngineError::InvalidTransition { from, to: status });
        }
        if from == status {
            return Ok(record.clone());
        }
        record.status = status;
        record.updated_at = record.updated_at.max(now);
        let updated = record.clone();

        self.persist_records()?;
        self.log(
            AuditAction::StatusChanged,
            format!("{}: {} -> {}", id, from, status),
        )?;
        Ok(updated)
    }

    pub fn delete_record(&mut self, id: &str) -> EngineResult<FinanceRecord> {
        let pos = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| EngineError::NotFound(id.to_string()))?;
        let removed = self.records.remove(pos);
        self.persist_records()?;
        self.log(AuditAction::RecordDeleted, format!("deleted {}", id))?;
        Ok(removed)
    }

    /// Create or replace the budget line for a month.
    pub fn upsert_budget(&mut self, raw: &Value) -> EngineResult<BudgetLine> {
        let line = normalize_budget(raw)
            .ok_or_else(|| EngineError::InvalidInput("budget line has no valid month".to_string()))?;
        let existing = std::mem::take(&mut self.budgets);
        self.budgets = merge_budgets(existing, vec![line.clone()]);
        self.persist_budgets()?;
        self.log(AuditAction::BudgetSaved, format!("budget {}", line.month))?;
        Ok(line)
    }

    pub fn update_settings(&mut self, config: EngineConfig) -> EngineResult<()> {
        let merged = config.merge_into(self.settings.take());
        self.store.set(SETTINGS_KEY, merged.clone())?;
        self.settings = Some(merged);
        let role = std::mem::take(&mut self.config.actor_role);
        self.config = EngineConfig::from_settings(self.settings.as_ref());
        self.config.actor_role = role;
        self.audit = AuditLog::from_entries(self.audit.to_vec(), self.config.audit_limit);
        self.log(
            AuditAction::SettingsChanged,
            format!(
                "currency={} overdueRuleDays={} auditLimit={}",
                self.config.currency, self.config.overdue_rule_days, self.config.audit_limit
            ),
        )
    }

    fn merge_incoming(&mut self, incoming: Vec<FinanceRecord>, report: &mut ImportReport) {
        let existing = std::mem::take(&mut self.records);
        let (merged, stats) = merge_with_stats(existing, incoming);
        self.records = merged;
        report.added = stats.added;
        report.replaced = stats.replaced;
        report.kept = stats.kept;
    }

    fn log(&mut self, action: AuditAction, detail: String) -> EngineResult<()> {
        let now = self.clock.now();
        let role = self.config.actor_role.clone();
        self.audit.record(now, &role, action, detail);
        self.persist_audit()
    }

    fn persist_records(&mut self) -> EngineResult<()> {
        let value = serde_json::to_value(&self.records)?;
        self.store.set(TXS_KEY, value)
    }

    fn persist_budgets(&mut self) -> EngineResult<()> {
        let value = serde_json::to_value(&self.budgets)?;
        self.store.set(BUDGETS_KEY, value)
    }

    fn persist_audit(&mut self) -> EngineResult<()> {
        let entries: Vec<AuditEntry> = self.audit.to_vec();
        let value = serde_json::to_value(&entries)?;
        self.store.set(AUDIT_KEY, value)
    }
}
