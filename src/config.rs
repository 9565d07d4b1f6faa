// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Engine settings, read from the `finance.settings` store key.
//!
//! Unknown or out-of-range values fall back to defaults rather than
//! failing; settings are edited by other surfaces we do not control.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::{Choice, Currency};

pub const DEFAULT_AUDIT_LIMIT: usize = 500;
pub const MIN_AUDIT_LIMIT: usize = 200;
pub const MAX_AUDIT_LIMIT: usize = 800;
pub const DEFAULT_ACTOR_ROLE: &str = "admin";
pub const SYSTEM_ACTOR: &str = "system";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    pub currency: Currency,
    /// Grace period in days before a due record turns overdue.
    pub overdue_rule_days: i64,
    pub audit_limit: usize,
    pub actor_role: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            currency: Currency::default(),
            overdue_rule_days: 0,
            audit_limit: DEFAULT_AUDIT_LIMIT,
            actor_role: DEFAULT_ACTOR_ROLE.to_string(),
        }
    }
}

impl EngineConfig {
    pub fn from_settings(settings: Option<&Value>) -> Self {
        let mut cfg = Self::default();
        let Some(obj) = settings.and_then(Value::as_object) else {
            return cfg;
        };

        if let Some(ccy) = str_field(obj, &["currency", "baseCurrency"]).and_then(Currency::parse)
        {
            cfg.currency = ccy;
        }
        if let Some(days) = int_field(obj, &["overdueRuleDays", "overdue_rule_days"]) {
            cfg.overdue_rule_days = days.max(0);
        }
        if let Some(limit) = int_field(obj, &["auditLimit", "audit_limit"]) {
            cfg.audit_limit = clamp_audit_limit(limit);
        }
        if let Some(role) = str_field(obj, &["actorRole", "role"]) {
            let role = role.trim();
            if !role.is_empty() {
                cfg.actor_role = role.to_string();
            }
        }
        cfg
    }

    /// Writes the engine-owned keys into `settings`, keeping every other
    /// key as found. The acting role is per session and is not written.
    pub fn merge_into(&self, settings: Option<Value>) -> Value {
        let mut obj = match settings {
            Some(Value::Object(m)) => m,
            _ => Map::new(),
        };
        obj.insert("currency".into(), Value::from(self.currency.as_str()));
        obj.insert("overdueRuleDays".into(), Value::from(self.overdue_rule_days));
        obj.insert("auditLimit".into(), Value::from(self.audit_limit));
        Value::Object(obj)
    }
}

pub fn clamp_audit_limit(limit: i64) -> usize {
    limit.clamp(MIN_AUDIT_LIMIT as i64, MAX_AUDIT_LIMIT as i64) as usize
}

fn str_field<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|k| obj.get(*k).and_then(Value::as_str))
}

fn int_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<i64> {
    keys.iter().find_map(|k| match obj.get(*k)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    })
}
