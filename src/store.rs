// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Key-value persistence the engine reads from and writes back to.

use serde_json::Value;
use std::collections::HashMap;

use crate::error::EngineResult;

pub const TXS_KEY: &str = "finance.txs";
pub const BUDGETS_KEY: &str = "finance.budgets";
pub const AUDIT_KEY: &str = "finance.audit";
pub const SETTINGS_KEY: &str = "finance.settings";

/// JSON documents by key. `get` returns `None` for a missing key.
pub trait Store {
    fn get(&self, key: &str) -> EngineResult<Option<Value>>;
    fn set(&mut self, key: &str, value: Value) -> EngineResult<()>;
}

impl<S: Store + ?Sized> Store for &mut S {
    fn get(&self, key: &str) -> EngineResult<Option<Value>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: Value) -> EngineResult<()> {
        (**self).set(key, value)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: HashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.data.insert(key.to_string(), value);
        self
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> EngineResult<Option<Value>> {
        Ok(self.data.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> EngineResult<()> {
        self.data.insert(key.to_string(), value);
        Ok(())
    }
}
