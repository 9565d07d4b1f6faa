// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Errors surfaced by the ledger engine.
//!
//! Only malformed *inputs* (unparsable JSON, CSV without data rows) and
//! storage failures are errors. A single bad record inside a batch is
//! dropped and counted instead, see [`crate::normalize::Normalized`].

use thiserror::Error;

use crate::models::Status;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Malformed JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),
    #[error("Insufficient rows: expected a header and at least one data row, found {found} line(s)")]
    InsufficientRows { found: usize },
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Database(#[from] rusqlite::Error),
    #[error("\"{0}\" not found")]
    NotFound(String),
    #[error("Invalid status transition {from} -> {to}")]
    InvalidTransition { from: Status, to: Status },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl EngineError {
    /// `true` for errors caused by the shape of user-supplied input, as
    /// opposed to storage failures.
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            EngineError::MalformedJson(_)
                | EngineError::InsufficientRows { .. }
                | EngineError::Csv(_)
                | EngineError::InvalidInput(_)
        )
    }
}
