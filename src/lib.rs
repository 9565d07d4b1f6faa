// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod audit;
pub mod cli;
pub mod commands;
pub mod config;
pub mod csv_codec;
pub mod db;
pub mod engine;
pub mod error;
pub mod merge;
pub mod models;
pub mod normalize;
pub mod overdue;
pub mod recurrence;
pub mod store;
pub mod summary;
pub mod tax;
pub mod utils;

pub use engine::{BootstrapReport, Clock, Engine, FixedClock, ImportReport, SystemClock};
pub use error::{EngineError, EngineResult};
