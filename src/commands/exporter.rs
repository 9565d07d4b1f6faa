// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::Engine;
use crate::store::Store;
use anyhow::{Context, Result, anyhow};

pub fn handle<S: Store>(engine: &mut Engine<S>, m: &clap::ArgMatches) -> Result<()> {
    let fmt = m
        .get_one::<String>("format")
        .map(|s| s.trim().to_lowercase())
        .unwrap_or_else(|| "csv".to_string());
    let out = m.get_one::<String>("out").context("--out is required")?;

    let text = match fmt.as_str() {
        "csv" => engine.export_csv()?,
        "json" => engine.export_json()?,
        _ => return Err(anyhow!("Unknown format: {} (use csv|json)", fmt)),
    };
    std::fs::write(out, text).with_context(|| format!("Write {}", out))?;
    println!("Exported {} record(s) to {}", engine.records().len(), out);
    Ok(())
}
