// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::path::PathBuf;

use finledger::{Engine, SystemClock, cli, commands, db};

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let db_arg = matches.get_one::<String>("db").map(PathBuf::from);
    let store = db::open_or_init(db_arg.as_deref())?;

    if let Some(("doctor", sub)) = matches.subcommand() {
        return commands::doctor::handle(&store, sub);
    }

    let mut engine = Engine::open(store, SystemClock)?;
    if let Some(role) = matches.get_one::<String>("role") {
        engine = engine.with_actor(role);
    }
    let report = engine.bootstrap()?;

    match matches.subcommand() {
        Some(("init", _)) => {
            let path = match db_arg {
                Some(p) => p,
                None => db::db_path()?,
            };
            println!("Store initialized at {}", path.display());
        }
        Some(("sync", sub)) => commands::sync::handle(&report, sub)?,
        Some(("import", sub)) => commands::importer::handle(&mut engine, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&mut engine, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&mut engine, sub)?,
        Some(("budget", sub)) => commands::budgets::handle(&mut engine, sub)?,
        Some(("report", sub)) => commands::reports::handle(&engine, sub)?,
        Some(("audit", sub)) => commands::audit::handle(&engine, sub)?,
        Some(("settings", sub)) => commands::settings::handle(&mut engine, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
