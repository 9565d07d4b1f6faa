// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print as JSON lines"),
    )
}

fn status_values() -> [&'static str; 5] {
    ["Planned", "Pending", "Paid", "Overdue", "Cancelled"]
}

pub fn build_cli() -> Command {
    Command::new("finledger")
        .about("Finance ledger engine: GST/TDS totals, overdue and recurring schedules, CSV/JSON import-export")
        .version(clap::crate_version!())
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .env("FINLEDGER_DB")
                .help("Path to the SQLite store (defaults to the platform data dir)"),
        )
        .arg(
            Arg::new("role")
                .long("role")
                .global(true)
                .help("Role recorded on audit entries"),
        )
        .subcommand(Command::new("init").about("Create the store if missing"))
        .subcommand(
            json_flags(Command::new("sync"))
                .about("Run overdue and recurring passes and persist the result"),
        )
        .subcommand(
            Command::new("import")
                .about("Import records")
                .subcommand(
                    Command::new("csv")
                        .about("Import records from a CSV file with a header row")
                        .arg(Arg::new("path").long("path").required(true)),
                )
                .subcommand(
                    Command::new("json")
                        .about("Import a JSON backup")
                        .arg(Arg::new("path").long("path").required(true)),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export records as CSV or a full JSON backup")
                .arg(
                    Arg::new("format")
                        .long("format")
                        .default_value("csv")
                        .help("csv|json"),
                )
                .arg(Arg::new("out").long("out").required(true)),
        )
        .subcommand(
            Command::new("tx")
                .about("Ledger records")
                .subcommand(
                    Command::new("add")
                        .about("Add or edit a record")
                        .arg(Arg::new("id").long("id"))
                        .arg(Arg::new("date").long("date"))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .default_value("Expense")
                                .help("Income|Expense"),
                        )
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("currency").long("currency"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("description").long("description"))
                        .arg(Arg::new("client").long("client"))
                        .arg(Arg::new("vendor").long("vendor"))
                        .arg(Arg::new("event").long("event"))
                        .arg(Arg::new("method").long("method"))
                        .arg(Arg::new("gst").long("gst").help("GST rate, 0-28"))
                        .arg(
                            Arg::new("gst_included")
                                .long("gst-included")
                                .action(ArgAction::SetTrue),
                        )
                        .arg(Arg::new("tds").long("tds").help("TDS rate, 0-20"))
                        .arg(Arg::new("due").long("due"))
                        .arg(Arg::new("status").long("status"))
                        .arg(Arg::new("invoice").long("invoice"))
                        .arg(Arg::new("note").long("note"))
                        .arg(
                            Arg::new("recurring")
                                .long("recurring")
                                .help("Weekly|Monthly|Quarterly|Yearly"),
                        ),
                )
                .subcommand(
                    json_flags(Command::new("list"))
                        .about("List records with derived totals")
                        .arg(Arg::new("month").long("month"))
                        .arg(Arg::new("status").long("status"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                )
                .subcommand(
                    Command::new("status")
                        .about("Change the status of a record")
                        .arg(Arg::new("id").long("id").required(true))
                        .arg(
                            Arg::new("to")
                                .long("to")
                                .required(true)
                                .value_parser(status_values()),
                        ),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete a record")
                        .arg(Arg::new("id").long("id").required(true)),
                ),
        )
        .subcommand(
            Command::new("budget")
                .about("Monthly budget lines")
                .subcommand(
                    Command::new("set")
                        .about("Create or replace the budget for a month")
                        .arg(Arg::new("month").long("month").required(true))
                        .arg(Arg::new("revenue").long("revenue"))
                        .arg(Arg::new("cap").long("cap"))
                        .arg(Arg::new("margin").long("margin"))
                        .arg(Arg::new("rent").long("rent"))
                        .arg(Arg::new("salaries").long("salaries"))
                        .arg(Arg::new("marketing").long("marketing"))
                        .arg(Arg::new("misc").long("misc"))
                        .arg(Arg::new("logistics").long("logistics"))
                        .arg(Arg::new("compliance").long("compliance")),
                )
                .subcommand(json_flags(Command::new("list")).about("List budget lines")),
        )
        .subcommand(
            Command::new("report")
                .about("Derived totals")
                .subcommand(
                    json_flags(Command::new("summary"))
                        .about("Income, expense, GST and TDS totals")
                        .arg(Arg::new("month").long("month")),
                )
                .subcommand(
                    json_flags(Command::new("budget"))
                        .about("Budget against actuals for a month")
                        .arg(Arg::new("month").long("month").required(true)),
                ),
        )
        .subcommand(
            Command::new("audit").about("Audit log").subcommand(
                json_flags(Command::new("list"))
                    .about("Most recent audit entries")
                    .arg(
                        Arg::new("limit")
                            .long("limit")
                            .value_parser(value_parser!(usize)),
                    ),
            ),
        )
        .subcommand(
            Command::new("settings")
                .about("Engine settings")
                .subcommand(json_flags(Command::new("show")).about("Show settings"))
                .subcommand(
                    Command::new("set")
                        .about("Update settings")
                        .arg(Arg::new("currency").long("currency"))
                        .arg(
                            Arg::new("overdue_days")
                                .long("overdue-days")
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(
                            Arg::new("audit_limit")
                                .long("audit-limit")
                                .value_parser(value_parser!(i64)),
                        ),
                ),
        )
        .subcommand(
            json_flags(Command::new("doctor"))
                .about("Report stored data the normalizer would drop or correct"),
        )
}
