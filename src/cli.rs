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
            .conflicts_with("jsonl")
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

fn required(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).required(true).help(help)
}

fn optional(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).help(help)
}

pub fn build_cli() -> Command {
    Command::new("pennywise")
        .version(clap::crate_version!())
        .about("Track expenses, spending limits, alerts and achievements")
        .arg(
            Arg::new("data_dir")
                .long("data-dir")
                .global(true)
                .help("Data directory (default: $PENNYWISE_DATA_DIR or the platform data dir)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log debug output to stderr"),
        )
        .subcommand(Command::new("init").about("Create the data directory"))
        .subcommand(
            Command::new("tx")
                .about("Record and browse transactions")
                .subcommand(
                    Command::new("add")
                        .about("Record an expense, check its limit and achievements")
                        .arg(required("name", "What the money was spent on"))
                        .arg(required("amount", "Amount spent").allow_negative_numbers(true))
                        .arg(required("category", "Category, e.g. Food or Travel"))
                        .arg(optional("extra1", "First category field, e.g. subcategory"))
                        .arg(optional("extra2", "Second category field, e.g. location"))
                        .arg(optional("date", "MM/DD/YYYY (default: today)")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List transactions, newest first")
                        .arg(optional("category", "Only this category"))
                        .arg(optional("month", "Only this month, MM/YYYY"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize))
                                .help("Show at most this many"),
                        ),
                ))
                .subcommand(
                    Command::new("edit")
                        .about("Change a transaction's name, amount or date")
                        .arg(required("id", "Transaction id"))
                        .arg(optional("name", "New name"))
                        .arg(optional("amount", "New amount").allow_negative_numbers(true))
                        .arg(optional("date", "New date, MM/DD/YYYY")),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete a transaction")
                        .arg(required("id", "Transaction id")),
                ),
        )
        .subcommand(
            Command::new("limit")
                .about("Manage per-category spending limits")
                .subcommand(
                    Command::new("set")
                        .about("Create or update a category's limit")
                        .arg(required("category", "Category"))
                        .arg(required("amount", "Monthly limit"))
                        .arg(
                            Arg::new("threshold")
                                .long("threshold")
                                .required(true)
                                .value_parser(value_parser!(i64).range(0..=100))
                                .help("Alert at this percentage of the limit"),
                        ),
                )
                .subcommand(json_flags(Command::new("list").about("List limits")))
                .subcommand(
                    Command::new("rm")
                        .about("Delete a category's limit")
                        .arg(required("category", "Category")),
                ),
        )
        .subcommand(
            Command::new("alerts")
                .about("Spending alerts")
                .subcommand(json_flags(Command::new("list").about("List active alerts")))
                .subcommand(
                    Command::new("dismiss")
                        .about("Dismiss one alert")
                        .arg(required("key", "Alert key as shown by `alerts list`")),
                )
                .subcommand(Command::new("clear").about("Dismiss every alert")),
        )
        .subcommand(
            Command::new("achievements")
                .about("Achievements earned from your history")
                .subcommand(json_flags(
                    Command::new("list").about("Show the catalog and what is unlocked"),
                ))
                .subcommand(Command::new("check").about("Re-evaluate achievements now"))
                .subcommand(json_flags(
                    Command::new("progress").about("Show progress towards each achievement"),
                ))
                .subcommand(Command::new("reset").about("Forget every unlocked achievement")),
        )
        .subcommand(json_flags(
            Command::new("report")
                .about("This month's spending summary")
                .arg(optional("month", "Month to report, MM/YYYY (default: this month)")),
        ))
}
