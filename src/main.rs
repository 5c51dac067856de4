// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use pennywise::{cli, commands, config::Config, logging, store::Store};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let config = Config::resolve(
        matches.get_one::<String>("data_dir").map(String::as_str),
        matches.get_flag("verbose"),
    )?;
    logging::init(&config.log_filter);
    tracing::debug!(data_dir = %config.data_dir.display(), "using data dir");

    let store = Store::open(&config.data_dir)?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Data directory ready at {}", store.root().display());
        }
        Some(("tx", sub)) => commands::transactions::handle(&store, sub)?,
        Some(("limit", sub)) => commands::limits::handle(&store, sub)?,
        Some(("alerts", sub)) => commands::alerts::handle(&store, sub)?,
        Some(("achievements", sub)) => commands::achievements::handle(&store, sub)?,
        Some(("report", sub)) => commands::reports::handle(&store, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
