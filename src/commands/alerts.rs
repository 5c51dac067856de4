// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use super::arg;
use crate::alerts::{clear, dismiss};
use crate::models::DedupKey;
use crate::store::Store;
use crate::utils::{fmt_money, maybe_print_json, pretty_table};

pub fn handle(store: &Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(store, sub)?,
        Some(("dismiss", sub)) => {
            let key: DedupKey = arg(sub, "key")?.parse()?;
            if dismiss(store, &key)? {
                println!("Dismissed alert {}", key);
            } else {
                println!("No active alert {}", key);
            }
        }
        Some(("clear", _)) => {
            clear(store)?;
            println!("All alerts cleared");
        }
        _ => {}
    }
    Ok(())
}

fn list(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let alerts = store.load_alerts()?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &alerts)? {
        return Ok(());
    }
    if alerts.is_empty() {
        println!("No active alerts");
        return Ok(());
    }
    let rows = alerts
        .iter()
        .map(|a| {
            vec![
                a.dedup_key.to_string(),
                a.category.clone(),
                fmt_money(&a.current_spending),
                fmt_money(&a.limit),
                format!("{}%", a.threshold_percent),
                a.timestamp.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Key", "Category", "Spending", "Limit", "Threshold", "Raised"],
            rows
        )
    );
    Ok(())
}
