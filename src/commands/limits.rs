// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};

use super::arg;
use super::transactions::print_unlocked;
use crate::achievements;
use crate::models::Limit;
use crate::store::Store;
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, pretty_table, today};

pub fn handle(store: &Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        Some(("rm", sub)) => remove(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn set(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let category = arg(sub, "category")?;
    let amount = parse_decimal(arg(sub, "amount")?)?;
    let threshold = *sub
        .get_one::<i64>("threshold")
        .context("Missing --threshold")?;
    let limit = Limit::new(category, amount, threshold)?;

    let mut limits = store.load_limits()?;
    match limits.iter_mut().find(|l| l.category == category) {
        Some(existing) => *existing = limit,
        None => limits.push(limit),
    }
    store.save_limits(&limits)?;
    println!(
        "Limit for {} set to {} (alert at {}%)",
        category,
        fmt_money(&amount),
        threshold
    );

    let transactions = store.load_transactions()?;
    let unlocked = achievements::check(store, &transactions, &limits, today())?;
    print_unlocked(&unlocked);
    Ok(())
}

fn list(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let limits = store.load_limits()?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &limits)? {
        let rows = limits
            .iter()
            .map(|l| {
                vec![
                    l.category.clone(),
                    fmt_money(&l.limit_amount),
                    format!("{}%", l.alert_threshold_percent),
                    l.threshold_amount()
                        .map(|t| fmt_money(&t))
                        .unwrap_or_else(|_| "overflow".to_string()),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Category", "Limit", "Alert At", "Alert Amount"], rows)
        );
    }
    Ok(())
}

fn remove(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let category = arg(sub, "category")?;
    let mut limits = store.load_limits()?;
    let before = limits.len();
    limits.retain(|l| l.category != category);
    if limits.len() == before {
        println!("No limit set for {}", category);
        return Ok(());
    }
    store.save_limits(&limits)?;
    println!("Removed limit for {}", category);
    Ok(())
}
