// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use serde::Serialize;

use super::transactions::print_unlocked;
use crate::achievements::{CATALOG, check, progress, reset, unlocked};
use crate::store::Store;
use crate::utils::{maybe_print_json, pretty_table, today};

pub fn handle(store: &Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(store, sub)?,
        Some(("check", _)) => {
            let transactions = store.load_transactions()?;
            let limits = store.load_limits()?;
            let unlocked = check(store, &transactions, &limits, today())?;
            if unlocked.is_empty() {
                println!("No new achievements");
            }
            print_unlocked(&unlocked);
        }
        Some(("progress", sub)) => show_progress(store, sub)?,
        Some(("reset", _)) => {
            reset(store)?;
            println!("All achievements reset");
        }
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct CatalogRow {
    id: &'static str,
    icon: &'static str,
    name: &'static str,
    description: &'static str,
    unlocked: bool,
}

fn list(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let earned = unlocked(&store.load_achievements()?);
    let data: Vec<CatalogRow> = CATALOG
        .iter()
        .map(|a| CatalogRow {
            id: a.id,
            icon: a.icon,
            name: a.name,
            description: a.description,
            unlocked: earned.iter().any(|e| e.id == a.id),
        })
        .collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .into_iter()
            .map(|r| {
                vec![
                    if r.unlocked { "✅" } else { "🔒" }.to_string(),
                    format!("{} {}", r.icon, r.name),
                    r.description.to_string(),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["", "Achievement", "Description"], rows));
        println!("{}/{} unlocked", earned.len(), CATALOG.len());
    }
    Ok(())
}

fn show_progress(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let transactions = store.load_transactions()?;
    let limits = store.load_limits()?;
    let state = store.load_achievements()?;
    let data = progress(&transactions, &limits, &state, today());
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|p| {
                vec![
                    p.name.to_string(),
                    p.current.clone(),
                    p.target.clone(),
                    if p.unlocked {
                        "unlocked"
                    } else if p.met {
                        "ready"
                    } else {
                        ""
                    }
                    .to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Achievement", "Current", "Target", "Status"], rows)
        );
    }
    Ok(())
}
