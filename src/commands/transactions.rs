// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use chrono::Datelike;
use serde::Serialize;

use super::{arg, opt_arg};
use crate::achievements;
use crate::alerts::{check_limit, record};
use crate::ids::IdAllocator;
use crate::models::{Transaction, TransactionDetails, UnlockedAchievement};
use crate::store::Store;
use crate::utils::{
    format_date, maybe_print_json, parse_date, parse_decimal, parse_month, pretty_table, today,
};

pub fn handle(store: &Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        Some(("edit", sub)) => edit(store, sub)?,
        Some(("rm", sub)) => remove(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let name = arg(sub, "name")?;
    let amount = parse_decimal(arg(sub, "amount")?)?;
    let category = arg(sub, "category")?;
    let today = today();
    let date = match opt_arg(sub, "date") {
        Some(d) => parse_date(d)?,
        None => today,
    };

    let mut transactions = store.load_transactions()?;
    let limits = store.load_limits()?;
    let mut ids = IdAllocator::new(transactions.iter().map(|t| t.id));
    let id = ids.allocate()?;
    let details = TransactionDetails::for_category(
        category,
        opt_arg(sub, "extra1").unwrap_or_default(),
        opt_arg(sub, "extra2").unwrap_or_default(),
    );
    let tx = Transaction::new(id, name, amount, date, category).with_details(details);

    // Projected against the current month's spend before this transaction
    // is saved, whatever its date.
    let check = check_limit(
        category,
        amount,
        &transactions,
        &limits,
        &store.load_alerts()?,
        today,
    );

    transactions.push(tx);
    store.save_transactions(&transactions)?;
    println!(
        "Recorded #{} {} {} on {} ({})",
        id,
        name,
        amount,
        format_date(date),
        category
    );

    if let Some(alert) = record(store, check)? {
        println!("\n{}\n", alert.message);
    }
    let unlocked = achievements::check(store, &transactions, &limits, today)?;
    print_unlocked(&unlocked);
    Ok(())
}

pub fn print_unlocked(unlocked: &[UnlockedAchievement]) {
    if unlocked.is_empty() {
        return;
    }
    let names: Vec<String> = unlocked
        .iter()
        .map(|a| format!("{} {}", a.icon, a.name))
        .collect();
    println!("🎉 New achievements unlocked: {}", names.join(", "));
}

#[derive(Debug, Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub name: String,
    pub amount: String,
    pub category: String,
    pub details: String,
}

impl From<&Transaction> for TransactionRow {
    fn from(t: &Transaction) -> Self {
        let details: Vec<String> = t
            .details
            .fields()
            .into_iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| format!("{}: {}", k, v))
            .collect();
        TransactionRow {
            id: t.id,
            date: t.date.map(format_date).unwrap_or_default(),
            name: t.name.clone(),
            amount: t.amount.map(|a| format!("{:.2}", a)).unwrap_or_default(),
            category: t.category.clone(),
            details: details.join(", "),
        }
    }
}

fn list(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(store, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.name.clone(),
                    r.amount.clone(),
                    r.category.clone(),
                    r.details.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Date", "Name", "Amount", "Category", "Details"], rows)
        );
    }
    Ok(())
}

/// Transactions matching the `list` filters, newest first.
pub fn query_rows(store: &Store, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let mut transactions = store.load_transactions()?;
    if let Some(cat) = opt_arg(sub, "category") {
        transactions.retain(|t| t.category == cat);
    }
    if let Some(month) = opt_arg(sub, "month") {
        let month = parse_month(month)?;
        transactions.retain(|t| {
            t.date
                .is_some_and(|d| d.year() == month.year() && d.month() == month.month())
        });
    }
    transactions.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
    if let Some(limit) = sub.get_one::<usize>("limit") {
        transactions.truncate(*limit);
    }
    Ok(transactions.iter().map(TransactionRow::from).collect())
}

fn parse_id(sub: &clap::ArgMatches) -> Result<i64> {
    let raw = arg(sub, "id")?;
    raw.parse::<i64>()
        .with_context(|| format!("Invalid transaction id '{}'", raw))
}

fn edit(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_id(sub)?;
    let mut transactions = store.load_transactions()?;
    let tx = transactions
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or_else(|| anyhow!("Transaction {} not found", id))?;
    if let Some(name) = opt_arg(sub, "name") {
        tx.name = name.to_string();
    }
    if let Some(amount) = opt_arg(sub, "amount") {
        tx.set_amount(parse_decimal(amount)?);
    }
    if let Some(date) = opt_arg(sub, "date") {
        tx.set_date(parse_date(date)?);
    }
    store.save_transactions(&transactions)?;
    println!("Updated transaction {}", id);
    reevaluate(store, &transactions)
}

fn remove(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_id(sub)?;
    let mut transactions = store.load_transactions()?;
    let before = transactions.len();
    transactions.retain(|t| t.id != id);
    if transactions.len() == before {
        return Err(anyhow!("Transaction {} not found", id));
    }
    store.save_transactions(&transactions)?;
    println!("Removed transaction {}", id);
    reevaluate(store, &transactions)
}

/// Unlocks are never revoked, so edits can only add achievements.
fn reevaluate(store: &Store, transactions: &[Transaction]) -> Result<()> {
    let limits = store.load_limits()?;
    let unlocked = achievements::check(store, transactions, &limits, today())?;
    print_unlocked(&unlocked);
    Ok(())
}
