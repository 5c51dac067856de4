// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;

use anyhow::Result;
use chrono::Datelike;
use rust_decimal::Decimal;
use serde::Serialize;

use super::opt_arg;
use crate::models::Transaction;
use crate::spending::{month_total, monthly_spending};
use crate::store::Store;
use crate::utils::{fmt_money, maybe_print_json, parse_month, pretty_table, same_month, today};

#[derive(Debug, Serialize)]
pub struct MonthSummary {
    pub total_spending: Decimal,
    pub transaction_count: usize,
    pub average_transaction: Decimal,
    pub top_category: Option<String>,
    pub limits: Vec<LimitUsage>,
}

#[derive(Debug, Serialize)]
pub struct LimitUsage {
    pub category: String,
    pub spent: Decimal,
    pub limit: Decimal,
    /// `None` when the percentage does not fit in a decimal.
    pub used_percent: Option<Decimal>,
}

/// Summary of `--month` (year and month), or of the current month.
pub fn month_summary(store: &Store, sub: &clap::ArgMatches) -> Result<MonthSummary> {
    let month = opt_arg(sub, "month").map(parse_month).transpose()?;
    let reference = month.unwrap_or_else(today);
    let transactions = store.load_transactions()?;
    let limits = store.load_limits()?;

    let in_month: Vec<Transaction> = transactions
        .iter()
        .filter(|t| {
            t.date.is_some_and(|d| match month {
                Some(m) => d.year() == m.year() && d.month() == m.month(),
                None => same_month(d, reference),
            })
        })
        .cloned()
        .collect();
    let total = month_total(&in_month, reference)?;
    let count = in_month.len();
    let average = if count > 0 {
        (total / Decimal::from(count)).round_dp(2)
    } else {
        Decimal::ZERO
    };

    let mut by_category: BTreeMap<&str, usize> = BTreeMap::new();
    for t in &in_month {
        *by_category.entry(t.category.as_str()).or_default() += 1;
    }
    // Highest count wins; ties go to the alphabetically first category.
    let top_category = by_category
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
        .map(|(c, _)| c.to_string());

    let mut usage = Vec::new();
    for l in &limits {
        let spent = match monthly_spending(&in_month, &l.category, reference) {
            Ok(spent) => spent,
            Err(err) => {
                tracing::warn!(category = %l.category, %err, "skipping limit usage");
                continue;
            }
        };
        let used_percent = spent
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|v| v.checked_div(l.limit_amount))
            .map(|p| p.round_dp(1));
        usage.push(LimitUsage {
            category: l.category.clone(),
            spent,
            limit: l.limit_amount,
            used_percent,
        });
    }

    Ok(MonthSummary {
        total_spending: total,
        transaction_count: count,
        average_transaction: average,
        top_category,
        limits: usage,
    })
}

pub fn handle(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let summary = month_summary(store, sub)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &summary)? {
        return Ok(());
    }

    println!(
        "{}",
        pretty_table(
            &["Total Spent", "Transactions", "Average", "Top Category"],
            vec![vec![
                fmt_money(&summary.total_spending),
                summary.transaction_count.to_string(),
                fmt_money(&summary.average_transaction),
                summary.top_category.clone().unwrap_or_else(|| "N/A".into()),
            ]],
        )
    );
    if !summary.limits.is_empty() {
        let rows = summary
            .limits
            .iter()
            .map(|u| {
                vec![
                    u.category.clone(),
                    fmt_money(&u.spent),
                    fmt_money(&u.limit),
                    u.used_percent
                        .map(|p| format!("{}%", p))
                        .unwrap_or_else(|| "N/A".to_string()),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Category", "Spent", "Limit", "Used"], rows)
        );
    }
    Ok(())
}
