// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Achievement catalog and evaluation.
//!
//! The catalog is plain data: each entry carries a [`Rule`] and
//! [`Rule::is_met`] is the one place rules are interpreted. Evaluation only
//! ever adds ids to the unlocked set; [`reset`] is the only way to shrink it.

use std::collections::BTreeSet;

use anyhow::Result;
use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::EngineError;
use crate::models::{AchievementState, Limit, Transaction, UnlockedAchievement};
use crate::spending::{daily_spending, distinct_categories, distinct_dates, monthly_spending};
use crate::store::Store;
use crate::utils::fmt_money;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// At least this many transactions recorded.
    TransactionCount { at_least: usize },
    /// At least this many distinct categories used.
    DistinctCategories { at_least: usize },
    /// At least this many limits configured.
    LimitsConfigured { at_least: usize },
    /// Some limited category has spend this month in `(0, limit)`.
    UnderBudget,
    /// Spend today in `(0, below)`.
    LowSpendingDay { below: i64 },
    /// A run of `days` consecutive calendar days with a transaction each.
    ConsecutiveDays { days: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Achievement {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub rule: Rule,
}

impl Achievement {
    fn unlocked_on(&self, day: NaiveDate) -> UnlockedAchievement {
        UnlockedAchievement {
            id: self.id,
            name: self.name,
            description: self.description,
            icon: self.icon,
            unlocked_date: day,
        }
    }
}

/// Every achievement, in evaluation order.
pub const CATALOG: &[Achievement] = &[
    Achievement {
        id: "first_transaction",
        name: "First Steps",
        description: "Added your first transaction",
        icon: "🎯",
        rule: Rule::TransactionCount { at_least: 1 },
    },
    Achievement {
        id: "ten_transactions",
        name: "Getting Started",
        description: "Added 10 transactions",
        icon: "📝",
        rule: Rule::TransactionCount { at_least: 10 },
    },
    Achievement {
        id: "fifty_transactions",
        name: "Dedicated Tracker",
        description: "Added 50 transactions",
        icon: "📊",
        rule: Rule::TransactionCount { at_least: 50 },
    },
    Achievement {
        id: "hundred_transactions",
        name: "Master Tracker",
        description: "Added 100 transactions",
        icon: "🏆",
        rule: Rule::TransactionCount { at_least: 100 },
    },
    Achievement {
        id: "first_category",
        name: "Category Explorer",
        description: "Used your first spending category",
        icon: "🏷️",
        rule: Rule::DistinctCategories { at_least: 1 },
    },
    Achievement {
        id: "five_categories",
        name: "Category Master",
        description: "Used 5 different categories",
        icon: "🎨",
        rule: Rule::DistinctCategories { at_least: 5 },
    },
    Achievement {
        id: "first_limit",
        name: "Budget Setter",
        description: "Set your first spending limit",
        icon: "💰",
        rule: Rule::LimitsConfigured { at_least: 1 },
    },
    Achievement {
        id: "under_budget",
        name: "Budget Master",
        description: "Stayed under budget for a category",
        icon: "✅",
        rule: Rule::UnderBudget,
    },
    Achievement {
        id: "low_spending_day",
        name: "Frugal Day",
        description: "Spent less than $20 in a day",
        icon: "💡",
        rule: Rule::LowSpendingDay { below: 20 },
    },
    Achievement {
        id: "consistent_tracker",
        name: "Consistent Tracker",
        description: "Added transactions for 7 consecutive days",
        icon: "📅",
        rule: Rule::ConsecutiveDays { days: 7 },
    },
];

pub fn find(id: &str) -> Option<&'static Achievement> {
    CATALOG.iter().find(|a| a.id == id)
}

/// The data a rule is evaluated against.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub transactions: &'a [Transaction],
    pub limits: &'a [Limit],
    pub today: NaiveDate,
}

impl Rule {
    pub fn is_met(&self, snap: &Snapshot<'_>) -> Result<bool, EngineError> {
        Ok(match *self {
            Rule::TransactionCount { at_least } => snap.transactions.len() >= at_least,
            Rule::DistinctCategories { at_least } => {
                distinct_categories(snap.transactions).len() >= at_least
            }
            Rule::LimitsConfigured { at_least } => snap.limits.len() >= at_least,
            Rule::UnderBudget => categories_under_budget(snap)? > 0,
            Rule::LowSpendingDay { below } => {
                let spent = daily_spending(snap.transactions, snap.today)?;
                spent > Decimal::ZERO && spent < Decimal::from(below)
            }
            Rule::ConsecutiveDays { days } => {
                snap.transactions.len() >= days as usize
                    && has_streak(&distinct_dates(snap.transactions), days)
            }
        })
    }

    /// Where the data currently stands relative to the rule's target.
    pub fn progress(&self, snap: &Snapshot<'_>) -> Result<(String, String), EngineError> {
        Ok(match *self {
            Rule::TransactionCount { at_least } => {
                (snap.transactions.len().to_string(), at_least.to_string())
            }
            Rule::DistinctCategories { at_least } => (
                distinct_categories(snap.transactions).len().to_string(),
                at_least.to_string(),
            ),
            Rule::LimitsConfigured { at_least } => {
                (snap.limits.len().to_string(), at_least.to_string())
            }
            Rule::UnderBudget => (categories_under_budget(snap)?.to_string(), "1".to_string()),
            Rule::LowSpendingDay { below } => (
                fmt_money(&daily_spending(snap.transactions, snap.today)?),
                format!("< {}", fmt_money(&Decimal::from(below))),
            ),
            Rule::ConsecutiveDays { days } => (
                longest_streak(&distinct_dates(snap.transactions)).to_string(),
                days.to_string(),
            ),
        })
    }
}

fn categories_under_budget(snap: &Snapshot<'_>) -> Result<usize, EngineError> {
    let mut under = 0;
    for limit in snap.limits {
        let spent = monthly_spending(snap.transactions, &limit.category, snap.today)?;
        if spent > Decimal::ZERO && spent < limit.limit_amount {
            under += 1;
        }
    }
    Ok(under)
}

/// True when some run of `days` consecutive calendar days is fully present
/// in `dates`.
///
/// Slides a `days`-wide window over the sorted distinct dates and checks
/// every calendar day from the window's first date onwards.
pub fn has_streak(dates: &BTreeSet<NaiveDate>, days: u32) -> bool {
    if days == 0 {
        return true;
    }
    let sorted: Vec<NaiveDate> = dates.iter().copied().collect();
    sorted.windows(days as usize).any(|w| {
        let start = w[0];
        (0..u64::from(days)).all(|k| {
            start
                .checked_add_days(Days::new(k))
                .is_some_and(|d| dates.contains(&d))
        })
    })
}

pub fn longest_streak(dates: &BTreeSet<NaiveDate>) -> u32 {
    let mut best = 0;
    let mut run = 0;
    let mut prev: Option<NaiveDate> = None;
    for &d in dates {
        run = match prev.and_then(|p| p.succ_opt()) {
            Some(next) if next == d => run + 1,
            _ => 1,
        };
        best = best.max(run);
        prev = Some(d);
    }
    best
}

#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub newly_unlocked: Vec<UnlockedAchievement>,
    pub state: AchievementState,
}

/// Evaluates every catalog entry not yet in `state.unlocked`.
///
/// Newly met entries are returned in catalog order, stamped with `today`.
/// A rule that fails to evaluate is logged and treated as not met.
pub fn evaluate(
    transactions: &[Transaction],
    limits: &[Limit],
    state: &AchievementState,
    today: NaiveDate,
) -> Evaluation {
    let snap = Snapshot {
        transactions,
        limits,
        today,
    };
    let mut state = state.clone();
    let mut newly_unlocked = Vec::new();
    for achievement in CATALOG {
        if state.is_unlocked(achievement.id) {
            continue;
        }
        match achievement.rule.is_met(&snap) {
            Ok(true) => {
                state.unlock(achievement.id);
                tracing::info!(achievement = achievement.id, "achievement unlocked");
                newly_unlocked.push(achievement.unlocked_on(today));
            }
            Ok(false) => {}
            Err(err) => {
                tracing::warn!(achievement = achievement.id, %err, "achievement rule failed");
            }
        }
    }
    Evaluation {
        newly_unlocked,
        state,
    }
}

/// Loads the unlock state, evaluates, and saves the state before returning
/// anything that was newly unlocked.
pub fn check(
    store: &Store,
    transactions: &[Transaction],
    limits: &[Limit],
    today: NaiveDate,
) -> Result<Vec<UnlockedAchievement>> {
    let state = store.load_achievements()?;
    let eval = evaluate(transactions, limits, &state, today);
    if !eval.newly_unlocked.is_empty() {
        store.save_achievements(&eval.state)?;
    }
    Ok(eval.newly_unlocked)
}

pub fn reset(store: &Store) -> Result<()> {
    tracing::info!("resetting achievements");
    store.save_achievements(&AchievementState::default())
}

/// Catalog entries present in `state`, in unlock order. Ids the catalog
/// does not know are skipped.
pub fn unlocked(state: &AchievementState) -> Vec<&'static Achievement> {
    state.unlocked.iter().filter_map(|id| find(id)).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressRow {
    pub id: &'static str,
    pub name: &'static str,
    pub current: String,
    pub target: String,
    pub met: bool,
    pub unlocked: bool,
}

/// One row per catalog entry showing how close the data is to each target.
pub fn progress(
    transactions: &[Transaction],
    limits: &[Limit],
    state: &AchievementState,
    today: NaiveDate,
) -> Vec<ProgressRow> {
    let snap = Snapshot {
        transactions,
        limits,
        today,
    };
    CATALOG
        .iter()
        .map(|a| {
            let (current, target) = a
                .rule
                .progress(&snap)
                .unwrap_or_else(|err| (format!("error: {}", err), String::new()));
            ProgressRow {
                id: a.id,
                name: a.name,
                current,
                target,
                met: a.rule.is_met(&snap).unwrap_or(false),
                unlocked: state.is_unlocked(a.id),
            }
        })
        .collect()
}
