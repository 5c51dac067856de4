// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Spending aggregates shared by the alert and achievement engines.
//!
//! Transactions without a parsable amount are skipped; transactions without
//! a parsable date never match a month or a day.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::EngineError;
use crate::models::Transaction;
use crate::utils::same_month;

/// Sums the parsable amounts of `txs`, failing on overflow.
pub fn sum_amounts<'a, I>(txs: I, what: &str) -> Result<Decimal, EngineError>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    txs.into_iter()
        .filter_map(|t| t.amount)
        .try_fold(Decimal::ZERO, |acc, a| {
            acc.checked_add(a)
                .ok_or_else(|| EngineError::Overflow(what.to_string()))
        })
}

/// Spend in `category` during the month of `today`.
pub fn monthly_spending(
    transactions: &[Transaction],
    category: &str,
    today: NaiveDate,
) -> Result<Decimal, EngineError> {
    sum_amounts(
        transactions.iter().filter(|t| {
            t.category == category && t.date.is_some_and(|d| same_month(d, today))
        }),
        category,
    )
}

/// Spend across all categories on `day`.
pub fn daily_spending(
    transactions: &[Transaction],
    day: NaiveDate,
) -> Result<Decimal, EngineError> {
    sum_amounts(
        transactions.iter().filter(|t| t.date == Some(day)),
        "daily spending",
    )
}

/// Spend across all categories during the month of `today`.
pub fn month_total(
    transactions: &[Transaction],
    today: NaiveDate,
) -> Result<Decimal, EngineError> {
    sum_amounts(
        transactions
            .iter()
            .filter(|t| t.date.is_some_and(|d| same_month(d, today))),
        "monthly spending",
    )
}

pub fn distinct_categories(transactions: &[Transaction]) -> BTreeSet<&str> {
    transactions.iter().map(|t| t.category.as_str()).collect()
}

pub fn distinct_dates(transactions: &[Transaction]) -> BTreeSet<NaiveDate> {
    transactions.iter().filter_map(|t| t.date).collect()
}
