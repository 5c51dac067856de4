// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Spending-limit alerts.
//!
//! The check runs before a transaction is saved: the amount about to be
//! recorded is added to the month's spend for its category. Alerts are
//! keyed by how many threshold multiples the projected total has crossed,
//! so a category re-alerts only when spending escalates to a new level.

use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::EngineError;
use crate::models::{Alert, DedupKey, Limit, Transaction};
use crate::spending::monthly_spending;
use crate::store::Store;
use crate::utils::fmt_money;

#[derive(Debug, Clone, PartialEq)]
pub struct LimitCheck {
    /// The alert raised by this check, if any.
    pub alert: Option<Alert>,
    /// `active_alerts` with `alert` appended when one was raised.
    pub alerts: Vec<Alert>,
}

impl LimitCheck {
    fn unchanged(active: &[Alert]) -> Self {
        Self {
            alert: None,
            alerts: active.to_vec(),
        }
    }
}

/// Checks whether recording `new_amount` in `category` crosses its alert
/// threshold. Categories without a limit never alert.
pub fn check_limit(
    category: &str,
    new_amount: Decimal,
    transactions: &[Transaction],
    limits: &[Limit],
    active_alerts: &[Alert],
    today: NaiveDate,
) -> LimitCheck {
    let Some(limit) = limits.iter().find(|l| l.category == category) else {
        return LimitCheck::unchanged(active_alerts);
    };
    match projected_alert(limit, new_amount, transactions, today) {
        Ok(Some(alert)) => {
            if active_alerts.iter().any(|a| a.dedup_key == alert.dedup_key) {
                tracing::debug!(key = %alert.dedup_key, "alert already active");
                return LimitCheck::unchanged(active_alerts);
            }
            tracing::info!(
                category,
                spending = %alert.current_spending,
                limit = %alert.limit,
                threshold = alert.threshold_percent,
                "spending alert raised"
            );
            let mut alerts = active_alerts.to_vec();
            alerts.push(alert.clone());
            LimitCheck {
                alert: Some(alert),
                alerts,
            }
        }
        Ok(None) => LimitCheck::unchanged(active_alerts),
        Err(err) => {
            tracing::warn!(category, %err, "spending limit check failed");
            LimitCheck::unchanged(active_alerts)
        }
    }
}

fn projected_alert(
    limit: &Limit,
    new_amount: Decimal,
    transactions: &[Transaction],
    today: NaiveDate,
) -> Result<Option<Alert>, EngineError> {
    let monthly = monthly_spending(transactions, &limit.category, today)?;
    let projected = monthly
        .checked_add(new_amount)
        .ok_or_else(|| EngineError::Overflow(limit.category.clone()))?;
    let threshold_amount = limit.threshold_amount()?;
    tracing::debug!(
        category = %limit.category,
        %monthly,
        %new_amount,
        %projected,
        %threshold_amount,
        "checking spending limit"
    );
    if projected < threshold_amount {
        return Ok(None);
    }
    let level = spending_level(projected, threshold_amount)?;
    Ok(Some(Alert {
        category: limit.category.clone(),
        current_spending: projected,
        limit: limit.limit_amount,
        threshold_percent: limit.alert_threshold_percent,
        message: alert_message(limit, projected),
        timestamp: today,
        dedup_key: DedupKey {
            category: limit.category.clone(),
            threshold_percent: limit.alert_threshold_percent,
            level,
        },
    }))
}

/// `floor(projected / threshold_amount)`; zero when the threshold is zero.
pub fn spending_level(
    projected: Decimal,
    threshold_amount: Decimal,
) -> Result<u32, EngineError> {
    if threshold_amount.is_zero() {
        return Ok(0);
    }
    projected
        .checked_div(threshold_amount)
        .and_then(|q| q.floor().to_u32())
        .ok_or_else(|| EngineError::Overflow("spending level".to_string()))
}

fn alert_message(limit: &Limit, spending: Decimal) -> String {
    format!(
        "🚨 SPENDING ALERT 🚨\n\nCategory: {}\nCurrent Spending: {}\nLimit: {}\nThreshold: {}%\n\nYou've reached {}% of your {} spending limit!",
        limit.category,
        fmt_money(&spending),
        fmt_money(&limit.limit_amount),
        limit.alert_threshold_percent,
        limit.alert_threshold_percent,
        limit.category
    )
}

/// Saves the active set if `check` raised a new alert, and returns it.
pub fn record(store: &Store, check: LimitCheck) -> Result<Option<Alert>> {
    if check.alert.is_some() {
        store.save_alerts(&check.alerts)?;
    }
    Ok(check.alert)
}

/// Removes the alert with `key`. Returns whether one was removed.
pub fn dismiss(store: &Store, key: &DedupKey) -> Result<bool> {
    let mut alerts = store.load_alerts()?;
    let before = alerts.len();
    alerts.retain(|a| &a.dedup_key != key);
    if alerts.len() == before {
        return Ok(false);
    }
    store.save_alerts(&alerts)?;
    tracing::info!(%key, "alert dismissed");
    Ok(true)
}

pub fn clear(store: &Store) -> Result<()> {
    store.save_alerts(&[])?;
    tracing::info!("all alerts cleared");
    Ok(())
}
