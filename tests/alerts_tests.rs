// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use pennywise::alerts::{check_limit, clear, dismiss, record, spending_level};
use pennywise::models::{Alert, DedupKey, Limit, Transaction};
use pennywise::store::{ALERTS_FILE, Store};
use rust_decimal::Decimal;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 8, 20).unwrap()
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn food_limit() -> Vec<Limit> {
    vec![Limit::new("Food", dec("100"), 50).unwrap()]
}

struct Ledger {
    txs: Vec<Transaction>,
    alerts: Vec<Alert>,
}

impl Ledger {
    /// Checks the limit the way a caller does before saving, then records
    /// the transaction.
    fn add(&mut self, category: &str, amount: &str, limits: &[Limit]) -> Option<Alert> {
        let amount = dec(amount);
        let check = check_limit(category, amount, &self.txs, limits, &self.alerts, today());
        self.alerts = check.alerts;
        let id = self.txs.len() as i64 + 1;
        self.txs
            .push(Transaction::new(id, "t", amount, today(), category));
        check.alert
    }
}

#[test]
fn repeated_level_is_suppressed_and_escalation_realerts() {
    let limits = food_limit();
    let mut ledger = Ledger {
        txs: vec![Transaction::new(1, "groceries", dec("40"), today(), "Food")],
        alerts: Vec::new(),
    };

    let first = ledger.add("Food", "15", &limits).expect("55 crosses 50");
    assert_eq!(first.current_spending, dec("55"));
    assert_eq!(first.dedup_key.level, 1);
    assert_eq!(first.dedup_key.to_string(), "Food_50_1");

    assert!(ledger.add("Food", "2", &limits).is_none());
    assert_eq!(ledger.alerts.len(), 1);

    let escalated = ledger.add("Food", "50", &limits).expect("107 is level 2");
    assert_eq!(escalated.current_spending, dec("107"));
    assert_eq!(escalated.dedup_key.level, 2);
    assert_ne!(escalated.dedup_key, first.dedup_key);
    assert_eq!(ledger.alerts.len(), 2);
}

#[test]
fn below_threshold_is_quiet() {
    let check = check_limit("Food", dec("49.99"), &[], &food_limit(), &[], today());
    assert!(check.alert.is_none());
    assert!(check.alerts.is_empty());
}

#[test]
fn exactly_at_threshold_alerts() {
    let check = check_limit("Food", dec("50"), &[], &food_limit(), &[], today());
    let alert = check.alert.unwrap();
    assert_eq!(alert.threshold_percent, 50);
    assert_eq!(alert.limit, dec("100"));
    assert_eq!(alert.timestamp, today());
    assert!(alert.message.contains("Food"));
    assert_eq!(check.alerts, vec![alert]);
}

#[test]
fn single_large_amount_jumps_levels() {
    let check = check_limit("Food", dec("160"), &[], &food_limit(), &[], today());
    assert_eq!(check.alert.unwrap().dedup_key.level, 3);
}

#[test]
fn category_without_limit_is_a_no_op() {
    let check = check_limit("Travel", dec("10000"), &[], &food_limit(), &[], today());
    assert!(check.alert.is_none());
}

#[test]
fn only_current_month_and_category_count() {
    let history = vec![
        Transaction::new(1, "old", dec("45"), NaiveDate::from_ymd_opt(2025, 7, 30).unwrap(), "Food"),
        Transaction::new(2, "trip", dec("45"), today(), "Travel"),
    ];
    let check = check_limit("Food", dec("10"), &history, &food_limit(), &[], today());
    assert!(check.alert.is_none());
}

#[test]
fn unparsable_amounts_are_left_out() {
    let mut broken = Transaction::new(1, "x", dec("0"), today(), "Food");
    broken.amount = None;
    let check = check_limit("Food", dec("49"), &[broken], &food_limit(), &[], today());
    assert!(check.alert.is_none());
}

#[test]
fn overflow_yields_no_alert() {
    let history = vec![Transaction::new(1, "x", Decimal::MAX, today(), "Food")];
    let check = check_limit("Food", Decimal::MAX, &history, &food_limit(), &[], today());
    assert!(check.alert.is_none());
}

#[test]
fn oversized_limit_yields_no_alert() {
    let huge = Decimal::from_scientific("1e27").unwrap();
    let limits = vec![Limit::new("Food", huge, 100).unwrap()];
    assert!(limits[0].threshold_amount().is_err());
    let check = check_limit("Food", dec("1"), &[], &limits, &[], today());
    assert!(check.alert.is_none());
    assert!(check.alerts.is_empty());
}

#[test]
fn zero_threshold_alerts_once() {
    let limits = vec![Limit::new("Food", dec("100"), 0).unwrap()];
    let first = check_limit("Food", dec("1"), &[], &limits, &[], today());
    assert_eq!(first.alert.as_ref().unwrap().dedup_key.level, 0);
    let again = check_limit("Food", dec("500"), &[], &limits, &first.alerts, today());
    assert!(again.alert.is_none());
}

#[test]
fn spending_level_is_floor_of_multiples() {
    assert_eq!(spending_level(dec("55"), dec("50")).unwrap(), 1);
    assert_eq!(spending_level(dec("99.99"), dec("50")).unwrap(), 1);
    assert_eq!(spending_level(dec("100"), dec("50")).unwrap(), 2);
    assert_eq!(spending_level(dec("10"), dec("0")).unwrap(), 0);
}

#[test]
fn dedup_key_parses_categories_with_underscores() {
    let key: DedupKey = "my_side_hustle_75_2".parse().unwrap();
    assert_eq!(key.category, "my_side_hustle");
    assert_eq!(key.threshold_percent, 75);
    assert_eq!(key.level, 2);
    assert!("Food_50".parse::<DedupKey>().is_err());
    assert!("Food_x_1".parse::<DedupKey>().is_err());
}

#[test]
fn recorded_alerts_can_be_dismissed_and_cleared() {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path()).unwrap();
    let limits = vec![
        Limit::new("Food", dec("100"), 50).unwrap(),
        Limit::new("Bills & Utilities", dec("200"), 80).unwrap(),
    ];

    let food = check_limit("Food", dec("60"), &[], &limits, &store.load_alerts().unwrap(), today());
    let food = record(&store, food).unwrap().unwrap();
    let bills = check_limit(
        "Bills & Utilities",
        dec("170"),
        &[],
        &limits,
        &store.load_alerts().unwrap(),
        today(),
    );
    record(&store, bills).unwrap().unwrap();
    assert_eq!(store.load_alerts().unwrap().len(), 2);

    // Same level again: nothing new is written.
    let active = store.load_alerts().unwrap();
    let repeat = check_limit("Food", dec("60"), &[], &limits, &active, today());
    assert!(record(&store, repeat).unwrap().is_none());
    assert_eq!(store.load_alerts().unwrap().len(), 2);

    assert!(dismiss(&store, &food.dedup_key).unwrap());
    assert!(!dismiss(&store, &food.dedup_key).unwrap());
    let left = store.load_alerts().unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].dedup_key.to_string(), "Bills & Utilities_80_1");

    clear(&store).unwrap();
    assert!(store.load_alerts().unwrap().is_empty());
}

#[test]
fn alerts_file_uses_key_field() {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path()).unwrap();
    let check = check_limit("Food", dec("60"), &[], &food_limit(), &[], today());
    record(&store, check).unwrap();
    let raw = std::fs::read_to_string(store.path(ALERTS_FILE)).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json[0]["key"], "Food_50_1");
    assert_eq!(json[0]["threshold_percentage"], 50);
    assert_eq!(json[0]["timestamp"], "2025-08-20");
}
