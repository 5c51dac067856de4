// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use pennywise::achievements::{self, CATALOG, Rule, Snapshot, evaluate, has_streak, longest_streak};
use pennywise::models::{AchievementState, Limit, Transaction};
use pennywise::store::{ACHIEVEMENTS_FILE, Store};
use rust_decimal::Decimal;

fn day(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, m, d).unwrap()
}

fn tx(id: i64, amount: &str, date: NaiveDate, category: &str) -> Transaction {
    Transaction::new(id, "t", amount.parse().unwrap(), date, category)
}

fn ids(eval: &achievements::Evaluation) -> Vec<&'static str> {
    eval.newly_unlocked.iter().map(|a| a.id).collect()
}

fn limit(category: &str, amount: i64) -> Limit {
    Limit::new(category, Decimal::from(amount), 80).unwrap()
}

#[test]
fn catalog_has_ten_stable_entries() {
    let ids: Vec<&str> = CATALOG.iter().map(|a| a.id).collect();
    assert_eq!(
        ids,
        [
            "first_transaction",
            "ten_transactions",
            "fifty_transactions",
            "hundred_transactions",
            "first_category",
            "five_categories",
            "first_limit",
            "under_budget",
            "low_spending_day",
            "consistent_tracker",
        ]
    );
}

#[test]
fn first_transaction_unlocks_in_catalog_order_with_date() {
    let today = day(3, 10);
    let txs = vec![tx(1000, "25", day(2, 1), "Food")];
    let eval = evaluate(&txs, &[], &AchievementState::default(), today);
    assert_eq!(ids(&eval), ["first_transaction", "first_category"]);
    assert!(eval.newly_unlocked.iter().all(|a| a.unlocked_date == today));
    assert_eq!(eval.state.unlocked, ["first_transaction", "first_category"]);
}

#[test]
fn evaluation_is_idempotent() {
    let today = day(3, 10);
    let txs: Vec<Transaction> = (0..12).map(|i| tx(1000 + i, "5", day(3, 10), "Food")).collect();
    let limits = vec![limit("Food", 100)];
    let first = evaluate(&txs, &limits, &AchievementState::default(), today);
    assert!(!first.newly_unlocked.is_empty());
    let second = evaluate(&txs, &limits, &first.state, today);
    assert!(second.newly_unlocked.is_empty());
    assert_eq!(second.state, first.state);
}

#[test]
fn unlocked_set_only_grows() {
    let today = day(3, 10);
    let mut txs = Vec::new();
    let mut state = AchievementState::default();
    for i in 0..15 {
        txs.push(tx(1000 + i, "1", day(1, 1), &format!("C{}", i % 6)));
        let eval = evaluate(&txs, &[], &state, today);
        for id in &state.unlocked {
            assert!(eval.state.is_unlocked(id));
        }
        state = eval.state;
    }
    // Shrinking history never revokes anything.
    let eval = evaluate(&txs[..1], &[], &state, today);
    assert!(eval.newly_unlocked.is_empty());
    assert_eq!(eval.state, state);
}

#[test]
fn tenth_transaction_unlocks_ten_transactions() {
    let today = day(3, 10);
    let mut state = AchievementState::default();
    let mut txs = Vec::new();
    for i in 1..=10 {
        txs.push(tx(1000 + i, "1", day(1, 1), "Food"));
        let eval = evaluate(&txs, &[], &state, today);
        let got_ten = ids(&eval).contains(&"ten_transactions");
        assert_eq!(got_ten, i == 10, "after {} transactions", i);
        state = eval.state;
    }
}

#[test]
fn five_categories_needs_five_distinct() {
    let today = day(3, 10);
    let cats = ["Food", "Travel", "Health", "Academic", "Food"];
    let txs: Vec<Transaction> = cats
        .iter()
        .enumerate()
        .map(|(i, c)| tx(1000 + i as i64, "1", day(1, 1), c))
        .collect();
    let eval = evaluate(&txs, &[], &AchievementState::default(), today);
    assert!(!ids(&eval).contains(&"five_categories"));

    let mut txs = txs;
    txs.push(tx(2000, "1", day(1, 1), "Transportation"));
    let eval = evaluate(&txs, &[], &eval.state, today);
    assert_eq!(ids(&eval), ["five_categories"]);
}

#[test]
fn first_limit_needs_a_limit() {
    let eval = evaluate(&[], &[limit("Food", 50)], &AchievementState::default(), day(3, 10));
    assert_eq!(ids(&eval), ["first_limit"]);
}

fn under_budget(spent: &str) -> bool {
    let today = day(3, 10);
    let txs = vec![tx(1, spent, day(3, 2), "Food"), tx(2, "999", day(2, 2), "Food")];
    let snap = Snapshot {
        transactions: &txs,
        limits: &[limit("Food", 50)],
        today,
    };
    Rule::UnderBudget.is_met(&snap).unwrap()
}

#[test]
fn under_budget_excludes_zero_and_over_limit() {
    assert!(under_budget("30"));
    assert!(!under_budget("0"));
    assert!(!under_budget("50"));
    assert!(!under_budget("60"));
}

#[test]
fn under_budget_ignores_categories_without_limit() {
    let txs = vec![tx(1, "10", day(3, 2), "Travel")];
    let snap = Snapshot {
        transactions: &txs,
        limits: &[limit("Food", 50)],
        today: day(3, 10),
    };
    assert!(!Rule::UnderBudget.is_met(&snap).unwrap());
}

#[test]
fn low_spending_day_counts_only_today() {
    let today = day(3, 10);
    let rule = Rule::LowSpendingDay { below: 20 };
    let check = |txs: Vec<Transaction>| {
        rule.is_met(&Snapshot {
            transactions: &txs,
            limits: &[],
            today,
        })
        .unwrap()
    };
    assert!(check(vec![tx(1, "5", today, "Food"), tx(2, "14.99", today, "Travel")]));
    assert!(!check(vec![tx(1, "5", today, "Food"), tx(2, "15", today, "Travel")]));
    assert!(!check(vec![tx(1, "5", day(3, 9), "Food")]));
    assert!(!check(vec![]));
}

fn january(days: &[u32]) -> BTreeSet<NaiveDate> {
    days.iter().map(|d| day(1, *d)).collect()
}

#[test]
fn streak_of_seven_consecutive_days() {
    assert!(has_streak(&january(&[1, 2, 3, 4, 5, 6, 7]), 7));
}

#[test]
fn streak_broken_by_missing_day() {
    assert!(!has_streak(&january(&[1, 2, 3, 5, 6, 7]), 7));
    // Seven dates spanning exactly six days apart but with a hole.
    assert!(!has_streak(&january(&[1, 2, 3, 5, 6, 7, 8]), 7));
}

#[test]
fn streak_found_after_a_gap() {
    assert!(has_streak(&january(&[1, 3, 4, 5, 6, 7, 8, 9]), 7));
}

#[test]
fn streak_crosses_month_boundary() {
    let dates: BTreeSet<NaiveDate> = [
        day(1, 28),
        day(1, 29),
        day(1, 30),
        day(1, 31),
        day(2, 1),
        day(2, 2),
        day(2, 3),
    ]
    .into_iter()
    .collect();
    assert!(has_streak(&dates, 7));
    assert_eq!(longest_streak(&dates), 7);
}

#[test]
fn consistent_tracker_evaluated_from_transactions() {
    let today = day(3, 10);
    let txs: Vec<Transaction> = (1..=7).map(|d| tx(d as i64, "3", day(1, d), "Food")).collect();
    let eval = evaluate(&txs, &[], &AchievementState::default(), today);
    assert!(ids(&eval).contains(&"consistent_tracker"));

    let gapped: Vec<Transaction> = txs
        .iter()
        .filter(|t| t.date != Some(day(1, 4)))
        .cloned()
        .collect();
    let eval = evaluate(&gapped, &[], &AchievementState::default(), today);
    assert!(!ids(&eval).contains(&"consistent_tracker"));
}

#[test]
fn consistent_tracker_needs_seven_transactions() {
    let snap_txs: Vec<Transaction> =
        (1..=6).map(|d| tx(d as i64, "3", day(1, d), "Food")).collect();
    let snap = Snapshot {
        transactions: &snap_txs,
        limits: &[],
        today: day(3, 10),
    };
    assert!(!Rule::ConsecutiveDays { days: 7 }.is_met(&snap).unwrap());
}

#[test]
fn failing_rule_does_not_stop_the_others() {
    let today = day(3, 10);
    let txs = vec![
        Transaction::new(1, "a", Decimal::MAX, today, "Food"),
        Transaction::new(2, "b", Decimal::MAX, today, "Food"),
    ];
    let eval = evaluate(&txs, &[limit("Food", 50)], &AchievementState::default(), today);
    assert_eq!(ids(&eval), ["first_transaction", "first_category", "first_limit"]);
}

#[test]
fn unparsable_amounts_count_but_do_not_sum() {
    let today = day(3, 10);
    let mut broken = tx(1, "1", today, "Food");
    broken.amount = None;
    let txs = vec![broken, tx(2, "4", today, "Food")];
    let eval = evaluate(&txs, &[], &AchievementState::default(), today);
    assert!(ids(&eval).contains(&"first_transaction"));
    assert!(ids(&eval).contains(&"low_spending_day"));
}

#[test]
fn check_persists_before_returning() {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path()).unwrap();
    let txs = vec![tx(1, "5", day(1, 1), "Food")];

    let first = achievements::check(&store, &txs, &[], day(3, 10)).unwrap();
    assert_eq!(first.len(), 2);
    let saved = store.load_achievements().unwrap();
    assert_eq!(saved.unlocked, ["first_transaction", "first_category"]);

    let second = achievements::check(&store, &txs, &[], day(3, 10)).unwrap();
    assert!(second.is_empty());
}

#[test]
fn corrupt_state_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path()).unwrap();
    std::fs::write(store.path(ACHIEVEMENTS_FILE), "{ not json").unwrap();
    assert_eq!(store.load_achievements().unwrap(), AchievementState::default());

    let txs = [tx(1, "5", day(1, 1), "Food")];
    let unlocked = achievements::check(&store, &txs, &[], day(3, 10)).unwrap();
    assert_eq!(unlocked.len(), 2);
}

#[test]
fn reset_clears_unlocks_and_keeps_unknown_ids_out_of_listing() {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path()).unwrap();
    let mut state = AchievementState::default();
    state.unlock("first_transaction");
    state.unlock("retired_badge");
    store.save_achievements(&state).unwrap();

    let listed: Vec<&str> = achievements::unlocked(&store.load_achievements().unwrap())
        .iter()
        .map(|a| a.id)
        .collect();
    assert_eq!(listed, ["first_transaction"]);

    achievements::reset(&store).unwrap();
    assert!(store.load_achievements().unwrap().unlocked.is_empty());
}

#[test]
fn progress_reports_every_entry() {
    let today = day(3, 10);
    let txs: Vec<Transaction> = (1..=3).map(|d| tx(d as i64, "2", day(3, d), "Food")).collect();
    let rows = achievements::progress(&txs, &[], &AchievementState::default(), today);
    assert_eq!(rows.len(), CATALOG.len());
    let ten = rows.iter().find(|r| r.id == "ten_transactions").unwrap();
    assert_eq!((ten.current.as_str(), ten.target.as_str()), ("3", "10"));
    assert!(!ten.met);
    let streak = rows.iter().find(|r| r.id == "consistent_tracker").unwrap();
    assert_eq!(streak.current, "3");
}
