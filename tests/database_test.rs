//! SQLite store integration tests
//! Run with: cargo test --test database_test

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use riel_bot::domain::entities::Expense;
use riel_bot::domain::traits::{LedgerStore, UserDirectory};
use riel_bot::infrastructure::database::Database;

fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

#[tokio::test]
async fn user_creation_is_an_idempotent_upsert() {
    let db = Database::in_memory().unwrap();

    let first = db.create("alice", 7).await.unwrap();
    let second = db.create("alice", 7).await.unwrap();
    assert_eq!(first, second);

    let all = db.list_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, 7);
    assert_eq!(all[0].username, "alice");
}

#[tokio::test]
async fn absent_handles_resolve_to_none() {
    let db = Database::in_memory().unwrap();
    assert!(db.find_by_handle("ghost").await.unwrap().is_none());

    db.create("alice", 7).await.unwrap();
    let found = db.find_by_handle("alice").await.unwrap().unwrap();
    assert_eq!(found.id, 7);
}

#[tokio::test]
async fn append_then_query_preserves_the_record_exactly() {
    let db = Database::in_memory().unwrap();
    db.create("alice", 7).await.unwrap();

    let expense = Expense::new(7, "USD", dec("12.35"), "dinner with friends", at("2026-08-03 14:30:00"));
    let id = db.append(&expense).await.unwrap();
    assert!(id > 0);

    let records = db.query_by_user(7).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].expense_id, id);
    assert_eq!(records[0].amount.to_string(), "12.35");
    assert_eq!(records[0].currency, "USD");
    assert_eq!(records[0].remark, "dinner with friends");
    assert_eq!(records[0].created_on, at("2026-08-03 14:30:00"));
}

#[tokio::test]
async fn query_returns_records_oldest_first_and_only_for_the_user() {
    let db = Database::in_memory().unwrap();
    db.create("alice", 7).await.unwrap();
    db.create("bob", 8).await.unwrap();

    db.append(&Expense::new(7, "USD", dec("2.00"), "later", at("2026-08-05 09:00:00")))
        .await
        .unwrap();
    db.append(&Expense::new(7, "USD", dec("1.00"), "earlier", at("2026-08-01 09:00:00")))
        .await
        .unwrap();
    db.append(&Expense::new(8, "USD", dec("9.00"), "other user", at("2026-08-02 09:00:00")))
        .await
        .unwrap();

    let remarks: Vec<String> = db
        .query_by_user(7)
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.remark)
        .collect();
    assert_eq!(remarks, vec!["earlier", "later"]);
}

#[tokio::test]
async fn delete_except_period_keeps_only_the_given_month() {
    let db = Database::in_memory().unwrap();
    db.create("alice", 7).await.unwrap();

    db.append(&Expense::new(7, "USD", dec("1.00"), "july", at("2026-07-31 23:59:59")))
        .await
        .unwrap();
    db.append(&Expense::new(7, "USD", dec("2.00"), "august", at("2026-08-01 00:00:00")))
        .await
        .unwrap();
    db.append(&Expense::new(7, "USD", dec("3.00"), "last year", at("2025-08-15 12:00:00")))
        .await
        .unwrap();

    let removed = db.delete_except_period(7, 2026, 8).await.unwrap();
    assert_eq!(removed, 2);

    let remarks: Vec<String> = db
        .query_by_user(7)
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.remark)
        .collect();
    assert_eq!(remarks, vec!["august"]);

    // Idempotent: a second pass removes nothing.
    assert_eq!(db.delete_except_period(7, 2026, 8).await.unwrap(), 0);
}

#[tokio::test]
async fn delete_except_period_leaves_other_users_untouched() {
    let db = Database::in_memory().unwrap();
    db.create("alice", 7).await.unwrap();
    db.create("bob", 8).await.unwrap();

    db.append(&Expense::new(8, "USD", dec("4.00"), "bob old", at("2026-01-01 08:00:00")))
        .await
        .unwrap();

    assert_eq!(db.delete_except_period(7, 2026, 8).await.unwrap(), 0);
    assert_eq!(db.query_by_user(8).await.unwrap().len(), 1);
}
