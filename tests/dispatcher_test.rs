//! Dispatcher integration tests
//! Run with: cargo test --test dispatcher_test

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use riel_bot::application::errors::{ChartError, StoreError};
use riel_bot::application::messaging::{AccessSettings, Dispatcher};
use riel_bot::application::reporting::Retention;
use riel_bot::domain::entities::{Expense, Inbound, Outgoing, User};
use riel_bot::domain::traits::{ChartRenderer, LedgerStore, UserDirectory};

const ADMIN: &str = "Lyhor_Hieng";
const OPERATOR_CHAT: i64 = -100;

/// In-memory store implementing both ledger and directory.
#[derive(Default)]
struct MemoryStore {
    users: Mutex<Vec<User>>,
    expenses: Mutex<Vec<Expense>>,
}

impl MemoryStore {
    fn seed_expense(&self, expense: Expense) {
        self.expenses.lock().unwrap().push(expense);
    }

    fn stored_expenses(&self) -> Vec<Expense> {
        self.expenses.lock().unwrap().clone()
    }

    fn seed_user(&self, user: User) {
        self.users.lock().unwrap().push(user);
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn append(&self, expense: &Expense) -> Result<i64, StoreError> {
        let mut expenses = self.expenses.lock().unwrap();
        let mut stored = expense.clone();
        stored.expense_id = expenses.len() as i64 + 1;
        let id = stored.expense_id;
        expenses.push(stored);
        Ok(id)
    }

    async fn query_by_user(&self, user_id: i64) -> Result<Vec<Expense>, StoreError> {
        Ok(self
            .expenses
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn delete_except_period(
        &self,
        user_id: i64,
        year: i32,
        month: u32,
    ) -> Result<usize, StoreError> {
        let mut expenses = self.expenses.lock().unwrap();
        let before = expenses.len();
        expenses.retain(|e| {
            e.user_id != user_id
                || (e.created_on.year() == year && e.created_on.month() == month)
        });
        Ok(before - expenses.len())
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn find_by_handle(&self, handle: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == handle)
            .cloned())
    }

    async fn create(&self, handle: &str, id: i64) -> Result<User, StoreError> {
        let mut users = self.users.lock().unwrap();
        if let Some(existing) = users.iter().find(|u| u.username == handle) {
            return Ok(existing.clone());
        }
        let user = User::new(id, handle, at("2026-08-01 00:00:00"));
        users.push(user.clone());
        Ok(user)
    }

    async fn list_all(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.users.lock().unwrap().clone())
    }
}

struct StubChart;

impl ChartRenderer for StubChart {
    fn render(
        &self,
        _title: &str,
        _slices: &BTreeMap<String, Decimal>,
    ) -> Result<Vec<u8>, ChartError> {
        Ok(b"<svg/>".to_vec())
    }
}

struct BrokenChart;

impl ChartRenderer for BrokenChart {
    fn render(
        &self,
        _title: &str,
        _slices: &BTreeMap<String, Decimal>,
    ) -> Result<Vec<u8>, ChartError> {
        Err(ChartError::Render("out of ink".to_string()))
    }
}

fn settings() -> AccessSettings {
    AccessSettings {
        admin_handles: [ADMIN.to_string()].into_iter().collect(),
        operator_chat: OPERATOR_CHAT,
        owner_handle: ADMIN.to_string(),
        monthly_budget: Decimal::new(50000, 2),
    }
}

fn dispatcher_over(store: &Arc<MemoryStore>, chart: Arc<dyn ChartRenderer>) -> Dispatcher {
    Dispatcher::new(store.clone(), store.clone(), chart, settings())
}

fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn now() -> NaiveDateTime {
    at("2026-08-07 12:00:00")
}

fn text_bodies(replies: &[Outgoing]) -> Vec<(i64, String)> {
    replies
        .iter()
        .filter_map(|r| match r {
            Outgoing::Text { chat, body } => Some((*chat, body.clone())),
            Outgoing::Photo { .. } => None,
        })
        .collect()
}

fn photo_count(replies: &[Outgoing]) -> usize {
    replies
        .iter()
        .filter(|r| matches!(r, Outgoing::Photo { .. }))
        .count()
}

#[tokio::test]
async fn first_contact_welcomes_and_still_handles_the_command() {
    let store = Arc::new(MemoryStore::default());
    let dispatcher = dispatcher_over(&store, Arc::new(StubChart));

    let replies = dispatcher
        .dispatch_at(&Inbound::new(7, "alice", "/start"), now())
        .await;
    let texts = text_bodies(&replies);
    assert_eq!(
        texts,
        vec![
            (7, "Welcome alice!".to_string()),
            (7, "Welcome to Expense Tracker alice!".to_string()),
        ]
    );
}

#[tokio::test]
async fn known_users_are_not_rewelcomed() {
    let store = Arc::new(MemoryStore::default());
    let dispatcher = dispatcher_over(&store, Arc::new(StubChart));

    dispatcher
        .dispatch_at(&Inbound::new(7, "alice", "/start"), now())
        .await;
    let replies = dispatcher
        .dispatch_at(&Inbound::new(7, "alice", "/start"), now())
        .await;
    assert_eq!(
        text_bodies(&replies),
        vec![(7, "Welcome to Expense Tracker alice!".to_string())]
    );
}

#[tokio::test]
async fn group_chats_get_the_fixed_notice_and_nothing_happens() {
    let store = Arc::new(MemoryStore::default());
    let dispatcher = dispatcher_over(&store, Arc::new(StubChart));

    let replies = dispatcher
        .dispatch_at(&Inbound::new(7, "alice", "/add 1 USD x").in_group(), now())
        .await;
    let texts = text_bodies(&replies);
    assert_eq!(texts.len(), 1);
    assert!(texts[0].1.contains("personal chat"));
    assert!(texts[0].1.contains("@Lyhor_Hieng"));
    assert!(store.stored_expenses().is_empty());
    assert!(store.users.lock().unwrap().is_empty());
}

#[tokio::test]
async fn add_stores_the_rounded_amount_and_confirms() {
    let store = Arc::new(MemoryStore::default());
    let dispatcher = dispatcher_over(&store, Arc::new(StubChart));

    let replies = dispatcher
        .dispatch_at(&Inbound::new(7, "alice", "/add 12.345 usd Lunch"), now())
        .await;
    let texts = text_bodies(&replies);
    assert_eq!(texts[1], (7, "✅ Added: 12.35 USD - Lunch".to_string()));

    let stored = store.stored_expenses();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].amount.to_string(), "12.35");
    assert_eq!(stored[0].currency, "USD");
    assert_eq!(stored[0].remark, "Lunch");
    assert_eq!(stored[0].created_on, now());
}

#[tokio::test]
async fn parse_errors_are_user_visible_and_change_nothing() {
    let store = Arc::new(MemoryStore::default());
    let dispatcher = dispatcher_over(&store, Arc::new(StubChart));
    dispatcher
        .dispatch_at(&Inbound::new(7, "alice", "/start"), now())
        .await;

    let replies = dispatcher
        .dispatch_at(&Inbound::new(7, "alice", "/add 50"), now())
        .await;
    assert_eq!(
        text_bodies(&replies),
        vec![(7, "❌ Usage: /add <amount> <currency> <remark>".to_string())]
    );

    let replies = dispatcher
        .dispatch_at(&Inbound::new(7, "alice", "/add fifty USD Lunch"), now())
        .await;
    assert_eq!(
        text_bodies(&replies),
        vec![(7, "❌ Invalid amount. Example: /add 50 USD Lunch".to_string())]
    );

    assert!(store.stored_expenses().is_empty());
}

#[tokio::test]
async fn summary_with_no_expenses_is_the_canned_text_without_photo() {
    let store = Arc::new(MemoryStore::default());
    let dispatcher = dispatcher_over(&store, Arc::new(StubChart));
    dispatcher
        .dispatch_at(&Inbound::new(7, "alice", "/start"), now())
        .await;

    let replies = dispatcher
        .dispatch_at(&Inbound::new(7, "alice", "/summary"), now())
        .await;
    assert_eq!(photo_count(&replies), 0);
    assert_eq!(
        text_bodies(&replies),
        vec![(7, "📊 You have no expenses recorded yet.".to_string())]
    );
}

#[tokio::test]
async fn summary_sends_chart_photo_and_text() {
    let store = Arc::new(MemoryStore::default());
    let dispatcher = dispatcher_over(&store, Arc::new(StubChart));

    dispatcher
        .dispatch_at(&Inbound::new(7, "alice", "/add 12.345 usd Lunch"), now())
        .await;
    dispatcher
        .dispatch_at(&Inbound::new(7, "alice", "/add 7.00 usd lunch"), now())
        .await;

    let replies = dispatcher
        .dispatch_at(&Inbound::new(7, "alice", "/summary"), now())
        .await;
    assert_eq!(photo_count(&replies), 1);

    let texts = text_bodies(&replies);
    assert_eq!(texts.len(), 1);
    let summary = &texts[0].1;
    assert!(summary.starts_with("📊 Expense Summary Current Month:\n"));
    assert!(summary.contains("- Lunch: 19.35\n"));
    assert!(summary.contains("\nTotal (USD): 19.35"));
}

#[tokio::test]
async fn summary_keeps_the_text_when_the_chart_renderer_fails() {
    let store = Arc::new(MemoryStore::default());
    let dispatcher = dispatcher_over(&store, Arc::new(BrokenChart));

    dispatcher
        .dispatch_at(&Inbound::new(7, "alice", "/add 5 USD coffee"), now())
        .await;
    let replies = dispatcher
        .dispatch_at(&Inbound::new(7, "alice", "/summary"), now())
        .await;

    assert_eq!(photo_count(&replies), 0);
    let texts = text_bodies(&replies);
    let diagnostic = texts
        .iter()
        .find(|(chat, _)| *chat == OPERATOR_CHAT)
        .expect("operator diagnostic expected");
    assert!(diagnostic.1.contains("#ERR_AT: /summary"));
    assert!(texts
        .iter()
        .any(|(chat, body)| *chat == 7 && body.starts_with("📊 Expense Summary")));
}

#[tokio::test]
async fn clear_removes_past_months_and_is_idempotent() {
    let store = Arc::new(MemoryStore::default());
    let dispatcher = dispatcher_over(&store, Arc::new(StubChart));

    dispatcher
        .dispatch_at(&Inbound::new(7, "alice", "/start"), now())
        .await;
    store.seed_expense(Expense::new(7, "USD", dec("10.00"), "old", at("2026-07-15 10:00:00")));
    store.seed_expense(Expense::new(7, "USD", dec("20.00"), "kept", at("2026-08-02 10:00:00")));

    let replies = dispatcher
        .dispatch_at(&Inbound::new(7, "alice", "/clear"), now())
        .await;
    assert_eq!(
        text_bodies(&replies),
        vec![(
            7,
            "All expenses except this month cleared.\nExpense record deleted: 1".to_string()
        )]
    );
    let remaining = store.stored_expenses();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].remark, "kept");

    let replies = dispatcher
        .dispatch_at(&Inbound::new(7, "alice", "/clear"), now())
        .await;
    assert_eq!(
        text_bodies(&replies),
        vec![(
            7,
            "All expenses except this month cleared.\nExpense record deleted: 0".to_string()
        )]
    );
}

#[tokio::test]
async fn retention_distinguishes_missing_users_from_zero_deleted() {
    let store = Arc::new(MemoryStore::default());
    let retention = Retention::new(store.clone(), store.clone());

    let result = retention
        .prune_to_month("ghost", NaiveDate::from_ymd_opt(2026, 8, 7).unwrap())
        .await
        .unwrap();
    assert_eq!(result, None);
}

#[tokio::test]
async fn admin_report_is_silently_ignored_for_non_admins() {
    let store = Arc::new(MemoryStore::default());
    let dispatcher = dispatcher_over(&store, Arc::new(StubChart));
    dispatcher
        .dispatch_at(&Inbound::new(7, "alice", "/start"), now())
        .await;

    let replies = dispatcher
        .dispatch_at(&Inbound::new(7, "alice", "/admin"), now())
        .await;
    assert!(replies.is_empty());
}

#[tokio::test]
async fn admin_report_lists_each_user_with_records() {
    let store = Arc::new(MemoryStore::default());
    let dispatcher = dispatcher_over(&store, Arc::new(StubChart));

    store.seed_user(User::new(1, ADMIN, at("2026-08-01 00:00:00")));
    store.seed_user(User::new(7, "alice", at("2026-08-01 00:00:00")));
    store.seed_user(User::new(8, "bob", at("2026-08-01 00:00:00")));
    store.seed_expense(Expense::new(7, "USD", dec("12.35"), "Lunch", at("2026-08-03 14:30:00")));

    let replies = dispatcher
        .dispatch_at(&Inbound::new(1, ADMIN, "/admin"), now())
        .await;
    let texts = text_bodies(&replies);
    // One message per user holding records; bob and the admin have none.
    assert_eq!(texts.len(), 1);
    assert_eq!(
        texts[0],
        (
            1,
            "📊 Expense list for alice:\n\n• Lunch - 12.35 (03/08/26 02:30 PM)\n".to_string()
        )
    );
}

#[tokio::test]
async fn my_fund_reports_the_remaining_monthly_budget() {
    let store = Arc::new(MemoryStore::default());
    let dispatcher = dispatcher_over(&store, Arc::new(StubChart));

    dispatcher
        .dispatch_at(&Inbound::new(1, ADMIN, "/add 100.40 USD groceries"), now())
        .await;
    dispatcher
        .dispatch_at(&Inbound::new(1, ADMIN, "/add 23 USD fuel"), now())
        .await;
    // Spend outside the current month does not count.
    store.seed_expense(Expense::new(1, "USD", dec("50.00"), "old", at("2026-07-15 10:00:00")));

    let replies = dispatcher
        .dispatch_at(&Inbound::new(1, ADMIN, "/myFund"), now())
        .await;
    assert_eq!(
        text_bodies(&replies),
        vec![(
            1,
            "💵 Hello Lyhor, Your budget left in this month is: 376.60".to_string()
        )]
    );
}

#[tokio::test]
async fn my_fund_is_silently_ignored_for_non_admins() {
    let store = Arc::new(MemoryStore::default());
    let dispatcher = dispatcher_over(&store, Arc::new(StubChart));
    dispatcher
        .dispatch_at(&Inbound::new(7, "alice", "/start"), now())
        .await;

    let replies = dispatcher
        .dispatch_at(&Inbound::new(7, "alice", "/myFund"), now())
        .await;
    assert!(replies.is_empty());
}

#[tokio::test]
async fn unrecognized_input_gets_no_reply() {
    let store = Arc::new(MemoryStore::default());
    let dispatcher = dispatcher_over(&store, Arc::new(StubChart));
    dispatcher
        .dispatch_at(&Inbound::new(7, "alice", "/start"), now())
        .await;

    let replies = dispatcher
        .dispatch_at(&Inbound::new(7, "alice", "what did I spend?"), now())
        .await;
    assert!(replies.is_empty());
}
