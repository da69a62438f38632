//! Report builder - read-only projections of a user's record set.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::application::errors::StoreError;
use crate::application::reporting::aggregate;
use crate::domain::traits::LedgerStore;

/// Canned reply when a user has no records at all.
pub const NO_EXPENSES: &str = "📊 You have no expenses recorded yet.";

/// Read-only report projections over the ledger. Never mutates the store.
pub struct Reports {
    ledger: Arc<dyn LedgerStore>,
}

impl Reports {
    pub fn new(ledger: Arc<dyn LedgerStore>) -> Self {
        Self { ledger }
    }

    /// Chart-ready category→sum mapping over `[from, to]`, lowercase keys.
    ///
    /// `None` means nothing fell in the range - nothing to render, not an
    /// error.
    pub async fn chart_data(
        &self,
        user_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Option<BTreeMap<String, Decimal>>, StoreError> {
        let expenses = self.ledger.query_by_user(user_id).await?;
        let in_range = aggregate::filter_by_date(&expenses, from, to);
        if in_range.is_empty() {
            return Ok(None);
        }
        Ok(Some(aggregate::sum_by_category(
            in_range,
            aggregate::lowercase_key,
        )))
    }

    /// Human-readable summary over ALL of the user's records.
    ///
    /// Category lines use capitalized keys; the currency totals at the end
    /// are likewise unfiltered.
    pub async fn summary_text(&self, user_id: i64) -> Result<String, StoreError> {
        let expenses = self.ledger.query_by_user(user_id).await?;
        if expenses.is_empty() {
            return Ok(NO_EXPENSES.to_string());
        }

        let by_category = aggregate::sum_by_category(&expenses, aggregate::capitalize_words);
        let by_currency = aggregate::sum_by_currency(&expenses);

        let mut text = String::from("📊 Expense Summary Current Month:\n");
        for (category, total) in &by_category {
            text.push_str(&format!("- {}: {}\n", category, total));
        }
        for (currency, total) in &by_currency {
            text.push_str(&format!("\nTotal ({}): {}", currency, total));
        }
        Ok(text)
    }

    /// Total spend across all currencies within `[from, to]`.
    pub async fn spend_in_range(
        &self,
        user_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Decimal, StoreError> {
        let expenses = self.ledger.query_by_user(user_id).await?;
        Ok(aggregate::filter_by_date(&expenses, from, to)
            .iter()
            .map(|e| e.amount)
            .sum())
    }
}
