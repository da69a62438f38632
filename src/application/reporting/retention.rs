//! Retention enforcer - keeps only the current calendar month on record.

use chrono::{Datelike, NaiveDate};
use std::sync::Arc;

use crate::application::errors::StoreError;
use crate::domain::traits::{LedgerStore, UserDirectory};

pub struct Retention {
    ledger: Arc<dyn LedgerStore>,
    directory: Arc<dyn UserDirectory>,
}

impl Retention {
    pub fn new(ledger: Arc<dyn LedgerStore>, directory: Arc<dyn UserDirectory>) -> Self {
        Self { ledger, directory }
    }

    /// Delete every record of `handle` created outside the month `today`
    /// falls in.
    ///
    /// `None` means the handle did not resolve to a user, which callers
    /// must distinguish from zero rows deleted. Idempotent: a second run
    /// removes nothing.
    pub async fn prune_to_month(
        &self,
        handle: &str,
        today: NaiveDate,
    ) -> Result<Option<usize>, StoreError> {
        let Some(user) = self.directory.find_by_handle(handle).await? else {
            return Ok(None);
        };
        let removed = self
            .ledger
            .delete_except_period(user.id, today.year(), today.month())
            .await?;
        tracing::info!(
            user = %user.username,
            removed,
            "pruned expense records outside {}-{:02}",
            today.year(),
            today.month()
        );
        Ok(Some(removed))
    }
}
