use async_trait::async_trait;

use crate::application::errors::StoreError;
use crate::domain::entities::{Expense, User};

/// Ledger store - append-only record store keyed by user identity.
///
/// Implementations must tolerate concurrent append/query/delete without the
/// caller holding any lock; per-user record sets are disjoint.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Persist a record and return its store-assigned id.
    async fn append(&self, expense: &Expense) -> Result<i64, StoreError>;

    /// All records owned by one user, oldest first.
    async fn query_by_user(&self, user_id: i64) -> Result<Vec<Expense>, StoreError>;

    /// Delete every record of the user whose creation year or month differs
    /// from the given period. Returns the number of rows removed.
    async fn delete_except_period(
        &self,
        user_id: i64,
        year: i32,
        month: u32,
    ) -> Result<usize, StoreError>;
}

/// User directory - resolve and register users by chat handle.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_handle(&self, handle: &str) -> Result<Option<User>, StoreError>;

    /// Idempotent upsert: concurrent first contact must not create
    /// duplicates, and an existing user is returned unchanged.
    async fn create(&self, handle: &str, id: i64) -> Result<User, StoreError>;

    async fn list_all(&self) -> Result<Vec<User>, StoreError>;
}
