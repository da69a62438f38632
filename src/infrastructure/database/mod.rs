//! SQLite-backed ledger store and user directory.
//!
//! One connection guarded by a mutex; callers never hold a lock themselves,
//! so concurrent append/query/delete from different handlers is safe.

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use crate::application::errors::StoreError;
use crate::domain::entities::{Expense, User};
use crate::domain::traits::{LedgerStore, UserDirectory};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn new(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(store_err)?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.init_tables()?;
        Ok(db)
    }

    /// In-memory database, used by tests.
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(store_err)?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.init_tables()?;
        Ok(db)
    }

    fn init_tables(&self) -> Result<(), StoreError> {
        let conn = self.lock()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS user_info (
                id INTEGER PRIMARY KEY,
                username TEXT UNIQUE NOT NULL,
                created_on TEXT NOT NULL
            )",
            [],
        )
        .map_err(store_err)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS expense (
                expense_id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                currency TEXT NOT NULL,
                amount TEXT NOT NULL,
                remark TEXT NOT NULL,
                created_on TEXT NOT NULL,
                FOREIGN KEY (user_id) REFERENCES user_info(id)
            )",
            [],
        )
        .map_err(store_err)?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_expense_user ON expense(user_id)",
            [],
        )
        .map_err(store_err)?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Database("connection lock poisoned".to_string()))
    }
}

fn store_err(e: rusqlite::Error) -> StoreError {
    StoreError::Database(e.to_string())
}

fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, StoreError> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .map_err(|e| StoreError::Data(format!("bad timestamp {:?}: {}", raw, e)))
}

fn parse_amount(raw: &str) -> Result<Decimal, StoreError> {
    raw.parse()
        .map_err(|e| StoreError::Data(format!("bad amount {:?}: {}", raw, e)))
}

fn lookup(conn: &Connection, handle: &str) -> Result<Option<User>, StoreError> {
    let mut stmt = conn
        .prepare("SELECT id, username, created_on FROM user_info WHERE username = ?1")
        .map_err(store_err)?;
    let mut rows = stmt.query([handle]).map_err(store_err)?;

    if let Some(row) = rows.next().map_err(store_err)? {
        let created_on: String = row.get(2).map_err(store_err)?;
        Ok(Some(User {
            id: row.get(0).map_err(store_err)?,
            username: row.get(1).map_err(store_err)?,
            created_on: parse_timestamp(&created_on)?,
        }))
    } else {
        Ok(None)
    }
}

#[async_trait]
impl LedgerStore for Database {
    async fn append(&self, expense: &Expense) -> Result<i64, StoreError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO expense (user_id, currency, amount, remark, created_on)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                expense.user_id,
                expense.currency,
                expense.amount.to_string(),
                expense.remark,
                expense.created_on.format(TIMESTAMP_FORMAT).to_string(),
            ],
        )
        .map_err(store_err)?;
        Ok(conn.last_insert_rowid())
    }

    async fn query_by_user(&self, user_id: i64) -> Result<Vec<Expense>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT expense_id, user_id, currency, amount, remark, created_on
                 FROM expense WHERE user_id = ?1 ORDER BY created_on, expense_id",
            )
            .map_err(store_err)?;
        let mut rows = stmt.query([user_id]).map_err(store_err)?;

        let mut expenses = Vec::new();
        while let Some(row) = rows.next().map_err(store_err)? {
            let amount: String = row.get(3).map_err(store_err)?;
            let created_on: String = row.get(5).map_err(store_err)?;
            expenses.push(Expense {
                expense_id: row.get(0).map_err(store_err)?,
                user_id: row.get(1).map_err(store_err)?,
                currency: row.get(2).map_err(store_err)?,
                amount: parse_amount(&amount)?,
                remark: row.get(4).map_err(store_err)?,
                created_on: parse_timestamp(&created_on)?,
            });
        }
        Ok(expenses)
    }

    async fn delete_except_period(
        &self,
        user_id: i64,
        year: i32,
        month: u32,
    ) -> Result<usize, StoreError> {
        let conn = self.lock()?;
        conn.execute(
            "DELETE FROM expense
             WHERE user_id = ?1
               AND (CAST(strftime('%Y', created_on) AS INTEGER) <> ?2
                    OR CAST(strftime('%m', created_on) AS INTEGER) <> ?3)",
            rusqlite::params![user_id, year, month],
        )
        .map_err(store_err)
    }
}

#[async_trait]
impl UserDirectory for Database {
    async fn find_by_handle(&self, handle: &str) -> Result<Option<User>, StoreError> {
        let conn = self.lock()?;
        lookup(&conn, handle)
    }

    async fn create(&self, handle: &str, id: i64) -> Result<User, StoreError> {
        let created_on = Utc::now().naive_utc();
        let conn = self.lock()?;
        // Upsert: a second registration leaves the existing row untouched.
        conn.execute(
            "INSERT OR IGNORE INTO user_info (id, username, created_on) VALUES (?1, ?2, ?3)",
            rusqlite::params![id, handle, created_on.format(TIMESTAMP_FORMAT).to_string()],
        )
        .map_err(store_err)?;
        Ok(lookup(&conn, handle)?.unwrap_or_else(|| User::new(id, handle, created_on)))
    }

    async fn list_all(&self) -> Result<Vec<User>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT id, username, created_on FROM user_info ORDER BY created_on, id")
            .map_err(store_err)?;
        let mut rows = stmt.query([]).map_err(store_err)?;

        let mut users = Vec::new();
        while let Some(row) = rows.next().map_err(store_err)? {
            let created_on: String = row.get(2).map_err(store_err)?;
            users.push(User {
                id: row.get(0).map_err(store_err)?,
                username: row.get(1).map_err(store_err)?,
                created_on: parse_timestamp(&created_on)?,
            });
        }
        Ok(users)
    }
}
