//! # Balance Repository
//!
//! Account balances kept as TEXT amounts, with a journal of adjustments.
//!
//! ## Adjust Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  adjust("acct-1", -2.50)                                                │
//! │       │                                                                 │
//! │       ▼  BEGIN                                                          │
//! │  SELECT amount FROM balances        "12.5000" ──► Amount(125000)        │
//! │       │                                                                 │
//! │       ▼  12.50 + (-2.50) = 10.00                                        │
//! │  UPDATE balances SET amount         "10.0000"                           │
//! │  INSERT INTO balance_entries        delta "-2.5000", after "10.0000"    │
//! │       │                                                                 │
//! │       ▼  COMMIT                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A NULL `amount` column reads as zero.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use gmfin_core::{Amount, CurrencyAmount, CurrencyStore, StoredText};
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};

/// Current balance of one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Balance {
    pub account_id: String,
    pub value: CurrencyAmount,
    pub updated_at: DateTime<Utc>,
}

/// One adjustment recorded by [`BalanceRepository::adjust`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct BalanceEntry {
    pub id: String,
    pub account_id: String,
    pub delta: Amount,
    pub balance_after: Amount,
    pub created_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct BalanceRow {
    account_id: String,
    amount: Option<String>,
    currency: Option<String>,
    updated_at: DateTime<Utc>,
}

/// Repository for balances and their journal.
///
/// Currency codes read back from the table are resolved through the
/// injected store.
#[derive(Clone)]
pub struct BalanceRepository {
    pool: SqlitePool,
    store: Arc<dyn CurrencyStore>,
}

impl std::fmt::Debug for BalanceRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BalanceRepository")
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

impl BalanceRepository {
    /// Creates a new BalanceRepository.
    pub fn new(pool: SqlitePool, store: Arc<dyn CurrencyStore>) -> Self {
        BalanceRepository { pool, store }
    }

    fn to_balance(&self, row: BalanceRow) -> DbResult<Balance> {
        let amount = Amount::decode_stored(row.amount.as_deref())?;
        let currency = row
            .currency
            .map(|code| self.store.lookup(&code))
            .transpose()?;

        Ok(Balance {
            account_id: row.account_id,
            value: CurrencyAmount::new(amount, currency),
            updated_at: row.updated_at,
        })
    }

    /// Creates or overwrites the balance of `account_id`.
    pub async fn set(&self, account_id: &str, value: &CurrencyAmount) -> DbResult<Balance> {
        let now = Utc::now();
        let currency = value.currency.as_ref().map(|c| c.code);

        debug!(account_id = %account_id, amount = %value.amount, "Setting balance");

        sqlx::query(
            r#"
            INSERT INTO balances (account_id, amount, currency, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(account_id) DO UPDATE SET
                amount = excluded.amount,
                currency = excluded.currency,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(account_id)
        .bind(value.amount)
        .bind(currency)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Balance {
            account_id: account_id.to_string(),
            value: value.clone(),
            updated_at: now,
        })
    }

    /// ## Errors
    /// `DbError::NotFound` when the account has no balance row.
    pub async fn get(&self, account_id: &str) -> DbResult<Balance> {
        let row = sqlx::query_as::<_, BalanceRow>(
            r#"
            SELECT account_id, amount, currency, updated_at
            FROM balances
            WHERE account_id = ?1
            "#,
        )
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Balance", account_id))?;

        self.to_balance(row)
    }

    /// Adds `delta` (negative to debit) to the balance and journals the
    /// change, both in one transaction.
    pub async fn adjust(&self, account_id: &str, delta: Amount) -> DbResult<BalanceEntry> {
        debug!(account_id = %account_id, delta = %delta, "Adjusting balance");

        let mut tx = self.pool.begin().await?;

        let stored: Option<Option<String>> =
            sqlx::query_scalar("SELECT amount FROM balances WHERE account_id = ?1")
                .bind(account_id)
                .fetch_optional(&mut *tx)
                .await?;
        let stored = stored.ok_or_else(|| DbError::not_found("Balance", account_id))?;

        let entry = BalanceEntry {
            id: Uuid::new_v4().to_string(),
            account_id: account_id.to_string(),
            delta,
            balance_after: Amount::decode_stored(stored.as_deref())? + delta,
            created_at: Utc::now(),
        };

        sqlx::query("UPDATE balances SET amount = ?1, updated_at = ?2 WHERE account_id = ?3")
            .bind(entry.balance_after)
            .bind(entry.created_at)
            .bind(account_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO balance_entries (id, account_id, delta, balance_after, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(entry.id.as_str())
        .bind(account_id)
        .bind(entry.delta)
        .bind(entry.balance_after)
        .bind(entry.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(account_id = %account_id, balance = %entry.balance_after, "Balance adjusted");
        Ok(entry)
    }

    /// Most recent journal entries first.
    pub async fn history(&self, account_id: &str, limit: u32) -> DbResult<Vec<BalanceEntry>> {
        let entries = sqlx::query_as::<_, BalanceEntry>(
            r#"
            SELECT id, account_id, delta, balance_after, created_at
            FROM balance_entries
            WHERE account_id = ?1
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?2
            "#,
        )
        .bind(account_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
