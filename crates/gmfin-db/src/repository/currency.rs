//! # Currency Repository
//!
//! The `currencies` table as a source of reference data.
//!
//! ## Snapshot Loading
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  currencies table ──► list() ──► StaticCurrencyStore (immutable)        │
//! │                                        │                                │
//! │                                        ▼                                │
//! │                          Arc<dyn CurrencyStore> handed to services      │
//! │                                                                         │
//! │  Edits made after load_store() are not seen by that snapshot; load a    │
//! │  new one and swap it in.                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use gmfin_core::{Currency, CurrencyCode, StaticCurrencyStore};
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments};
use sqlx::{FromRow, SqlitePool};
use tracing::{debug, info};

use crate::error::DbResult;

/// Repository for currency reference rows.
#[derive(Debug, Clone)]
pub struct CurrencyRepository {
    pool: SqlitePool,
}

#[derive(FromRow)]
struct CurrencyRow {
    code: CurrencyCode,
    numeric_code: u16,
    name: String,
    fraction: u8,
    grapheme: String,
    template: String,
}

impl From<CurrencyRow> for Currency {
    fn from(row: CurrencyRow) -> Self {
        Currency::new(
            row.code,
            row.numeric_code,
            row.name,
            row.fraction,
            row.grapheme,
            row.template,
        )
    }
}

fn upsert_query(currency: &Currency) -> Query<'_, Sqlite, SqliteArguments<'_>> {
    sqlx::query(
        r#"
        INSERT INTO currencies (code, numeric_code, name, fraction, grapheme, template)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        ON CONFLICT(code) DO UPDATE SET
            numeric_code = excluded.numeric_code,
            name = excluded.name,
            fraction = excluded.fraction,
            grapheme = excluded.grapheme,
            template = excluded.template
        "#,
    )
    .bind(currency.code)
    .bind(currency.numeric_code)
    .bind(currency.name.as_str())
    .bind(currency.fraction)
    .bind(currency.grapheme.as_str())
    .bind(currency.template.as_str())
}

impl CurrencyRepository {
    /// Creates a new CurrencyRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CurrencyRepository { pool }
    }

    /// Inserts a currency or overwrites the row with the same code.
    ///
    /// ## Errors
    /// `DbError::UniqueViolation` when another code already owns the
    /// numeric code.
    pub async fn upsert(&self, currency: &Currency) -> DbResult<()> {
        debug!(code = %currency.code, numeric_code = currency.numeric_code, "Upserting currency");

        upsert_query(currency).execute(&self.pool).await?;
        Ok(())
    }

    /// Every stored currency, ordered by code.
    pub async fn list(&self) -> DbResult<Vec<Currency>> {
        let rows = sqlx::query_as::<_, CurrencyRow>(
            r#"
            SELECT code, numeric_code, name, fraction, grapheme, template
            FROM currencies
            ORDER BY code
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Currency::from).collect())
    }

    pub async fn get(&self, code: CurrencyCode) -> DbResult<Option<Currency>> {
        let row = sqlx::query_as::<_, CurrencyRow>(
            r#"
            SELECT code, numeric_code, name, fraction, grapheme, template
            FROM currencies
            WHERE code = ?1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Currency::from))
    }

    /// Writes the built-in table in one transaction. Returns the row count.
    pub async fn seed_defaults(&self) -> DbResult<usize> {
        let defaults = Currency::defaults();
        let mut tx = self.pool.begin().await?;

        for currency in &defaults {
            upsert_query(currency).execute(&mut *tx).await?;
        }

        tx.commit().await?;

        info!(count = defaults.len(), "Default currencies seeded");
        Ok(defaults.len())
    }

    /// Loads the whole table into an immutable in-memory store.
    pub async fn load_store(&self) -> DbResult<StaticCurrencyStore> {
        let currencies = self.list().await?;
        Ok(StaticCurrencyStore::new(currencies))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use gmfin_core::CurrencyStore;

    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};

    async fn repo() -> CurrencyRepository {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.currencies()
    }

    #[tokio::test]
    async fn test_seed_and_list() {
        let repo = repo().await;
        assert!(repo.list().await.unwrap().is_empty());

        assert_eq!(repo.seed_defaults().await.unwrap(), 5);
        // Seeding twice updates in place.
        assert_eq!(repo.seed_defaults().await.unwrap(), 5);

        let codes: Vec<String> = repo
            .list()
            .await
            .unwrap()
            .iter()
            .map(|c| c.code.to_string())
            .collect();
        assert_eq!(codes, ["ANY", "EUR", "RUB", "UAH", "USD"]);
    }

    #[tokio::test]
    async fn test_round_trip_keeps_every_field() {
        let repo = repo().await;
        repo.seed_defaults().await.unwrap();

        let uah = repo.get(CurrencyCode::UAH).await.unwrap().unwrap();
        assert_eq!(uah.numeric_code, 980);
        assert_eq!(uah.fraction, 2);
        assert_eq!(uah.grapheme, "\u{20b4}");
        assert_eq!(uah.template, "1 $");

        let gbp = CurrencyCode::parse("GBP").unwrap();
        assert!(repo.get(gbp).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_overwrites() {
        let repo = repo().await;
        repo.seed_defaults().await.unwrap();

        let euro = Currency::new(CurrencyCode::EUR, 978, "Euro", 2, "\u{20ac}", "1 $");
        repo.upsert(&euro).await.unwrap();

        let stored = repo.get(CurrencyCode::EUR).await.unwrap().unwrap();
        assert_eq!(stored.template, "1 $");
        assert_eq!(repo.list().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_numeric_code_is_unique() {
        let repo = repo().await;
        repo.seed_defaults().await.unwrap();

        let fake = Currency::new(CurrencyCode::parse("XUS").unwrap(), 840, "Fake", 2, "$", "$1");
        let err = repo.upsert(&fake).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_load_store() {
        let repo = repo().await;
        repo.seed_defaults().await.unwrap();
        let gbp = CurrencyCode::parse("GBP").unwrap();
        repo.upsert(&Currency::new(gbp, 826, "Pound sterling", 2, "\u{a3}", "$1"))
            .await
            .unwrap();

        let store = repo.load_store().await.unwrap();
        assert_eq!(store.len(), 6);
        assert_eq!(store.lookup("gbp").unwrap().numeric_code, 826);
        assert_eq!(store.lookup_numeric(643).unwrap().code, CurrencyCode::RUB);
    }
}
