//! # gmfin-db: Database Layer for gmfin
//!
//! SQLite persistence for currency reference data and account balances,
//! using sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          gmfin Data Flow                                │
//! │                                                                         │
//! │  Service handler                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     gmfin-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │                │    │  (embedded)  │  │   │
//! │  │   │               │    │ CurrencyRepo   │    │ 001_currency │  │   │
//! │  │   │ SqlitePool    │◄───│ BalanceRepo    │    │ 002_balances │  │   │
//! │  │   │ DbConfig      │    │                │    │              │  │   │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file ($GMFIN_DB_PATH, default ./gmfin.db)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Currency and balance repositories
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use gmfin_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::from_env()?).await?;
//! db.currencies().seed_defaults().await?;
//!
//! let store = Arc::new(db.currencies().load_store().await?);
//! let entry = db.balances(store).adjust("acct-1", "-2.50".parse()?).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{ConfigError, DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::balance::{Balance, BalanceEntry, BalanceRepository};
pub use repository::currency::CurrencyRepository;
