//! # Repository Module
//!
//! Database repositories for gmfin.
//!
//! ## Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Database                                                               │
//! │  ├── currencies() ──► CurrencyRepository                               │
//! │  │     upsert • list • get • seed_defaults • load_store                │
//! │  │                          │                                           │
//! │  │                          ▼ Arc<dyn CurrencyStore>                    │
//! │  └── balances(store) ──► BalanceRepository                             │
//! │        set • get • adjust • history                                    │
//! │                                                                         │
//! │  Amounts go through the Amount column adapter in gmfin-core:           │
//! │  written as "12.5000", read by stripping the point.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CurrencyRepository`](currency::CurrencyRepository) - Currency reference rows
//! - [`BalanceRepository`](balance::BalanceRepository) - Balances and their journal

pub mod balance;
pub mod currency;
