//! # gmfin-core: Exact Money and Card Checks
//!
//! Pure value types for backend services that move money through JSON and
//! relational text columns, and that inspect payment-card numbers.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         gmfin Data Flow                                 │
//! │                                                                         │
//! │  JSON token / TEXT column                                              │
//! │       │  normalize-then-parse                                           │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               ★ gmfin-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  amount   │  │   luhn    │  │   card    │  │ currency  │  │   │
//! │  │   │  Amount   │  │ validate  │  │CreditCard │  │ Currency  │  │   │
//! │  │   │ ×10^4 i64 │  │ compute   │  │CardIssuer │  │   Store   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • NO GLOBAL TABLES          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │  canonical text                                                 │
//! │       ▼                                                                 │
//! │  gmfin-db (SQLite) / JSON responses                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`amount`] - Fixed-point `Amount`, banker's rounding, canonical text
//! - [`luhn`] - Check-digit computation, validation, generation
//! - [`card`] - `CreditCard` validation, issuer classification, masking
//! - [`currency`] / [`currency_store`] - Reference data behind an injected store
//! - [`currency_amount`] - Amount + currency, template rendering
//! - [`storage`] - Stored-text hooks for persistence collaborators
//! - [`error`] - Domain error types
//!
//! Every type is an immutable value or a stateless function; share freely
//! across threads.
//!
//! ## Example Usage
//!
//! ```rust
//! use gmfin_core::{Amount, CardIssuer, CreditCard};
//!
//! let subtotal: Amount = "100.00".parse().unwrap();
//! let vat = subtotal.percent("20".parse().unwrap());
//! assert_eq!((subtotal + vat).to_string(), "120.00");
//!
//! let card = CreditCard {
//!     card_number: 4242424242424242,
//!     card_security_code: 123,
//!     cardholder_name: "JANE DOE".into(),
//!     expiry_month: 12,
//!     expiry_year: 2099,
//! };
//! assert!(card.validate().is_ok());
//! assert_eq!(card.issuer(), CardIssuer::Visa);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod amount;
pub mod card;
pub mod currency;
pub mod currency_amount;
pub mod currency_store;
pub mod error;
pub mod luhn;
pub mod storage;

#[cfg(feature = "sqlx")]
mod sqlite;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use amount::Amount;
pub use card::{CardIssuer, CreditCard};
pub use currency::{Currency, CurrencyCode};
pub use currency_amount::CurrencyAmount;
pub use currency_store::{CurrencySeed, CurrencyStore, StaticCurrencyStore};
pub use error::{
    AmountError, CardValidationError, CoreError, CoreResult, CurrencyError, LuhnError,
};
pub use storage::StoredText;
