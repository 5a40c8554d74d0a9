//! # Currency Store
//!
//! Lookup capability for currency reference data, injected into whatever
//! needs to resolve a code.
//!
//! ## Backing Stores
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     dyn CurrencyStore                                   │
//! │        by_code() • by_numeric_code() • all() • lookup()                 │
//! │                  │                              │                       │
//! │      ┌───────────┴──────────┐      ┌────────────┴───────────┐           │
//! │      │ StaticCurrencyStore  │      │ gmfin-db snapshot      │           │
//! │      │ (defaults or a list) │      │ (currencies table)     │           │
//! │      └──────────────────────┘      └────────────────────────┘           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no process-wide table. Tests and services build the store they
//! need and pass it along.

use std::collections::HashMap;
use std::sync::Arc;

use serde::de::{DeserializeSeed, Error as _};
use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::currency::{Currency, CurrencyCode};
use crate::error::{CoreResult, CurrencyError};

/// Read access to currency reference data.
pub trait CurrencyStore: Send + Sync {
    fn by_code(&self, code: CurrencyCode) -> Option<Currency>;

    fn by_numeric_code(&self, numeric_code: u16) -> Option<Currency>;

    /// Every currency, ordered by code.
    fn all(&self) -> Vec<Currency>;

    /// Resolves code text the way JSON input is read: quotes and spaces
    /// trimmed, case ignored.
    ///
    /// ```rust
    /// use gmfin_core::currency::CurrencyCode;
    /// use gmfin_core::currency_store::{CurrencyStore, StaticCurrencyStore};
    ///
    /// let store = StaticCurrencyStore::default();
    /// assert_eq!(store.lookup("\"usd\"").unwrap().code, CurrencyCode::USD);
    /// assert!(store.lookup("XXX").is_err());
    /// ```
    fn lookup(&self, text: &str) -> Result<Currency, CurrencyError> {
        let code = CurrencyCode::parse(text)?;
        self.by_code(code)
            .ok_or_else(|| CurrencyError::Unsupported(code.to_string()))
    }

    fn lookup_numeric(&self, numeric_code: u16) -> Result<Currency, CurrencyError> {
        self.by_numeric_code(numeric_code)
            .ok_or_else(|| CurrencyError::Unsupported(numeric_code.to_string()))
    }

    /// Reads a JSON code string (`"usd"`) through this store.
    fn parse_json(&self, json: &str) -> CoreResult<Currency> {
        let mut de = serde_json::Deserializer::from_str(json);
        let currency = CurrencySeed(self).deserialize(&mut de)?;
        de.end()?;
        Ok(currency)
    }
}

impl<S: CurrencyStore + ?Sized> CurrencyStore for Arc<S> {
    fn by_code(&self, code: CurrencyCode) -> Option<Currency> {
        (**self).by_code(code)
    }

    fn by_numeric_code(&self, numeric_code: u16) -> Option<Currency> {
        (**self).by_numeric_code(numeric_code)
    }

    fn all(&self) -> Vec<Currency> {
        (**self).all()
    }
}

// =============================================================================
// Static Store
// =============================================================================

/// In-memory table, fixed after construction.
#[derive(Debug, Clone)]
pub struct StaticCurrencyStore {
    currencies: HashMap<CurrencyCode, Currency>,
}

impl StaticCurrencyStore {
    /// Builds a store from an explicit list. A later entry with the same code
    /// replaces an earlier one.
    pub fn new(currencies: impl IntoIterator<Item = Currency>) -> Self {
        let currencies: HashMap<_, _> = currencies.into_iter().map(|c| (c.code, c)).collect();
        debug!(count = currencies.len(), "Currency table loaded");
        StaticCurrencyStore { currencies }
    }

    /// Swaps the whole table for `currencies`.
    pub fn with_currencies(self, currencies: impl IntoIterator<Item = Currency>) -> Self {
        StaticCurrencyStore::new(currencies)
    }

    pub fn len(&self) -> usize {
        self.currencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.currencies.is_empty()
    }
}

/// The built-in table from [`Currency::defaults`].
impl Default for StaticCurrencyStore {
    fn default() -> Self {
        StaticCurrencyStore::new(Currency::defaults())
    }
}

impl CurrencyStore for StaticCurrencyStore {
    fn by_code(&self, code: CurrencyCode) -> Option<Currency> {
        self.currencies.get(&code).cloned()
    }

    fn by_numeric_code(&self, numeric_code: u16) -> Option<Currency> {
        self.currencies
            .values()
            .find(|c| c.numeric_code == numeric_code)
            .cloned()
    }

    fn all(&self) -> Vec<Currency> {
        let mut all: Vec<Currency> = self.currencies.values().cloned().collect();
        all.sort_by_key(|c| c.code);
        all
    }
}

// =============================================================================
// Deserialization
// =============================================================================

/// Reads a `Currency` from its JSON code string through a store.
///
/// ```rust
/// use serde::de::DeserializeSeed;
/// use gmfin_core::currency::CurrencyCode;
/// use gmfin_core::currency_store::{CurrencySeed, StaticCurrencyStore};
///
/// let store = StaticCurrencyStore::default();
/// let mut json = serde_json::Deserializer::from_str("\"eur\"");
/// let euro = CurrencySeed(&store).deserialize(&mut json).unwrap();
/// assert_eq!(euro.code, CurrencyCode::EUR);
/// ```
pub struct CurrencySeed<'a, S: ?Sized>(pub &'a S);

impl<'de, S: CurrencyStore + ?Sized> DeserializeSeed<'de> for CurrencySeed<'_, S> {
    type Value = Currency;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Currency, D::Error> {
        let text = String::deserialize(deserializer)?;
        self.0.lookup(&text).map_err(D::Error::custom)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lookups() {
        let store = StaticCurrencyStore::default();
        assert_eq!(store.len(), 5);

        let usd = store.by_code(CurrencyCode::USD).unwrap();
        assert_eq!(usd.numeric_code, 840);
        assert_eq!(store.by_numeric_code(978).unwrap().code, CurrencyCode::EUR);
        assert!(store.by_numeric_code(999).is_none());
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let store = StaticCurrencyStore::default();
        let usd = store.lookup("usd").unwrap();
        assert_eq!(usd.code, CurrencyCode::USD);
        assert_eq!(store.lookup(" \"Uah\" ").unwrap().numeric_code, 980);
    }

    #[test]
    fn test_lookup_unsupported() {
        let store = StaticCurrencyStore::default();
        assert_eq!(
            store.lookup("XXX"),
            Err(CurrencyError::Unsupported("XXX".to_string()))
        );
        assert!(store.lookup("DOLLAR").is_err());
        assert_eq!(
            store.lookup_numeric(1),
            Err(CurrencyError::Unsupported("1".to_string()))
        );
    }

    #[test]
    fn test_custom_table_replaces_defaults() {
        let gbp = CurrencyCode::parse("GBP").unwrap();
        let store = StaticCurrencyStore::new([Currency::new(gbp, 826, "Pound sterling", 2, "£", "$1")]);

        assert_eq!(store.all().len(), 1);
        assert!(store.by_code(CurrencyCode::USD).is_none());
        assert_eq!(store.lookup("gbp").unwrap().grapheme, "£");
    }

    #[test]
    fn test_all_is_sorted() {
        let codes: Vec<String> = StaticCurrencyStore::default()
            .all()
            .iter()
            .map(|c| c.code.to_string())
            .collect();
        assert_eq!(codes, ["ANY", "EUR", "RUB", "UAH", "USD"]);
    }

    #[test]
    fn test_shared_store() {
        let store: Arc<dyn CurrencyStore> = Arc::new(StaticCurrencyStore::default());
        assert_eq!(store.lookup("eur").unwrap().numeric_code, 978);
    }

    #[test]
    fn test_with_currencies_swaps_table() {
        let store = StaticCurrencyStore::default().with_currencies([Currency::new(
            CurrencyCode::EUR,
            978,
            "Euro",
            2,
            "€",
            "1 $",
        )]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.lookup("EUR").unwrap().template, "1 $");
    }

    #[test]
    fn test_parse_json() {
        let store = StaticCurrencyStore::default();
        assert_eq!(store.parse_json("\"rub\"").unwrap().numeric_code, 643);
        assert!(store.parse_json("\"XXX\"").is_err());
        assert!(store.parse_json("840").is_err());
    }

    #[test]
    fn test_seed() {
        let store = StaticCurrencyStore::default();

        let mut json = serde_json::Deserializer::from_str("\"usd\"");
        let usd = CurrencySeed(&store).deserialize(&mut json).unwrap();
        assert_eq!(usd.code, CurrencyCode::USD);

        let mut json = serde_json::Deserializer::from_str("\"XXX\"");
        let err = CurrencySeed(&store).deserialize(&mut json).unwrap_err();
        assert!(err.to_string().contains("unsupported currency: XXX"));
    }
}
