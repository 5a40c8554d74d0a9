//! # Currency Amount
//!
//! An [`Amount`] paired with the currency it is denominated in, rendered
//! through the currency's display template.
//!
//! ```rust
//! use gmfin_core::amount::Amount;
//! use gmfin_core::currency::CurrencyCode;
//! use gmfin_core::currency_amount::CurrencyAmount;
//! use gmfin_core::currency_store::{CurrencyStore, StaticCurrencyStore};
//!
//! let store = StaticCurrencyStore::default();
//! let price = CurrencyAmount::new(Amount::from_cents(1250), store.by_code(CurrencyCode::EUR));
//! assert_eq!(price.to_string(), "€12.50");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::currency::Currency;
use crate::currency_store::CurrencyStore;
use crate::error::CoreResult;

/// JSON shape: `{"Amount": 12.50, "Currency": "USD"}`; `Currency` is
/// omitted when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrencyAmount {
    #[serde(rename = "Amount")]
    pub amount: Amount,

    #[serde(rename = "Currency", skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,
}

/// Wire form before the currency code is resolved.
#[derive(Deserialize)]
struct CurrencyAmountWire {
    #[serde(rename = "Amount", default)]
    amount: Amount,

    #[serde(rename = "Currency", default)]
    currency: Option<String>,
}

impl CurrencyAmount {
    pub fn new(amount: Amount, currency: Option<Currency>) -> Self {
        CurrencyAmount { amount, currency }
    }

    /// Rounded cents of the amount.
    pub fn in_cents(&self) -> i64 {
        self.amount.in_cents()
    }

    /// Parses the JSON form, resolving the code through `store`.
    ///
    /// ## Errors
    /// - malformed JSON or amount text
    /// - a currency code the store does not know
    pub fn from_json<S: CurrencyStore + ?Sized>(json: &str, store: &S) -> CoreResult<Self> {
        let wire: CurrencyAmountWire = serde_json::from_str(json)?;
        let currency = wire
            .currency
            .map(|code| store.lookup(&code))
            .transpose()?;
        Ok(CurrencyAmount {
            amount: wire.amount,
            currency,
        })
    }
}

/// Fills the template: the first `1` becomes the amount, then the first `$`
/// becomes the grapheme. Without a currency only the amount is written.
impl fmt::Display for CurrencyAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let amount = self.amount.to_string();
        match &self.currency {
            Some(currency) => f.write_str(
                &currency
                    .template
                    .replacen('1', &amount, 1)
                    .replacen('$', &currency.grapheme, 1),
            ),
            None => f.write_str(&amount),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
