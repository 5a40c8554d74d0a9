//! # Currency Reference Records
//!
//! `CurrencyCode` is a validated three-letter code; `Currency` is the
//! immutable record a [`CurrencyStore`](crate::currency_store::CurrencyStore)
//! hands out.
//!
//! ## JSON Form
//! A currency is written as its bare code: `"USD"`. Reading one back needs a
//! store, see [`CurrencySeed`](crate::currency_store::CurrencySeed).

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CurrencyError;
use crate::storage::StoredText;

// =============================================================================
// Currency Code
// =============================================================================

/// ISO 4217 style alphabetic code, always upper case.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CurrencyCode([u8; 3]);

impl CurrencyCode {
    /// Placeholder currency for amounts whose currency does not matter.
    pub const ANY: CurrencyCode = CurrencyCode(*b"ANY");
    pub const UAH: CurrencyCode = CurrencyCode(*b"UAH");
    pub const RUB: CurrencyCode = CurrencyCode(*b"RUB");
    pub const USD: CurrencyCode = CurrencyCode(*b"USD");
    pub const EUR: CurrencyCode = CurrencyCode(*b"EUR");

    /// Parses a code leniently: surrounding quotes and spaces are dropped and
    /// the letters are upper-cased.
    ///
    /// ```rust
    /// use gmfin_core::currency::CurrencyCode;
    ///
    /// assert_eq!(CurrencyCode::parse("\"usd\"").unwrap(), CurrencyCode::USD);
    /// assert!(CurrencyCode::parse("US").is_err());
    /// ```
    pub fn parse(text: &str) -> Result<Self, CurrencyError> {
        let trimmed = text.trim_matches(|c| c == '"' || c == ' ');
        let bytes: [u8; 3] = trimmed
            .as_bytes()
            .try_into()
            .map_err(|_| CurrencyError::Unsupported(trimmed.to_string()))?;
        if !bytes.iter().all(u8::is_ascii_alphabetic) {
            return Err(CurrencyError::Unsupported(trimmed.to_string()));
        }
        Ok(CurrencyCode(bytes.map(|b| b.to_ascii_uppercase())))
    }

    pub fn as_str(&self) -> &str {
        // only ASCII letters get in
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CurrencyCode({})", self.as_str())
    }
}

impl FromStr for CurrencyCode {
    type Err = CurrencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CurrencyCode::parse(s)
    }
}

impl Serialize for CurrencyCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CurrencyCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        CurrencyCode::parse(&text).map_err(D::Error::custom)
    }
}

impl StoredText for CurrencyCode {
    type Error = CurrencyError;

    fn decode_stored(text: Option<&str>) -> Result<Self, Self::Error> {
        CurrencyCode::parse(text.unwrap_or_default())
    }

    fn encode_stored(&self) -> String {
        self.as_str().to_string()
    }
}

// =============================================================================
// Currency
// =============================================================================

/// Reference data for one currency.
///
/// Two records are the same currency when their numeric codes match.
#[derive(Debug, Clone)]
pub struct Currency {
    pub code: CurrencyCode,

    /// ISO 4217 numeric code (840 for USD).
    pub numeric_code: u16,

    pub name: String,

    /// Minor unit digits.
    pub fraction: u8,

    /// Symbol, e.g. `€`.
    pub grapheme: String,

    /// Display template: `1` is the amount, `$` is the grapheme.
    /// `"$1"` renders `€12.50`, `"1 $"` renders `12.50 ₴`.
    pub template: String,
}

impl Currency {
    pub fn new(
        code: CurrencyCode,
        numeric_code: u16,
        name: impl Into<String>,
        fraction: u8,
        grapheme: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        Currency {
            code,
            numeric_code,
            name: name.into(),
            fraction,
            grapheme: grapheme.into(),
            template: template.into(),
        }
    }

    /// Built-in reference table.
    pub fn defaults() -> Vec<Currency> {
        vec![
            Currency::new(CurrencyCode::UAH, 980, "Ukrainian hryvnia", 2, "\u{20b4}", "1 $"),
            Currency::new(CurrencyCode::EUR, 978, "Euro", 2, "\u{20ac}", "$1"),
            Currency::new(CurrencyCode::USD, 840, "US dollar", 2, "$", "$1"),
            Currency::new(CurrencyCode::RUB, 643, "Russian ruble", 2, "\u{20bd}", "1 $"),
            Currency::new(CurrencyCode::ANY, 0, "Any currency", 2, "", "1 $"),
        ]
    }

    /// Same currency, compared by numeric code.
    pub fn equals(&self, other: &Currency) -> bool {
        self.numeric_code == other.numeric_code
    }
}

impl PartialEq for Currency {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Eq for Currency {}

impl Hash for Currency {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.numeric_code.hash(state);
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.code, f)
    }
}

impl Serialize for Currency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.code.serialize(serializer)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_code() {
        assert_eq!(CurrencyCode::parse("USD").unwrap(), CurrencyCode::USD);
        assert_eq!(CurrencyCode::parse(" eur ").unwrap(), CurrencyCode::EUR);
        assert_eq!(CurrencyCode::parse("\"uah\"").unwrap(), CurrencyCode::UAH);

        for bad in ["", "US", "USDX", "U$D", "ÜSD"] {
            assert!(
                matches!(CurrencyCode::parse(bad), Err(CurrencyError::Unsupported(_))),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn test_code_text_forms() {
        assert_eq!(CurrencyCode::USD.to_string(), "USD");
        assert_eq!(format!("{:?}", CurrencyCode::EUR), "CurrencyCode(EUR)");
        assert_eq!(serde_json::to_string(&CurrencyCode::UAH).unwrap(), "\"UAH\"");
        let code: CurrencyCode = serde_json::from_str("\"rub\"").unwrap();
        assert_eq!(code, CurrencyCode::RUB);
        assert!(serde_json::from_str::<CurrencyCode>("\"XXXX\"").is_err());
    }

    #[test]
    fn test_code_stored_text() {
        assert_eq!(CurrencyCode::decode_stored(Some("usd")).unwrap(), CurrencyCode::USD);
        assert!(CurrencyCode::decode_stored(None).is_err());
        assert_eq!(CurrencyCode::EUR.encode_stored(), "EUR");
    }

    #[test]
    fn test_currency_equality_by_numeric_code() {
        let usd = Currency::new(CurrencyCode::USD, 840, "US dollar", 2, "$", "$1");
        let renamed = Currency::new(CurrencyCode::USD, 840, "Dollar", 2, "US$", "1 $");
        let euro = Currency::new(CurrencyCode::EUR, 978, "Euro", 2, "€", "$1");

        assert!(usd.equals(&renamed));
        assert_eq!(usd, renamed);
        assert_ne!(usd, euro);
    }

    #[test]
    fn test_currency_serializes_as_code() {
        let usd = Currency::new(CurrencyCode::USD, 840, "US dollar", 2, "$", "$1");
        assert_eq!(serde_json::to_string(&usd).unwrap(), "\"USD\"");
        assert_eq!(usd.to_string(), "USD");
    }

    #[test]
    fn test_defaults() {
        let defaults = Currency::defaults();
        assert_eq!(defaults.len(), 5);
        let uah = defaults.iter().find(|c| c.code == CurrencyCode::UAH).unwrap();
        assert_eq!(uah.numeric_code, 980);
        assert_eq!(uah.grapheme, "₴");
        assert_eq!(uah.template, "1 $");
    }
}
