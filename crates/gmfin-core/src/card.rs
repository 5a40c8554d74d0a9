//! # Card Module
//!
//! Payment-card records: validation, issuer classification and masking.
//!
//! ## Validation Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CreditCard::validate()            first failure wins                   │
//! │                                                                         │
//! │  1. expiry month in 1..=12      → InvalidExpiryMonth                    │
//! │  2. expiry year >= 1            → InvalidExpiryYear                     │
//! │  3. 1st of expiry month >= now  → Expired                               │
//! │  4. security code in 1..=999    → InvalidSecurityCode                   │
//! │  5. 13 to 19 digits             → InvalidNumberLength                   │
//! │  6. luhn::is_valid(number)      → LuhnCheckFailed                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Cards expire at the *start* of their expiry month.
//!
//! [`CreditCard::issuer`] is independent of validation and never fails.

use std::fmt;
use std::sync::LazyLock;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::error::CardValidationError;
use crate::luhn;

/// Result type for card validation.
pub type CardResult<T> = Result<T, CardValidationError>;

/// Smallest 13-digit number.
const MIN_CARD_NUMBER: u64 = 1_000_000_000_000;
/// Smallest 20-digit number.
const MAX_CARD_NUMBER_EXCLUSIVE: u64 = 10_000_000_000_000_000_000;

const MAX_SECURITY_CODE: u32 = 999;

/// Published sandbox numbers from the major gateways.
const TEST_CARD_NUMBERS: [u64; 14] = [
    4242424242424242,
    4012888888881881,
    4000056655665556,
    5555555555554444,
    5200828282828210,
    5105105105105100,
    378282246310005,
    371449635398431,
    6011111111111117,
    6011000990139424,
    30569309025904,
    38520000023237,
    3530111333300000,
    3566002020360505,
];

// =============================================================================
// Card Issuer
// =============================================================================

/// Card network, derived from the number's prefix and length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum CardIssuer {
    #[serde(rename = "visa")]
    Visa,
    #[serde(rename = "mastercard")]
    MasterCard,
    #[serde(rename = "american express")]
    Amex,
    #[serde(rename = "diners")]
    Diners,
    #[serde(rename = "discover")]
    Discover,
    #[serde(rename = "jcb")]
    Jcb,
    #[serde(rename = "prostir")]
    Prostir,
    #[serde(rename = "other")]
    Other,
}

/// Issuer prefix patterns, compiled once.
///
/// The patterns are mutually exclusive by network prefix design, so the
/// first match is the only match. Classification relies on that; the list
/// order is not a tie-breaker.
static ISSUER_PATTERNS: LazyLock<Vec<(CardIssuer, Regex)>> = LazyLock::new(|| {
    [
        (CardIssuer::Visa, r"^4[0-9]{12}(?:[0-9]{3})?$"),
        (CardIssuer::MasterCard, r"^5[1-5][0-9]{14}$"),
        (CardIssuer::Amex, r"^3[47][0-9]{13}$"),
        (CardIssuer::Diners, r"^3(?:0[0-5]|[68][0-9])[0-9]{11}$"),
        (CardIssuer::Discover, r"^6(?:011|5[0-9]{2})[0-9]{12}$"),
        (CardIssuer::Jcb, r"^(?:2131|1800|35[0-9]{3})[0-9]{11}$"),
        (CardIssuer::Prostir, r"^9[0-9]{12}(?:[0-9]{3})?$"),
    ]
    .into_iter()
    .map(|(issuer, pattern)| {
        let regex = Regex::new(pattern).expect("issuer pattern is a valid regex");
        (issuer, regex)
    })
    .collect()
});

impl CardIssuer {
    /// Classifies a digit string. Anything unmatched is [`CardIssuer::Other`].
    ///
    /// ```rust
    /// use gmfin_core::card::CardIssuer;
    ///
    /// assert_eq!(CardIssuer::classify("4242424242424242"), CardIssuer::Visa);
    /// assert_eq!(CardIssuer::classify("0000000000000000"), CardIssuer::Other);
    /// ```
    pub fn classify(digits: &str) -> CardIssuer {
        ISSUER_PATTERNS
            .iter()
            .find(|(_, pattern)| pattern.is_match(digits))
            .map(|(issuer, _)| *issuer)
            .unwrap_or(CardIssuer::Other)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            CardIssuer::Visa => "visa",
            CardIssuer::MasterCard => "mastercard",
            CardIssuer::Amex => "american express",
            CardIssuer::Diners => "diners",
            CardIssuer::Discover => "discover",
            CardIssuer::Jcb => "jcb",
            CardIssuer::Prostir => "prostir",
            CardIssuer::Other => "other",
        }
    }
}

impl fmt::Display for CardIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Credit Card
// =============================================================================

/// A card as submitted by a customer.
///
/// Nothing is checked at construction; call [`CreditCard::validate`] before
/// use. `Debug` output masks the number and hides the security code.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreditCard {
    /// 13 to 19 digits when valid.
    pub card_number: u64,

    /// CVV2/CVC2, 1 to 999 when valid.
    pub card_security_code: u32,

    pub cardholder_name: String,

    /// 1 to 12 when valid.
    pub expiry_month: u32,

    pub expiry_year: u32,
}

impl CreditCard {
    pub fn number_string(&self) -> String {
        self.card_number.to_string()
    }

    pub fn security_code_string(&self) -> String {
        self.card_security_code.to_string()
    }

    /// Keeps the first 4 and last 4 digits.
    ///
    /// ```rust
    /// use gmfin_core::card::CreditCard;
    ///
    /// let card = CreditCard { card_number: 4242424242424242, ..Default::default() };
    /// assert_eq!(card.mask(), "4242********4242");
    /// ```
    ///
    /// Numbers of 8 digits or fewer are returned as-is.
    pub fn mask(&self) -> String {
        mask_digits(&self.number_string(), 4, 4)
    }

    /// Keeps the first 6 and last 4 digits; numbers shorter than 11 digits are
    /// returned unmasked.
    pub fn mask_full(&self) -> String {
        mask_digits(&self.number_string(), 6, 4)
    }

    /// Recomputed on every call.
    pub fn issuer(&self) -> CardIssuer {
        CardIssuer::classify(&self.number_string())
    }

    /// Whether the number is one of the well-known gateway sandbox numbers.
    pub fn is_test_card(&self) -> bool {
        TEST_CARD_NUMBERS.contains(&self.card_number)
    }

    /// Validates against the local clock.
    pub fn validate(&self) -> CardResult<()> {
        self.validate_at(Local::now().naive_local())
    }

    /// Validates as of `now`.
    pub fn validate_at(&self, now: NaiveDateTime) -> CardResult<()> {
        let result = self.check_all(now);
        if let Err(err) = &result {
            debug!(card = %self.mask_full(), error = %err, "Card rejected");
        }
        result
    }

    fn check_all(&self, now: NaiveDateTime) -> CardResult<()> {
        let (month, year) = (self.expiry_month, self.expiry_year);
        if !(1..=12).contains(&month) {
            return Err(CardValidationError::InvalidExpiryMonth(month));
        }
        if year < 1 {
            return Err(CardValidationError::InvalidExpiryYear(year));
        }

        // A year past the calendar's range is far in the future: not expired.
        let expires = i32::try_from(year)
            .ok()
            .and_then(|y| NaiveDate::from_ymd_opt(y, month, 1))
            .map(|date| date.and_time(NaiveTime::MIN));
        if expires.is_some_and(|expires| expires < now) {
            return Err(CardValidationError::Expired { month, year });
        }

        if !(1..=MAX_SECURITY_CODE).contains(&self.card_security_code) {
            return Err(CardValidationError::InvalidSecurityCode(
                self.card_security_code,
            ));
        }

        self.validate_number()
    }

    /// Length (13 to 19 digits) and Luhn checks only.
    ///
    /// The Luhn step goes through [`luhn::is_valid`], whose own 13 to 16
    /// digit gate rejects 17 to 19 digit numbers as Luhn failures.
    pub fn validate_number(&self) -> CardResult<()> {
        if !(MIN_CARD_NUMBER..MAX_CARD_NUMBER_EXCLUSIVE).contains(&self.card_number) {
            return Err(CardValidationError::InvalidNumberLength(self.mask_full()));
        }
        if !luhn::is_valid(&self.number_string()) {
            return Err(CardValidationError::LuhnCheckFailed(self.mask_full()));
        }
        Ok(())
    }
}

impl Default for CreditCard {
    fn default() -> Self {
        CreditCard {
            card_number: 0,
            card_security_code: 0,
            cardholder_name: String::new(),
            expiry_month: 1,
            expiry_year: 1,
        }
    }
}

impl fmt::Debug for CreditCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreditCard")
            .field("card_number", &self.mask_full())
            .field("card_security_code", &"***")
            .field("cardholder_name", &self.cardholder_name)
            .field("expiry_month", &self.expiry_month)
            .field("expiry_year", &self.expiry_year)
            .finish()
    }
}

fn mask_digits(number: &str, head: usize, tail: usize) -> String {
    let len = number.len();
    if len <= head + tail {
        return number.to_string();
    }
    format!(
        "{}{}{}",
        &number[..head],
        "*".repeat(len - head - tail),
        &number[len - tail..]
    )
}

// =============================================================================
// Unit Tests
// =============================================================================
