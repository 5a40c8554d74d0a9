//! # Error Types
//!
//! Domain-specific error types for gmfin-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  gmfin-core errors (this file)                                         │
//! │  ├── AmountError          - Malformed amount text                      │
//! │  ├── LuhnError            - Non-digit input / bad checksum             │
//! │  ├── CurrencyError        - Unknown currency code                      │
//! │  ├── CardValidationError  - Which card rule failed                     │
//! │  └── CoreError            - Wraps all of the above                     │
//! │                                                                         │
//! │  gmfin-db errors (separate crate)                                      │
//! │  └── DbError              - Database operation failures                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (input text, position, rule)
//! 3. Card numbers only ever appear masked
//! 4. Each card variant maps to a user-facing message

use std::num::ParseIntError;

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Any failure produced by gmfin-core.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Amount(#[from] AmountError),

    #[error(transparent)]
    Luhn(#[from] LuhnError),

    #[error(transparent)]
    Currency(#[from] CurrencyError),

    #[error(transparent)]
    Card(#[from] CardValidationError),

    /// Malformed JSON document (amount text errors surface here too when
    /// they occur inside a document).
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Amount Error
// =============================================================================

/// Amount text could not be turned into a fixed-point value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// The normalized digits are not a valid signed 64-bit integer.
    ///
    /// ## When This Occurs
    /// - Letters or stray symbols: `"12a.00"`
    /// - Two separators: `"1.2.3"`
    /// - Magnitude beyond the i64 range after scaling
    #[error("invalid amount '{input}': {source}")]
    Parse {
        input: String,
        #[source]
        source: ParseIntError,
    },

    /// Blank input.
    #[error("amount text is empty")]
    Empty,
}

// =============================================================================
// Luhn Error
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LuhnError {
    /// A character outside `'0'..='9'`.
    #[error("invalid digit {found:?} at position {position}")]
    InvalidDigit { position: usize, found: char },

    /// The weighted digit sum is not a multiple of 10.
    #[error("invalid number")]
    Checksum,
}

// =============================================================================
// Currency Error
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurrencyError {
    /// Code or numeric code not present in the reference table,
    /// or text that cannot be a currency code at all.
    #[error("unsupported currency: {0}")]
    Unsupported(String),
}

// =============================================================================
// Card Validation Error
// =============================================================================

/// The specific card rule that failed.
///
/// ## User Workflow
/// ```text
/// Checkout form submitted
///      │
///      ▼
/// CreditCard::validate()
///      │
///      ├── month 13   → InvalidExpiryMonth  → "Check the expiry month"
///      ├── 01/2020    → Expired             → "This card has expired"
///      ├── cvv 0      → InvalidSecurityCode → "Check the security code"
///      └── bad digits → LuhnCheckFailed     → "Check the card number"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardValidationError {
    #[error("invalid expiry month: {0}")]
    InvalidExpiryMonth(u32),

    #[error("invalid expiry year: {0}")]
    InvalidExpiryYear(u32),

    /// The card stopped being valid at the start of its expiry month.
    #[error("card expired: {month:02}/{year}")]
    Expired { month: u32, year: u32 },

    #[error("card security code invalid: {0}")]
    InvalidSecurityCode(u32),

    /// Holds the masked number.
    #[error("card number length invalid: {0}")]
    InvalidNumberLength(String),

    /// Holds the masked number.
    #[error("card number failed the luhn algorithm check: {0}")]
    LuhnCheckFailed(String),
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_error_messages() {
        assert_eq!(
            CardValidationError::Expired { month: 3, year: 2020 }.to_string(),
            "card expired: 03/2020"
        );
        assert_eq!(
            CardValidationError::InvalidExpiryMonth(13).to_string(),
            "invalid expiry month: 13"
        );
        assert_eq!(
            CardValidationError::LuhnCheckFailed("424242******4241".to_string()).to_string(),
            "card number failed the luhn algorithm check: 424242******4241"
        );
    }

    #[test]
    fn test_luhn_error_messages() {
        let err = LuhnError::InvalidDigit {
            position: 3,
            found: 'x',
        };
        assert_eq!(err.to_string(), "invalid digit 'x' at position 3");
        assert_eq!(LuhnError::Checksum.to_string(), "invalid number");
    }

    #[test]
    fn test_converts_to_core_error() {
        let err: CoreError = CurrencyError::Unsupported("XXX".to_string()).into();
        assert!(matches!(err, CoreError::Currency(_)));
        assert_eq!(err.to_string(), "unsupported currency: XXX");

        let err: CoreError = CardValidationError::InvalidSecurityCode(0).into();
        assert!(matches!(err, CoreError::Card(_)));
    }
}
