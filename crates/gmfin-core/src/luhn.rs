//! # Luhn Checksum
//!
//! Check-digit computation, validation and sample generation over ASCII
//! digit strings.
//!
//! ## The Weighted Sum
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  number:   4 5 3 2 0 1 5 1 1 2 8 3 0 3 6 6                              │
//! │  doubled:  ^   ^   ^   ^   ^   ^   ^   ^      (index % 2 == len % 2)    │
//! │                                                                         │
//! │  doubled digit > 9 → subtract 9 (same as summing its two digits)        │
//! │  valid  ⇔  sum % 10 == 0                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Entry Points
//! - [`validate`] - checksum only, any length, reports the failure
//! - [`is_valid`] - convenience gate: 13 to 16 digits and a valid checksum
//! - [`compute`] - check digit for a number that does not carry one yet
//! - [`generate`] - random Luhn-valid digit strings for test data
//!
//! The 13 to 16 digit gate in [`is_valid`] is a Luhn-layer convenience, not
//! the card length rule: [`CreditCard`](crate::card::CreditCard) accepts
//! 13 to 19 digits before it gets here, so a 17 to 19 digit number passes the
//! length rule and then fails at this gate.

use crate::error::LuhnError;

/// Result type for Luhn operations.
pub type LuhnResult<T> = Result<T, LuhnError>;

pub const MIN_CHECKED_LEN: usize = 13;
pub const MAX_CHECKED_LEN: usize = 16;

/// A computed check digit and the number with it appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckDigit {
    pub digit: u8,
    pub full: String,
}

/// Validates a digit string of 13 to 16 characters.
///
/// ```rust
/// use gmfin_core::luhn;
///
/// assert!(luhn::is_valid("4532015112830366"));
/// assert!(!luhn::is_valid("4532015112830367"));
/// assert!(!luhn::is_valid("0000000000")); // too short for the gate
/// ```
pub fn is_valid(number: &str) -> bool {
    (MIN_CHECKED_LEN..=MAX_CHECKED_LEN).contains(&number.len()) && validate(number).is_ok()
}

/// Checks the Luhn sum of a digit string of any length.
pub fn validate(number: &str) -> LuhnResult<()> {
    let sum = weighted_sum(number, number.len() % 2)?;
    if sum % 10 != 0 {
        return Err(LuhnError::Checksum);
    }
    Ok(())
}

/// Computes the check digit for `partial`.
///
/// Parity is chosen as if the check digit were already appended.
///
/// ```rust
/// use gmfin_core::luhn;
///
/// let check = luhn::compute("453201511283036").unwrap();
/// assert_eq!(check.digit, 6);
/// assert_eq!(check.full, "4532015112830366");
/// ```
pub fn compute(partial: &str) -> LuhnResult<CheckDigit> {
    let sum = weighted_sum(partial, (partial.len() + 1) % 2)?;
    let digit = ((10 - sum % 10) % 10) as u8;
    Ok(CheckDigit {
        digit,
        full: format!("{partial}{digit}"),
    })
}

/// Generates a random Luhn-valid digit string of `length` characters.
///
/// Uses non-cryptographic randomness. This is a test and sample data helper;
/// never use it to issue real account numbers. `length == 0` yields `""`.
pub fn generate(length: usize) -> String {
    if length == 0 {
        return String::new();
    }
    let partial: String = (1..length)
        .map(|_| char::from(b'0' + rand::random_range(0..10u8)))
        .collect();
    let digit = check_digit_for_digits(&partial);
    format!("{partial}{digit}")
}

/// `partial` is known to hold only ASCII digits.
fn check_digit_for_digits(partial: &str) -> u32 {
    let sum: u32 = partial
        .bytes()
        .enumerate()
        .map(|(i, b)| weigh(i, u32::from(b - b'0'), (partial.len() + 1) % 2))
        .sum();
    (10 - sum % 10) % 10
}

fn weighted_sum(number: &str, parity: usize) -> LuhnResult<u32> {
    number
        .chars()
        .enumerate()
        .map(|(position, c)| {
            c.to_digit(10)
                .map(|d| weigh(position, d, parity))
                .ok_or(LuhnError::InvalidDigit { position, found: c })
        })
        .sum()
}

#[inline]
fn weigh(position: usize, digit: u32, parity: usize) -> u32 {
    if position % 2 != parity {
        return digit;
    }
    let doubled = digit * 2;
    if doubled > 9 {
        doubled - 9
    } else {
        doubled
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_vectors() {
        assert!(validate("4532015112830366").is_ok());
        assert_eq!(validate("4532015112830367"), Err(LuhnError::Checksum));
        assert!(validate("4242424242424242").is_ok());
        assert!(validate("378282246310005").is_ok());
        assert!(validate("79927398713").is_ok());
        assert!(validate("0").is_ok());
    }

    #[test]
    fn test_invalid_digit() {
        assert_eq!(
            validate("4242-4242"),
            Err(LuhnError::InvalidDigit {
                position: 4,
                found: '-'
            })
        );
        assert!(matches!(compute("12a"), Err(LuhnError::InvalidDigit { position: 2, .. })));
        assert!(!is_valid("424242424242424x"));
        // non-ASCII digits are rejected too
        assert!(validate("٤٢").is_err());
    }

    #[test]
    fn test_length_gate() {
        // 12 digits, Luhn-valid sum, rejected by the gate only
        let twelve = compute("12345678901").unwrap().full;
        assert!(validate(&twelve).is_ok());
        assert!(!is_valid(&twelve));

        let seventeen = compute("4000000000000000").unwrap().full;
        assert_eq!(seventeen.len(), 17);
        assert!(validate(&seventeen).is_ok());
        assert!(!is_valid(&seventeen));

        assert!(is_valid("4222222222222")); // 13
        assert!(is_valid("4242424242424242")); // 16
    }

    #[test]
    fn test_compute() {
        assert_eq!(compute("7992739871").unwrap().digit, 3);
        assert_eq!(
            compute("").unwrap(),
            CheckDigit {
                digit: 0,
                full: "0".to_string()
            }
        );
    }

    #[test]
    fn test_generate() {
        for length in [13, 15, 16, 19] {
            let number = generate(length);
            assert_eq!(number.len(), length);
            assert!(number.bytes().all(|b| b.is_ascii_digit()));
            assert!(validate(&number).is_ok(), "{number}");
        }
        assert_eq!(generate(0), "");
        assert_eq!(generate(1), "0");
    }

    proptest! {
        #[test]
        fn computed_numbers_validate(partial in "[0-9]{12,18}") {
            let check = compute(&partial).unwrap();
            prop_assert_eq!(check.full.len(), partial.len() + 1);
            prop_assert!(validate(&check.full).is_ok());
        }

        #[test]
        fn single_digit_mutation_breaks_checksum(partial in "[0-9]{12,15}", bump in 1u8..10) {
            let full = compute(&partial).unwrap().full;
            let mut bytes = full.into_bytes();
            let last = bytes.len() - 1;
            bytes[last] = b'0' + (bytes[last] - b'0' + bump) % 10;
            let mutated = String::from_utf8(bytes).unwrap();
            prop_assert_eq!(validate(&mutated), Err(LuhnError::Checksum));
        }
    }
}
