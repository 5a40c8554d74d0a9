//! # Amount Module
//!
//! Provides the `Amount` type: a signed fixed-point money value with four
//! implied decimal digits.
//!
//! ## Two Scales
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  STORAGE vs PRESENTATION                                                │
//! │                                                                         │
//! │  Internal (storage) scale: 10^-4   120001 → 12.0001                     │
//! │  External (presentation):  10^-2   cents, after bank_round()            │
//! │                                                                         │
//! │  Percentages and splits keep sub-cent digits until the value is         │
//! │  reported, then collapse to cents with round-half-to-even.              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Canonical Text
//! ```text
//!   0          → "0"
//!   125000     → "12.50"     (last two internal digits are zero)
//!   120001     → "12.0001"   (sub-cent precision present)
//!  -5000       → "-0.50"
//! ```
//!
//! ## Usage
//! ```rust
//! use gmfin_core::amount::Amount;
//!
//! let price: Amount = "12.50".parse().unwrap();
//! let fee = price.percent("2.5".parse().unwrap()); // 0.3125
//! assert_eq!(fee.to_string(), "0.3125");
//! assert_eq!(fee.in_cents(), 31);
//! assert_eq!((price + fee).to_string(), "12.8125");
//! ```
//!
//! ## Overflow
//! Addition and subtraction use native `i64` arithmetic. Staying inside the
//! `i64` range (about ±922 trillion units) is the caller's responsibility.

use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::value::RawValue;

use crate::error::AmountError;
use crate::storage::StoredText;

/// Internal units per whole currency unit.
pub const SCALE: i64 = 10_000;

/// Internal units per cent.
const CENT: i64 = 100;

/// Digits kept after the separator when parsing.
const FRACTION_DIGITS: usize = 4;

/// A percentage times an amount, both at internal scale, lands at 10^-10.
const PERCENT_DIVISOR: i128 = 1_000_000;

// =============================================================================
// Amount Type
// =============================================================================

/// Money value counting ten-thousandths of a currency unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: refunds and corrections are negative amounts
/// - **Single field tuple struct**: zero-cost wrapper, `Copy`, freely shared
/// - **Custom serde**: written as a bare JSON number with exact digits
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Wraps an internal (10^-4 scaled) value.
    ///
    /// ```rust
    /// use gmfin_core::amount::Amount;
    ///
    /// assert_eq!(Amount::from_raw(120001).to_string(), "12.0001");
    /// ```
    #[inline]
    pub const fn from_raw(raw: i64) -> Self {
        Amount(raw)
    }

    /// Returns the internal (10^-4 scaled) value.
    #[inline]
    pub const fn raw(&self) -> i64 {
        self.0
    }

    /// Creates an amount from whole cents.
    ///
    /// ```rust
    /// use gmfin_core::amount::Amount;
    ///
    /// let price = Amount::from_cents(1099);
    /// assert_eq!(price.raw(), 109_900);
    /// assert_eq!(price.to_string(), "10.99");
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Amount(cents * CENT)
    }

    /// Rounds to cents (see [`Amount::bank_round`]) and returns the cent count.
    #[inline]
    pub const fn in_cents(&self) -> i64 {
        self.bank_round().0 / CENT
    }

    /// Whole units, truncated toward zero.
    #[inline]
    pub const fn integer_part(&self) -> i64 {
        self.0 / SCALE
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    #[inline]
    pub const fn abs(&self) -> Self {
        Amount(self.0.abs())
    }

    /// Applies a percentage expressed at internal scale.
    ///
    /// `rate` of `8.25` (raw `82500`) means 8.25%. The product is divided by
    /// 10^6 to come back to internal scale. Integer division truncates toward
    /// zero; no rounding happens here.
    ///
    /// ```rust
    /// use gmfin_core::amount::Amount;
    ///
    /// let subtotal = Amount::from_cents(10_000); // 100.00
    /// let tax = subtotal.percent("8.25".parse().unwrap());
    /// assert_eq!(tax.to_string(), "8.25");
    /// ```
    pub fn percent(&self, rate: Amount) -> Amount {
        // i128 keeps the intermediate product from wrapping
        let scaled = rate.0 as i128 * self.0 as i128 / PERCENT_DIVISOR;
        Amount(scaled as i64)
    }

    /// Collapses the four internal digits to cents, round half to even.
    ///
    /// ## Two Cascaded Stages
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  12.0350  →  cents = 1203, tens = 5, units = 0                      │
    /// │                                                                     │
    /// │  stage 1: units rounds into tens                                    │
    /// │           up when units > 5, or units == 5 and tens is odd          │
    /// │           0 → tens stays 5                                          │
    /// │                                                                     │
    /// │  stage 2: tens rounds into cents, same rule                         │
    /// │           tens == 5 and cents (1203) is odd → 1204                  │
    /// │                                                                     │
    /// │  result: 12.04   (12.0250 gives 12.02: cents 1202 is even)          │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    /// Rounding works on the magnitude; the sign is re-applied at the end.
    /// The result keeps internal scale with the last two digits at `00`.
    pub const fn bank_round(&self) -> Amount {
        let abs = self.0.unsigned_abs();
        let mut cents = abs / CENT as u64;
        let mut tens = abs % 100 / 10;
        let units = abs % 10;

        tens += round_delta(units, tens % 2 == 1);
        cents += round_delta(tens, cents % 2 == 1);

        let cents = cents as i64;
        if self.0 < 0 {
            Amount(-cents * CENT)
        } else {
            Amount(cents * CENT)
        }
    }

    /// Fixed four-digit text, e.g. `"12.5000"`, `"0.0000"`, `"-0.0001"`.
    ///
    /// This is the shape a `numeric(20,4)` column hands back, and the shape
    /// [`StoredText::decode_stored`] expects once it removes the separator.
    pub fn to_scaled_text(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let scale = SCALE as u64;
        format!("{sign}{}.{:04}", abs / scale, abs % scale)
    }

    /// Updates the amount from a raw JSON token.
    ///
    /// A literal `null` leaves the value unchanged. Number tokens and quoted
    /// strings both go through the same normalize-then-parse path as
    /// [`FromStr`].
    ///
    /// ```rust
    /// use gmfin_core::amount::Amount;
    ///
    /// let mut amount = Amount::from_cents(500);
    /// amount.unmarshal_json("null").unwrap();
    /// assert_eq!(amount, Amount::from_cents(500));
    ///
    /// amount.unmarshal_json("\"7,5\"").unwrap();
    /// assert_eq!(amount.to_string(), "7.50");
    /// ```
    pub fn unmarshal_json(&mut self, raw: &str) -> Result<(), AmountError> {
        let raw = raw.trim();
        if raw == "null" {
            return Ok(());
        }
        let text = raw
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .unwrap_or(raw);
        *self = text.parse()?;
        Ok(())
    }
}

const fn round_delta(digit: u64, odd: bool) -> u64 {
    if digit > 5 || (digit == 5 && odd) {
        1
    } else {
        0
    }
}

/// Rewrites amount text into a plain integer at internal scale.
///
/// `,` counts as the separator. The fraction is right-padded with `0` or
/// truncated to four digits; no separator means four zero digits are appended.
fn normalize(text: &str) -> String {
    let text = text.replacen(',', ".", 1);
    match text.find('.') {
        None => format!("{text}0000"),
        Some(idx) => {
            let fraction: String = text[idx + 1..].chars().take(FRACTION_DIGITS).collect();
            format!("{}{:0<width$}", &text[..idx], fraction, width = FRACTION_DIGITS)
        }
    }
}

fn parse_scaled(input: &str, digits: &str) -> Result<Amount, AmountError> {
    digits
        .parse::<i64>()
        .map(Amount)
        .map_err(|source| AmountError::Parse {
            input: input.to_string(),
            source,
        })
}

// =============================================================================
// Text Conversions
// =============================================================================

/// Canonical text rendering.
impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return f.write_str("0");
        }
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let scale = SCALE as u64;
        let (whole, fraction) = (abs / scale, abs % scale);
        if abs % CENT as u64 > 0 {
            write!(f, "{sign}{whole}.{fraction:04}")
        } else {
            write!(f, "{sign}{whole}.{:02}", fraction / CENT as u64)
        }
    }
}

/// Normalize-then-parse.
///
/// ```rust
/// use gmfin_core::amount::Amount;
///
/// assert_eq!("12.00".parse::<Amount>().unwrap().raw(), 120_000);
/// assert_eq!("12,0001".parse::<Amount>().unwrap().raw(), 120_001);
/// assert_eq!("12.123456".parse::<Amount>().unwrap().raw(), 121_234);
/// assert!("twelve".parse::<Amount>().is_err());
/// ```
impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AmountError::Empty);
        }
        parse_scaled(s, &normalize(s))
    }
}

/// Stored form: the separator is dropped and the digits are read as an
/// integer at internal scale. NULL reads as `"0"`.
impl StoredText for Amount {
    type Error = AmountError;

    fn decode_stored(text: Option<&str>) -> Result<Self, Self::Error> {
        let text = text.unwrap_or("0").trim();
        parse_scaled(text, &text.replacen('.', "", 1))
    }

    fn encode_stored(&self) -> String {
        self.to_string()
    }
}

// =============================================================================
// JSON
// =============================================================================

/// Writes a bare number token with the canonical digits (`12.50`, not `12.5`).
impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let raw = RawValue::from_string(self.to_string()).map_err(S::Error::custom)?;
        raw.serialize(serializer)
    }
}

/// Reads number tokens or quoted strings; `null` becomes zero.
impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        let mut amount = Amount::ZERO;
        amount.unmarshal_json(raw.get()).map_err(D::Error::custom)?;
        Ok(amount)
    }
}

// =============================================================================
// Arithmetic
// =============================================================================

impl Add for Amount {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Amount(self.0 + other.0)
    }
}

impl AddAssign for Amount {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Amount {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Amount(self.0 - other.0)
    }
}

impl SubAssign for Amount {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Amount {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Amount(-self.0)
    }
}

impl std::iter::Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
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
    fn test_from_cents() {
        let amount = Amount::from_cents(1099);
        assert_eq!(amount.raw(), 109_900);
        assert_eq!(amount.in_cents(), 1099);
        assert_eq!(amount.integer_part(), 10);

        let refund = Amount::from_cents(-550);
        assert_eq!(refund.raw(), -55_000);
        assert_eq!(refund.in_cents(), -550);
        assert_eq!(refund.integer_part(), -5);
    }

    #[test]
    fn test_display() {
        let cases = [
            (0, "0"),
            (120_000, "12.00"),
            (120_001, "12.0001"),
            (120_010, "12.0010"),
            (125_000, "12.50"),
            (-125_000, "-12.50"),
            (5_000, "0.50"),
            (-1, "-0.0001"),
            (100, "0.01"),
        ];
        for (raw, expected) in cases {
            assert_eq!(Amount::from_raw(raw).to_string(), expected, "raw {raw}");
        }
    }

    #[test]
    fn test_display_extremes() {
        assert_eq!(Amount::from_raw(i64::MAX).to_string(), "922337203685477.5807");
        assert_eq!(Amount::from_raw(i64::MIN).to_string(), "-922337203685477.5808");
    }

    #[test]
    fn test_parse() {
        let cases = [
            ("12.00", 120_000),
            ("12.0001", 120_001),
            ("12,5", 125_000),
            ("12", 120_000),
            ("12.", 120_000),
            ("12.123456", 121_234),
            ("-0.5", -5_000),
            (".5", 5_000),
            ("0", 0),
            ("-12.50", -125_000),
        ];
        for (text, raw) in cases {
            assert_eq!(text.parse::<Amount>().unwrap().raw(), raw, "text {text:?}");
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!("abc".parse::<Amount>(), Err(AmountError::Parse { .. })));
        assert!(matches!("1.2.3".parse::<Amount>(), Err(AmountError::Parse { .. })));
        assert!(matches!("12a.00".parse::<Amount>(), Err(AmountError::Parse { .. })));
        assert_eq!("".parse::<Amount>(), Err(AmountError::Empty));
        assert_eq!("   ".parse::<Amount>(), Err(AmountError::Empty));
    }

    #[test]
    fn test_bank_round_half_even() {
        // (raw, rounded raw)
        let cases = [
            (120_250, 120_200), // 12.0250 → 12.02, cents even
            (120_350, 120_400), // 12.0350 → 12.04, cents odd
            (120_060, 120_100),
            (120_049, 120_000), // units 9 lifts tens to 5, cents even
            (120_149, 120_200), // same, cents odd
            (120_051, 120_000), // units 1 never rounds
            (120_056, 120_100), // tens 5 → 6
            (120_045, 120_000), // tens even, units 5 stays
            (120_155, 120_200), // tens odd, units 5 → tens 6
            (99, 100),
            (5, 0),
            (0, 0),
            (-120_350, -120_400),
            (-120_250, -120_200),
        ];
        for (raw, rounded) in cases {
            assert_eq!(Amount::from_raw(raw).bank_round().raw(), rounded, "raw {raw}");
        }
    }

    #[test]
    fn test_in_cents_rounds() {
        assert_eq!(Amount::from_raw(120_350).in_cents(), 1204);
        assert_eq!(Amount::from_raw(120_250).in_cents(), 1202);
        assert_eq!(Amount::from_raw(-120_350).in_cents(), -1204);
    }

    #[test]
    fn test_percent_truncates() {
        let hundred = Amount::from_cents(10_000);
        assert_eq!(hundred.percent("8.25".parse().unwrap()).raw(), 82_500);

        let odd = Amount::from_raw(123_456); // 12.3456
        let ten = Amount::from_raw(100_000); // 10%
        assert_eq!(odd.percent(ten).raw(), 12_345);
        assert_eq!((-odd).percent(ten).raw(), -12_345);
    }

    #[test]
    fn test_arithmetic() {
        let a = Amount::from_cents(1000);
        let b = Amount::from_raw(5_001);

        assert_eq!((a + b).raw(), 105_001);
        assert_eq!((a - b).raw(), 94_999);
        assert_eq!((-a).raw(), -100_000);

        let mut c = a;
        c += b;
        c -= a;
        assert_eq!(c, b);

        let total: Amount = [a, b, -b].into_iter().sum();
        assert_eq!(total, a);
    }

    #[test]
    fn test_unmarshal_null_keeps_value() {
        let mut amount = Amount::from_raw(42);
        amount.unmarshal_json("null").unwrap();
        assert_eq!(amount.raw(), 42);

        amount.unmarshal_json("3.1").unwrap();
        assert_eq!(amount.raw(), 31_000);

        assert!(amount.unmarshal_json("\"x\"").is_err());
        assert_eq!(amount.raw(), 31_000);
    }

    #[test]
    fn test_json() {
        let amount = Amount::from_raw(125_000);
        assert_eq!(serde_json::to_string(&amount).unwrap(), "12.50");
        assert_eq!(serde_json::to_string(&Amount::ZERO).unwrap(), "0");
        assert_eq!(serde_json::to_string(&vec![Amount::from_raw(1)]).unwrap(), "[0.0001]");

        let parsed: Amount = serde_json::from_str("12.0001").unwrap();
        assert_eq!(parsed.raw(), 120_001);
        let parsed: Amount = serde_json::from_str("\"12,25\"").unwrap();
        assert_eq!(parsed.raw(), 122_500);
        let parsed: Amount = serde_json::from_str("null").unwrap();
        assert_eq!(parsed, Amount::ZERO);
        assert!(serde_json::from_str::<Amount>("true").is_err());
    }

    #[test]
    fn test_stored_text() {
        assert_eq!(Amount::decode_stored(Some("12.5000")).unwrap().raw(), 125_000);
        assert_eq!(Amount::decode_stored(Some("-0.0001")).unwrap().raw(), -1);
        assert_eq!(Amount::decode_stored(Some("125000")).unwrap().raw(), 125_000);
        assert_eq!(Amount::decode_stored(None).unwrap(), Amount::ZERO);
        assert!(Amount::decode_stored(Some("1.2.3")).is_err());

        assert_eq!(Amount::from_raw(125_000).encode_stored(), "12.50");
    }

    #[test]
    fn test_scaled_text_feeds_stored_decode() {
        for raw in [0, 1, -1, 125_000, -120_001, i64::MAX, i64::MIN] {
            let amount = Amount::from_raw(raw);
            let text = amount.to_scaled_text();
            assert_eq!(Amount::decode_stored(Some(&text)).unwrap(), amount, "{text}");
        }
        assert_eq!(Amount::ZERO.to_scaled_text(), "0.0000");
        assert_eq!(Amount::from_raw(125_000).to_scaled_text(), "12.5000");
    }

    proptest! {
        #[test]
        fn canonical_text_round_trips(raw in any::<i64>()) {
            let text = Amount::from_raw(raw).to_string();
            let parsed: Amount = text.parse().unwrap();
            prop_assert_eq!(parsed.raw(), raw);
            prop_assert_eq!(parsed.to_string(), text);
        }

        #[test]
        fn integral_cents_survive_rounding(cents in -(i64::MAX / 100)..(i64::MAX / 100)) {
            prop_assert_eq!(Amount::from_cents(cents).in_cents(), cents);
        }

        #[test]
        fn add_then_sub_is_identity(
            a in -(1i64 << 61)..(1i64 << 61),
            b in -(1i64 << 61)..(1i64 << 61),
        ) {
            let (a, b) = (Amount::from_raw(a), Amount::from_raw(b));
            prop_assert_eq!(a + b - b, a);
        }

        #[test]
        fn bank_round_stays_within_half_cent(raw in -(1i64 << 60)..(1i64 << 60)) {
            let amount = Amount::from_raw(raw);
            let rounded = amount.bank_round();
            prop_assert_eq!(rounded.raw() % 100, 0);
            prop_assert!((rounded.raw() - raw).abs() <= 100);
        }
    }
}
