//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Summing a month of sales as floats:                                    │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Every price, total and profit is an exact count of cents.            │
//! │    The only division in the system (the running average) rounds        │
//! │    once, at the very end.                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stockbook_core::money::Money;
//!
//! let price: Money = "10.99".parse().unwrap();
//! assert_eq!(price.cents(), 1099);
//!
//! let total = price * 2_i64 + Money::from_cents(500);
//! assert_eq!(total.to_decimal_string(), "26.98");
//! ```

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in cents.
///
/// ## Design Decisions
/// - **i64 (signed)**: profit can be negative even though prices cannot
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Serialized as a decimal string** (`"10.99"`), read back through `FromStr`
///
/// ## Where Money is Used
/// ```text
/// Item.rate ──┬──► Sale.item_cost (snapshot, cost floor)
///             │
/// Item.taxes ─┴──► Sale.rate_with_tax ──► profit = sold_price − rate_with_tax × qty
///
/// Item.mrp ──► suggested sold_price = mrp × qty
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use stockbook_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents 10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// For negative amounts only the major unit carries the sign:
    /// `from_major_minor(-5, 50)` is -5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Addition that reports overflow instead of wrapping.
    #[inline]
    pub const fn checked_add(self, other: Money) -> Option<Money> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Money(v)),
            None => None,
        }
    }

    /// Subtraction that reports overflow instead of wrapping.
    #[inline]
    pub const fn checked_sub(self, other: Money) -> Option<Money> {
        match self.0.checked_sub(other.0) {
            Some(v) => Some(Money(v)),
            None => None,
        }
    }

    /// Multiplies by a quantity, reporting overflow.
    ///
    /// ## Example
    /// ```rust
    /// use stockbook_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.checked_mul_quantity(3), Some(Money::from_cents(897)));
    /// assert_eq!(Money::from_cents(i64::MAX).checked_mul_quantity(2), None);
    /// ```
    #[inline]
    pub const fn checked_mul_quantity(self, qty: i64) -> Option<Money> {
        match self.0.checked_mul(qty) {
            Some(v) => Some(Money(v)),
            None => None,
        }
    }

    /// Divides by a count, rounding half away from zero.
    ///
    /// Returns `None` when `count` is zero.
    ///
    /// ## Example
    /// ```rust
    /// use stockbook_core::money::Money;
    ///
    /// // 10.00 / 3 = 3.333.. → 3.33
    /// assert_eq!(Money::from_cents(1000).div_rounded(3), Some(Money::from_cents(333)));
    /// // 0.05 / 2 = 0.025 → 0.03
    /// assert_eq!(Money::from_cents(5).div_rounded(2), Some(Money::from_cents(3)));
    /// assert_eq!(Money::from_cents(5).div_rounded(0), None);
    /// ```
    pub fn div_rounded(self, count: u64) -> Option<Money> {
        if count == 0 {
            return None;
        }
        // i128 keeps 2 * cents from overflowing
        let n = count as i128;
        let v = self.0 as i128;
        let rounded = if v >= 0 {
            (2 * v + n) / (2 * n)
        } else {
            -((-2 * v + n) / (2 * n))
        };
        Some(Money(rounded as i64))
    }

    /// Formats the amount with exactly two decimals and no currency symbol.
    ///
    /// ## Example
    /// ```rust
    /// use stockbook_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1050).to_decimal_string(), "10.50");
    /// assert_eq!(Money::from_cents(-307).to_decimal_string(), "-3.07");
    /// assert_eq!(Money::from_cents(-7).to_decimal_string(), "-0.07");
    /// ```
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.dollars().abs(), self.cents_part())
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Why a string could not be read as an amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseMoneyError {
    Empty,
    InvalidCharacter,
    TooManyDecimals,
    Overflow,
}

impl fmt::Display for ParseMoneyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ParseMoneyError::Empty => "empty amount",
            ParseMoneyError::InvalidCharacter => "not a decimal number",
            ParseMoneyError::TooManyDecimals => "more than 2 decimal places",
            ParseMoneyError::Overflow => "amount out of range",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for ParseMoneyError {}

/// Parses `12`, `12.5`, `12.50`, `-3.07`, `.75`.
///
/// Exponents, thousands separators and more than two fractional digits are
/// rejected rather than rounded.
impl FromStr for Money {
    type Err = ParseMoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseMoneyError::Empty);
        }

        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };

        let (major, minor) = match digits.split_once('.') {
            Some((major, minor)) => (major, minor),
            None => (digits, ""),
        };

        if major.is_empty() && minor.is_empty() {
            return Err(ParseMoneyError::InvalidCharacter);
        }
        if !major.chars().all(|c| c.is_ascii_digit()) || !minor.chars().all(|c| c.is_ascii_digit())
        {
            return Err(ParseMoneyError::InvalidCharacter);
        }
        if minor.len() > 2 {
            return Err(ParseMoneyError::TooManyDecimals);
        }

        let major_value: i64 = if major.is_empty() {
            0
        } else {
            major.parse().map_err(|_| ParseMoneyError::Overflow)?
        };
        let minor_value: i64 = match minor.len() {
            0 => 0,
            1 => minor.parse::<i64>().map_err(|_| ParseMoneyError::InvalidCharacter)? * 10,
            _ => minor.parse().map_err(|_| ParseMoneyError::InvalidCharacter)?,
        };

        let cents = major_value
            .checked_mul(100)
            .and_then(|c| c.checked_add(minor_value))
            .ok_or(ParseMoneyError::Overflow)?;

        Ok(Money(if negative { -cents } else { cents }))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Human-readable form with a currency symbol, e.g. `$10.99`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_decimal_string())
    }
}

/// Accepts the serialized form, `"10.99"`.
impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn test_decimal_string() {
        assert_eq!(Money::zero().to_decimal_string(), "0.00");
        assert_eq!(Money::from_cents(7500).to_decimal_string(), "75.00");
        assert_eq!(Money::from_cents(-50).to_decimal_string(), "-0.50");
    }

    #[test]
    fn test_parse() {
        assert_eq!("12".parse::<Money>(), Ok(Money::from_cents(1200)));
        assert_eq!("12.5".parse::<Money>(), Ok(Money::from_cents(1250)));
        assert_eq!(" 12.05 ".parse::<Money>(), Ok(Money::from_cents(1205)));
        assert_eq!(".75".parse::<Money>(), Ok(Money::from_cents(75)));
        assert_eq!("3.".parse::<Money>(), Ok(Money::from_cents(300)));
        assert_eq!("-3.07".parse::<Money>(), Ok(Money::from_cents(-307)));
        assert_eq!("+1".parse::<Money>(), Ok(Money::from_cents(100)));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!("".parse::<Money>(), Err(ParseMoneyError::Empty));
        assert_eq!("abc".parse::<Money>(), Err(ParseMoneyError::InvalidCharacter));
        assert_eq!(".".parse::<Money>(), Err(ParseMoneyError::InvalidCharacter));
        assert_eq!("1e3".parse::<Money>(), Err(ParseMoneyError::InvalidCharacter));
        assert_eq!("1,000".parse::<Money>(), Err(ParseMoneyError::InvalidCharacter));
        assert_eq!("1.005".parse::<Money>(), Err(ParseMoneyError::TooManyDecimals));
        assert_eq!(
            "99999999999999999999".parse::<Money>(),
            Err(ParseMoneyError::Overflow)
        );
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3_i64).cents(), 3000);
        assert_eq!(a.checked_sub(b), Some(Money::from_cents(500)));
        assert_eq!(Money::from_cents(i64::MIN).checked_sub(b), None);
    }

    #[test]
    fn test_sum() {
        let amounts = [Money::from_cents(10), Money::from_cents(20), Money::from_cents(-5)];
        let total: Money = amounts.iter().sum();
        assert_eq!(total.cents(), 25);
    }

    #[test]
    fn test_div_rounded_negative_half_rounds_away_from_zero() {
        assert_eq!(Money::from_cents(-5).div_rounded(2), Some(Money::from_cents(-3)));
        assert_eq!(Money::from_cents(-4).div_rounded(3), Some(Money::from_cents(-1)));
    }

    #[test]
    fn test_serde_decimal_string() {
        let json = serde_json::to_string(&Money::from_cents(15000)).unwrap();
        assert_eq!(json, "\"150.00\"");
        assert_eq!(serde_json::to_string(&Money::from_cents(-7)).unwrap(), "\"-0.07\"");

        let back: Money = serde_json::from_str("\"12.5\"").unwrap();
        assert_eq!(back, Money::from_cents(1250));
        assert!(serde_json::from_str::<Money>("\"1.005\"").is_err());
        assert!(serde_json::from_str::<Money>("1250").is_err());
    }

    /// Repeated aggregation of cents never drifts.
    #[test]
    fn test_no_drift_over_many_additions() {
        let dime = Money::from_cents(10);
        let total: Money = std::iter::repeat(dime).take(10_000).sum();
        assert_eq!(total.to_decimal_string(), "1000.00");
    }
}
