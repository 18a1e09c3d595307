//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Summing a shift's sales as floats:                                     │
//! │    150.00 + 80.50 + 19.99 = 250.49000000000001  ❌                      │
//! │                                                                         │
//! │  Over dozens of sales the drift shows up as a phantom cent in the      │
//! │  arqueo report ("difference: -$0.01") when the drawer is exact.        │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    15000 + 8050 + 1999 = 25049 cents, always                           │
//! │    Rounding happens ONCE, when user input is parsed                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use arqueo_core::money::{to_money, Money};
//!
//! // Create from cents (preferred)
//! let price = Money::from_cents(1099); // $10.99
//!
//! // Parse what the cashier typed (rounds half-up to cents)
//! let counted = to_money("670.00", "counted_cash").unwrap();
//! assert_eq!(counted.cents(), 67000);
//!
//! // Arithmetic operations
//! let total = price + Money::from_cents(500); // $15.99
//! assert_eq!(total.cents(), 1599);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::validation::validate_amount;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: Reconciliation differences can be negative (shortage)
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Serde**: Serializes as an integer cent count, never as a float
///
/// ## Where Money Flows
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Shift.initial_cash ───────────────────────┐                            │
/// │                                            ├──► expected_cash           │
/// │  Transaction.total ──► aggregate ──► cash_sales                         │
/// │                                            │                            │
/// │  counted_cash (typed at close) ────────────┴──► difference (signed)     │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use arqueo_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
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

    /// Adds, clamping at the `i64` bounds instead of overflowing.
    #[inline]
    pub const fn saturating_add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }

    /// Subtracts, clamping at the `i64` bounds instead of overflowing.
    #[inline]
    pub const fn saturating_sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }

    /// Multiplies a unit price by a quantity.
    ///
    /// Returns `None` on overflow so a corrupt quantity cannot wrap around
    /// into a plausible-looking total.
    ///
    /// ## Example
    /// ```rust
    /// use arqueo_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299); // $2.99
    /// assert_eq!(unit_price.multiply_quantity(3), Some(Money::from_cents(897)));
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Parses an exact decimal string into Money.
    ///
    /// ## Rules
    /// - Optional leading `+` or `-`, surrounding whitespace is ignored
    /// - At most one `.`; digits only otherwise (`"12"`, `"12.5"`, `".50"`)
    /// - More than two decimals are rounded half-up on the magnitude:
    ///   `"10.005"` → 1001 cents, `"-0.005"` → -1 cent
    ///
    /// ## Example
    /// ```rust
    /// use arqueo_core::money::Money;
    ///
    /// assert_eq!(Money::parse_decimal("19.99").unwrap().cents(), 1999);
    /// assert_eq!(Money::parse_decimal("10.005").unwrap().cents(), 1001);
    /// assert!(Money::parse_decimal("12,50").is_err());
    /// ```
    pub fn parse_decimal(raw: &str) -> CoreResult<Money> {
        let trimmed = raw.trim();
        let (negative, unsigned) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };

        let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));

        if whole.is_empty() && fraction.is_empty() {
            return Err(CoreError::invalid_amount("amount", format!("'{raw}' is not a number")));
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CoreError::invalid_amount("amount", format!("'{raw}' is not a number")));
        }

        let overflow = || CoreError::invalid_amount("amount", format!("'{raw}' is too large"));

        let whole_units: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| overflow())?
        };

        let digits = fraction.as_bytes();
        let digit = |i: usize| digits.get(i).map_or(0, |b| i64::from(b - b'0'));
        let minor = digit(0) * 10 + digit(1);
        let round_up = digits.get(2).is_some_and(|b| *b >= b'5');

        let magnitude = whole_units
            .checked_mul(100)
            .and_then(|cents| cents.checked_add(minor))
            .and_then(|cents| cents.checked_add(i64::from(round_up)))
            .ok_or_else(overflow)?;

        Ok(Money(if negative { -magnitude } else { magnitude }))
    }

    /// Converts a float into Money through its shortest decimal form.
    ///
    /// `1.005_f64` is really `1.00499999…`; going through the decimal text
    /// `"1.005"` makes it round to 101 cents the way the cashier expects.
    ///
    /// ## Errors
    /// `InvalidAmount` for NaN and infinities.
    pub fn try_from_f64(value: f64) -> CoreResult<Money> {
        if !value.is_finite() {
            return Err(CoreError::invalid_amount("amount", "must be a finite number"));
        }
        Money::parse_decimal(&value.to_string())
    }

    /// Formats as an exact decimal string without currency symbol (`"-0.01"`).
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

// =============================================================================
// Raw Input
// =============================================================================

/// An untrusted monetary input as it arrives from a form or an API payload.
#[derive(Debug, Clone, PartialEq)]
pub enum RawAmount {
    /// A JavaScript-style number (`150.5`).
    Number(f64),
    /// Decimal text typed by the user (`"150.50"`).
    Text(String),
    /// An integer cent count from the backend.
    Cents(i64),
}

impl From<f64> for RawAmount {
    fn from(value: f64) -> Self {
        RawAmount::Number(value)
    }
}

impl From<&str> for RawAmount {
    fn from(value: &str) -> Self {
        RawAmount::Text(value.to_string())
    }
}

impl From<String> for RawAmount {
    fn from(value: String) -> Self {
        RawAmount::Text(value)
    }
}

/// Validates and converts a non-negative monetary input.
///
/// Used for every amount where a negative value makes no sense: the
/// opening float, the counted cash and unit prices.
///
/// ## Errors
/// `InvalidAmount` naming `field` when the input is unparseable, not
/// finite, negative, or above `MAX_AMOUNT_CENTS`.
///
/// ## Example
/// ```rust
/// use arqueo_core::money::{to_money, RawAmount};
///
/// assert_eq!(to_money(500.0, "initial_cash").unwrap().cents(), 50000);
/// assert_eq!(to_money(RawAmount::Cents(1999), "unit_price").unwrap().cents(), 1999);
/// assert!(to_money("-0.01", "counted_cash").is_err());
/// ```
pub fn to_money(raw: impl Into<RawAmount>, field: &str) -> CoreResult<Money> {
    let parsed = match raw.into() {
        RawAmount::Number(value) => Money::try_from_f64(value),
        RawAmount::Text(text) => Money::parse_decimal(&text),
        RawAmount::Cents(cents) => Ok(Money::from_cents(cents)),
    }
    .map_err(|err| err.with_field(field))?;

    validate_amount(parsed, field)?;
    Ok(parsed)
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug/log formatting. The UI formats for display with its own locale.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, self.major().abs(), self.minor())
    }
}

impl FromStr for Money {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::parse_decimal(s)
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

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Decimal String Wire Format
// =============================================================================

/// Serde adapter that writes Money as an exact decimal string (`"12.34"`).
///
/// Reading accepts either a decimal string or an integer cent count, so
/// payloads from older clients that still send cents keep working.
///
/// ```rust
/// use arqueo_core::money::Money;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct CloseRequest {
///     #[serde(with = "arqueo_core::money::decimal_string")]
///     counted_cash: Money,
/// }
/// ```
pub mod decimal_string {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::Money;

    pub fn serialize<S>(value: &Money, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_decimal_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Money, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum MoneyInput {
            Decimal(String),
            Cents(i64),
        }

        match MoneyInput::deserialize(deserializer)? {
            MoneyInput::Decimal(raw) => Money::parse_decimal(&raw).map_err(D::Error::custom),
            MoneyInput::Cents(cents) => Ok(Money::from_cents(cents)),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
