//! # Money Module
//!
//! Provides the `Money` type for unit prices, stock values and totals.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Northwind stores UnitPrice as a decimal column.                        │
//! │  As f64:  0.1 + 0.2 = 0.30000000000000004  ❌                            │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    UnitPrice 18.00  →  1800 cents                                       │
//! │    SUM(UnitPrice)   →  exact integer sum                                │
//! │    Display          →  "$18.00"                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use northwind_core::money::Money;
//!
//! let price = Money::from_cents(1800); // $18.00
//! let stock_value = price.checked_mul(39); // $702.00
//! assert_eq!(stock_value.map(|m| m.to_string()).as_deref(), Some("$702.00"));
//!
//! let threshold: Money = "$10".parse().unwrap();
//! assert_eq!(threshold.cents(), 1000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;
use std::str::FromStr;

use crate::error::CoreError;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in cents.
///
/// ## Design Decisions
/// - **i64 (signed)**: arithmetic stays closed under subtraction; prices
///   themselves are kept non-negative by validation
/// - **Single field tuple struct**: Zero-cost abstraction over i64
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use northwind_core::money::Money;
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

    /// Returns the dollar portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cents portion (always 0-99).
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

    /// Multiplies by a stock quantity. `None` on `i64` overflow.
    ///
    /// ## Example
    /// ```rust
    /// use northwind_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(1950); // $19.50
    /// assert_eq!(unit_price.checked_mul(2), Some(Money::from_cents(3900)));
    /// assert_eq!(Money::from_cents(i64::MAX).checked_mul(2), None);
    /// ```
    #[inline]
    pub const fn checked_mul(self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Two decimal places with a leading currency symbol: `$10.50`, `-$5.50`.
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

/// Parses decimal amounts as typed by a user.
///
/// Accepts an optional leading `$`, an optional `-`, and at most two
/// fraction digits: `10`, `10.5`, `$0.50`, `-3.25`.
impl FromStr for Money {
    type Err = CoreError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let rest = rest.strip_prefix('$').unwrap_or(rest);

        let (whole, fraction) = match rest.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (rest, ""),
        };

        if whole.is_empty() && fraction.is_empty() {
            return Err(CoreError::invalid_money(input, "empty amount"));
        }
        if fraction.len() > 2 {
            return Err(CoreError::invalid_money(input, "at most two decimal places"));
        }
        if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
            return Err(CoreError::invalid_money(input, "not a decimal number"));
        }

        let dollars: i64 = if whole.is_empty() {
            0
        } else {
            whole
                .parse()
                .map_err(|_| CoreError::invalid_money(input, "amount too large"))?
        };
        let cents: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().unwrap_or(0) * 10,
            _ => fraction.parse::<i64>().unwrap_or(0),
        };

        let total = dollars
            .checked_mul(100)
            .and_then(|c| c.checked_add(cents))
            .ok_or_else(|| CoreError::invalid_money(input, "amount too large"))?;

        Ok(Money(if negative { -total } else { total }))
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

// =============================================================================
// Unit Tests
// =============================================================================
