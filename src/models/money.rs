//! Money type for representing currency amounts
//!
//! Amounts are whole currency units stored as i64. Income and expense amounts
//! are never negative, but derived values like "remaining" can be.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Largest amount accepted from user input (just under 10^15)
pub const MAX_UNITS: i64 = 999_999_999_999_999;

/// A monetary amount in whole currency units
///
/// Arithmetic saturates at the `i64` bounds instead of overflowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from whole units
    ///
    /// # Examples
    /// ```
    /// use triad_cli::models::Money;
    /// let income = Money::from_units(5_000_000);
    /// assert_eq!(income.units(), 5_000_000);
    /// ```
    pub const fn from_units(units: i64) -> Self {
        Self(units)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn units(&self) -> i64 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub const fn abs(&self) -> Self {
        Self(self.0.saturating_abs())
    }

    /// Clamp negative amounts to zero
    pub const fn non_negative(&self) -> Self {
        if self.0 < 0 {
            Self(0)
        } else {
            *self
        }
    }

    /// The share of this amount for a percentage, truncated toward zero
    ///
    /// # Examples
    /// ```
    /// use triad_cli::models::Money;
    /// assert_eq!(Money::from_units(5_000_000).percent(30).units(), 1_500_000);
    /// ```
    pub fn percent(&self, percent: i32) -> Self {
        let share = (self.0 as i128) * (percent as i128) / 100;
        Self(share.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }

    /// Parse a money amount from a string
    ///
    /// Accepts an optional leading `-`, an optional currency symbol
    /// (`Rp`, `$`, `€`, `£`) and one kind of digit-group separator (`.` `,`
    /// `_` or space) between groups of three digits:
    /// "5000000", "5.000.000", "Rp 5.000.000", "$1,250", "-300".
    ///
    /// Amounts are whole units. A separator followed by one or two trailing
    /// digits is read as a decimal part and rejected rather than glued onto
    /// the whole number.
    ///
    /// # Examples
    /// ```
    /// use triad_cli::models::{Money, MoneyParseError};
    /// assert_eq!(Money::parse("Rp 1.500").unwrap().units(), 1_500);
    /// assert!(matches!(Money::parse("1.500,50"), Err(MoneyParseError::Fractional(_))));
    /// ```
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let trimmed = s.trim();

        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(stripped) => (true, stripped.trim_start()),
            None => (false, trimmed),
        };

        let rest = ["Rp", "rp", "RP", "$", "€", "£"]
            .iter()
            .find_map(|symbol| rest.strip_prefix(symbol))
            .unwrap_or(rest)
            .trim();

        let groups: Vec<&str> = rest.split(is_group_separator).collect();
        if groups.iter().any(|g| g.is_empty() || !g.chars().all(|c| c.is_ascii_digit())) {
            return Err(MoneyParseError::InvalidFormat(s.to_string()));
        }

        if groups.len() > 1 {
            let last = groups[groups.len() - 1];
            if last.len() <= 2 {
                return Err(MoneyParseError::Fractional(s.to_string()));
            }

            let mut separators = rest.chars().filter(|c| is_group_separator(*c));
            let first_separator = separators.next();
            let mixed = separators.any(|c| Some(c) != first_separator);
            let bad_grouping = groups[0].len() > 3 || groups[1..].iter().any(|g| g.len() != 3);
            if mixed || bad_grouping {
                return Err(MoneyParseError::InvalidFormat(s.to_string()));
            }
        }

        let units: i64 = groups
            .concat()
            .parse()
            .map_err(|_| MoneyParseError::OutOfRange(s.to_string()))?;
        if units > MAX_UNITS {
            return Err(MoneyParseError::OutOfRange(s.to_string()));
        }

        Ok(Self(if negative { -units } else { units }))
    }

    /// Format with a currency symbol, e.g. "Rp 5.000.000"
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let grouped = group_thousands(self.0.unsigned_abs());
        let sign = if self.is_negative() { "-" } else { "" };
        if symbol.is_empty() {
            format!("{}{}", sign, grouped)
        } else {
            format!("{}{} {}", sign, symbol, grouped)
        }
    }
}

fn is_group_separator(c: char) -> bool {
    matches!(c, ',' | '.' | '_' | ' ')
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.format_with_symbol(""))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(self.0.saturating_neg())
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> std::iter::Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
    /// Input carried a decimal part; amounts are whole units
    Fractional(String),
    OutOfRange(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
            Self::Fractional(s) => {
                write!(f, "Amounts are whole units, drop the decimal part: {}", s)
            }
            Self::OutOfRange(s) => write!(f, "Amount out of range: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}
