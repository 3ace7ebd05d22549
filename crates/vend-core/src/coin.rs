//! # Coin Module
//!
//! The closed set of GBP coins the machine accepts.
//!
//! ## Denomination Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ordinal │  0    1    2    3     4     5     6     7     8              │
//! │  name    │  1p   2p   5p   10p   20p   50p   £1    £2    £5             │
//! │  value   │  1    2    5    10    20    50    100   200   500            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The ordinal is also the position of the coin in the machine's initial
//! quantity vector. Name and value lookups both go through the one table,
//! and both are exact-match only: "15p", "500p", "£1.50" and "" are rejected.
//!
//! ## Usage
//! ```rust
//! use vend_core::coin::Coin;
//!
//! let coin = Coin::from_name("£2").unwrap();
//! assert_eq!(coin.value(), 200);
//! assert_eq!(Coin::from_value(20).unwrap().name(), "20p");
//! assert!(Coin::from_name("15p").is_err());
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};
use crate::money::Pence;

/// Number of distinct denominations.
pub const DENOMINATION_COUNT: usize = 9;

/// (name, value in pence), indexed by ordinal.
const DENOMINATIONS: [(&str, i64); DENOMINATION_COUNT] = [
    ("1p", 1),
    ("2p", 2),
    ("5p", 5),
    ("10p", 10),
    ("20p", 20),
    ("50p", 50),
    ("£1", 100),
    ("£2", 200),
    ("£5", 500),
];

// =============================================================================
// Coin
// =============================================================================

/// One GBP coin.
///
/// Two coins of the same denomination are interchangeable, so the variant
/// is the whole identity. Equality and ordering follow the pence value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Coin {
    OnePenny,
    TwoPence,
    FivePence,
    TenPence,
    TwentyPence,
    FiftyPence,
    OnePound,
    TwoPounds,
    FivePounds,
}

impl Coin {
    /// Every coin, ascending by value (the canonical listing order).
    pub const ALL: [Coin; DENOMINATION_COUNT] = [
        Coin::OnePenny,
        Coin::TwoPence,
        Coin::FivePence,
        Coin::TenPence,
        Coin::TwentyPence,
        Coin::FiftyPence,
        Coin::OnePound,
        Coin::TwoPounds,
        Coin::FivePounds,
    ];

    /// Looks a coin up by its exact display name.
    ///
    /// ## Errors
    /// `CoreError::InvalidDenomination` for anything outside the nine names,
    /// including the empty string. No trimming or case folding happens here.
    pub fn from_name(name: &str) -> CoreResult<Self> {
        DENOMINATIONS
            .iter()
            .position(|(n, _)| *n == name)
            .map(|ordinal| Coin::ALL[ordinal])
            .ok_or_else(|| CoreError::InvalidDenomination {
                input: name.to_string(),
            })
    }

    /// Looks a coin up by its exact value in pence.
    ///
    /// ## Example
    /// ```rust
    /// use vend_core::coin::Coin;
    ///
    /// assert_eq!(Coin::from_value(100).unwrap(), Coin::OnePound);
    /// assert!(Coin::from_value(0).is_err());
    /// assert!(Coin::from_value(-5).is_err());
    /// ```
    pub fn from_value(value: i64) -> CoreResult<Self> {
        DENOMINATIONS
            .iter()
            .position(|(_, v)| *v == value)
            .map(|ordinal| Coin::ALL[ordinal])
            .ok_or_else(|| CoreError::InvalidDenomination {
                input: value.to_string(),
            })
    }

    /// Returns the coin at `ordinal` in the ascending table.
    pub fn from_ordinal(ordinal: usize) -> Option<Self> {
        Coin::ALL.get(ordinal).copied()
    }

    /// Position in the ascending table (0 = 1p, 8 = £5).
    #[inline]
    pub const fn ordinal(&self) -> usize {
        *self as usize
    }

    /// Display name, e.g. `"50p"` or `"£2"`.
    #[inline]
    pub const fn name(&self) -> &'static str {
        DENOMINATIONS[self.ordinal()].0
    }

    /// Value in pence.
    #[inline]
    pub const fn value(&self) -> i64 {
        DENOMINATIONS[self.ordinal()].1
    }

    /// Value as a `Pence` amount.
    #[inline]
    pub const fn amount(&self) -> Pence {
        Pence::new(self.value())
    }

    /// Every coin, largest first (the change-making order).
    pub fn descending() -> impl Iterator<Item = Coin> {
        Coin::ALL.into_iter().rev()
    }
}

impl Ord for Coin {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value().cmp(&other.value())
    }
}

impl PartialOrd for Coin {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Coin {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Coin::from_name(s)
    }
}

impl TryFrom<i64> for Coin {
    type Error = CoreError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Coin::from_value(value)
    }
}

impl TryFrom<String> for Coin {
    type Error = CoreError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        Coin::from_name(&name)
    }
}

impl From<Coin> for String {
    fn from(coin: Coin) -> Self {
        coin.name().to_string()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
