//! # Money Module
//!
//! Provides the `Pence` type for handling sterling amounts safely.
//!
//! ## Why Integer Pence?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A change machine that is 1p out can never make exact change.          │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Pence                                            │
//! │    £7.19 is stored as 719 and only formatted as pounds for display     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use vend_core::money::Pence;
//!
//! let price = Pence::new(719);
//! assert_eq!(price.to_string(), "£7.19");
//!
//! let total = price + Pence::new(81);
//! assert_eq!(total.value(), 800);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};

// =============================================================================
// Pence Type
// =============================================================================

/// A sterling amount in pence (the smallest currency unit).
///
/// ## Design Decisions
/// - **i64 (signed)**: change requests arrive as raw integers and may be
///   negative; the engine rejects those, but the type can carry them
/// - **Single field tuple struct**: zero-cost abstraction over i64
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pence(i64);

impl Pence {
    /// Creates an amount from pence.
    #[inline]
    pub const fn new(pence: i64) -> Self {
        Pence(pence)
    }

    /// Returns the raw value in pence.
    #[inline]
    pub const fn value(&self) -> i64 {
        self.0
    }

    /// Returns the whole-pound portion.
    ///
    /// ## Example
    /// ```rust
    /// use vend_core::money::Pence;
    ///
    /// assert_eq!(Pence::new(719).pounds(), 7);
    /// assert_eq!(Pence::new(-550).pounds(), -5);
    /// ```
    #[inline]
    pub const fn pounds(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the pence portion (always 0-99).
    #[inline]
    pub const fn pence_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero pence.
    #[inline]
    pub const fn zero() -> Self {
        Pence(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies by a coin count, or `None` if the product does not fit.
    ///
    /// ## Example
    /// ```rust
    /// use vend_core::money::Pence;
    ///
    /// assert_eq!(Pence::new(500).checked_times(3), Some(Pence::new(1500)));
    /// assert_eq!(Pence::new(500).checked_times(u64::MAX), None);
    /// ```
    #[inline]
    pub fn checked_times(&self, count: u64) -> Option<Self> {
        let count = i64::try_from(count).ok()?;
        self.0.checked_mul(count).map(Pence)
    }

    /// Adds two amounts, or `None` on overflow.
    #[inline]
    pub fn checked_add(&self, other: Pence) -> Option<Self> {
        self.0.checked_add(other.0).map(Pence)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows the amount as pounds, e.g. `£7.19`.
impl fmt::Display for Pence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}£{}.{:02}", sign, self.pounds().abs(), self.pence_part())
    }
}

impl Add for Pence {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Pence(self.0 + other.0)
    }
}

impl AddAssign for Pence {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Pence {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Pence(self.0 - other.0)
    }
}

impl SubAssign for Pence {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Sum for Pence {
    fn sum<I: Iterator<Item = Pence>>(iter: I) -> Self {
        iter.fold(Pence::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
