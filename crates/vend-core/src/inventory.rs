//! # Inventory Module
//!
//! How many coins of each denomination the machine is holding.
//!
//! ## Layout
//! ```text
//! counts: [ 1p, 2p, 5p, 10p, 20p, 50p, £1, £2, £5 ]
//!           ▲                                   ▲
//!           └── index == Coin::ordinal() ───────┘
//! ```
//!
//! A fixed array means there is always exactly one entry per denomination,
//! and `u64` means a count can hit zero but never go below it. Decrements
//! that would underflow are reported as `InternalConsistency` instead.
//!
//! The value of the inventory always fits in an `i64` of pence: counts come
//! from `validate_inventory_spec`, and `increment` refuses a coin that would
//! overflow either its count or the total.

use serde::{Deserialize, Serialize};

use crate::coin::{Coin, DENOMINATION_COUNT};
use crate::error::{CoreError, CoreResult};
use crate::money::Pence;

/// Coin quantities by denomination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    counts: [u64; DENOMINATION_COUNT],
}

impl Inventory {
    /// Creates an inventory from counts in ascending denomination order.
    pub fn from_counts(counts: [u64; DENOMINATION_COUNT]) -> Self {
        Inventory { counts }
    }

    /// An inventory holding no coins.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of `coin` held.
    #[inline]
    pub fn quantity(&self, coin: Coin) -> u64 {
        self.counts[coin.ordinal()]
    }

    /// Adds one coin.
    ///
    /// ## Errors
    /// `CapacityExceeded` if the count or the total value would overflow.
    /// Nothing is changed.
    pub fn increment(&mut self, coin: Coin) -> CoreResult<()> {
        let full = || CoreError::CapacityExceeded { coin };

        let count = self.counts[coin.ordinal()].checked_add(1).ok_or_else(full)?;
        self.checked_total()
            .and_then(|total| total.checked_add(coin.amount()))
            .ok_or_else(full)?;

        self.counts[coin.ordinal()] = count;
        Ok(())
    }

    /// Removes one coin.
    ///
    /// ## Errors
    /// `InternalConsistency` if none of `coin` is held. Nothing is changed.
    pub fn decrement(&mut self, coin: Coin) -> CoreResult<()> {
        let slot = &mut self.counts[coin.ordinal()];
        if *slot == 0 {
            return Err(CoreError::InternalConsistency {
                coin,
                available: 0,
                requested: 1,
            });
        }
        *slot -= 1;
        Ok(())
    }

    /// Checks that every coin in `coins` can be removed, counting repeats.
    ///
    /// Lets a batch removal fail before anything is mutated.
    pub fn ensure_covers(&self, coins: &[Coin]) -> CoreResult<()> {
        let mut requested = [0u64; DENOMINATION_COUNT];
        for coin in coins {
            requested[coin.ordinal()] += 1;
        }

        for coin in Coin::ALL {
            let wanted = requested[coin.ordinal()];
            let available = self.quantity(coin);
            if wanted > available {
                return Err(CoreError::InternalConsistency {
                    coin,
                    available,
                    requested: wanted,
                });
            }
        }

        Ok(())
    }

    /// Total value, recomputed from the counts.
    ///
    /// Saturates at `i64::MAX` pence, which the module invariant keeps out of
    /// reach.
    pub fn total(&self) -> Pence {
        self.checked_total().unwrap_or(Pence::new(i64::MAX))
    }

    /// Total value, or `None` if it does not fit in an `i64`.
    pub fn checked_total(&self) -> Option<Pence> {
        self.iter().try_fold(Pence::zero(), |acc, (coin, qty)| {
            acc.checked_add(coin.amount().checked_times(qty)?)
        })
    }

    /// Total number of coins held.
    pub fn coin_count(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// `(coin, quantity)` pairs, smallest denomination first.
    pub fn iter(&self) -> impl Iterator<Item = (Coin, u64)> + '_ {
        Coin::ALL.into_iter().map(move |coin| (coin, self.quantity(coin)))
    }
}
