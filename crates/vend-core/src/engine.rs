//! # Change Engine
//!
//! The vending machine's cash box: accepts coins, works out change and pays
//! it out.
//!
//! ## Transaction Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    One Vending Transaction                              │
//! │                                                                         │
//! │  deposit("£1") ──► inventory[£1] += 1, total += 100, ledger.deposited  │
//! │  deposit("50p") ─► inventory[50p] += 1, total += 50, ledger.deposited  │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  compute_change(30)                                                     │
//! │        ├── target < 0?            → NegativeRequest                    │
//! │        ├── recomputed total < 30? → InsufficientFunds                  │
//! │        ├── largest-first walk     → [20p, 10p]                         │
//! │        └── walk falls short?      → CannotMakeChange                   │
//! │        │                                                                │
//! │        ▼   (nothing has moved yet)                                      │
//! │  dispense([20p, 10p]) ──► inventory -= coins, total -= 30              │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  reset_session() ──► fresh ledger for the next customer                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariant
//! `total()` always equals the value of the inventory. The running total is
//! kept incrementally and reconciled against a full recount every time
//! funds are checked.
//!
//! ## Usage
//! ```rust
//! use vend_core::engine::ChangeEngine;
//!
//! let mut machine = ChangeEngine::new(&[10, 10, 10, 10, 10, 10, 10, 10, 10]).unwrap();
//! machine.deposit("£2").unwrap();
//!
//! let change = machine.compute_change(748).unwrap();
//! assert_eq!(change.iter().map(|c| c.value()).sum::<i64>(), 748);
//!
//! machine.dispense(&change).unwrap();
//! assert_eq!(machine.total().value(), 8880 + 200 - 748);
//! ```

use std::cmp::Ordering;
use tracing::{debug, error, info, warn};

use crate::coin::Coin;
use crate::error::{CoreError, CoreResult};
use crate::inventory::Inventory;
use crate::money::Pence;
use crate::types::{format_coins, InventorySummary, Ledger};
use crate::validation::validate_inventory_spec;

/// The machine's coin store plus the current session's ledger.
#[derive(Debug, Clone)]
pub struct ChangeEngine {
    inventory: Inventory,
    running_total: Pence,
    ledger: Ledger,
}

impl ChangeEngine {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Creates a machine loaded with `quantities` coins of each denomination.
    ///
    /// `quantities` maps positionally to 1p, 2p, 5p, 10p, 20p, 50p, £1, £2, £5.
    ///
    /// ## Errors
    /// `InvalidInventorySpec` if there are not exactly nine entries or any
    /// entry is negative. No engine is created in that case.
    pub fn new(quantities: &[i64]) -> CoreResult<Self> {
        let counts = validate_inventory_spec(quantities)?;
        let inventory = Inventory::from_counts(counts);
        let running_total = inventory.total();

        info!(
            total = %running_total,
            coins = inventory.coin_count(),
            "Vending machine initialised"
        );

        Ok(ChangeEngine {
            inventory,
            running_total,
            ledger: Ledger::new(),
        })
    }

    // =========================================================================
    // Deposits
    // =========================================================================

    /// Accepts one coin by name.
    ///
    /// ## Errors
    /// - `InvalidDenomination` if `token` is not an exact coin name
    /// - `CapacityExceeded` if the machine cannot count another coin
    ///
    /// Either way the machine is left untouched and can keep taking coins.
    pub fn deposit(&mut self, token: &str) -> CoreResult<Coin> {
        let coin = Coin::from_name(token).map_err(|e| {
            warn!(token, "Coin rejected");
            e
        })?;

        if let Err(e) = self.inventory.increment(coin) {
            warn!(coin = %coin, total = %self.running_total, "Coin refused, machine full");
            return Err(e);
        }
        self.running_total += coin.amount();
        self.ledger.deposited.push(coin);

        info!(
            coin = %coin,
            session = %self.ledger.session_id,
            deposited = %format_coins(&self.ledger.deposited),
            "Coin deposited"
        );

        Ok(coin)
    }

    // =========================================================================
    // Change Calculation
    // =========================================================================

    /// Recounts the inventory and reports whether it covers `target` pence.
    ///
    /// The recount replaces the running total. A mismatch between the two
    /// means some mutation bypassed the bookkeeping and is logged.
    pub fn has_sufficient_funds(&mut self, target: i64) -> bool {
        let total = self.reconcile();
        debug!(total = %total, target, "Funds checked");
        total.value() >= target
    }

    /// Recomputes the total from the inventory and stores it.
    pub fn reconcile(&mut self) -> Pence {
        let recounted = self.inventory.total();
        if recounted != self.running_total {
            warn!(
                cached = %self.running_total,
                recounted = %recounted,
                "Running total out of step with inventory, using recount"
            );
            self.running_total = recounted;
        }
        recounted
    }

    /// Picks coins summing exactly to `target` pence, largest first.
    ///
    /// The coins are NOT removed from the machine; pass the result to
    /// [`ChangeEngine::dispense`] to pay them out.
    ///
    /// ## Algorithm
    /// ```text
    /// for each denomination, £5 down to 1p:
    ///     while some left and running < target:
    ///         running + value <  target → take it, keep going
    ///         running + value == target → take it, done
    ///         running + value >  target → skip to next denomination
    /// running < target at the end → CannotMakeChange
    /// ```
    ///
    /// The walk never backtracks, so it can miss a combination that exists
    /// (50p × 1 and 20p × 3 cannot make 60p this way).
    ///
    /// ## Errors
    /// - `NegativeRequest` when `target < 0`
    /// - `InsufficientFunds` when the machine holds less than `target`
    /// - `CannotMakeChange` when the walk cannot land on `target`
    pub fn compute_change(&mut self, target: i64) -> CoreResult<Vec<Coin>> {
        debug!(target = %Pence::new(target), "Calculating coins");

        if target < 0 {
            warn!(target, "Cannot produce coins for negative amount");
            return Err(CoreError::NegativeRequest { requested: target });
        }

        if !self.has_sufficient_funds(target) {
            warn!(
                available = %self.running_total,
                target = %Pence::new(target),
                "Insufficient funds in vending machine"
            );
            return Err(CoreError::InsufficientFunds {
                available: self.running_total.value(),
                requested: target,
            });
        }

        let (coins, reached) = self.largest_first(target);

        if reached < target {
            warn!(target, reached, "Not able to make amount with available coins");
            return Err(CoreError::CannotMakeChange {
                requested: target,
                reached,
            });
        }

        info!(
            target = %Pence::new(target),
            coins = %format_coins(&coins),
            "Change calculated"
        );
        Ok(coins)
    }

    /// The greedy walk itself. Returns the candidate coins and the amount
    /// they reach, which is below `target` when the walk got stuck.
    fn largest_first(&self, target: i64) -> (Vec<Coin>, i64) {
        let mut picked = Vec::new();
        let mut running = 0i64;

        'denominations: for coin in Coin::descending() {
            let mut available = self.inventory.quantity(coin);

            while available > 0 && running < target {
                let Some(next) = running.checked_add(coin.value()) else {
                    break;
                };
                match next.cmp(&target) {
                    Ordering::Less => {
                        picked.push(coin);
                        running = next;
                        available -= 1;
                        debug!(coin = %coin, running, "Added coin");
                    }
                    Ordering::Equal => {
                        picked.push(coin);
                        running = next;
                        debug!(coin = %coin, running, "Added coin, target reached");
                        break 'denominations;
                    }
                    Ordering::Greater => {
                        debug!(coin = %coin, running, "Coin would exceed target");
                        break;
                    }
                }
            }
        }

        (picked, running)
    }

    // =========================================================================
    // Dispensing
    // =========================================================================

    /// Removes `coins` from the machine.
    ///
    /// Meant to be called with the result of [`ChangeEngine::compute_change`]
    /// and nothing in between. The whole batch is checked before any coin
    /// moves, so a failure leaves the inventory exactly as it was.
    ///
    /// ## Errors
    /// `InternalConsistency` if the batch asks for more of a denomination
    /// than the machine holds. This is a caller bug, not a user error.
    pub fn dispense(&mut self, coins: &[Coin]) -> CoreResult<()> {
        if let Err(e) = self.inventory.ensure_covers(coins) {
            error!(error = %e, coins = %format_coins(coins), "Refusing to dispense");
            return Err(e);
        }

        for &coin in coins {
            self.inventory.decrement(coin)?;
            self.running_total -= coin.amount();
            self.ledger.dispensed.push(coin);
            debug!(coin = %coin, "Coin dispensed");
        }

        info!(
            session = %self.ledger.session_id,
            dispensed = %format_coins(&self.ledger.dispensed),
            total = %self.running_total,
            "Coins dispensed"
        );
        Ok(())
    }

    /// Computes change for `target` and dispenses it in one step.
    ///
    /// Holding `&mut self` across both halves means nothing can change the
    /// inventory between the calculation and the payout.
    pub fn make_change(&mut self, target: i64) -> CoreResult<Vec<Coin>> {
        let coins = self.compute_change(target)?;
        self.dispense(&coins)?;
        Ok(coins)
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Closes the current session and opens a new one, returning the old
    /// ledger.
    pub fn reset_session(&mut self) -> Ledger {
        let closed = std::mem::take(&mut self.ledger);
        debug!(
            closed = %closed.session_id,
            opened = %self.ledger.session_id,
            "Session reset"
        );
        closed
    }

    /// The open session's ledger.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Coins deposited this session.
    pub fn deposited(&self) -> &[Coin] {
        &self.ledger.deposited
    }

    /// Coins dispensed this session.
    pub fn dispensed(&self) -> &[Coin] {
        &self.ledger.dispensed
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Per-denomination quantities and the total, for display.
    pub fn summary(&self) -> InventorySummary {
        InventorySummary::new(&self.inventory, self.running_total)
    }

    /// Running total held, in pence.
    pub fn total(&self) -> Pence {
        self.running_total
    }

    /// Number of `coin` held.
    pub fn quantity_of(&self, coin: Coin) -> u64 {
        self.inventory.quantity(coin)
    }

    /// Coin counts by denomination.
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// True when the running total matches a full recount.
    pub fn is_consistent(&self) -> bool {
        self.running_total == self.inventory.total()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    const TEN_OF_EACH: [i64; 9] = [10; 9];
    const ODD: [i64; 9] = [1, 3, 5, 7, 9, 11, 13, 15, 17];
    const ZERO: [i64; 9] = [0; 9];

    fn sum(coins: &[Coin]) -> i64 {
        coins.iter().map(Coin::value).sum()
    }

    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    #[test]
    fn test_new_with_zero_inventory() {
        let machine = ChangeEngine::new(&ZERO).unwrap();
        assert!(machine.total().is_zero());
        assert!(machine.ledger().is_empty());
    }

    #[test]
    fn test_new_with_ten_of_each() {
        let machine = ChangeEngine::new(&TEN_OF_EACH).unwrap();
        assert_eq!(machine.total().value(), 8880);
        for coin in Coin::ALL {
            assert_eq!(machine.quantity_of(coin), 10);
        }
    }

    #[test]
    fn test_new_rejects_wrong_length() {
        assert!(matches!(
            ChangeEngine::new(&[]),
            Err(CoreError::InvalidInventorySpec(_))
        ));
        assert!(matches!(
            ChangeEngine::new(&[1, 2, 3, 4, 5]),
            Err(CoreError::InvalidInventorySpec(_))
        ));
    }

    #[test]
    fn test_new_rejects_negative_quantity() {
        assert!(matches!(
            ChangeEngine::new(&[-1, -2, -3, -4, -5, -6, -7, -8, 0]),
            Err(CoreError::InvalidInventorySpec(_))
        ));
        assert!(matches!(
            ChangeEngine::new(&[1, 1, 1, 1, -1, 1, 1, 1, 1]),
            Err(CoreError::InvalidInventorySpec(_))
        ));
    }

    #[test]
    fn test_new_rejects_total_beyond_i64() {
        let err = ChangeEngine::new(&[0, 0, 0, 0, 0, 0, 0, 0, i64::MAX / 100]).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidInventorySpec(ValidationError::TooLarge { .. })
        ));
    }

    // -------------------------------------------------------------------------
    // Deposits
    // -------------------------------------------------------------------------

    #[test]
    fn test_deposit_refused_when_total_would_overflow() {
        let mut machine = ChangeEngine::new(&[0, 0, 0, 0, 0, 0, 0, 0, i64::MAX / 500]).unwrap();
        let before = machine.total();

        assert_eq!(
            machine.deposit("£5"),
            Err(CoreError::CapacityExceeded {
                coin: Coin::FivePounds
            })
        );
        assert_eq!(machine.total(), before);
        assert!(machine.deposited().is_empty());

        // 307p of headroom still takes a £2.
        machine.deposit("£2").unwrap();
        assert_eq!(machine.total().value(), before.value() + 200);
        assert!(machine.is_consistent());
    }

    #[test]
    fn test_deposit_valid() {
        let mut machine = ChangeEngine::new(&ZERO).unwrap();
        let coin = machine.deposit("1p").unwrap();

        assert_eq!(coin, Coin::OnePenny);
        assert_eq!(machine.quantity_of(Coin::OnePenny), 1);
        assert_eq!(machine.total().value(), 1);
        assert_eq!(machine.deposited(), &[Coin::OnePenny]);
    }

    #[test]
    fn test_deposit_adds_to_existing_quantity() {
        let mut machine = ChangeEngine::new(&ODD).unwrap();
        machine.deposit("1p").unwrap();
        assert_eq!(machine.quantity_of(Coin::OnePenny), 2);
    }

    #[test]
    fn test_deposit_invalid_leaves_machine_untouched() {
        let mut machine = ChangeEngine::new(&ZERO).unwrap();

        for token in ["167p", "", "15p", "£10"] {
            let err = machine.deposit(token).unwrap_err();
            assert!(matches!(err, CoreError::InvalidDenomination { .. }));
        }

        assert!(machine.total().is_zero());
        assert_eq!(machine.inventory(), &Inventory::empty());
        assert!(machine.deposited().is_empty());
    }

    #[test]
    fn test_deposit_consecutive() {
        let mut machine = ChangeEngine::new(&ZERO).unwrap();
        for token in ["1p", "1p", "2p", "5p", "10p", "£2", "£1", "£1", "£1", "£2"] {
            machine.deposit(token).unwrap();
        }

        assert_eq!(machine.quantity_of(Coin::OnePenny), 2);
        assert_eq!(machine.quantity_of(Coin::OnePound), 3);
        assert_eq!(machine.quantity_of(Coin::TenPence), 1);
        assert_eq!(machine.total().value(), 719);
        assert_eq!(machine.deposited().len(), 10);
        assert_eq!(machine.ledger().deposited_total().value(), 719);
    }

    // -------------------------------------------------------------------------
    // Change Calculation
    // -------------------------------------------------------------------------

    #[test]
    fn test_compute_change_exact_sum() {
        let mut machine = ChangeEngine::new(&TEN_OF_EACH).unwrap();
        let coins = machine.compute_change(1000).unwrap();

        assert_eq!(sum(&coins), 1000);
        assert_eq!(coins, vec![Coin::FivePounds, Coin::FivePounds]);
    }

    #[test]
    fn test_compute_change_does_not_mutate() {
        let mut machine = ChangeEngine::new(&TEN_OF_EACH).unwrap();
        let before = machine.inventory().clone();

        machine.compute_change(748).unwrap();

        assert_eq!(machine.inventory(), &before);
        assert_eq!(machine.total().value(), 8880);
    }

    #[test]
    fn test_compute_change_prefers_larger_coins() {
        let mut machine = ChangeEngine::new(&TEN_OF_EACH).unwrap();
        let coins = machine.compute_change(748).unwrap();

        assert_eq!(
            coins,
            vec![
                Coin::FivePounds,
                Coin::TwoPounds,
                Coin::TwentyPence,
                Coin::TwentyPence,
                Coin::FivePence,
                Coin::TwoPence,
                Coin::OnePenny,
            ]
        );
    }

    #[test]
    fn test_compute_change_odd_inventory() {
        let mut machine = ChangeEngine::new(&ODD).unwrap();
        let coins = machine.compute_change(12345).unwrap();
        assert_eq!(sum(&coins), 12345);
    }

    #[test]
    fn test_compute_change_zero_is_empty() {
        let mut machine = ChangeEngine::new(&ZERO).unwrap();
        assert!(machine.compute_change(0).unwrap().is_empty());
    }

    #[test]
    fn test_compute_change_too_large() {
        let mut machine = ChangeEngine::new(&TEN_OF_EACH).unwrap();
        let err = machine.compute_change(1234567).unwrap_err();
        assert_eq!(
            err,
            CoreError::InsufficientFunds {
                available: 8880,
                requested: 1234567,
            }
        );
    }

    #[test]
    fn test_compute_change_negative() {
        let mut machine = ChangeEngine::new(&TEN_OF_EACH).unwrap();
        assert_eq!(
            machine.compute_change(-5),
            Err(CoreError::NegativeRequest { requested: -5 })
        );

        let mut empty = ChangeEngine::new(&ZERO).unwrap();
        assert!(matches!(
            empty.compute_change(-1),
            Err(CoreError::NegativeRequest { .. })
        ));
    }

    #[test]
    fn test_compute_change_cannot_make_amount() {
        let mut machine = ChangeEngine::new(&ZERO).unwrap();
        machine.deposit("10p").unwrap();
        machine.deposit("£2").unwrap();

        let err = machine.compute_change(203).unwrap_err();
        assert_eq!(
            err,
            CoreError::CannotMakeChange {
                requested: 203,
                reached: 200,
            }
        );
        assert_eq!(machine.total().value(), 210);
        assert_eq!(machine.quantity_of(Coin::TwoPounds), 1);
    }

    #[test]
    fn test_compute_change_greedy_misses_feasible_combination() {
        let mut machine = ChangeEngine::new(&[0, 0, 0, 0, 3, 1, 0, 0, 0]).unwrap();

        // 3 × 20p makes 60p, but the walk commits to the 50p first.
        let err = machine.compute_change(60).unwrap_err();
        assert_eq!(
            err,
            CoreError::CannotMakeChange {
                requested: 60,
                reached: 50,
            }
        );
    }

    #[test]
    fn test_compute_change_skips_denomination_that_overshoots() {
        let mut machine = ChangeEngine::new(&[0, 0, 0, 3, 0, 0, 0, 0, 1]).unwrap();
        let coins = machine.compute_change(30).unwrap();
        assert_eq!(coins, vec![Coin::TenPence; 3]);
    }

    #[test]
    fn test_funds_check_reconciles_running_total() {
        let mut machine = ChangeEngine::new(&TEN_OF_EACH).unwrap();
        machine.running_total = Pence::new(1);
        assert!(!machine.is_consistent());

        assert!(machine.has_sufficient_funds(8880));
        assert!(machine.is_consistent());
        assert!(!machine.has_sufficient_funds(8881));
    }

    // -------------------------------------------------------------------------
    // Dispensing
    // -------------------------------------------------------------------------

    #[test]
    fn test_dispense_updates_inventory_and_total() {
        let mut machine = ChangeEngine::new(&TEN_OF_EACH).unwrap();
        let starting = machine.total().value();

        let coins = machine.compute_change(748).unwrap();
        machine.dispense(&coins).unwrap();

        assert_eq!(machine.total().value(), starting - 748);
        assert_eq!(machine.quantity_of(Coin::TwentyPence), 8);
        assert_eq!(machine.dispensed(), coins.as_slice());
        assert!(machine.is_consistent());
    }

    #[test]
    fn test_dispense_empties_denominations() {
        let mut machine = ChangeEngine::new(&ZERO).unwrap();
        machine.deposit("1p").unwrap();
        machine.deposit("5p").unwrap();
        assert_eq!(machine.total().value(), 6);

        let coins = machine.compute_change(6).unwrap();
        assert_eq!(sum(&coins), 6);
        machine.dispense(&coins).unwrap();

        assert_eq!(machine.quantity_of(Coin::OnePenny), 0);
        assert_eq!(machine.quantity_of(Coin::FivePence), 0);
        assert!(machine.total().is_zero());
    }

    #[test]
    fn test_dispense_uncertified_coins_is_rejected_atomically() {
        let mut machine = ChangeEngine::new(&[1, 0, 0, 0, 0, 0, 0, 0, 0]).unwrap();
        let before = machine.inventory().clone();

        let err = machine
            .dispense(&[Coin::OnePenny, Coin::OnePound])
            .unwrap_err();

        assert!(err.is_fatal());
        assert_eq!(
            err,
            CoreError::InternalConsistency {
                coin: Coin::OnePound,
                available: 0,
                requested: 1,
            }
        );
        assert_eq!(machine.inventory(), &before);
        assert_eq!(machine.total().value(), 1);
        assert!(machine.dispensed().is_empty());
    }

    #[test]
    fn test_make_change_is_compute_then_dispense() {
        let mut machine = ChangeEngine::new(&TEN_OF_EACH).unwrap();
        let coins = machine.make_change(1000).unwrap();

        assert_eq!(sum(&coins), 1000);
        assert_eq!(machine.total().value(), 7880);
        assert_eq!(machine.quantity_of(Coin::FivePounds), 8);
    }

    #[test]
    fn test_make_change_failure_leaves_machine_untouched() {
        let mut machine = ChangeEngine::new(&TEN_OF_EACH).unwrap();
        assert!(machine.make_change(1234567).is_err());
        assert_eq!(machine.total().value(), 8880);
        assert!(machine.dispensed().is_empty());
    }

    // -------------------------------------------------------------------------
    // Session & Summary
    // -------------------------------------------------------------------------

    #[test]
    fn test_reset_session() {
        let mut machine = ChangeEngine::new(&TEN_OF_EACH).unwrap();
        machine.deposit("£1").unwrap();
        machine.make_change(50).unwrap();

        let first_id = machine.ledger().session_id;
        let closed = machine.reset_session();

        assert_eq!(closed.session_id, first_id);
        assert_eq!(closed.deposited, vec![Coin::OnePound]);
        assert_eq!(closed.dispensed, vec![Coin::FiftyPence]);
        assert!(machine.ledger().is_empty());
        assert_ne!(machine.ledger().session_id, first_id);
        // Inventory is not part of the session.
        assert_eq!(machine.total().value(), 8880 + 100 - 50);
    }

    #[test]
    fn test_summary_matches_inventory_after_every_operation() {
        let mut machine = ChangeEngine::new(&ODD).unwrap();
        let check = |m: &ChangeEngine| {
            let summary = m.summary();
            assert_eq!(summary.denominations.len(), 9);
            assert_eq!(summary.total_pence, summary.recomputed_total());
            assert_eq!(summary.total_pence, m.total().value());
        };

        check(&machine);
        for token in ["£5", "2p", "50p", "20p"] {
            machine.deposit(token).unwrap();
            check(&machine);
        }
        for target in [777, 1, 0, 2345] {
            machine.make_change(target).unwrap();
            check(&machine);
        }
    }

    #[test]
    fn test_summary_is_read_only() {
        let machine = ChangeEngine::new(&[2, 0, 0, 1, 0, 0, 3, 0, 0]).unwrap();
        let summary = machine.summary();

        assert_eq!(summary.quantity_of("1p"), Some(2));
        assert_eq!(summary.quantity_of("10p"), Some(1));
        assert_eq!(summary.quantity_of("£1"), Some(3));
        assert_eq!(summary.total_pence, 312);
        assert_eq!(machine.summary(), summary);
    }
}
