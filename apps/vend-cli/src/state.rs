//! # Machine State
//!
//! Owns the `ChangeEngine` for the lifetime of the console.
//!
//! ## Thread Safety
//! The engine is wrapped in `Arc<Mutex<T>>` so that each command runs
//! against it exclusively. Change requests do their calculation, payout and
//! session reset inside a single lock:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    producecoins 748                                     │
//! │                                                                         │
//! │  lock ──► compute_change ──► dispense ──► reset_session ──► unlock     │
//! │           └──────────── nothing else can touch the inventory ─────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! After an internal consistency failure the state is marked halted and
//! refuses further commands until the process is restarted.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tracing::error;
use vend_core::{ChangeEngine, Coin, InventorySummary, Ledger};

use crate::error::CliError;

/// Result of a change request, for display.
#[derive(Debug, Clone)]
pub struct ChangeReceipt {
    /// Amount requested, in pence.
    pub requested: i64,

    /// Coins paid out.
    pub coins: Vec<Coin>,

    /// The session that was closed by this payout.
    pub closed_session: Ledger,
}

/// Shared handle to the machine.
#[derive(Debug, Clone)]
pub struct MachineState {
    engine: Arc<Mutex<ChangeEngine>>,
    halted: Arc<AtomicBool>,
}

impl MachineState {
    pub fn new(engine: ChangeEngine) -> Self {
        MachineState {
            engine: Arc::new(Mutex::new(engine)),
            halted: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Executes a function with read access to the engine.
    pub fn with_machine<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&ChangeEngine) -> R,
    {
        let engine = self.engine.lock().expect("Machine mutex poisoned");
        f(&engine)
    }

    /// Executes a function with write access to the engine.
    pub fn with_machine_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut ChangeEngine) -> R,
    {
        let mut engine = self.engine.lock().expect("Machine mutex poisoned");
        f(&mut engine)
    }

    /// True once an internal consistency error has been seen.
    pub fn is_halted(&self) -> bool {
        self.halted.load(Ordering::SeqCst)
    }

    fn ensure_running(&self) -> Result<(), CliError> {
        if self.is_halted() {
            return Err(CliError::internal(
                "Machine halted after an internal error. Restart to re-initialise.",
            ));
        }
        Ok(())
    }

    fn halt(&self, err: &CliError) {
        error!(error = %err, "Halting machine");
        self.halted.store(true, Ordering::SeqCst);
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Deposits one coin. Returns the coin and the session's deposits so far.
    pub fn deposit(&self, token: &str) -> Result<(Coin, Vec<Coin>), CliError> {
        self.ensure_running()?;
        self.with_machine_mut(|m| -> Result<_, CliError> {
            let coin = m.deposit(token)?;
            Ok((coin, m.deposited().to_vec()))
        })
    }

    /// Calculates and pays out change, then starts a new session.
    ///
    /// On a user-facing failure nothing moves and the session stays open.
    pub fn produce_coins(&self, requested: i64) -> Result<ChangeReceipt, CliError> {
        self.ensure_running()?;
        let result = self.with_machine_mut(|m| -> Result<_, CliError> {
            let coins = m.make_change(requested)?;
            let closed_session = m.reset_session();
            Ok(ChangeReceipt {
                requested,
                coins,
                closed_session,
            })
        });

        if let Err(ref e) = result {
            if e.is_fatal() {
                self.halt(e);
            }
        }
        result
    }

    /// Current inventory summary.
    pub fn summary(&self) -> Result<InventorySummary, CliError> {
        self.ensure_running()?;
        Ok(self.with_machine(|m| m.summary()))
    }
}
