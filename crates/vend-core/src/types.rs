//! # Domain Types
//!
//! Read models handed out by the engine.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ┌──────────────────────┐   ┌──────────────────────┐                   │
//! │  │  InventorySummary    │   │  Ledger              │                   │
//! │  │  ──────────────────  │   │  ──────────────────  │                   │
//! │  │  denominations[9]    │   │  session_id (UUID)   │                   │
//! │  │  total_pence         │   │  started_at          │                   │
//! │  └──────────┬───────────┘   │  deposited: [Coin]   │                   │
//! │             │               │  dispensed: [Coin]   │                   │
//! │  ┌──────────▼───────────┐   └──────────────────────┘                   │
//! │  │  DenominationCount   │                                               │
//! │  │  name, value, qty    │                                               │
//! │  └──────────────────────┘                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::coin::Coin;
use crate::inventory::Inventory;
use crate::money::Pence;

// =============================================================================
// Inventory Summary
// =============================================================================

/// Quantity held of one denomination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DenominationCount {
    /// Display name, e.g. "20p".
    pub name: String,

    /// Coin value in pence.
    pub value_pence: i64,

    /// Coins of this denomination held.
    pub quantity: u64,
}

/// Snapshot of the machine's coins for inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary {
    /// One entry per denomination, ascending by value.
    pub denominations: Vec<DenominationCount>,

    /// Total value held, in pence.
    pub total_pence: i64,
}

impl InventorySummary {
    /// Builds a summary from an inventory and the engine's running total.
    pub fn new(inventory: &Inventory, total: Pence) -> Self {
        InventorySummary {
            denominations: inventory
                .iter()
                .map(|(coin, quantity)| DenominationCount {
                    name: coin.name().to_string(),
                    value_pence: coin.value(),
                    quantity,
                })
                .collect(),
            total_pence: total.value(),
        }
    }

    /// Quantity listed for `name`, if that denomination is present.
    pub fn quantity_of(&self, name: &str) -> Option<u64> {
        self.denominations
            .iter()
            .find(|d| d.name == name)
            .map(|d| d.quantity)
    }

    /// Total recomputed from the listed quantities.
    pub fn recomputed_total(&self) -> i64 {
        self.denominations
            .iter()
            .map(|d| d.value_pence * d.quantity as i64)
            .sum()
    }
}

/// Console layout:
///
/// ```text
/// Vending Machine Contents:
/// -------
/// 1p | Quantity: 1
/// ...
/// -------
/// Total funds: £33.30
/// ```
impl fmt::Display for InventorySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Vending Machine Contents:")?;
        writeln!(f, "-------")?;
        for d in &self.denominations {
            writeln!(f, "{} | Quantity: {}", d.name, d.quantity)?;
        }
        writeln!(f, "-------")?;
        write!(f, "Total funds: {}", Pence::new(self.total_pence))
    }
}

// =============================================================================
// Session Ledger
// =============================================================================

/// Coins that went in and out during the current transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ledger {
    /// Identifies the transaction in log output.
    pub session_id: Uuid,

    /// When this session was opened.
    pub started_at: DateTime<Utc>,

    /// Coins accepted, in deposit order.
    pub deposited: Vec<Coin>,

    /// Coins paid out, in dispense order.
    pub dispensed: Vec<Coin>,
}

impl Ledger {
    /// Opens a new, empty session.
    pub fn new() -> Self {
        Ledger {
            session_id: Uuid::new_v4(),
            started_at: Utc::now(),
            deposited: Vec::new(),
            dispensed: Vec::new(),
        }
    }

    /// Value of all coins deposited this session.
    pub fn deposited_total(&self) -> Pence {
        self.deposited.iter().map(Coin::amount).sum()
    }

    /// Value of all coins dispensed this session.
    pub fn dispensed_total(&self) -> Pence {
        self.dispensed.iter().map(Coin::amount).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.deposited.is_empty() && self.dispensed.is_empty()
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Ledger::new()
    }
}

/// Formats a coin list the way the console shows it: `[£2, 50p, 1p]`.
pub fn format_coins(coins: &[Coin]) -> String {
    let names: Vec<&str> = coins.iter().map(Coin::name).collect();
    format!("[{}]", names.join(", "))
}
