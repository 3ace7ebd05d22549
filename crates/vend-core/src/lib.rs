//! # vend-core: Pure Cash Logic for Coin Vend
//!
//! The coin model and change-making engine of a vending machine. No I/O:
//! the console front-end in `apps/vend-cli` drives everything through the
//! engine's methods.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Coin Vend Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    vend-cli (console loop)                      │   │
//! │  │    deposit <coin> ──► producecoins <pence> ──► check ──► exit  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ method calls under one Mutex           │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ vend-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   coin    │  │ inventory │  │  engine   │  │   money   │  │   │
//! │  │   │  1p..£5   │  │ qty × 9   │  │  greedy   │  │   Pence   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO FLOATS • NO GLOBAL STATE                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`coin`] - The nine GBP denominations
//! - [`money`] - `Pence`, integer money with £ display
//! - [`inventory`] - Coin quantities by denomination
//! - [`engine`] - Deposits, change calculation, dispensing
//! - [`types`] - Summaries and the session ledger
//! - [`validation`] - Checks and parsers for external input
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use vend_core::{ChangeEngine, Coin, CoreError};
//!
//! let mut machine = ChangeEngine::new(&[0; 9]).unwrap();
//! machine.deposit("£1").unwrap();
//! machine.deposit("50p").unwrap();
//!
//! assert!(matches!(machine.deposit("15p"), Err(CoreError::InvalidDenomination { .. })));
//!
//! let change = machine.make_change(50).unwrap();
//! assert_eq!(change, vec![Coin::FiftyPence]);
//! assert_eq!(machine.summary().total_pence, 100);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod coin;
pub mod engine;
pub mod error;
pub mod inventory;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use coin::{Coin, DENOMINATION_COUNT};
pub use engine::ChangeEngine;
pub use error::{CoreError, CoreResult, ValidationError};
pub use inventory::Inventory;
pub use money::Pence;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Coins loaded at start-up when nothing else is configured, ascending
/// by denomination (1p, 2p, 5p, 10p, 20p, 50p, £1, £2, £5).
pub const DEFAULT_FLOAT: [i64; DENOMINATION_COUNT] = [1, 2, 5, 1, 2, 5, 1, 2, 5];
