//! # Error Types
//!
//! Domain-specific error types for vend-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  vend-core errors (this file)                                          │
//! │  ├── CoreError        - Cash handling failures                         │
//! │  └── ValidationError  - Malformed input (quantity vectors, amounts)    │
//! │                                                                         │
//! │  vend-cli errors (app crate)                                           │
//! │  └── CliError         - What the console user sees                     │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CliError → Console                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Severity
//! ```text
//! InvalidDenomination   user typo, machine keeps going
//! InvalidInventorySpec  engine never comes into existence
//! CapacityExceeded      coin refused, machine keeps going
//! NegativeRequest       rejected, nothing mutated
//! InsufficientFunds     rejected, nothing mutated
//! CannotMakeChange      rejected, candidate coins discarded
//! InternalConsistency   caller protocol broken, machine needs re-initialising
//! ```

use thiserror::Error;

use crate::coin::Coin;

// =============================================================================
// Core Error
// =============================================================================

/// Cash handling errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The token or value does not name one of the nine GBP coins.
    #[error("The '{input}' coin has not been minted")]
    InvalidDenomination { input: String },

    /// The initial quantity vector is malformed.
    ///
    /// ## When This Occurs
    /// - Vector does not have exactly one entry per denomination
    /// - Any entry is negative
    /// - The coins are worth more than `i64::MAX` pence
    #[error("Invalid starting inventory: {0}")]
    InvalidInventorySpec(ValidationError),

    /// Accepting the coin would push a count or the total past what the
    /// machine can count. Nothing is changed.
    #[error("Machine is full and cannot accept another {coin}")]
    CapacityExceeded { coin: Coin },

    /// Change was requested for a negative amount.
    #[error("Cannot produce coins for negative amount {requested}p")]
    NegativeRequest { requested: i64 },

    /// The machine holds less money than was requested.
    #[error("Insufficient funds: machine holds {available}p, requested {requested}p")]
    InsufficientFunds { available: i64, requested: i64 },

    /// Enough money is held, but the largest-first walk cannot hit the
    /// target exactly with the coins available.
    ///
    /// ## Example
    /// ```text
    /// Inventory: 50p × 1, 20p × 3      Target: 60p
    ///
    /// 50p  → running 50
    /// 20p  → 70 > 60, abandon 20p
    /// ...  → stuck at 50
    ///
    /// CannotMakeChange { requested: 60, reached: 50 }
    /// (3 × 20p would have worked; the walk never backtracks)
    /// ```
    #[error("Not able to make {requested}p with available coins (reached {reached}p)")]
    CannotMakeChange { requested: i64, reached: i64 },

    /// A dispense asked for more coins of a denomination than the machine
    /// holds. Only happens when `dispense` is called with coins that did not
    /// come from `compute_change`, or the inventory moved in between.
    #[error("Internal consistency error: cannot dispense {requested} × {coin}, only {available} held")]
    InternalConsistency {
        coin: Coin,
        available: u64,
        requested: u64,
    },
}

impl CoreError {
    /// Returns true for errors that mean the engine state can no longer be
    /// trusted.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CoreError::InternalConsistency { .. })
    }
}

impl From<ValidationError> for CoreError {
    fn from(err: ValidationError) -> Self {
        CoreError::InvalidInventorySpec(err)
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Used for early validation before any engine state is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Collection has the wrong number of elements.
    #[error("{field} must have exactly {expected} entries (1p, 2p, 5p, 10p, 20p, 50p, £1, £2, £5), got {actual}")]
    WrongLength {
        field: String,
        expected: usize,
        actual: usize,
    },

    /// Value must not be negative.
    #[error("{field}[{index}] cannot be negative (got {value})")]
    Negative {
        field: String,
        index: usize,
        value: i64,
    },

    /// Invalid format (e.g., non-numeric amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// The values add up to more pence than an `i64` can hold.
    #[error("{field} add up to more than {max}p")]
    TooLarge { field: String, max: i64 },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientFunds {
            available: 700,
            requested: 1234567,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient funds: machine holds 700p, requested 1234567p"
        );

        let err = CoreError::InvalidDenomination {
            input: "167p".to_string(),
        };
        assert_eq!(err.to_string(), "The '167p' coin has not been minted");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Negative {
            field: "quantities".to_string(),
            index: 2,
            value: -3,
        };
        assert_eq!(err.to_string(), "quantities[2] cannot be negative (got -3)");

        let err = ValidationError::Required {
            field: "coin".to_string(),
        };
        assert_eq!(err.to_string(), "coin is required");
    }

    #[test]
    fn test_validation_converts_to_inventory_spec_error() {
        let validation_err = ValidationError::WrongLength {
            field: "quantities".to_string(),
            expected: 9,
            actual: 5,
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::InvalidInventorySpec(_)));
    }

    #[test]
    fn test_only_consistency_errors_are_fatal() {
        let fatal = CoreError::InternalConsistency {
            coin: Coin::OnePound,
            available: 0,
            requested: 1,
        };
        assert!(fatal.is_fatal());
        assert!(!CoreError::NegativeRequest { requested: -5 }.is_fatal());
        assert!(!CoreError::CapacityExceeded {
            coin: Coin::FivePounds
        }
        .is_fatal());
    }
}
