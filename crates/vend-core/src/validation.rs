//! # Validation Module
//!
//! Input validation for values that reach the engine from outside.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Console / config file                                        │
//! │  ├── Text → numbers (parse_pence, parse_quantity_list)                 │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  └── Shape of the initial quantity vector                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: ChangeEngine                                                 │
//! │  ├── Coin names (Coin::from_name)                                      │
//! │  └── Negative / unaffordable / unmakeable change requests              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use vend_core::validation::{parse_pence, validate_inventory_spec};
//!
//! let quantities = validate_inventory_spec(&[10, 10, 10, 10, 10, 10, 10, 10, 10]).unwrap();
//! assert_eq!(quantities[8], 10);
//!
//! assert_eq!(parse_pence("748").unwrap(), 748);
//! assert!(parse_pence("7.48").is_err());
//! ```

use crate::coin::{Coin, DENOMINATION_COUNT};
use crate::error::ValidationError;
use crate::money::Pence;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Inventory Validators
// =============================================================================

/// Validates an initial quantity vector and converts it to unsigned counts.
///
/// ## Rules
/// - Exactly one entry per denomination (9), ascending by value
/// - No entry may be negative (zero is fine)
/// - The coins together must be worth at most `i64::MAX` pence
pub fn validate_inventory_spec(quantities: &[i64]) -> ValidationResult<[u64; DENOMINATION_COUNT]> {
    if quantities.len() != DENOMINATION_COUNT {
        return Err(ValidationError::WrongLength {
            field: "quantities".to_string(),
            expected: DENOMINATION_COUNT,
            actual: quantities.len(),
        });
    }

    let mut counts = [0u64; DENOMINATION_COUNT];
    for (index, (&qty, slot)) in quantities.iter().zip(counts.iter_mut()).enumerate() {
        if qty < 0 {
            return Err(ValidationError::Negative {
                field: "quantities".to_string(),
                index,
                value: qty,
            });
        }
        *slot = qty as u64;
    }

    let total = Coin::ALL
        .iter()
        .zip(counts.iter())
        .try_fold(Pence::zero(), |acc, (coin, &count)| {
            acc.checked_add(coin.amount().checked_times(count)?)
        });
    if total.is_none() {
        return Err(ValidationError::TooLarge {
            field: "quantities".to_string(),
            max: i64::MAX,
        });
    }

    Ok(counts)
}

// =============================================================================
// Text Parsers
// =============================================================================

/// Parses an amount typed in pence, e.g. `"748"` for £7.48.
///
/// Negative amounts parse successfully; rejecting them is the engine's job
/// so that the caller sees `NegativeRequest` rather than a format error.
pub fn parse_pence(input: &str) -> ValidationResult<i64> {
    let input = input.trim();

    if input.is_empty() {
        return Err(ValidationError::Required {
            field: "amount".to_string(),
        });
    }

    input.parse::<i64>().map_err(|_| ValidationError::InvalidFormat {
        field: "amount".to_string(),
        reason: format!("'{}' is not a whole number of pence (e.g. £1 = 100)", input),
    })
}

/// Parses a comma-separated quantity list such as `"1,2,5,1,2,5,1,2,5"`.
///
/// Only the number format is checked here; pass the result through
/// [`validate_inventory_spec`] for the length and sign rules.
pub fn parse_quantity_list(input: &str) -> ValidationResult<Vec<i64>> {
    if input.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "quantities".to_string(),
        });
    }

    input
        .split(',')
        .map(str::trim)
        .enumerate()
        .map(|(index, part)| {
            part.parse::<i64>().map_err(|_| ValidationError::InvalidFormat {
                field: "quantities".to_string(),
                reason: format!("entry {} ('{}') is not an integer", index, part),
            })
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_inventory_spec() {
        assert_eq!(validate_inventory_spec(&[0; 9]).unwrap(), [0; 9]);
        assert_eq!(
            validate_inventory_spec(&[1, 3, 5, 7, 9, 11, 13, 15, 17]).unwrap(),
            [1, 3, 5, 7, 9, 11, 13, 15, 17]
        );
    }

    #[test]
    fn test_validate_inventory_spec_wrong_length() {
        assert!(matches!(
            validate_inventory_spec(&[]),
            Err(ValidationError::WrongLength { actual: 0, .. })
        ));
        assert!(matches!(
            validate_inventory_spec(&[1, 2, 3, 4, 5]),
            Err(ValidationError::WrongLength { actual: 5, .. })
        ));
        assert!(validate_inventory_spec(&[1; 10]).is_err());
    }

    #[test]
    fn test_validate_inventory_spec_negative() {
        let err = validate_inventory_spec(&[-1, -2, -3, -4, -5, -6, -7, -8, 0]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::Negative {
                field: "quantities".to_string(),
                index: 0,
                value: -1,
            }
        );

        assert!(matches!(
            validate_inventory_spec(&[0, 0, 0, 0, 0, 0, 0, 0, -1]),
            Err(ValidationError::Negative { index: 8, .. })
        ));
    }

    #[test]
    fn test_validate_inventory_spec_total_must_fit() {
        assert!(matches!(
            validate_inventory_spec(&[0, 0, 0, 0, 0, 0, 0, 0, i64::MAX / 100]),
            Err(ValidationError::TooLarge { .. })
        ));
        // Each product fits but the sum does not.
        assert!(matches!(
            validate_inventory_spec(&[0, 0, 0, 0, 0, 0, 0, i64::MAX / 300, i64::MAX / 1000]),
            Err(ValidationError::TooLarge { .. })
        ));

        let at_limit = i64::MAX / 500;
        assert_eq!(
            validate_inventory_spec(&[0, 0, 0, 0, 0, 0, 0, 0, at_limit]).unwrap()[8],
            at_limit as u64
        );
    }

    #[test]
    fn test_parse_pence() {
        assert_eq!(parse_pence("100").unwrap(), 100);
        assert_eq!(parse_pence(" 6 ").unwrap(), 6);
        assert_eq!(parse_pence("-5").unwrap(), -5);

        assert!(parse_pence("").is_err());
        assert!(parse_pence("£1").is_err());
        assert!(parse_pence("1.50").is_err());
        assert!(parse_pence("ten").is_err());
    }

    #[test]
    fn test_parse_quantity_list() {
        assert_eq!(
            parse_quantity_list("1, 2,5,1,2,5,1,2,5").unwrap(),
            vec![1, 2, 5, 1, 2, 5, 1, 2, 5]
        );
        assert_eq!(parse_quantity_list("-1").unwrap(), vec![-1]);

        assert!(parse_quantity_list("").is_err());
        assert!(matches!(
            parse_quantity_list("1,x,3"),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }
}
