//! # Validation Module
//!
//! Input validation for shift and sale operations.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: UI form                                                      │
//! │  ├── Disables "Close shift" while a close is in flight                 │
//! │  └── Immediate inline feedback                                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE + money::to_money                                │
//! │  ├── Amounts parsed and rejected when negative                         │
//! │  └── Ids and quantities checked before any math runs                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK constraints on cents and quantity                           │
//! │  └── Guarded UPDATE ... WHERE status = 'open'                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::{MAX_AMOUNT_CENTS, MAX_ID_LENGTH, MAX_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Identifier Validators
// =============================================================================

/// Validates an opaque identifier (cashier id, shift id).
///
/// ## Rules
/// - Must not be empty or whitespace
/// - At most `MAX_ID_LENGTH` characters
///
/// ## Example
/// ```rust
/// use arqueo_core::validation::validate_id;
///
/// assert!(validate_id("cashier_id", "user-42").is_ok());
/// assert!(validate_id("cashier_id", "  ").is_err());
/// ```
pub fn validate_id(field: &str, id: &str) -> ValidationResult<()> {
    let id = id.trim();

    if id.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if id.chars().count() > MAX_ID_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_ID_LENGTH,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a sale quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Checks an amount that was already converted to Money.
///
/// ## Rules
/// - Must not be negative
/// - Must not exceed `MAX_AMOUNT_CENTS`, so sums of bounded amounts
///   (float + sales, counted - expected) stay exact in `i64`
///
/// `to_money` covers raw input; this covers Money built from cents by
/// callers (a backend payload, a test, the repository).
pub fn validate_amount(amount: Money, field: &str) -> CoreResult<()> {
    if amount.is_negative() {
        return Err(CoreError::invalid_amount(field, "cannot be negative"));
    }
    if amount.cents() > MAX_AMOUNT_CENTS {
        return Err(CoreError::invalid_amount(
            field,
            format!("exceeds maximum of {}", Money::from_cents(MAX_AMOUNT_CENTS)),
        ));
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_id() {
        assert!(validate_id("cashier_id", "user-42").is_ok());
        assert!(validate_id("cashier_id", "").is_err());
        assert!(validate_id("cashier_id", "   ").is_err());
        assert!(validate_id("cashier_id", &"a".repeat(MAX_ID_LENGTH)).is_ok());
        assert_eq!(
            validate_id("cashier_id", &"a".repeat(MAX_ID_LENGTH + 1)),
            Err(ValidationError::TooLong {
                field: "cashier_id".to_string(),
                max: MAX_ID_LENGTH,
            })
        );
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_ITEM_QUANTITY).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(MAX_ITEM_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount(Money::zero(), "initial_cash").is_ok());
        assert!(validate_amount(Money::from_cents(1), "initial_cash").is_ok());
        assert!(validate_amount(Money::from_cents(MAX_AMOUNT_CENTS), "initial_cash").is_ok());
        assert_eq!(
            validate_amount(Money::from_cents(-1), "counted_cash"),
            Err(CoreError::invalid_amount("counted_cash", "cannot be negative"))
        );
        assert!(matches!(
            validate_amount(Money::from_cents(MAX_AMOUNT_CENTS + 1), "counted_cash"),
            Err(CoreError::InvalidAmount { field, .. }) if field == "counted_cash"
        ));
    }
}
