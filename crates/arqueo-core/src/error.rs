//! # Error Types
//!
//! Domain-specific error types for arqueo-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  arqueo-core errors (this file)                                        │
//! │  ├── CoreError             - Rejected operations (fatal to the call)   │
//! │  │   ├── InvalidAmount     - bad money input, re-prompt the cashier    │
//! │  │   ├── InvalidState      - shift not in the required state           │
//! │  │   └── Validation        - other field validation                    │
//! │  ├── ValidationError       - Input validation failures                 │
//! │  └── DataIntegrityWarning  - Non-fatal, reported next to the result    │
//! │                                                                         │
//! │  arqueo-db errors (separate crate)                                     │
//! │  └── DbError / ServiceError                                            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ServiceError → UI message         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field, shift id, status)
//! 3. Errors are enum variants, never String
//! 4. No hidden retries: every error is returned to the caller as-is

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use crate::money::Money;
use crate::types::ShiftStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A monetary input is negative, non-finite, or not parseable.
    ///
    /// ## User Workflow
    /// ```text
    /// Close Shift: counted cash "-0.01"
    ///      │
    ///      ▼
    /// InvalidAmount { field: "counted_cash", reason: "cannot be negative" }
    ///      │
    ///      ▼
    /// UI shows the message inline, shift stays OPEN
    /// ```
    #[error("Invalid amount for {field}: {reason}")]
    InvalidAmount { field: String, reason: String },

    /// The shift is not in a state that allows the requested operation.
    ///
    /// ## When This Occurs
    /// - Closing a shift that is already closed (double submit)
    /// - Previewing the arqueo of a closed shift
    #[error("Shift {shift_id} is {status}, cannot {operation}")]
    InvalidState {
        shift_id: String,
        status: ShiftStatus,
        operation: String,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates an InvalidAmount error.
    pub fn invalid_amount(field: impl Into<String>, reason: impl Into<String>) -> Self {
        CoreError::InvalidAmount {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates an InvalidState error.
    pub fn invalid_state(
        shift_id: impl Into<String>,
        status: ShiftStatus,
        operation: impl Into<String>,
    ) -> Self {
        CoreError::InvalidState {
            shift_id: shift_id.into(),
            status,
            operation: operation.into(),
        }
    }

    /// Re-labels an InvalidAmount with the caller's field name.
    ///
    /// Parsers only know they saw "an amount"; the caller knows it was
    /// the counted cash.
    pub fn with_field(self, field: &str) -> Self {
        match self {
            CoreError::InvalidAmount { reason, .. } => CoreError::InvalidAmount {
                field: field.to_string(),
                reason,
            },
            other => other,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Data Integrity Warning
// =============================================================================

/// A transaction whose stored total disagrees with `quantity × unit_price`.
///
/// Aggregation keeps using the stored total (it is what was charged) and
/// hands this back so an operator can look at the sale.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize, TS)]
#[ts(export)]
#[error(
    "Transaction {transaction_id}: stored total {stored} does not match quantity x unit price ({})",
    .computed.map_or_else(|| "overflow".to_string(), |m| m.to_string())
)]
pub struct DataIntegrityWarning {
    pub transaction_id: String,
    pub stored: Money,
    /// `None` when `quantity × unit_price` overflows.
    pub computed: Option<Money>,
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
