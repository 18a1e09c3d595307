//! # Domain Types
//!
//! Shift and transaction types shared by the engine and the database layer.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐        ┌──────────────────┐                        │
//! │  │     Shift       │ 1    * │   Transaction    │                        │
//! │  │  ─────────────  │◄───────│  ──────────────  │                        │
//! │  │  id (UUID)      │        │  id (UUID)       │                        │
//! │  │  cashier_id     │        │  shift_id (FK)   │                        │
//! │  │  initial_cash   │        │  quantity        │                        │
//! │  │  final_cash     │        │  unit_price      │                        │
//! │  │  status         │        │  total           │                        │
//! │  └─────────────────┘        │  payment_method  │                        │
//! │                             │  status          │                        │
//! │  ┌─────────────────┐        └──────────────────┘                        │
//! │  │  ShiftStatus    │   ┌────────────────┐   ┌────────────────────┐      │
//! │  │  Open           │   │ PaymentMethod  │   │ TransactionStatus  │      │
//! │  │  Closed         │   │ Cash           │   │ Pending            │      │
//! │  └─────────────────┘   │ Card           │   │ Completed  ◄ counts│      │
//! │                        │ Transfer       │   │ Failed             │      │
//! │                        └────────────────┘   │ Refunded           │      │
//! │                                             └────────────────────┘      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Shift Status
// =============================================================================

/// The status of a shift. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ShiftStatus {
    /// Cashier is working; sales are attributed to this shift.
    Open,
    /// Cash was counted and the shift was closed.
    Closed,
}

impl ShiftStatus {
    /// Database/wire representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ShiftStatus::Open => "open",
            ShiftStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for ShiftStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Payment Method
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash into the drawer. The only method that counts toward
    /// expected cash.
    Cash,
    /// Card payment on a terminal.
    Card,
    /// Bank transfer.
    Transfer,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [
        PaymentMethod::Cash,
        PaymentMethod::Card,
        PaymentMethod::Transfer,
    ];
}

// =============================================================================
// Transaction Status
// =============================================================================

/// Outcome of a sale. Only `Completed` sales hold value in the drawer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    #[default]
    Pending,
    Completed,
    Failed,
    Refunded,
}

// =============================================================================
// Shift
// =============================================================================

/// A cashier's working session, bounded by an open and a close.
///
/// Created by [`crate::shift::open_shift`], mutated only by
/// [`crate::shift::close_shift`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Shift {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Owning cashier (foreign reference, not owned here).
    pub cashier_id: String,

    #[ts(as = "String")]
    pub start_time: DateTime<Utc>,

    /// `None` while open.
    #[ts(as = "Option<String>")]
    pub end_time: Option<DateTime<Utc>>,

    /// Float declared at open. Never negative.
    pub initial_cash: Money,

    /// Cash counted at close. `None` while open.
    pub final_cash: Option<Money>,

    pub status: ShiftStatus,
}

impl Shift {
    /// Checks whether sales can still be attributed to this shift.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.status == ShiftStatus::Open
    }

    /// Length of the shift, if it has ended.
    pub fn duration(&self) -> Option<chrono::Duration> {
        self.end_time.map(|end| end - self.start_time)
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// A sale recorded against a shift.
///
/// Owned by the transaction service; read-only input to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Transaction {
    pub id: String,
    pub shift_id: String,
    /// Units sold (positive).
    pub quantity: i64,
    pub unit_price: Money,
    /// What was charged. Expected to equal `quantity × unit_price`.
    pub total: Money,
    pub payment_method: PaymentMethod,
    pub status: TransactionStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Checks whether this sale counts toward shift totals.
    #[inline]
    pub fn is_completed(&self) -> bool {
        self.status == TransactionStatus::Completed
    }

    /// Recomputes `quantity × unit_price`. `None` on overflow.
    #[inline]
    pub fn computed_total(&self) -> Option<Money> {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_status_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&ShiftStatus::Open).unwrap(), r#""open""#);
        assert_eq!(serde_json::to_string(&PaymentMethod::Transfer).unwrap(), r#""transfer""#);
        assert_eq!(
            serde_json::from_str::<TransactionStatus>(r#""refunded""#).unwrap(),
            TransactionStatus::Refunded
        );
    }

    #[test]
    fn test_transaction_status_default() {
        assert_eq!(TransactionStatus::default(), TransactionStatus::Pending);
    }

    #[test]
    fn test_computed_total() {
        let tx = Transaction {
            id: "t-1".to_string(),
            shift_id: "s-1".to_string(),
            quantity: 3,
            unit_price: Money::from_cents(299),
            total: Money::from_cents(897),
            payment_method: PaymentMethod::Cash,
            status: TransactionStatus::Completed,
            created_at: Utc::now(),
        };
        assert_eq!(tx.computed_total(), Some(tx.total));
        assert!(tx.is_completed());
    }

    #[test]
    fn test_shift_duration() {
        let start = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
        let mut shift = Shift {
            id: "s-1".to_string(),
            cashier_id: "c-1".to_string(),
            start_time: start,
            end_time: None,
            initial_cash: Money::from_cents(50000),
            final_cash: None,
            status: ShiftStatus::Open,
        };
        assert!(shift.is_open());
        assert_eq!(shift.duration(), None);

        shift.end_time = Some(start + chrono::Duration::hours(8));
        assert_eq!(shift.duration(), Some(chrono::Duration::hours(8)));
    }
}
