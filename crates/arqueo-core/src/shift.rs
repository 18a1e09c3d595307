//! # Shift Lifecycle
//!
//! State transitions for a cashier's shift.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   NO_SHIFT ──open_shift(initial_cash)──► OPEN ──close_shift(counted)──► │
//! │      ▲                                    │                 CLOSED      │
//! │      │                                    │ preview_close     │         │
//! │      │                                    └──(no change)      │         │
//! │      │                                                        │         │
//! │      └──────── a NEW shift may be opened afterwards ◄─────────┘         │
//! │                                                                         │
//! │  CLOSED is terminal: close_shift on it fails with InvalidState and     │
//! │  leaves final_cash untouched (double-submit protection).               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Timestamps are passed in by the caller; this module never reads the
//! clock.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::aggregator::{aggregate, SalesSummary};
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::reconciliation::{reconcile, ReconciliationResult};
use crate::types::{Shift, ShiftStatus, Transaction};
use crate::validation::{validate_amount, validate_id};

// =============================================================================
// Phase
// =============================================================================

/// Where a cashier stands in the lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ShiftPhase {
    NoShift,
    Open,
    Closed,
}

impl ShiftPhase {
    /// Phase from the cashier's most recent shift, if any.
    pub fn of(latest: Option<&Shift>) -> Self {
        match latest.map(|shift| shift.status) {
            None => ShiftPhase::NoShift,
            Some(ShiftStatus::Open) => ShiftPhase::Open,
            Some(ShiftStatus::Closed) => ShiftPhase::Closed,
        }
    }

    /// Checks whether a new shift may be opened.
    pub fn can_open(&self) -> bool {
        !matches!(self, ShiftPhase::Open)
    }
}

// =============================================================================
// Closure
// =============================================================================

/// Everything produced by a successful close, for display and printing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ShiftClosure {
    /// The shift as it is after closing.
    pub shift: Shift,
    pub summary: SalesSummary,
    pub reconciliation: ReconciliationResult,
}

// =============================================================================
// Transitions
// =============================================================================

/// Opens a new shift for `cashier_id` with a declared float.
///
/// "One open shift per cashier" is the backend's rule; this function only
/// builds the shift.
///
/// ## Errors
/// - `InvalidAmount` when `initial_cash` is negative or above `MAX_AMOUNT_CENTS`
/// - `Validation` when `cashier_id` is empty or too long
pub fn open_shift(cashier_id: &str, initial_cash: Money, opened_at: DateTime<Utc>) -> CoreResult<Shift> {
    validate_id("cashier_id", cashier_id)?;
    validate_amount(initial_cash, "initial_cash")?;

    Ok(Shift {
        id: Uuid::new_v4().to_string(),
        cashier_id: cashier_id.trim().to_string(),
        start_time: opened_at,
        end_time: None,
        initial_cash,
        final_cash: None,
        status: ShiftStatus::Open,
    })
}

/// Closes an open shift with the counted cash and returns the arqueo.
///
/// Only transactions whose `shift_id` matches this shift are aggregated.
///
/// ## Errors
/// All leave `shift` exactly as it was:
/// - `InvalidState` when the shift is not open (including a second close)
/// - `InvalidAmount` when `counted_cash` is negative or above
///   `MAX_AMOUNT_CENTS`, or when the cash sales add up past it
///
/// ## Example
/// ```rust
/// use arqueo_core::money::Money;
/// use arqueo_core::shift::{close_shift, open_shift};
/// use chrono::Utc;
///
/// let mut shift = open_shift("cashier-1", Money::from_cents(50000), Utc::now()).unwrap();
/// let closure = close_shift(&mut shift, Money::from_cents(50000), &[], Utc::now()).unwrap();
/// assert!(closure.reconciliation.difference.is_zero());
///
/// // Double submit is rejected
/// assert!(close_shift(&mut shift, Money::from_cents(1), &[], Utc::now()).is_err());
/// assert_eq!(shift.final_cash, Some(Money::from_cents(50000)));
/// ```
pub fn close_shift(
    shift: &mut Shift,
    counted_cash: Money,
    transactions: &[Transaction],
    closed_at: DateTime<Utc>,
) -> CoreResult<ShiftClosure> {
    ensure_open(shift, "close shift")?;
    validate_amount(counted_cash, "counted_cash")?;

    let (summary, reconciliation) = audit(shift, counted_cash, transactions)?;

    shift.end_time = Some(closed_at);
    shift.final_cash = Some(counted_cash);
    shift.status = ShiftStatus::Closed;

    Ok(ShiftClosure {
        shift: shift.clone(),
        summary,
        reconciliation,
    })
}

/// Computes the arqueo an open shift would get if closed now.
///
/// No side effects; backs the live preview while the cashier counts.
pub fn preview_close(
    shift: &Shift,
    counted_cash: Money,
    transactions: &[Transaction],
) -> CoreResult<ReconciliationResult> {
    ensure_open(shift, "preview close")?;
    validate_amount(counted_cash, "counted_cash")?;

    let (_, reconciliation) = audit(shift, counted_cash, transactions)?;
    Ok(reconciliation)
}

fn ensure_open(shift: &Shift, operation: &str) -> CoreResult<()> {
    if shift.status != ShiftStatus::Open {
        return Err(CoreError::invalid_state(&shift.id, shift.status, operation));
    }
    Ok(())
}

fn audit(
    shift: &Shift,
    counted_cash: Money,
    transactions: &[Transaction],
) -> CoreResult<(SalesSummary, ReconciliationResult)> {
    // Float comes from storage, not only from open_shift
    validate_amount(shift.initial_cash, "initial_cash")?;

    let summary = aggregate(transactions.iter().filter(|tx| tx.shift_id == shift.id));
    validate_amount(summary.cash_sales, "cash_sales")?;

    let reconciliation = reconcile(shift.initial_cash, summary.cash_sales, counted_cash);
    Ok((summary, reconciliation))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::to_money;
    use crate::reconciliation::ReconciliationStatus;
    use crate::types::{PaymentMethod, TransactionStatus};
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, hour, 0, 0).unwrap()
    }

    fn sale(shift: &Shift, id: &str, total: &str, method: PaymentMethod, status: TransactionStatus) -> Transaction {
        let total = to_money(total, "total").unwrap();
        Transaction {
            id: id.to_string(),
            shift_id: shift.id.clone(),
            quantity: 1,
            unit_price: total,
            total,
            payment_method: method,
            status,
            created_at: at(10),
        }
    }

    #[test]
    fn test_open_shift() {
        let shift = open_shift(" cashier-1 ", Money::from_cents(50000), at(8)).unwrap();

        assert_eq!(shift.cashier_id, "cashier-1");
        assert_eq!(shift.status, ShiftStatus::Open);
        assert_eq!(shift.start_time, at(8));
        assert_eq!(shift.end_time, None);
        assert_eq!(shift.final_cash, None);
        assert!(Uuid::parse_str(&shift.id).is_ok());
    }

    #[test]
    fn test_open_shift_rejects_negative_float() {
        let err = open_shift("cashier-1", Money::from_cents(-100), at(8)).unwrap_err();
        assert_eq!(err, CoreError::invalid_amount("initial_cash", "cannot be negative"));
    }

    #[test]
    fn test_open_shift_requires_cashier() {
        let err = open_shift("", Money::zero(), at(8)).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_full_scenario_overage_by_one_cent() {
        let mut shift = open_shift("cashier-1", to_money("500.00", "initial_cash").unwrap(), at(8)).unwrap();
        let txs = vec![
            sale(&shift, "a", "150.00", PaymentMethod::Cash, TransactionStatus::Completed),
            sale(&shift, "b", "80.50", PaymentMethod::Card, TransactionStatus::Completed),
            sale(&shift, "c", "19.99", PaymentMethod::Cash, TransactionStatus::Completed),
            sale(&shift, "d", "500.00", PaymentMethod::Cash, TransactionStatus::Failed),
        ];

        let closure = close_shift(&mut shift, to_money("670.00", "counted_cash").unwrap(), &txs, at(16)).unwrap();

        assert_eq!(closure.summary.cash_sales.cents(), 16999);
        assert_eq!(closure.summary.total.cents(), 25049);
        assert_eq!(closure.reconciliation.expected_cash.cents(), 66999);
        assert_eq!(closure.reconciliation.difference.cents(), 1);
        assert_eq!(closure.reconciliation.status, ReconciliationStatus::Overage);

        assert_eq!(shift.status, ShiftStatus::Closed);
        assert_eq!(shift.end_time, Some(at(16)));
        assert_eq!(shift.final_cash, Some(Money::from_cents(67000)));
        assert_eq!(closure.shift, shift);
    }

    #[test]
    fn test_second_close_is_rejected_and_keeps_final_cash() {
        let mut shift = open_shift("cashier-1", Money::from_cents(1000), at(8)).unwrap();
        close_shift(&mut shift, Money::from_cents(1000), &[], at(16)).unwrap();
        let before = shift.clone();

        let err = close_shift(&mut shift, Money::from_cents(9999), &[], at(17)).unwrap_err();

        assert!(matches!(err, CoreError::InvalidState { status: ShiftStatus::Closed, .. }));
        assert_eq!(shift, before);
    }

    #[test]
    fn test_negative_count_leaves_shift_open() {
        let mut shift = open_shift("cashier-1", Money::from_cents(1000), at(8)).unwrap();
        let before = shift.clone();

        let err = close_shift(&mut shift, Money::from_cents(-1), &[], at(16)).unwrap_err();

        assert_eq!(err, CoreError::invalid_amount("counted_cash", "cannot be negative"));
        assert_eq!(shift, before);

        // Still closable afterwards
        assert!(close_shift(&mut shift, Money::from_cents(1000), &[], at(16)).is_ok());
    }

    #[test]
    fn test_largest_float_plus_a_cent_reconciles_exactly() {
        assert!(open_shift("cashier-1", Money::from_cents(i64::MAX - 1), at(8)).is_err());

        let float = to_money("1000000000000.00", "initial_cash").unwrap();
        let mut shift = open_shift("cashier-1", float, at(8)).unwrap();
        let txs = vec![sale(&shift, "a", "0.01", PaymentMethod::Cash, TransactionStatus::Completed)];

        let closure = close_shift(&mut shift, float, &txs, at(16)).unwrap();

        assert_eq!(closure.reconciliation.expected_cash.cents(), crate::MAX_AMOUNT_CENTS + 1);
        assert_eq!(closure.reconciliation.difference.cents(), -1);
        assert_eq!(closure.reconciliation.status, ReconciliationStatus::Shortage);
    }

    #[test]
    fn test_cash_sales_past_the_limit_reject_the_close() {
        let mut shift = open_shift("cashier-1", Money::from_cents(100), at(8)).unwrap();
        let mut corrupt = sale(&shift, "a", "0.01", PaymentMethod::Cash, TransactionStatus::Completed);
        corrupt.total = Money::from_cents(i64::MAX);
        let txs = vec![corrupt, sale(&shift, "b", "0.01", PaymentMethod::Cash, TransactionStatus::Completed)];
        let before = shift.clone();

        let err = close_shift(&mut shift, Money::zero(), &txs, at(16)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidAmount { ref field, .. } if field == "cash_sales"));
        assert_eq!(shift, before);

        assert!(preview_close(&shift, Money::zero(), &txs).is_err());
    }

    #[test]
    fn test_preview_matches_close_and_has_no_side_effects() {
        let mut shift = open_shift("cashier-1", Money::from_cents(20000), at(8)).unwrap();
        let txs = vec![
            sale(&shift, "a", "12.34", PaymentMethod::Cash, TransactionStatus::Completed),
            sale(&shift, "b", "5.00", PaymentMethod::Cash, TransactionStatus::Refunded),
        ];
        let counted = Money::from_cents(21200);

        let preview = preview_close(&shift, counted, &txs).unwrap();
        assert!(shift.is_open());

        let closure = close_shift(&mut shift, counted, &txs, at(16)).unwrap();
        assert_eq!(preview, closure.reconciliation);
        assert_eq!(preview.difference.cents(), -34);
        assert_eq!(preview.status, ReconciliationStatus::Shortage);

        assert!(preview_close(&shift, counted, &txs).is_err());
    }

    #[test]
    fn test_close_ignores_other_shifts_transactions() {
        let mut shift = open_shift("cashier-1", Money::zero(), at(8)).unwrap();
        let mut foreign = sale(&shift, "x", "99.00", PaymentMethod::Cash, TransactionStatus::Completed);
        foreign.shift_id = "another-shift".to_string();

        let closure = close_shift(&mut shift, Money::zero(), &[foreign], at(16)).unwrap();
        assert_eq!(closure.summary.count, 0);
        assert_eq!(closure.reconciliation.status, ReconciliationStatus::Exact);
    }

    #[test]
    fn test_phase() {
        assert_eq!(ShiftPhase::of(None), ShiftPhase::NoShift);
        assert!(ShiftPhase::NoShift.can_open());

        let mut shift = open_shift("cashier-1", Money::zero(), at(8)).unwrap();
        assert_eq!(ShiftPhase::of(Some(&shift)), ShiftPhase::Open);
        assert!(!ShiftPhase::Open.can_open());

        close_shift(&mut shift, Money::zero(), &[], at(9)).unwrap();
        assert_eq!(ShiftPhase::of(Some(&shift)), ShiftPhase::Closed);
        assert!(ShiftPhase::Closed.can_open());
    }
}
