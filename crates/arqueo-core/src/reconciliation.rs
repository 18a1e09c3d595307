//! # Cash Reconciliation (Arqueo)
//!
//! Compares the cash counted in the drawer against what should be there.
//!
//! ## Formula
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  expected_cash = initial_cash + cash_sales                              │
//! │  difference    = counted_cash - expected_cash                           │
//! │                                                                         │
//! │  difference == 0  →  EXACT                                              │
//! │  difference  > 0  →  OVERAGE   (more cash than expected)                │
//! │  difference  < 0  →  SHORTAGE  (cash is missing)                        │
//! │                                                                         │
//! │  Example: 500.00 + 169.99 = 669.99 expected                             │
//! │           670.00 counted → +0.01 OVERAGE                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The live preview shown while the cashier types and the result stored
//! at close both come from [`reconcile`], so they cannot disagree.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use ts_rs::TS;

use crate::money::Money;

/// Classification of the discrepancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ReconciliationStatus {
    Exact,
    Overage,
    Shortage,
}

impl ReconciliationStatus {
    /// Classifies a signed difference.
    pub fn from_difference(difference: Money) -> Self {
        match difference.cents().cmp(&0) {
            Ordering::Equal => ReconciliationStatus::Exact,
            Ordering::Greater => ReconciliationStatus::Overage,
            Ordering::Less => ReconciliationStatus::Shortage,
        }
    }
}

/// Auditable outcome of a cash count. Computed fresh each time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReconciliationResult {
    pub initial_cash: Money,
    pub cash_sales: Money,
    pub expected_cash: Money,
    pub counted_cash: Money,
    /// Signed: positive is surplus, negative is missing funds.
    pub difference: Money,
    pub status: ReconciliationStatus,
}

/// Computes the arqueo for a cash count.
///
/// Total function. Exact for inputs within `MAX_AMOUNT_CENTS`, which is
/// what `validate_amount` and `close_shift` guarantee; beyond that the
/// arithmetic saturates rather than wrapping.
///
/// ## Example
/// ```rust
/// use arqueo_core::money::Money;
/// use arqueo_core::reconciliation::{reconcile, ReconciliationStatus};
///
/// let result = reconcile(
///     Money::from_cents(50000),
///     Money::from_cents(16999),
///     Money::from_cents(67000),
/// );
/// assert_eq!(result.expected_cash.cents(), 66999);
/// assert_eq!(result.difference.cents(), 1);
/// assert_eq!(result.status, ReconciliationStatus::Overage);
/// ```
pub fn reconcile(initial_cash: Money, cash_sales: Money, counted_cash: Money) -> ReconciliationResult {
    let expected_cash = initial_cash.saturating_add(cash_sales);
    let difference = counted_cash.saturating_sub(expected_cash);

    ReconciliationResult {
        initial_cash,
        cash_sales,
        expected_cash,
        counted_cash,
        difference,
        status: ReconciliationStatus::from_difference(difference),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact() {
        let r = reconcile(Money::from_cents(10000), Money::from_cents(2550), Money::from_cents(12550));
        assert_eq!(r.difference, Money::zero());
        assert_eq!(r.status, ReconciliationStatus::Exact);
    }

    #[test]
    fn test_shortage_is_negative() {
        let r = reconcile(Money::from_cents(50000), Money::from_cents(16999), Money::from_cents(66998));
        assert_eq!(r.expected_cash.cents(), 66999);
        assert_eq!(r.difference.cents(), -1);
        assert_eq!(r.status, ReconciliationStatus::Shortage);
    }

    #[test]
    fn test_empty_drawer_with_no_sales() {
        let r = reconcile(Money::zero(), Money::zero(), Money::zero());
        assert_eq!(r.status, ReconciliationStatus::Exact);
    }

    #[test]
    fn test_sign_law_over_grid() {
        let values = [0, 1, 99, 100, 16999, 50000, 66999, 67000];
        for initial in values {
            for sales in values {
                for counted in values {
                    let r = reconcile(
                        Money::from_cents(initial),
                        Money::from_cents(sales),
                        Money::from_cents(counted),
                    );
                    let expected = initial + sales;
                    assert_eq!(r.expected_cash.cents(), expected);
                    assert_eq!(r.difference.cents(), counted - expected);
                    assert_eq!(r.status == ReconciliationStatus::Exact, counted == expected);
                    assert_eq!(r.status == ReconciliationStatus::Overage, counted > expected);
                    assert_eq!(r.status == ReconciliationStatus::Shortage, counted < expected);
                }
            }
        }
    }

    #[test]
    fn test_largest_accepted_amounts_stay_exact() {
        let max = Money::from_cents(crate::MAX_AMOUNT_CENTS);

        let r = reconcile(max, max, Money::zero());
        assert_eq!(r.expected_cash.cents(), 2 * crate::MAX_AMOUNT_CENTS);
        assert_eq!(r.difference.cents(), -2 * crate::MAX_AMOUNT_CENTS);
        assert_eq!(r.status, ReconciliationStatus::Shortage);

        let r = reconcile(Money::zero(), Money::zero(), max);
        assert_eq!(r.status, ReconciliationStatus::Overage);
    }

    #[test]
    fn test_out_of_range_inputs_do_not_panic() {
        let r = reconcile(Money::from_cents(i64::MAX), Money::from_cents(1), Money::zero());
        assert_eq!(r.expected_cash.cents(), i64::MAX);
        assert_eq!(r.status, ReconciliationStatus::Shortage);
    }

    #[test]
    fn test_repeated_calls_agree() {
        let preview = reconcile(Money::from_cents(500), Money::from_cents(250), Money::from_cents(700));
        let final_result = reconcile(Money::from_cents(500), Money::from_cents(250), Money::from_cents(700));
        assert_eq!(preview, final_result);
    }
}
