//! # Transaction Aggregator
//!
//! Reduces the sales of one shift into the totals the arqueo needs.
//!
//! ## What Counts
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Transactions for shift S                                               │
//! │                                                                         │
//! │  { 150.00, CASH, COMPLETED } ──┐                                        │
//! │  {  80.50, CARD, COMPLETED } ──┼──► total      = 250.49                 │
//! │  {  19.99, CASH, COMPLETED } ──┤    count      = 3                      │
//! │  { 500.00, CASH, FAILED    } ✗ │    by_method  = CASH: 2 / 169.99       │
//! │  {  12.00, CASH, REFUNDED  } ✗ │                 CARD: 1 /  80.50       │
//! │  {   9.00, CARD, PENDING   } ✗ ┘    cash_sales = 169.99                 │
//! │                                                                         │
//! │  Only COMPLETED sales hold value in the drawer or the bank.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sums are integer cents, so the result is the same to the cent whatever
//! the order of the input, and two partial summaries can be merged.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::error::DataIntegrityWarning;
use crate::money::Money;
use crate::types::{PaymentMethod, Transaction};

// =============================================================================
// Breakdown
// =============================================================================

/// Count and sum of completed sales for one payment method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MethodTotals {
    pub count: u64,
    pub total: Money,
}

/// One entry per payment method observed among completed sales.
pub type PaymentMethodBreakdown = BTreeMap<PaymentMethod, MethodTotals>;

// =============================================================================
// Sales Summary
// =============================================================================

/// Sale statistics for a shift.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalesSummary {
    /// Sum of completed sale totals, all methods.
    pub total: Money,
    /// Number of completed sales.
    pub count: u64,
    pub by_method: PaymentMethodBreakdown,
    /// Completed cash sales; zero when there were none.
    pub cash_sales: Money,
    /// Sales whose stored total disagrees with quantity × unit price.
    pub warnings: Vec<DataIntegrityWarning>,
}

impl SalesSummary {
    /// Folds one sale into the summary. Non-completed sales are ignored.
    pub fn record(&mut self, tx: &Transaction) {
        if !tx.is_completed() {
            return;
        }

        // Saturating: a corrupt stored total must not panic the summary.
        // Callers bound the result (see shift::close_shift).
        self.total = self.total.saturating_add(tx.total);
        self.count += 1;

        let entry = self.by_method.entry(tx.payment_method).or_default();
        entry.count += 1;
        entry.total = entry.total.saturating_add(tx.total);

        if tx.payment_method == PaymentMethod::Cash {
            self.cash_sales = self.cash_sales.saturating_add(tx.total);
        }

        let computed = tx.computed_total();
        if computed != Some(tx.total) {
            self.warnings.push(DataIntegrityWarning {
                transaction_id: tx.id.clone(),
                stored: tx.total,
                computed,
            });
        }
    }

    /// Combines two partial summaries (e.g. two pages of transactions).
    ///
    /// ## Example
    /// ```rust
    /// use arqueo_core::aggregator::SalesSummary;
    ///
    /// let merged = SalesSummary::default().merge(SalesSummary::default());
    /// assert_eq!(merged.count, 0);
    /// ```
    pub fn merge(mut self, other: SalesSummary) -> SalesSummary {
        self.total = self.total.saturating_add(other.total);
        self.count += other.count;
        self.cash_sales = self.cash_sales.saturating_add(other.cash_sales);

        for (method, totals) in other.by_method {
            let entry = self.by_method.entry(method).or_default();
            entry.count += totals.count;
            entry.total = entry.total.saturating_add(totals.total);
        }

        self.warnings.extend(other.warnings);
        self
    }

    /// Totals for a single method, zero when the method was never used.
    pub fn method(&self, method: PaymentMethod) -> MethodTotals {
        self.by_method.get(&method).copied().unwrap_or_default()
    }

    /// Checks whether any sale failed the quantity × unit price check.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

// =============================================================================
// Aggregate
// =============================================================================

/// Reduces a shift's transactions into a [`SalesSummary`].
///
/// Pure: no side effects, and the same input always yields the same
/// totals regardless of order.
///
/// ## Example
/// ```rust
/// use arqueo_core::aggregator::aggregate;
/// use arqueo_core::Transaction;
///
/// let none: Vec<Transaction> = Vec::new();
/// let summary = aggregate(&none);
/// assert!(summary.cash_sales.is_zero());
/// ```
pub fn aggregate<'a, I>(transactions: I) -> SalesSummary
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut summary = SalesSummary::default();
    for tx in transactions {
        summary.record(tx);
    }
    summary
}

// =============================================================================
// Unit Tests
// =============================================================================
