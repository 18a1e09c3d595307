//! # Shift Service
//!
//! Runs the engine against the database: load, decide in `arqueo-core`,
//! persist.
//!
//! ## Close Round-Trip
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  close_shift(shift_id, counted)                                         │
//! │       │                                                                 │
//! │       ├── shifts().get_by_id ─────────── ShiftNotFound                  │
//! │       ├── transactions().list_for_shift                                 │
//! │       ├── arqueo_core::close_shift ───── InvalidState / InvalidAmount   │
//! │       │        (nothing written yet, shift stays open)                  │
//! │       ├── warn! per DataIntegrityWarning                                │
//! │       └── shifts().mark_closed ──────── lost race → InvalidState        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use arqueo_core::validation::{validate_amount, validate_quantity};
use arqueo_core::{
    aggregate, close_shift, open_shift, preview_close, CoreError, Money, PaymentMethod, ReconciliationResult,
    SalesSummary, Shift, ShiftClosure, ShiftPhase, ShiftStatus, Transaction, TransactionStatus,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DbError, ServiceError, ServiceResult};
use crate::pool::Database;
use crate::repository::shift::ShiftRepository;
use crate::repository::transaction::TransactionRepository;

// =============================================================================
// Requests
// =============================================================================

/// A sale to record against an open shift. The total is computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSale {
    pub quantity: i64,
    #[serde(with = "arqueo_core::money::decimal_string")]
    pub unit_price: Money,
    pub payment_method: PaymentMethod,
    #[serde(default = "completed")]
    pub status: TransactionStatus,
}

fn completed() -> TransactionStatus {
    TransactionStatus::Completed
}

impl NewSale {
    /// A completed sale.
    pub fn new(quantity: i64, unit_price: Money, payment_method: PaymentMethod) -> Self {
        NewSale {
            quantity,
            unit_price,
            payment_method,
            status: TransactionStatus::Completed,
        }
    }

    /// Same sale with a different outcome.
    pub fn with_status(mut self, status: TransactionStatus) -> Self {
        self.status = status;
        self
    }
}

// =============================================================================
// Service
// =============================================================================

/// Shift open/record/close operations backed by SQLite.
#[derive(Debug, Clone)]
pub struct ShiftService {
    shifts: ShiftRepository,
    transactions: TransactionRepository,
}

impl ShiftService {
    pub fn new(db: &Database) -> Self {
        ShiftService {
            shifts: db.shifts(),
            transactions: db.transactions(),
        }
    }

    /// Opens a shift for `cashier_id`, unless one is already open.
    pub async fn open_shift(&self, cashier_id: &str, initial_cash: Money) -> ServiceResult<Shift> {
        let shift = open_shift(cashier_id, initial_cash, Utc::now())?;

        if let Some(existing) = self.shifts.get_open_for_cashier(&shift.cashier_id).await? {
            return Err(ServiceError::ShiftAlreadyOpen {
                cashier_id: existing.cashier_id,
                shift_id: existing.id,
            });
        }

        self.insert_opening(&shift).await?;

        info!(
            shift_id = %shift.id,
            cashier_id = %shift.cashier_id,
            initial_cash = %shift.initial_cash,
            "Shift opened"
        );

        Ok(shift)
    }

    /// Inserts a new open shift, resolving a race with another till.
    ///
    /// The partial unique index rejects a second open row. If the rival is
    /// still open that is `ShiftAlreadyOpen`; if it was closed again before
    /// we could look, the slot is free and the insert is retried.
    async fn insert_opening(&self, shift: &Shift) -> ServiceResult<()> {
        const ATTEMPTS: usize = 3;

        for attempt in 1..=ATTEMPTS {
            match self.shifts.insert(shift).await {
                Ok(()) => return Ok(()),
                Err(err) if err.is_unique_violation() => {
                    if let Some(rival) = self.shifts.get_open_for_cashier(&shift.cashier_id).await? {
                        return Err(ServiceError::ShiftAlreadyOpen {
                            cashier_id: rival.cashier_id,
                            shift_id: rival.id,
                        });
                    }
                    if attempt == ATTEMPTS {
                        return Err(err.into());
                    }
                    debug!(cashier_id = %shift.cashier_id, attempt, "Rival shift closed meanwhile, retrying open");
                }
                Err(err) => return Err(err.into()),
            }
        }

        Ok(())
    }

    /// Records a sale on an open shift.
    pub async fn record_sale(&self, shift_id: &str, sale: NewSale) -> ServiceResult<Transaction> {
        validate_quantity(sale.quantity).map_err(CoreError::from)?;
        validate_amount(sale.unit_price, "unit_price")?;

        let shift = self.load(shift_id).await?;
        if !shift.is_open() {
            return Err(CoreError::invalid_state(&shift.id, shift.status, "record sale").into());
        }

        let total = sale
            .unit_price
            .multiply_quantity(sale.quantity)
            .ok_or_else(|| CoreError::invalid_amount("total", "too large"))?;
        validate_amount(total, "total")?;

        let tx = Transaction {
            id: Uuid::new_v4().to_string(),
            shift_id: shift.id,
            quantity: sale.quantity,
            unit_price: sale.unit_price,
            total,
            payment_method: sale.payment_method,
            status: sale.status,
            created_at: Utc::now(),
        };
        self.insert_sale(&tx).await?;

        Ok(tx)
    }

    /// Writes a sale; a shift closed since it was loaded rejects it.
    async fn insert_sale(&self, tx: &Transaction) -> ServiceResult<()> {
        match self.transactions.insert(tx).await {
            Ok(()) => Ok(()),
            Err(DbError::NotFound { .. }) => {
                Err(CoreError::invalid_state(&tx.shift_id, ShiftStatus::Closed, "record sale").into())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Sale statistics for a shift, open or closed.
    pub async fn sales_summary(&self, shift_id: &str) -> ServiceResult<SalesSummary> {
        let shift = self.load(shift_id).await?;
        let txs = self.transactions.list_for_shift(&shift.id).await?;
        Ok(aggregate(&txs))
    }

    /// The arqueo the shift would get if closed with `counted_cash` now.
    /// Writes nothing.
    pub async fn preview_close(&self, shift_id: &str, counted_cash: Money) -> ServiceResult<ReconciliationResult> {
        let shift = self.load(shift_id).await?;
        let txs = self.transactions.list_for_shift(&shift.id).await?;
        Ok(preview_close(&shift, counted_cash, &txs)?)
    }

    /// Closes the shift and persists the count.
    ///
    /// On any error the stored shift is still open (or was already closed).
    pub async fn close_shift(&self, shift_id: &str, counted_cash: Money) -> ServiceResult<ShiftClosure> {
        let mut shift = self.load(shift_id).await?;
        let txs = self.transactions.list_for_shift(&shift.id).await?;

        let closure = close_shift(&mut shift, counted_cash, &txs, Utc::now())?;

        for warning in &closure.summary.warnings {
            warn!(
                shift_id = %shift.id,
                transaction_id = %warning.transaction_id,
                stored = %warning.stored,
                "Stored total does not match quantity x unit price"
            );
        }

        match self.shifts.mark_closed(&closure.shift).await {
            Ok(()) => {}
            Err(DbError::NotFound { .. }) => {
                return Err(CoreError::invalid_state(&shift.id, ShiftStatus::Closed, "close shift").into());
            }
            Err(err) => return Err(err.into()),
        }

        let r = &closure.reconciliation;
        info!(
            shift_id = %shift.id,
            expected = %r.expected_cash,
            counted = %r.counted_cash,
            difference = %r.difference,
            status = ?r.status,
            duration_secs = closure.shift.duration().map(|d| d.num_seconds()),
            "Shift closed"
        );

        Ok(closure)
    }

    /// Where the cashier stands: no shift yet, working, or last shift closed.
    pub async fn current_phase(&self, cashier_id: &str) -> ServiceResult<ShiftPhase> {
        let cashier_id = cashier_id.trim();

        // An open shift wins regardless of how start times sort
        if self.shifts.get_open_for_cashier(cashier_id).await?.is_some() {
            return Ok(ShiftPhase::Open);
        }

        let latest = self.shifts.latest_for_cashier(cashier_id).await?;
        Ok(ShiftPhase::of(latest.as_ref()))
    }

    async fn load(&self, shift_id: &str) -> ServiceResult<Shift> {
        self.shifts
            .get_by_id(shift_id)
            .await?
            .ok_or_else(|| ServiceError::ShiftNotFound(shift_id.to_string()))
    }
}

// =============================================================================
// Tests
// =============================================================================
