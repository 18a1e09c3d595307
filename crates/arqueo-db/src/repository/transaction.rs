//! # Transaction Repository
//!
//! Sales recorded against a shift. Rows are written once; only `status`
//! changes afterwards (a pending card payment completing, a refund).

use arqueo_core::{Transaction, TransactionStatus};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};

/// Repository for transaction database operations.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TransactionRepository { pool }
    }

    /// Inserts a transaction. The stored `total` is written as given.
    ///
    /// The row is only written while its shift is still open; the check and
    /// the write are one statement, so a close cannot slip in between.
    /// A missing or closed shift yields `NotFound("Shift (open)")`.
    pub async fn insert(&self, tx: &Transaction) -> DbResult<()> {
        debug!(
            id = %tx.id,
            shift_id = %tx.shift_id,
            total = %tx.total,
            method = ?tx.payment_method,
            "Inserting transaction"
        );

        let result = sqlx::query(
            r#"
            INSERT INTO transactions (
                id, shift_id, quantity, unit_price, total,
                payment_method, status, created_at
            )
            SELECT ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8
            WHERE EXISTS (SELECT 1 FROM shifts WHERE id = ?2 AND status = 'open')
            "#,
        )
        .bind(&tx.id)
        .bind(&tx.shift_id)
        .bind(tx.quantity)
        .bind(tx.unit_price)
        .bind(tx.total)
        .bind(tx.payment_method)
        .bind(tx.status)
        .bind(tx.created_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Shift (open)", &tx.shift_id));
        }

        Ok(())
    }

    /// All transactions recorded against a shift, in recording order.
    pub async fn list_for_shift(&self, shift_id: &str) -> DbResult<Vec<Transaction>> {
        let txs = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT
                id, shift_id, quantity, unit_price, total,
                payment_method, status, created_at
            FROM transactions
            WHERE shift_id = ?1
            ORDER BY created_at, rowid
            "#,
        )
        .bind(shift_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(txs)
    }

    /// Changes a transaction's status.
    pub async fn update_status(&self, id: &str, status: TransactionStatus) -> DbResult<()> {
        debug!(id = %id, status = ?status, "Updating transaction status");

        let result = sqlx::query("UPDATE transactions SET status = ?2 WHERE id = ?1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Transaction", id));
        }

        Ok(())
    }
}
