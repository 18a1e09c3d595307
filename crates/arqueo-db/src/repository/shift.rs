//! # Shift Repository
//!
//! Database operations for shifts.
//!
//! ## Shift Rows
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  insert()       → status 'open', end_time NULL, final_cash NULL         │
//! │                   (partial unique index: one open row per cashier)      │
//! │                                                                         │
//! │  mark_closed()  → UPDATE ... WHERE id = ? AND status = 'open'           │
//! │                   0 rows = somebody else closed it first                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use arqueo_core::{Shift, ShiftStatus};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};

const SHIFT_COLUMNS: &str = "id, cashier_id, start_time, end_time, initial_cash, final_cash, status";

/// Repository for shift database operations.
#[derive(Debug, Clone)]
pub struct ShiftRepository {
    pool: SqlitePool,
}

impl ShiftRepository {
    /// Creates a new ShiftRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ShiftRepository { pool }
    }

    /// Inserts a freshly opened shift.
    pub async fn insert(&self, shift: &Shift) -> DbResult<()> {
        debug!(id = %shift.id, cashier_id = %shift.cashier_id, "Inserting shift");

        sqlx::query(
            r#"
            INSERT INTO shifts (
                id, cashier_id, start_time, end_time,
                initial_cash, final_cash, status
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&shift.id)
        .bind(&shift.cashier_id)
        .bind(shift.start_time)
        .bind(shift.end_time)
        .bind(shift.initial_cash)
        .bind(shift.final_cash)
        .bind(shift.status)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a shift by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Shift>> {
        let shift = sqlx::query_as::<_, Shift>(&format!("SELECT {SHIFT_COLUMNS} FROM shifts WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(shift)
    }

    /// Gets the cashier's open shift, if any.
    pub async fn get_open_for_cashier(&self, cashier_id: &str) -> DbResult<Option<Shift>> {
        let shift = sqlx::query_as::<_, Shift>(&format!(
            "SELECT {SHIFT_COLUMNS} FROM shifts WHERE cashier_id = ?1 AND status = ?2"
        ))
        .bind(cashier_id)
        .bind(ShiftStatus::Open)
        .fetch_optional(&self.pool)
        .await?;

        Ok(shift)
    }

    /// Gets the cashier's most recently started shift, open or closed.
    pub async fn latest_for_cashier(&self, cashier_id: &str) -> DbResult<Option<Shift>> {
        let shift = sqlx::query_as::<_, Shift>(&format!(
            "SELECT {SHIFT_COLUMNS} FROM shifts WHERE cashier_id = ?1 \
             ORDER BY start_time DESC, rowid DESC LIMIT 1"
        ))
        .bind(cashier_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(shift)
    }

    /// Lists a cashier's shifts, newest first.
    pub async fn list_for_cashier(&self, cashier_id: &str, limit: u32) -> DbResult<Vec<Shift>> {
        let shifts = sqlx::query_as::<_, Shift>(&format!(
            "SELECT {SHIFT_COLUMNS} FROM shifts WHERE cashier_id = ?1 \
             ORDER BY start_time DESC, rowid DESC LIMIT ?2"
        ))
        .bind(cashier_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(shifts)
    }

    /// Persists a close computed by the engine.
    ///
    /// Only succeeds if the row is still open; a concurrent close that got
    /// there first yields `NotFound("Shift (open)")`.
    pub async fn mark_closed(&self, shift: &Shift) -> DbResult<()> {
        debug!(id = %shift.id, final_cash = ?shift.final_cash, "Closing shift");

        let result = sqlx::query(
            r#"
            UPDATE shifts SET
                status = ?2,
                end_time = ?3,
                final_cash = ?4
            WHERE id = ?1 AND status = 'open'
            "#,
        )
        .bind(&shift.id)
        .bind(ShiftStatus::Closed)
        .bind(shift.end_time)
        .bind(shift.final_cash)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Shift (open)", &shift.id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use arqueo_core::{close_shift, open_shift, Money};
    use chrono::{DateTime, TimeZone, Utc};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, hour, 0, 0).unwrap()
    }

    async fn repo() -> ShiftRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().shifts()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let repo = repo().await;
        let shift = open_shift("cashier-1", Money::from_cents(50000), at(8)).unwrap();
        repo.insert(&shift).await.unwrap();

        let loaded = repo.get_by_id(&shift.id).await.unwrap().unwrap();
        assert_eq!(loaded, shift);
        assert!(repo.get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_second_open_row_violates_unique_index() {
        let repo = repo().await;
        let first = open_shift("cashier-1", Money::zero(), at(8)).unwrap();
        let second = open_shift("cashier-1", Money::zero(), at(9)).unwrap();
        repo.insert(&first).await.unwrap();

        let err = repo.insert(&second).await.unwrap_err();
        assert!(err.is_unique_violation(), "got {err:?}");
    }

    #[tokio::test]
    async fn test_mark_closed_is_guarded() {
        let repo = repo().await;
        let mut shift = open_shift("cashier-1", Money::from_cents(1000), at(8)).unwrap();
        repo.insert(&shift).await.unwrap();

        close_shift(&mut shift, Money::from_cents(1000), &[], at(16)).unwrap();
        repo.mark_closed(&shift).await.unwrap();

        let loaded = repo.get_by_id(&shift.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, ShiftStatus::Closed);
        assert_eq!(loaded.final_cash, Some(Money::from_cents(1000)));
        assert_eq!(loaded.end_time, Some(at(16)));
        assert!(repo.get_open_for_cashier("cashier-1").await.unwrap().is_none());

        let err = repo.mark_closed(&shift).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_latest_and_list_order() {
        let repo = repo().await;
        let mut morning = open_shift("cashier-1", Money::zero(), at(6)).unwrap();
        repo.insert(&morning).await.unwrap();
        close_shift(&mut morning, Money::zero(), &[], at(12)).unwrap();
        repo.mark_closed(&morning).await.unwrap();

        let evening = open_shift("cashier-1", Money::zero(), at(13)).unwrap();
        repo.insert(&evening).await.unwrap();
        let other = open_shift("cashier-2", Money::zero(), at(14)).unwrap();
        repo.insert(&other).await.unwrap();

        let latest = repo.latest_for_cashier("cashier-1").await.unwrap().unwrap();
        assert_eq!(latest.id, evening.id);

        let listed: Vec<String> = repo
            .list_for_cashier("cashier-1", 10)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(listed, vec![evening.id.clone(), morning.id.clone()]);

        assert!(repo.latest_for_cashier("nobody").await.unwrap().is_none());
    }
}
