//! Borrow records repository: checkout and return transactions
//!
//! The two multi-row operations here run inside database transactions, so a
//! checkout is all-or-nothing and a return never leaves the ledger
//! decremented with the record still open.

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        item::Item,
        record::{BorrowRecord, BorrowRecordDetails, CheckoutSummary, CommittedLine},
    },
};

use super::items::{release_units, reserve_units};

#[derive(Clone)]
pub struct RecordsRepository {
    pool: Pool<Postgres>,
}

impl RecordsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get record by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<BorrowRecord> {
        sqlx::query_as::<_, BorrowRecord>("SELECT * FROM borrow_records WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Borrow record {} not found", id)))
    }

    /// Commit a validated cart as one borrow transaction.
    ///
    /// Every line is re-validated against the live row inside the
    /// transaction; the first line that no longer fits aborts the whole
    /// checkout with a Conflict naming the offending item, and the rollback
    /// undoes any reservations already applied.
    pub async fn checkout(
        &self,
        lines: &[(i32, i32)],
        borrower_name: &str,
        borrower_contact: Option<&str>,
        borrowed_at: DateTime<Utc>,
    ) -> AppResult<CheckoutSummary> {
        let checkout_id = Uuid::new_v4();
        let mut tx = self.pool.begin().await?;
        let mut committed = Vec::with_capacity(lines.len());

        for &(item_id, quantity) in lines {
            // Freshness check: lock and re-read the live row, never the
            // cart-time snapshot
            let item = sqlx::query_as::<_, Item>("SELECT * FROM items WHERE id = $1 FOR UPDATE")
                .bind(item_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Item {} not found", item_id)))?;

            if !reserve_units(&mut *tx, item_id, quantity).await? {
                // Dropping the transaction rolls back lines already reserved
                return if item.borrowable() {
                    Err(AppError::Conflict(format!(
                        "'{}' has only {} available, {} requested",
                        item.name,
                        item.available(),
                        quantity
                    )))
                } else {
                    Err(AppError::Conflict(format!(
                        "'{}' is no longer available ({})",
                        item.name,
                        item.status().label
                    )))
                };
            }

            let record_id = sqlx::query_scalar::<_, i32>(
                r#"
                INSERT INTO borrow_records
                    (item_id, checkout_id, borrower_name, borrower_contact, quantity, borrowed_at, is_returned)
                VALUES ($1, $2, $3, $4, $5, $6, FALSE)
                RETURNING id
                "#,
            )
            .bind(item_id)
            .bind(checkout_id)
            .bind(borrower_name)
            .bind(borrower_contact)
            .bind(quantity)
            .bind(borrowed_at)
            .fetch_one(&mut *tx)
            .await?;

            committed.push(CommittedLine {
                record_id,
                item_id,
                item_name: item.name,
                category: item.category,
                quantity,
            });
        }

        tx.commit().await?;

        Ok(CheckoutSummary {
            checkout_id,
            borrower_name: borrower_name.to_string(),
            borrower_contact: borrower_contact.map(str::to_string),
            borrowed_at,
            lines: committed,
        })
    }

    /// Reverse one borrow record: give the units back and close the record.
    ///
    /// A record that is already returned is terminal; returning it again is
    /// rejected, the ledger is decremented exactly once. Both steps commit
    /// together; a commit failure after the ledger step is surfaced as an
    /// inconsistency, never swallowed.
    pub async fn return_record(&self, id: i32) -> AppResult<BorrowRecord> {
        let mut tx = self.pool.begin().await?;

        let record =
            sqlx::query_as::<_, BorrowRecord>("SELECT * FROM borrow_records WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Borrow record {} not found", id)))?;

        if record.is_returned {
            return Err(AppError::Conflict(format!(
                "Borrow record {} is already returned",
                id
            )));
        }

        // The item may have been hard-deleted from the catalog; the record
        // is still closed in that case
        if !release_units(&mut *tx, record.item_id, record.quantity).await? {
            tracing::warn!(
                "Returning record {}: item {} no longer exists",
                id,
                record.item_id
            );
        }

        let returned_at = Utc::now();
        let updated = sqlx::query(
            "UPDATE borrow_records SET is_returned = TRUE, returned_at = $2 WHERE id = $1 AND is_returned = FALSE",
        )
        .bind(id)
        .bind(returned_at)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() != 1 {
            return Err(AppError::Inconsistency(format!(
                "Borrow record {} changed underneath its return transaction",
                id
            )));
        }

        tx.commit().await.map_err(|e| {
            AppError::Inconsistency(format!(
                "Return of record {} failed to commit, ledger state must be verified: {}",
                id, e
            ))
        })?;

        Ok(BorrowRecord {
            is_returned: true,
            returned_at: Some(returned_at),
            ..record
        })
    }

    /// All open records, newest borrow date first
    pub async fn list_active(&self) -> AppResult<Vec<BorrowRecordDetails>> {
        let rows = sqlx::query_as::<_, BorrowRecordDetails>(
            r#"
            SELECT r.id, r.item_id, r.checkout_id,
                   COALESCE(i.name, '(deleted item)') AS item_name,
                   COALESCE(i.category, 6::smallint) AS category,
                   r.borrower_name, r.borrower_contact, r.quantity,
                   r.borrowed_at, r.returned_at, r.is_returned
            FROM borrow_records r
            LEFT JOIN items i ON i.id = r.item_id
            WHERE r.is_returned = FALSE
            ORDER BY r.borrowed_at DESC, r.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Open records of one borrower
    pub async fn list_active_for_borrower(&self, borrower: &str) -> AppResult<Vec<BorrowRecord>> {
        let rows = sqlx::query_as::<_, BorrowRecord>(
            "SELECT * FROM borrow_records WHERE borrower_name = $1 AND is_returned = FALSE ORDER BY id",
        )
        .bind(borrower)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// All records of one checkout, open or returned, for manifest rendering
    pub async fn list_for_checkout(&self, checkout_id: Uuid) -> AppResult<Vec<BorrowRecordDetails>> {
        let rows = sqlx::query_as::<_, BorrowRecordDetails>(
            r#"
            SELECT r.id, r.item_id, r.checkout_id,
                   COALESCE(i.name, '(deleted item)') AS item_name,
                   COALESCE(i.category, 6::smallint) AS category,
                   r.borrower_name, r.borrower_contact, r.quantity,
                   r.borrowed_at, r.returned_at, r.is_returned
            FROM borrow_records r
            LEFT JOIN items i ON i.id = r.item_id
            WHERE r.checkout_id = $1
            ORDER BY r.id
            "#,
        )
        .bind(checkout_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Count open records
    pub async fn count_active(&self) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM borrow_records WHERE is_returned = FALSE")
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}
