//! Borrow and return transactions

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::{
        cart::CartLine,
        record::{BorrowRecord, BorrowRecordDetails, BulkReturnReport, CheckoutRequest, CheckoutSummary},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct BorrowsService {
    repository: Repository,
}

impl BorrowsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Commit the cart as one all-or-nothing borrow transaction
    pub async fn checkout(
        &self,
        cart_lines: Vec<CartLine>,
        request: &CheckoutRequest,
    ) -> AppResult<CheckoutSummary> {
        if cart_lines.is_empty() {
            return Err(AppError::Validation("Cart is empty".to_string()));
        }
        let borrower = request.borrower_name.trim();
        if borrower.is_empty() {
            return Err(AppError::Validation("borrower_name is required".to_string()));
        }

        let borrowed_at = request.borrowed_at.unwrap_or_else(Utc::now);
        let lines: Vec<(i32, i32)> = cart_lines
            .iter()
            .map(|line| (line.item_id, line.quantity))
            .collect();

        self.repository
            .records
            .checkout(
                &lines,
                borrower,
                request.borrower_contact.as_deref(),
                borrowed_at,
            )
            .await
    }

    /// Return one borrow record
    pub async fn return_record(&self, record_id: i32) -> AppResult<BorrowRecord> {
        self.repository.records.return_record(record_id).await
    }

    /// Return every open record of a borrower. Individual failures are
    /// collected and reported; they never abort the sweep.
    pub async fn return_all_for_borrower(&self, borrower: &str) -> AppResult<BulkReturnReport> {
        let open = self
            .repository
            .records
            .list_active_for_borrower(borrower)
            .await?;

        let mut report = BulkReturnReport {
            returned: 0,
            failed: 0,
            errors: Vec::new(),
        };

        for record in open {
            match self.repository.records.return_record(record.id).await {
                Ok(_) => report.returned += 1,
                Err(e) => {
                    report.failed += 1;
                    report.errors.push(format!("record {}: {}", record.id, e));
                }
            }
        }

        Ok(report)
    }

    /// All open records with item details
    pub async fn list_active(&self) -> AppResult<Vec<BorrowRecordDetails>> {
        self.repository.records.list_active().await
    }

    /// Count open records
    pub async fn count_active(&self) -> AppResult<i64> {
        self.repository.records.count_active().await
    }
}
