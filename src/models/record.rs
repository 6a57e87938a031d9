//! Borrow record model and checkout/return types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Borrow record from the database. Append-only: created by a checkout,
/// closed by a return, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BorrowRecord {
    pub id: i32,
    pub item_id: i32,
    /// Groups the records committed by one checkout
    pub checkout_id: Uuid,
    pub borrower_name: String,
    pub borrower_contact: Option<String>,
    pub quantity: i32,
    /// Logical borrow date (caller-suppliable, may differ from created_at)
    pub borrowed_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
    pub is_returned: bool,
    pub created_at: Option<DateTime<Utc>>,
}

/// Active borrow record joined with its item, for listings
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct BorrowRecordDetails {
    pub id: i32,
    pub item_id: i32,
    pub checkout_id: Uuid,
    pub item_name: String,
    /// Item category code
    pub category: i16,
    pub borrower_name: String,
    pub borrower_contact: Option<String>,
    pub quantity: i32,
    pub borrowed_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
    pub is_returned: bool,
}

/// Checkout (borrow transaction) request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CheckoutRequest {
    #[validate(length(min = 1, max = 200, message = "borrower_name is required"))]
    pub borrower_name: String,
    pub borrower_contact: Option<String>,
    /// Logical borrow date; defaults to now. Backdating is allowed.
    pub borrowed_at: Option<DateTime<Utc>>,
}

/// One committed line of a checkout
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CommittedLine {
    pub record_id: i32,
    pub item_id: i32,
    pub item_name: String,
    /// Item category code
    pub category: i16,
    pub quantity: i32,
}

/// Result of a successful checkout
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CheckoutSummary {
    pub checkout_id: Uuid,
    pub borrower_name: String,
    pub borrower_contact: Option<String>,
    pub borrowed_at: DateTime<Utc>,
    pub lines: Vec<CommittedLine>,
}

/// Outcome of a bulk return: per-record failures do not abort the sweep
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BulkReturnReport {
    pub returned: u32,
    pub failed: u32,
    /// One message per record that could not be returned
    pub errors: Vec<String>,
}
