//! Checkout and return endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::record::{
        BorrowRecord, BorrowRecordDetails, BulkReturnReport, CheckoutRequest, CheckoutSummary,
    },
};

use super::{validate_payload, AuthenticatedSession};

/// Bulk return request
#[derive(Deserialize, ToSchema)]
pub struct BulkReturnRequest {
    pub borrower_name: String,
}

/// Commit the session cart as one borrow transaction.
///
/// Every line is re-validated against live availability inside the
/// transaction; a single stale line aborts the whole checkout. On success
/// the cart is cleared and the committed lines are returned for manifest
/// generation.
#[utoipa::path(
    post,
    path = "/checkout",
    tag = "borrows",
    security(("bearer_auth" = [])),
    request_body = CheckoutRequest,
    responses(
        (status = 201, description = "Borrow committed", body = CheckoutSummary),
        (status = 400, description = "Empty cart or missing borrower name"),
        (status = 409, description = "Availability changed; nothing was committed")
    )
)]
pub async fn checkout(
    State(state): State<crate::AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Json(request): Json<CheckoutRequest>,
) -> AppResult<(StatusCode, Json<CheckoutSummary>)> {
    validate_payload(&request)?;

    let lines = state.services.sessions.cart_lines(&session.token)?;
    let summary = state.services.borrows.checkout(lines, &request).await?;

    // The reservation is durable now; the cart has served its purpose
    state
        .services
        .sessions
        .with_cart(&session.token, |cart| cart.clear())?;

    Ok((StatusCode::CREATED, Json(summary)))
}

/// List all open borrow records
#[utoipa::path(
    get,
    path = "/records",
    tag = "borrows",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Open records", body = Vec<BorrowRecordDetails>)
    )
)]
pub async fn list_records(
    State(state): State<crate::AppState>,
    AuthenticatedSession(_session): AuthenticatedSession,
) -> AppResult<Json<Vec<BorrowRecordDetails>>> {
    let records = state.services.borrows.list_active().await?;
    Ok(Json(records))
}

/// Return one borrow record. A record already returned stays returned;
/// the second call fails and the ledger is decremented exactly once.
#[utoipa::path(
    post,
    path = "/records/{id}/return",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Borrow record ID")),
    responses(
        (status = 200, description = "Record returned", body = BorrowRecord),
        (status = 404, description = "Record not found"),
        (status = 409, description = "Already returned")
    )
)]
pub async fn return_record(
    State(state): State<crate::AppState>,
    AuthenticatedSession(_session): AuthenticatedSession,
    Path(id): Path<i32>,
) -> AppResult<Json<BorrowRecord>> {
    let record = state.services.borrows.return_record(id).await?;
    Ok(Json(record))
}

/// Return every open record of a borrower. Partial-failure tolerant: one
/// bad record does not stop the sweep, the report counts both outcomes.
#[utoipa::path(
    post,
    path = "/records/return-all",
    tag = "borrows",
    security(("bearer_auth" = [])),
    request_body = BulkReturnRequest,
    responses(
        (status = 200, description = "Bulk return report", body = BulkReturnReport)
    )
)]
pub async fn return_all(
    State(state): State<crate::AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Json(request): Json<BulkReturnRequest>,
) -> AppResult<Json<BulkReturnReport>> {
    session.require_admin()?;
    let report = state
        .services
        .borrows
        .return_all_for_borrower(&request.borrower_name)
        .await?;
    Ok(Json(report))
}
