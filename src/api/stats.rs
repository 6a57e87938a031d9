//! Statistics endpoint

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AppResult;

use super::AuthenticatedSession;

/// Unit totals for one category
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryUnits {
    pub category: String,
    pub total_units: i64,
    pub borrowed_units: i64,
}

/// Dashboard counts
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatsResponse {
    pub item_count: i64,
    pub total_units: i64,
    pub borrowed_units: i64,
    pub available_units: i64,
    pub active_records: i64,
    pub categories: Vec<CategoryUnits>,
}

/// Inventory dashboard counts
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Inventory statistics", body = StatsResponse)
    )
)]
pub async fn get_stats(
    State(state): State<crate::AppState>,
    AuthenticatedSession(_session): AuthenticatedSession,
) -> AppResult<Json<StatsResponse>> {
    let stats = state.services.stats.get_stats().await?;
    Ok(Json(stats))
}
