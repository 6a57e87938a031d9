//! Manifest download endpoints
//!
//! Both encodings render the same grouped table; the filename embeds the
//! generation date for traceability.

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue},
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    manifest::{render_pages, render_table, PAGES_EXTENSION, TABLE_EXTENSION},
};

use super::AuthenticatedSession;

/// Manifest format selector
#[derive(Deserialize, IntoParams)]
pub struct ManifestQuery {
    /// "pages" (default) or "table"
    pub format: Option<String>,
}

/// Download the borrow manifest of a checkout
#[utoipa::path(
    get,
    path = "/checkouts/{id}/manifest",
    tag = "manifests",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Checkout ID"),
        ManifestQuery
    ),
    responses(
        (status = 200, description = "Manifest document"),
        (status = 400, description = "Unknown format"),
        (status = 404, description = "Checkout not found")
    )
)]
pub async fn download(
    State(state): State<crate::AppState>,
    AuthenticatedSession(_session): AuthenticatedSession,
    Path(checkout_id): Path<Uuid>,
    Query(query): Query<ManifestQuery>,
) -> AppResult<impl IntoResponse> {
    let manifest = state.services.manifests.build(checkout_id).await?;

    let (body, filename, content_type) = match query.format.as_deref().unwrap_or("pages") {
        "pages" => (
            render_pages(&manifest),
            manifest.filename(PAGES_EXTENSION),
            "text/plain; charset=utf-8",
        ),
        "table" => (
            render_table(&manifest),
            manifest.filename(TABLE_EXTENSION),
            "application/msword",
        ),
        other => {
            return Err(AppError::BadRequest(format!(
                "Unknown manifest format '{}', expected 'pages' or 'table'",
                other
            )))
        }
    };

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&format!("attachment; filename=\"{}\"", filename))
            .map_err(|e| AppError::Internal(format!("Invalid filename header: {}", e)))?,
    );

    Ok((headers, body))
}
