//! Authentication endpoints
//!
//! One shared secret per capability level; a successful login opens a
//! session holding the role and the reservation cart.

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{error::AppResult, models::Role};

use super::AuthenticatedSession;

/// Login request
#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Shared secret (admin or member)
    pub secret: String,
}

/// Login response
#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub role: Role,
}

/// Current session info
#[derive(Serialize, ToSchema)]
pub struct SessionResponse {
    pub role: Role,
    pub created_at: DateTime<Utc>,
    /// Number of lines currently in the session cart
    pub cart_size: usize,
}

/// Exchange a shared secret for a session token
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session opened", body = LoginResponse),
        (status = 401, description = "Invalid secret")
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let session = state
        .services
        .sessions
        .login(&request.secret, &state.config.auth)?;

    Ok(Json(LoginResponse {
        token: session.token,
        token_type: "Bearer".to_string(),
        role: session.role,
    }))
}

/// Close the current session and discard its cart
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Session closed")
    )
)]
pub async fn logout(
    State(state): State<crate::AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
) -> AppResult<StatusCode> {
    state.services.sessions.logout(&session.token);
    Ok(StatusCode::NO_CONTENT)
}

/// Describe the current session
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Session info", body = SessionResponse)
    )
)]
pub async fn me(
    State(state): State<crate::AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
) -> AppResult<Json<SessionResponse>> {
    let cart_size = state
        .services
        .sessions
        .with_cart(&session.token, |cart| cart.len())?;

    Ok(Json(SessionResponse {
        role: session.role,
        created_at: session.created_at,
        cart_size,
    }))
}
