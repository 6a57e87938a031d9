//! API handlers for Gearhouse REST endpoints

pub mod auth;
pub mod borrows;
pub mod cart;
pub mod health;
pub mod items;
pub mod manifests;
pub mod openapi;
pub mod stats;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    services::session::SessionInfo,
    AppState,
};

/// Extractor resolving the bearer token to a live session
pub struct AuthenticatedSession(pub SessionInfo);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // Get the Authorization header
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        // Check for Bearer token
        if !auth_header.starts_with("Bearer ") {
            return Err(AppError::Authentication(
                "Invalid authorization header format".to_string(),
            ));
        }

        let token = &auth_header[7..];

        let session = state
            .services
            .sessions
            .get(token)
            .ok_or_else(|| AppError::Authentication("Unknown or expired session".to_string()))?;

        Ok(AuthenticatedSession(session))
    }
}

/// Run derive-based payload validation, mapping failures to a 400
pub(crate) fn validate_payload<T: Validate>(payload: &T) -> AppResult<()> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))
}
