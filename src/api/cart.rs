//! Reservation cart endpoints
//!
//! The cart is session state; every operation validates against a fresh
//! item snapshot, and the definitive check happens again at checkout.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppResult;

use super::AuthenticatedSession;

/// Add-to-cart request
#[derive(Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub item_id: i32,
}

/// Quantity change request
#[derive(Deserialize, ToSchema)]
pub struct SetQuantityRequest {
    pub quantity: i32,
}

/// One cart line enriched with live item info
#[derive(Serialize, ToSchema)]
pub struct CartLineView {
    pub item_id: i32,
    pub item_name: String,
    pub quantity: i32,
    pub available_quantity: i32,
}

/// Cart contents
#[derive(Serialize, ToSchema)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
}

async fn cart_view(state: &crate::AppState, token: &str) -> AppResult<CartView> {
    let lines = state.services.sessions.cart_lines(token)?;
    let mut views = Vec::with_capacity(lines.len());
    for line in lines {
        // An item deleted since it was carted simply disappears from the view
        if let Ok(item) = state.services.inventory.get_by_id(line.item_id).await {
            views.push(CartLineView {
                item_id: line.item_id,
                item_name: item.item.name,
                quantity: line.quantity,
                available_quantity: item.available_quantity,
            });
        }
    }
    Ok(CartView { lines: views })
}

/// Current cart contents
#[utoipa::path(
    get,
    path = "/cart",
    tag = "cart",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Cart contents", body = CartView)
    )
)]
pub async fn view(
    State(state): State<crate::AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
) -> AppResult<Json<CartView>> {
    Ok(Json(cart_view(&state, &session.token).await?))
}

/// Add an item to the cart with quantity 1.
///
/// A silent no-op when the item is already carted, out of stock, or its
/// manual state disqualifies it; the response is the (possibly unchanged)
/// cart either way.
#[utoipa::path(
    post,
    path = "/cart/items",
    tag = "cart",
    security(("bearer_auth" = [])),
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Cart contents", body = CartView),
        (status = 404, description = "Item not found")
    )
)]
pub async fn add(
    State(state): State<crate::AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Json(request): Json<AddToCartRequest>,
) -> AppResult<Json<CartView>> {
    let item = state.services.inventory.get_by_id(request.item_id).await?;
    state
        .services
        .sessions
        .with_cart(&session.token, |cart| cart.add(&item.item))?;
    Ok(Json(cart_view(&state, &session.token).await?))
}

/// Set the requested quantity of a carted item, clamped to availability
#[utoipa::path(
    put,
    path = "/cart/items/{id}",
    tag = "cart",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Item ID")),
    request_body = SetQuantityRequest,
    responses(
        (status = 200, description = "Cart contents", body = CartView),
        (status = 404, description = "Item not found")
    )
)]
pub async fn set_quantity(
    State(state): State<crate::AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Path(item_id): Path<i32>,
    Json(request): Json<SetQuantityRequest>,
) -> AppResult<Json<CartView>> {
    let item = state.services.inventory.get_by_id(item_id).await?;
    state
        .services
        .sessions
        .with_cart(&session.token, |cart| {
            cart.set_quantity(&item.item, request.quantity)
        })?;
    Ok(Json(cart_view(&state, &session.token).await?))
}

/// Remove a cart line. No error if absent.
#[utoipa::path(
    delete,
    path = "/cart/items/{id}",
    tag = "cart",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Cart contents", body = CartView)
    )
)]
pub async fn remove(
    State(state): State<crate::AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Path(item_id): Path<i32>,
) -> AppResult<Json<CartView>> {
    state
        .services
        .sessions
        .with_cart(&session.token, |cart| cart.remove(item_id))?;
    Ok(Json(cart_view(&state, &session.token).await?))
}

/// Empty the cart unconditionally
#[utoipa::path(
    delete,
    path = "/cart",
    tag = "cart",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Cart contents", body = CartView)
    )
)]
pub async fn clear(
    State(state): State<crate::AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
) -> AppResult<Json<CartView>> {
    state
        .services
        .sessions
        .with_cart(&session.token, |cart| cart.clear())?;
    Ok(Json(cart_view(&state, &session.token).await?))
}
