//! Item catalog endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::Multipart;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::item::{CreateItem, Item, ItemWithStatus, UpdateItem},
};

use super::{validate_payload, AuthenticatedSession};

/// Item created, possibly without its image
#[derive(Serialize, ToSchema)]
pub struct CreateItemResponse {
    pub item: Item,
    /// Set when the image upload failed and the item was saved without it
    pub image_warning: Option<String>,
}

/// Administrative ledger overwrite request
#[derive(Deserialize, ToSchema)]
pub struct SetBorrowedRequest {
    pub borrowed_quantity: i32,
}

/// List all items with availability status
#[utoipa::path(
    get,
    path = "/items",
    tag = "items",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Item list", body = Vec<ItemWithStatus>)
    )
)]
pub async fn list_items(
    State(state): State<crate::AppState>,
    AuthenticatedSession(_session): AuthenticatedSession,
) -> AppResult<Json<Vec<ItemWithStatus>>> {
    let items = state.services.inventory.list().await?;
    Ok(Json(items))
}

/// Get one item with availability status
#[utoipa::path(
    get,
    path = "/items/{id}",
    tag = "items",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Item details", body = ItemWithStatus),
        (status = 404, description = "Item not found")
    )
)]
pub async fn get_item(
    State(state): State<crate::AppState>,
    AuthenticatedSession(_session): AuthenticatedSession,
    Path(id): Path<i32>,
) -> AppResult<Json<ItemWithStatus>> {
    let item = state.services.inventory.get_by_id(id).await?;
    Ok(Json(item))
}

/// Create an item. Multipart: an `item` part with the JSON payload and an
/// optional `image` part. An image upload failure does not block the create;
/// it is reported in `image_warning`.
#[utoipa::path(
    post,
    path = "/items",
    tag = "items",
    security(("bearer_auth" = [])),
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Item created", body = CreateItemResponse),
        (status = 400, description = "Invalid payload")
    )
)]
pub async fn create_item(
    State(state): State<crate::AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<CreateItemResponse>)> {
    session.require_admin()?;

    let (data, image) = read_item_multipart(multipart).await?;
    let data = data.ok_or_else(|| AppError::BadRequest("Missing 'item' part".to_string()))?;
    validate_payload(&data)?;

    let (item, image_warning) = state.services.inventory.create(&data, image).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateItemResponse { item, image_warning }),
    ))
}

/// Update an item
#[utoipa::path(
    put,
    path = "/items/{id}",
    tag = "items",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Item ID")),
    request_body = UpdateItem,
    responses(
        (status = 200, description = "Item updated", body = Item),
        (status = 404, description = "Item not found"),
        (status = 409, description = "Quantity change conflicts with borrowed units")
    )
)]
pub async fn update_item(
    State(state): State<crate::AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Path(id): Path<i32>,
    Json(data): Json<UpdateItem>,
) -> AppResult<Json<Item>> {
    session.require_admin()?;
    validate_payload(&data)?;
    let item = state.services.inventory.update(id, &data).await?;
    Ok(Json(item))
}

/// Hard-delete an item from the catalog (borrow records are kept)
#[utoipa::path(
    delete,
    path = "/items/{id}",
    tag = "items",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Item ID")),
    responses(
        (status = 204, description = "Item deleted"),
        (status = 404, description = "Item not found")
    )
)]
pub async fn delete_item(
    State(state): State<crate::AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    session.require_admin()?;
    state.services.inventory.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Attach or replace the item photo
#[utoipa::path(
    post,
    path = "/items/{id}/image",
    tag = "items",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Item ID")),
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image attached", body = Item),
        (status = 404, description = "Item not found"),
        (status = 502, description = "Object storage failure")
    )
)]
pub async fn attach_image(
    State(state): State<crate::AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> AppResult<Json<Item>> {
    session.require_admin()?;

    let (_, image) = read_item_multipart(multipart).await?;
    let (bytes, content_type) =
        image.ok_or_else(|| AppError::BadRequest("Missing 'image' part".to_string()))?;

    let item = state
        .services
        .inventory
        .attach_image(id, bytes, &content_type)
        .await?;
    Ok(Json(item))
}

/// Administrative overwrite of the borrowed count. Values outside
/// `[0, total_quantity]` are rejected before the write.
#[utoipa::path(
    put,
    path = "/items/{id}/borrowed",
    tag = "items",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Item ID")),
    request_body = SetBorrowedRequest,
    responses(
        (status = 200, description = "Ledger corrected", body = ItemWithStatus),
        (status = 400, description = "Value out of range"),
        (status = 404, description = "Item not found")
    )
)]
pub async fn set_borrowed(
    State(state): State<crate::AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Path(id): Path<i32>,
    Json(request): Json<SetBorrowedRequest>,
) -> AppResult<Json<ItemWithStatus>> {
    session.require_admin()?;
    let item = state
        .services
        .inventory
        .force_set_borrowed(id, request.borrowed_quantity)
        .await?;
    Ok(Json(item))
}

/// Pull the `item` JSON part and the `image` part out of a multipart body
async fn read_item_multipart(
    mut multipart: Multipart,
) -> AppResult<(Option<CreateItem>, Option<(Vec<u8>, String)>)> {
    let mut data = None;
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {}", e)))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("item") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Unreadable 'item' part: {}", e)))?;
                data = Some(
                    serde_json::from_str(&text)
                        .map_err(|e| AppError::BadRequest(format!("Invalid item JSON: {}", e)))?,
                );
            }
            Some("image") => {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Unreadable 'image' part: {}", e)))?;
                image = Some((bytes.to_vec(), content_type));
            }
            _ => {}
        }
    }

    Ok((data, image))
}
