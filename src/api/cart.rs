//! Cart endpoints, mapped 1:1 onto the aggregation engine.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::auth::extract::CurrentUser;
use crate::cart::view::{CartView, LineItemView};
use crate::error::Result;
use crate::response::ApiResponse;
use crate::state::AppState;

pub async fn index(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<ApiResponse<CartView>>> {
    let view = state.cart.view(current.user.id).await?;
    Ok(Json(ApiResponse::success(
        view,
        "Cart retrieved successfully",
    )))
}

pub async fn count(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<ApiResponse<serde_json::Value>>> {
    let count = state.cart.item_count(current.user.id).await?;
    Ok(Json(ApiResponse::success(
        serde_json::json!({ "count": count }),
        "Cart count retrieved successfully",
    )))
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddToCartPayload {
    pub product_id: Uuid,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
}

pub async fn add(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(payload): Json<AddToCartPayload>,
) -> Result<(StatusCode, Json<ApiResponse<LineItemView>>)> {
    payload.validate()?;
    let item = state
        .cart
        .add_item(current.user.id, payload.product_id, payload.quantity)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            item,
            "Item added to cart successfully",
        )),
    ))
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateQuantityPayload {
    pub cart_item_id: Uuid,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
}

pub async fn update(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(payload): Json<UpdateQuantityPayload>,
) -> Result<Json<ApiResponse<LineItemView>>> {
    payload.validate()?;
    let item = state
        .cart
        .update_quantity(current.user.id, payload.cart_item_id, payload.quantity)
        .await?;
    Ok(Json(ApiResponse::success(
        item,
        "Cart item updated successfully",
    )))
}

#[derive(Debug, Deserialize)]
pub struct RemoveItemPayload {
    pub cart_item_id: Uuid,
}

pub async fn remove(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(payload): Json<RemoveItemPayload>,
) -> Result<Json<ApiResponse<()>>> {
    state
        .cart
        .remove_item(current.user.id, payload.cart_item_id)
        .await?;
    Ok(Json(ApiResponse::message(
        "Item removed from cart successfully",
    )))
}

pub async fn clear(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<ApiResponse<()>>> {
    let removed = state.cart.clear(current.user.id).await?;
    Ok(Json(ApiResponse::message(format!(
        "Cart cleared. {removed} items removed."
    ))))
}
