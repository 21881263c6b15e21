//! Checkout and order history endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::extract::CurrentUser;
use crate::error::{ApiError, Result};
use crate::orders::{Order, OrderItem};
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Default)]
pub struct CheckoutPayload {
    pub shipping_address: Option<serde_json::Value>,
}

pub async fn checkout(
    State(state): State<AppState>,
    current: CurrentUser,
    payload: Option<Json<CheckoutPayload>>,
) -> Result<(StatusCode, Json<ApiResponse<Order>>)> {
    let shipping_address = payload
        .and_then(|Json(p)| p.shipping_address)
        .unwrap_or_else(|| serde_json::json!({}));

    let order = state.orders.checkout(current.user.id, shipping_address).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(order, "Order placed successfully")),
    ))
}

pub async fn index(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<ApiResponse<Vec<Order>>>> {
    let orders = state.orders.orders_for_user(current.user.id).await?;
    Ok(Json(ApiResponse::success(
        orders,
        "Orders retrieved successfully",
    )))
}

#[derive(Debug, Serialize)]
pub struct OrderDetailData {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

pub async fn show(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<OrderDetailData>>> {
    let (order, items) = state
        .orders
        .find_for_user(current.user.id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Order not found".to_string()))?;

    Ok(Json(ApiResponse::success(
        OrderDetailData { order, items },
        "Order retrieved successfully",
    )))
}
