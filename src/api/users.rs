//! Public user endpoints: listings and profiles without sensitive fields.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{User, UserProfile};
use crate::catalog::store::Page;
use crate::catalog::view::Pagination;
use crate::error::{ApiError, Result};
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct UserListData {
    pub users: Vec<UserProfile>,
    pub pagination: Pagination,
}

pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ApiResponse<UserListData>>> {
    let page = Page::new(params.page, params.per_page, 15);
    let users = sqlx::query_as::<_, User>(
        "SELECT * FROM users ORDER BY created_at DESC LIMIT $1 OFFSET $2",
    )
    .bind(page.limit())
    .bind(page.offset())
    .fetch_all(&state.db)
    .await?;
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&state.db)
        .await?;

    Ok(Json(ApiResponse::success(
        UserListData {
            pagination: Pagination::new(page.page, page.per_page, total, users.len()),
            users: users.iter().map(UserProfile::from).collect(),
        },
        "Users retrieved successfully",
    )))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<UserProfile>>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(ApiResponse::success(
        UserProfile::from(&user),
        "User retrieved successfully",
    )))
}
