//! Registration, login, logout, and profile endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::extract::CurrentUser;
use crate::auth::service::{NewUser, ProfileChanges};
use crate::auth::UserProfile;
use crate::error::{ApiError, Result};
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AuthData {
    pub user: UserProfile,
    pub token: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterPayload {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    pub password_confirmation: Option<String>,
}

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<(StatusCode, Json<ApiResponse<AuthData>>)> {
    payload.validate()?;
    if let Some(confirmation) = &payload.password_confirmation {
        if confirmation != &payload.password {
            return Err(ApiError::Validation(
                "Password confirmation does not match".to_string(),
            ));
        }
    }

    let (user, token) = state
        .auth
        .register(NewUser {
            name: payload.name,
            email: payload.email,
            password: payload.password,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            AuthData { user, token },
            "User registered successfully",
        )),
    ))
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginPayload {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<ApiResponse<AuthData>>> {
    payload.validate()?;
    let (user, token) = state.auth.login(&payload.email, &payload.password).await?;
    Ok(Json(ApiResponse::success(
        AuthData { user, token },
        "Login successful",
    )))
}

pub async fn logout(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<ApiResponse<()>>> {
    state.auth.revoke_token(&current.token_digest).await?;
    Ok(Json(ApiResponse::message("Logged out successfully")))
}

pub async fn profile(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<ApiResponse<UserProfile>>> {
    let profile = state.auth.profile(current.user.id).await?;
    Ok(Json(ApiResponse::success(
        profile,
        "Profile retrieved successfully",
    )))
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfilePayload {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(email(message = "A valid email address is required"))]
    pub email: Option<String>,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(length(max = 500))]
    pub address: Option<String>,
    #[validate(length(max = 100))]
    pub city: Option<String>,
    #[validate(length(max = 20))]
    pub postal_code: Option<String>,
}

pub async fn update_profile(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(payload): Json<UpdateProfilePayload>,
) -> Result<Json<ApiResponse<UserProfile>>> {
    payload.validate()?;
    let profile = state
        .auth
        .update_profile(
            current.user.id,
            ProfileChanges {
                name: payload.name,
                email: payload.email,
                password: payload.password,
                phone: payload.phone,
                address: payload.address,
                city: payload.city,
                postal_code: payload.postal_code,
            },
        )
        .await?;
    Ok(Json(ApiResponse::success(
        profile,
        "Profile updated successfully",
    )))
}
