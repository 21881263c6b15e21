//! Request extractor resolving the bearer token to a user.
//!
//! Handlers take the resolved identity as an explicit argument; nothing
//! downstream reads authentication state out of request-scoped storage.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use super::{token_digest, User};
use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated caller, plus the digest of the token that was
/// presented (needed by logout to revoke exactly that token).
pub struct CurrentUser {
    pub user: User,
    pub token_digest: String,
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                ApiError::Authentication("Authentication required".to_string())
            })?;

        let secret = header.strip_prefix("Bearer ").ok_or_else(|| {
            ApiError::Authentication("Malformed authorization header".to_string())
        })?;

        let user = state
            .auth
            .user_for_token(secret)
            .await?
            .ok_or_else(|| ApiError::Authentication("Invalid or expired token".to_string()))?;

        Ok(CurrentUser {
            user,
            token_digest: token_digest(secret),
        })
    }
}
