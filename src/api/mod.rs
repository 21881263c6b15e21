//! HTTP surface: the router and per-resource handlers.

pub mod auth;
pub mod cart;
pub mod categories;
pub mod home;
pub mod orders;
pub mod products;
pub mod users;

use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::User;
use crate::error::{ApiError, Result};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/home", get(home::index))
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
        .route("/api/logout", post(auth::logout))
        .route("/api/profile", get(auth::profile).put(auth::update_profile))
        .route("/api/products", get(products::index))
        .route("/api/products/search", get(products::search))
        .route("/api/products/featured", get(products::featured))
        .route("/api/products/:id", get(products::show))
        .route("/api/categories", get(categories::index))
        .route("/api/categories/:slug/page", get(categories::page))
        .route("/api/categories/:id", get(categories::show))
        .route("/api/users", get(users::index))
        .route("/api/users/:id", get(users::show))
        .route("/api/cart", get(cart::index))
        .route("/api/cart/count", get(cart::count))
        .route("/api/cart/add", post(cart::add))
        .route("/api/cart/update", put(cart::update))
        .route("/api/cart/remove", delete(cart::remove))
        .route("/api/cart/clear", delete(cart::clear))
        .route("/api/checkout", post(orders::checkout))
        .route("/api/orders", get(orders::index))
        .route("/api/orders/:id", get(orders::show))
        .route("/api/admin/products", post(products::create))
        .route(
            "/api/admin/products/:id",
            put(products::update).delete(products::destroy),
        )
        .route("/api/admin/categories", post(categories::create))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "healthy", "service": "storefront-api"}))
}

/// Catalog management is for staff accounts only.
pub(crate) fn ensure_admin(user: &User) -> Result<()> {
    if !user.is_admin() {
        return Err(ApiError::Forbidden(
            "Administrator access required".to_string(),
        ));
    }
    Ok(())
}
