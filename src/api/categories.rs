//! Category browsing and admin management endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::auth::extract::CurrentUser;
use crate::catalog::store::{Page, ProductFilter};
use crate::catalog::view::{shape_products, Pagination, ProductView};
use crate::catalog::Category;
use crate::error::{ApiError, Result};
use crate::response::ApiResponse;
use crate::state::AppState;

use super::ensure_admin;

pub async fn index(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Category>>>> {
    let categories = state.catalog.list_categories().await?;
    Ok(Json(ApiResponse::success(
        categories,
        "Categories retrieved successfully",
    )))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Category>>> {
    let category = state
        .catalog
        .find_category(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))?;
    Ok(Json(ApiResponse::success(
        category,
        "Category retrieved successfully",
    )))
}

#[derive(Debug, Serialize)]
pub struct CategoryHero {
    pub img: String,
    pub title: String,
    pub subtitle: String,
}

#[derive(Debug, Serialize)]
pub struct CategoryPageData {
    pub category: CategoryPageHeader,
    pub products: Vec<ProductView>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct CategoryPageHeader {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub hero: CategoryHero,
}

#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Everything the category landing page needs in one call: the category,
/// its hero banner, and a page of its products.
pub async fn page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Json<ApiResponse<CategoryPageData>>> {
    let category = state
        .catalog
        .find_category_by_slug(&slug)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Category with slug '{slug}' not found"))
        })?;

    let filter = ProductFilter {
        category_id: Some(category.id),
        ..ProductFilter::default()
    };
    let page = Page::new(params.page, params.per_page, 12);
    let (products, total) = state.catalog.list_products(&filter, page).await?;

    let hero = CategoryHero {
        img: state.assets.hero_image(&category.slug),
        title: category.name.to_uppercase(),
        subtitle: String::new(),
    };

    Ok(Json(ApiResponse::success(
        CategoryPageData {
            pagination: Pagination::new(page.page, page.per_page, total, products.len()),
            products: shape_products(&products, std::slice::from_ref(&category), &state.assets),
            category: CategoryPageHeader {
                id: category.id,
                name: category.name,
                slug: category.slug,
                hero,
            },
        },
        "Category products retrieved successfully",
    )))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryPayload {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,
    pub description: Option<String>,
}

pub async fn create(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(payload): Json<CreateCategoryPayload>,
) -> Result<(StatusCode, Json<ApiResponse<Category>>)> {
    ensure_admin(&current.user)?;
    payload.validate()?;
    let category = state
        .catalog
        .create_category(&payload.name, payload.description.as_deref())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            category,
            "Category created successfully",
        )),
    ))
}
