//! Product browsing and admin management endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::auth::extract::CurrentUser;
use crate::catalog::store::{CatalogReader, NewProduct, Page, ProductChanges, ProductFilter};
use crate::catalog::view::{shape_products, Pagination, ProductView};
use crate::catalog::{Category, Product};
use crate::error::{ApiError, Result};
use crate::response::ApiResponse;
use crate::state::AppState;

use super::ensure_admin;

#[derive(Debug, Serialize)]
pub struct ProductListData {
    pub products: Vec<ProductView>,
    pub pagination: Pagination,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub category: Option<String>,
    pub featured: Option<String>,
}

fn flag(value: &Option<String>) -> bool {
    matches!(value.as_deref(), Some("true") | Some("1"))
}

async fn categories_for(state: &AppState, products: &[Product]) -> Result<Vec<Category>> {
    let ids: Vec<Uuid> = products.iter().filter_map(|p| p.category_id).collect();
    state.catalog.find_categories_by_ids(&ids).await
}

pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ApiResponse<ProductListData>>> {
    let mut filter = ProductFilter {
        featured: flag(&params.featured),
        ..ProductFilter::default()
    };
    if let Some(slug) = &params.category {
        // An unknown category slug matches nothing rather than everything.
        match state.catalog.find_category_by_slug(slug).await? {
            Some(category) => filter.category_id = Some(category.id),
            None => {
                return Ok(Json(ApiResponse::success(
                    ProductListData {
                        products: Vec::new(),
                        pagination: Pagination::new(1, 12, 0, 0),
                    },
                    "Products retrieved successfully",
                )))
            }
        }
    }

    let page = Page::new(params.page, params.per_page, 12);
    let (products, total) = state.catalog.list_products(&filter, page).await?;
    let categories = categories_for(&state, &products).await?;

    Ok(Json(ApiResponse::success(
        ProductListData {
            pagination: Pagination::new(page.page, page.per_page, total, products.len()),
            products: shape_products(&products, &categories, &state.assets),
        },
        "Products retrieved successfully",
    )))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub category: Option<Uuid>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<ApiResponse<ProductListData>>> {
    let filter = ProductFilter {
        category_id: params.category,
        search: params.q.clone(),
        min_price: params.min_price,
        max_price: params.max_price,
        featured: false,
    };
    let page = Page::new(params.page, params.per_page, 15);
    let (products, total) = state.catalog.list_products(&filter, page).await?;
    let categories = categories_for(&state, &products).await?;

    Ok(Json(ApiResponse::success(
        ProductListData {
            pagination: Pagination::new(page.page, page.per_page, total, products.len()),
            products: shape_products(&products, &categories, &state.assets),
        },
        "Search results retrieved successfully",
    )))
}

pub async fn featured(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ProductView>>>> {
    let products = state.catalog.featured_products(8).await?;
    let categories = categories_for(&state, &products).await?;
    Ok(Json(ApiResponse::success(
        shape_products(&products, &categories, &state.assets),
        "Featured products retrieved successfully",
    )))
}

/// Detail lookup accepts either the product id or its slug.
pub async fn show(
    State(state): State<AppState>,
    Path(id_or_slug): Path<String>,
) -> Result<Json<ApiResponse<ProductView>>> {
    let mut product = None;
    if let Ok(id) = id_or_slug.parse::<Uuid>() {
        product = state.catalog.find_product(id).await?;
    }
    if product.is_none() {
        product = state.catalog.find_product_by_slug(&id_or_slug).await?;
    }
    let product = product.ok_or_else(|| {
        ApiError::NotFound(format!("Product with ID or slug '{id_or_slug}' not found"))
    })?;

    let category = match product.category_id {
        Some(id) => state.catalog.find_category(id).await?,
        None => None,
    };

    Ok(Json(ApiResponse::success(
        ProductView::from_product(&product, category.as_ref(), &state.assets),
        "Product retrieved successfully",
    )))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductPayload {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    pub price: Decimal,
    pub category_id: Option<Uuid>,
    pub stock: Option<i32>,
    pub image: Option<String>,
}

pub async fn create(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(payload): Json<CreateProductPayload>,
) -> Result<(StatusCode, Json<ApiResponse<Product>>)> {
    ensure_admin(&current.user)?;
    payload.validate()?;
    if payload.price < Decimal::ZERO {
        return Err(ApiError::Validation("Price must not be negative".to_string()));
    }
    if let Some(category_id) = payload.category_id {
        if state.catalog.find_category(category_id).await?.is_none() {
            return Err(ApiError::Validation("Category does not exist".to_string()));
        }
    }

    let product = state
        .catalog
        .create_product(NewProduct {
            name: payload.name,
            description: payload.description,
            price: payload.price,
            category_id: payload.category_id,
            stock: payload.stock.unwrap_or(0),
            image: payload.image,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            product,
            "Product created successfully",
        )),
    ))
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProductPayload {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub category_id: Option<Uuid>,
    pub stock: Option<i32>,
}

pub async fn update(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductPayload>,
) -> Result<Json<ApiResponse<Product>>> {
    ensure_admin(&current.user)?;
    payload.validate()?;
    if matches!(payload.price, Some(price) if price < Decimal::ZERO) {
        return Err(ApiError::Validation("Price must not be negative".to_string()));
    }
    if let Some(category_id) = payload.category_id {
        if state.catalog.find_category(category_id).await?.is_none() {
            return Err(ApiError::Validation("Category does not exist".to_string()));
        }
    }

    let product = state
        .catalog
        .update_product(
            id,
            ProductChanges {
                name: payload.name,
                description: payload.description,
                price: payload.price,
                category_id: payload.category_id,
                stock: payload.stock,
            },
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

    Ok(Json(ApiResponse::success(
        product,
        "Product updated successfully",
    )))
}

pub async fn destroy(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    ensure_admin(&current.user)?;
    if !state.catalog.delete_product(id).await? {
        return Err(ApiError::NotFound("Product not found".to_string()));
    }
    Ok(Json(ApiResponse::message("Product deleted successfully")))
}
