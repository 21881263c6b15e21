//! Homepage payload: everything the landing screen renders in one call.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::catalog::store::CatalogReader;
use crate::catalog::view::{shape_products, ProductView};
use crate::error::Result;
use crate::response::ApiResponse;
use crate::state::AppState;

/// The storefront's main navigation categories, in display order.
const MAIN_CATEGORY_SLUGS: [&str; 4] = ["men", "women", "footwear", "accessories"];

#[derive(Debug, Serialize)]
pub struct HomeCategory {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub image: String,
    pub route: String,
}

#[derive(Debug, Serialize)]
pub struct FeaturedProduct {
    #[serde(flatten)]
    pub product: ProductView,
    pub route: String,
}

#[derive(Debug, Serialize)]
pub struct CarouselSlide {
    pub id: u32,
    pub image: String,
    pub alt: String,
    pub title: String,
    pub subtitle: String,
}

#[derive(Debug, Serialize)]
pub struct AppInfo {
    pub title: String,
    pub welcome_message: String,
}

#[derive(Debug, Serialize)]
pub struct HomeData {
    pub carousel: Vec<CarouselSlide>,
    pub categories: Vec<HomeCategory>,
    pub featured_products: Vec<FeaturedProduct>,
    pub app_info: AppInfo,
}

pub async fn index(State(state): State<AppState>) -> Result<Json<ApiResponse<HomeData>>> {
    let slugs: Vec<String> = MAIN_CATEGORY_SLUGS.iter().map(|s| s.to_string()).collect();
    let categories = state.catalog.categories_by_slugs(&slugs).await?;
    let home_categories = categories
        .iter()
        .map(|c| HomeCategory {
            id: c.id,
            name: c.name.clone(),
            slug: c.slug.clone(),
            image: state.assets.category_image(&c.slug),
            route: format!("/products/{}", c.slug),
        })
        .collect();

    let featured = state.catalog.featured_products(8).await?;
    let ids: Vec<Uuid> = featured.iter().filter_map(|p| p.category_id).collect();
    let featured_categories = state.catalog.find_categories_by_ids(&ids).await?;
    let featured_products = shape_products(&featured, &featured_categories, &state.assets)
        .into_iter()
        .map(|product| FeaturedProduct {
            route: format!("/product/{}", product.slug),
            product,
        })
        .collect();

    let carousel = vec![
        CarouselSlide {
            id: 1,
            image: state.assets.static_image("hero1.jpg"),
            alt: "Slide 1".to_string(),
            title: "New Season".to_string(),
            subtitle: "The latest drops, all in one place".to_string(),
        },
        CarouselSlide {
            id: 2,
            image: state.assets.static_image("hero2.jpg"),
            alt: "Slide 2".to_string(),
            title: "New Arrivals".to_string(),
            subtitle: "Discover the latest trends".to_string(),
        },
        CarouselSlide {
            id: 3,
            image: state.assets.static_image("hero3.jpg"),
            alt: "Slide 3".to_string(),
            title: "Style & Comfort".to_string(),
            subtitle: "Perfect for every occasion".to_string(),
        },
    ];

    Ok(Json(ApiResponse::success(
        HomeData {
            carousel,
            categories: home_categories,
            featured_products,
            app_info: AppInfo {
                title: state.config.store_name.clone(),
                welcome_message: format!(
                    "Welcome to {}. Apparel, accessories, and footwear for every day.",
                    state.config.store_name
                ),
            },
        },
        "Homepage data retrieved successfully",
    )))
}
