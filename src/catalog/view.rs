//! Catalog response shaping.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

use super::{stock_status, Category, Product};
use crate::domain::money::format_price;

/// Resolves stored image references into absolute URLs.
#[derive(Debug, Clone)]
pub struct AssetUrls {
    base: String,
}

impl AssetUrls {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn product_image(&self, image: Option<&str>) -> String {
        match image {
            Some(file) => format!("{}/storage/products/{file}", self.base),
            None => format!("{}/images/placeholder.jpg", self.base),
        }
    }

    pub fn category_image(&self, slug: &str) -> String {
        format!("{}/images/categories/{slug}.jpg", self.base)
    }

    pub fn hero_image(&self, slug: &str) -> String {
        format!("{}/images/heroes/{slug}.jpg", self.base)
    }

    pub fn static_image(&self, file: &str) -> String {
        format!("{}/images/{file}", self.base)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryRef {
    pub id: Option<Uuid>,
    pub name: String,
    pub slug: Option<String>,
}

impl CategoryRef {
    pub fn from_category(category: Option<&Category>) -> Self {
        match category {
            Some(c) => Self {
                id: Some(c.id),
                name: c.name.clone(),
                slug: Some(c.slug.clone()),
            },
            None => Self {
                id: None,
                name: "Uncategorized".to_string(),
                slug: None,
            },
        }
    }
}

/// Product as both clients consume it: raw price plus display string, image
/// URL resolved, stock message derived.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: Decimal,
    pub formatted_price: String,
    pub image: String,
    pub stock: i32,
    pub stock_status: String,
    pub is_featured: bool,
    pub category: CategoryRef,
}

impl ProductView {
    pub fn from_product(
        product: &Product,
        category: Option<&Category>,
        assets: &AssetUrls,
    ) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            slug: product.slug.clone(),
            description: product.description.clone(),
            price: product.price,
            formatted_price: format_price(product.price),
            image: assets.product_image(product.image.as_deref()),
            stock: product.stock,
            stock_status: stock_status(product.stock),
            is_featured: product.is_featured,
            category: CategoryRef::from_category(category),
        }
    }
}

/// Shapes a batch of products, joining each against its category.
pub fn shape_products(
    products: &[Product],
    categories: &[Category],
    assets: &AssetUrls,
) -> Vec<ProductView> {
    let by_id: HashMap<Uuid, &Category> = categories.iter().map(|c| (c.id, c)).collect();
    products
        .iter()
        .map(|p| {
            let category = p.category_id.and_then(|id| by_id.get(&id).copied());
            ProductView::from_product(p, category, assets)
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct Pagination {
    pub current_page: u32,
    pub last_page: u32,
    pub per_page: u32,
    pub total: i64,
    pub from: Option<i64>,
    pub to: Option<i64>,
}

impl Pagination {
    pub fn new(page: u32, per_page: u32, total: i64, returned: usize) -> Self {
        let last_page = if total == 0 {
            1
        } else {
            ((total + i64::from(per_page) - 1) / i64::from(per_page)) as u32
        };
        let (from, to) = if returned == 0 {
            (None, None)
        } else {
            let from = i64::from(page - 1) * i64::from(per_page) + 1;
            (Some(from), Some(from + returned as i64 - 1))
        };
        Self {
            current_page: page,
            last_page,
            per_page,
            total,
            from,
            to,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(price: Decimal, stock: i32, image: Option<&str>) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: "Denim Jacket".to_string(),
            slug: "denim-jacket".to_string(),
            description: "Classic fit".to_string(),
            price,
            image: image.map(String::from),
            stock,
            is_active: true,
            is_featured: false,
            category_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn formatted_price_matches_raw_price() {
        let assets = AssetUrls::new("http://localhost:8083");
        let view = ProductView::from_product(&product(Decimal::new(249950, 2), 5, None), None, &assets);
        assert_eq!(view.price, Decimal::new(249950, 2));
        assert_eq!(view.formatted_price, "Rs. 2,499.50");
        assert_eq!(view.stock_status, "Only 5 left in stock");
    }

    #[test]
    fn image_falls_back_to_placeholder() {
        let assets = AssetUrls::new("http://localhost:8083/");
        let with = ProductView::from_product(&product(Decimal::ONE, 1, Some("jacket.jpg")), None, &assets);
        let without = ProductView::from_product(&product(Decimal::ONE, 1, None), None, &assets);
        assert_eq!(with.image, "http://localhost:8083/storage/products/jacket.jpg");
        assert_eq!(without.image, "http://localhost:8083/images/placeholder.jpg");
    }

    #[test]
    fn missing_category_shapes_as_uncategorized() {
        let category = CategoryRef::from_category(None);
        assert_eq!(category.name, "Uncategorized");
        assert!(category.id.is_none());
    }

    #[test]
    fn pagination_window() {
        let p = Pagination::new(2, 12, 30, 12);
        assert_eq!(p.last_page, 3);
        assert_eq!(p.from, Some(13));
        assert_eq!(p.to, Some(24));

        let empty = Pagination::new(1, 12, 0, 0);
        assert_eq!(empty.last_page, 1);
        assert_eq!(empty.from, None);
    }
}
