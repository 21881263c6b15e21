//! Product and category catalog.

pub mod store;
pub mod view;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: Decimal,
    pub image: Option<String>,
    pub stock: i32,
    pub is_active: bool,
    pub is_featured: bool,
    pub category_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Stock message shown on product cards and detail pages.
pub fn stock_status(stock: i32) -> String {
    if stock <= 0 {
        "Out of stock".to_string()
    } else if stock < 10 {
        format!("Only {stock} left in stock")
    } else {
        "In Stock".to_string()
    }
}

/// URL-safe slug derived from a display name.
pub fn slugify(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_status_boundaries() {
        assert_eq!(stock_status(0), "Out of stock");
        assert_eq!(stock_status(-3), "Out of stock");
        assert_eq!(stock_status(1), "Only 1 left in stock");
        assert_eq!(stock_status(9), "Only 9 left in stock");
        assert_eq!(stock_status(10), "In Stock");
        assert_eq!(stock_status(500), "In Stock");
    }

    #[test]
    fn slugify_lowercases_and_dashes() {
        assert_eq!(slugify("Summer Jackets"), "summer-jackets");
        assert_eq!(slugify("  Footwear "), "footwear");
    }
}
