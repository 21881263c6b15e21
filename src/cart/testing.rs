//! In-memory fakes used by the cart unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::store::CartStore;
use super::CartLineItem;
use crate::catalog::store::CatalogReader;
use crate::catalog::{Category, Product};
use crate::error::Result;

pub(crate) fn product_with_price(price: Decimal) -> Product {
    let id = Uuid::new_v4();
    Product {
        id,
        name: format!("Product {id}"),
        slug: format!("product-{id}"),
        description: String::new(),
        price,
        image: None,
        stock: 50,
        is_active: true,
        is_featured: false,
        category_id: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub(crate) fn line_item(user_id: Uuid, product_id: Uuid, quantity: i32) -> CartLineItem {
    CartLineItem {
        id: Uuid::new_v4(),
        user_id,
        product_id,
        quantity,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct MemoryCartStore {
    items: Arc<Mutex<Vec<CartLineItem>>>,
}

#[async_trait]
impl CartStore for MemoryCartStore {
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<CartLineItem>> {
        let items = self.items.lock().unwrap();
        Ok(items
            .iter()
            .filter(|i| i.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn add_or_increment(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<CartLineItem> {
        let mut items = self.items.lock().unwrap();
        if let Some(existing) = items
            .iter_mut()
            .find(|i| i.user_id == user_id && i.product_id == product_id)
        {
            existing.quantity += quantity;
            existing.updated_at = Utc::now();
            return Ok(existing.clone());
        }
        let item = line_item(user_id, product_id, quantity);
        items.push(item.clone());
        Ok(item)
    }

    async fn set_quantity(
        &self,
        user_id: Uuid,
        item_id: Uuid,
        quantity: i32,
    ) -> Result<Option<CartLineItem>> {
        let mut items = self.items.lock().unwrap();
        Ok(items
            .iter_mut()
            .find(|i| i.id == item_id && i.user_id == user_id)
            .map(|item| {
                item.quantity = quantity;
                item.updated_at = Utc::now();
                item.clone()
            }))
    }

    async fn remove(&self, user_id: Uuid, item_id: Uuid) -> Result<bool> {
        let mut items = self.items.lock().unwrap();
        let before = items.len();
        items.retain(|i| !(i.id == item_id && i.user_id == user_id));
        Ok(items.len() < before)
    }

    async fn clear(&self, user_id: Uuid) -> Result<u64> {
        let mut items = self.items.lock().unwrap();
        let before = items.len();
        items.retain(|i| i.user_id != user_id);
        Ok((before - items.len()) as u64)
    }

    async fn quantity_sum(&self, user_id: Uuid) -> Result<i64> {
        let items = self.items.lock().unwrap();
        Ok(items
            .iter()
            .filter(|i| i.user_id == user_id)
            .map(|i| i64::from(i.quantity))
            .sum())
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct MemoryCatalog {
    products: Arc<Mutex<HashMap<Uuid, Product>>>,
    categories: Arc<Mutex<HashMap<Uuid, Category>>>,
}

impl MemoryCatalog {
    pub(crate) fn with_products(products: Vec<Product>) -> Self {
        let catalog = Self::default();
        {
            let mut map = catalog.products.lock().unwrap();
            for product in products {
                map.insert(product.id, product);
            }
        }
        catalog
    }

    pub(crate) fn set_price(&self, id: Uuid, price: Decimal) {
        if let Some(product) = self.products.lock().unwrap().get_mut(&id) {
            product.price = price;
        }
    }

    pub(crate) fn delete_product(&self, id: Uuid) {
        self.products.lock().unwrap().remove(&id);
    }
}

#[async_trait]
impl CatalogReader for MemoryCatalog {
    async fn find_product(&self, id: Uuid) -> Result<Option<Product>> {
        Ok(self.products.lock().unwrap().get(&id).cloned())
    }

    async fn find_products_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Product>> {
        let products = self.products.lock().unwrap();
        Ok(ids.iter().filter_map(|id| products.get(id).cloned()).collect())
    }

    async fn find_categories_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Category>> {
        let categories = self.categories.lock().unwrap();
        Ok(ids.iter().filter_map(|id| categories.get(id).cloned()).collect())
    }
}
