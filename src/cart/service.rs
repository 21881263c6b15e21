//! Cart aggregation engine.
//!
//! Every operation takes the resolved user id explicitly; the engine never
//! authenticates, never caches, and never retries storage failures. Adding
//! an existing product increments its line item, while updating a line item
//! replaces its quantity outright; the two are distinct operations on
//! purpose.

use std::collections::HashMap;

use tracing::warn;
use uuid::Uuid;

use super::store::CartStore;
use super::view::{CartView, LineItemView};
use crate::catalog::store::CatalogReader;
use crate::catalog::view::AssetUrls;
use crate::catalog::{Category, Product};
use crate::error::{ApiError, Result};

#[derive(Debug, Clone)]
pub struct CartService<S, C> {
    store: S,
    catalog: C,
    assets: AssetUrls,
}

impl<S: CartStore, C: CatalogReader> CartService<S, C> {
    pub fn new(store: S, catalog: C, assets: AssetUrls) -> Self {
        Self {
            store,
            catalog,
            assets,
        }
    }

    /// Point-in-time cart projection: line items joined against current
    /// product data, totals recomputed from scratch. No side effects.
    pub async fn view(&self, user_id: Uuid) -> Result<CartView> {
        let items = self.store.list_for_user(user_id).await?;

        let product_ids: Vec<Uuid> = items.iter().map(|i| i.product_id).collect();
        let products: HashMap<Uuid, Product> = self
            .catalog
            .find_products_by_ids(&product_ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        for item in &items {
            if !products.contains_key(&item.product_id) {
                warn!(
                    line_item = %item.id,
                    product = %item.product_id,
                    "cart line references a product missing from the catalog"
                );
            }
        }

        let category_ids: Vec<Uuid> = products
            .values()
            .filter_map(|p| p.category_id)
            .collect();
        let categories: HashMap<Uuid, Category> = self
            .catalog
            .find_categories_by_ids(&category_ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        Ok(CartView::assemble(&items, &products, &categories, &self.assets))
    }

    /// Adds to the cart. An existing (user, product) line item has its
    /// quantity incremented by `quantity`; otherwise a new line item is
    /// created. The write is a single atomic upsert, so two concurrent adds
    /// both land.
    pub async fn add_item(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<LineItemView> {
        ensure_quantity(quantity)?;
        let product = self
            .catalog
            .find_product(product_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

        let item = self
            .store
            .add_or_increment(user_id, product_id, quantity)
            .await?;

        let category = self.category_of(&product).await?;
        Ok(LineItemView::new(
            &item,
            Some(&product),
            category.as_ref(),
            &self.assets,
        ))
    }

    /// Replaces the quantity of an owned line item. A line item that does
    /// not exist, or belongs to another user, reports NotFound either way,
    /// so existence never leaks across users.
    pub async fn update_quantity(
        &self,
        user_id: Uuid,
        item_id: Uuid,
        quantity: i32,
    ) -> Result<LineItemView> {
        ensure_quantity(quantity)?;
        let item = self
            .store
            .set_quantity(user_id, item_id, quantity)
            .await?
            .ok_or_else(|| ApiError::NotFound("Cart item not found".to_string()))?;

        let product = self.catalog.find_product(item.product_id).await?;
        let category = match &product {
            Some(p) => self.category_of(p).await?,
            None => None,
        };
        Ok(LineItemView::new(
            &item,
            product.as_ref(),
            category.as_ref(),
            &self.assets,
        ))
    }

    /// Deletes an owned line item. Removing the same item twice reports
    /// NotFound the second time.
    pub async fn remove_item(&self, user_id: Uuid, item_id: Uuid) -> Result<()> {
        if !self.store.remove(user_id, item_id).await? {
            return Err(ApiError::NotFound("Cart item not found".to_string()));
        }
        Ok(())
    }

    /// Deletes everything in the user's cart; returns how many items went.
    /// An already-empty cart clears to zero, which is still success.
    pub async fn clear(&self, user_id: Uuid) -> Result<u64> {
        self.store.clear(user_id).await
    }

    /// Total quantity across the user's line items; no catalog join.
    pub async fn item_count(&self, user_id: Uuid) -> Result<i64> {
        self.store.quantity_sum(user_id).await
    }

    async fn category_of(&self, product: &Product) -> Result<Option<Category>> {
        match product.category_id {
            Some(id) => Ok(self
                .catalog
                .find_categories_by_ids(&[id])
                .await?
                .into_iter()
                .next()),
            None => Ok(None),
        }
    }
}

fn ensure_quantity(quantity: i32) -> Result<()> {
    if quantity < 1 {
        return Err(ApiError::Validation(
            "Quantity must be at least 1".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::testing::{product_with_price, MemoryCartStore, MemoryCatalog};
    use rust_decimal::Decimal;

    fn service(catalog: MemoryCatalog) -> CartService<MemoryCartStore, MemoryCatalog> {
        CartService::new(
            MemoryCartStore::default(),
            catalog,
            AssetUrls::new("http://localhost:8083"),
        )
    }

    #[tokio::test]
    async fn adding_the_same_product_twice_merges_into_one_line() {
        let product = product_with_price(Decimal::from(250));
        let cart = service(MemoryCatalog::with_products(vec![product.clone()]));
        let user = Uuid::new_v4();

        let first = cart.add_item(user, product.id, 2).await.unwrap();
        let second = cart.add_item(user, product.id, 3).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.quantity, 5);

        let view = cart.view(user).await.unwrap();
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.summary.total_items, 5);
    }

    #[tokio::test]
    async fn add_rejects_non_positive_quantity() {
        let product = product_with_price(Decimal::from(100));
        let cart = service(MemoryCatalog::with_products(vec![product.clone()]));
        let user = Uuid::new_v4();

        let err = cart.add_item(user, product.id, 0).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        let err = cart.add_item(user, product.id, -2).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        assert!(cart.view(user).await.unwrap().summary.is_empty);
    }

    #[tokio::test]
    async fn add_unknown_product_is_not_found() {
        let cart = service(MemoryCatalog::default());
        let err = cart
            .add_item(Uuid::new_v4(), Uuid::new_v4(), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_replaces_rather_than_adds() {
        let product = product_with_price(Decimal::from(100));
        let cart = service(MemoryCatalog::with_products(vec![product.clone()]));
        let user = Uuid::new_v4();

        let item = cart.add_item(user, product.id, 4).await.unwrap();
        let updated = cart.update_quantity(user, item.id, 2).await.unwrap();

        assert_eq!(updated.quantity, 2);
        assert_eq!(cart.item_count(user).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn update_someone_elses_item_is_not_found_and_leaves_it_alone() {
        let product = product_with_price(Decimal::from(100));
        let cart = service(MemoryCatalog::with_products(vec![product.clone()]));
        let owner = Uuid::new_v4();
        let intruder = Uuid::new_v4();

        let item = cart.add_item(owner, product.id, 3).await.unwrap();

        let err = cart
            .update_quantity(intruder, item.id, 99)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));

        let view = cart.view(owner).await.unwrap();
        assert_eq!(view.summary.total_items, 3);
    }

    #[tokio::test]
    async fn removing_twice_reports_not_found_the_second_time() {
        let product = product_with_price(Decimal::from(100));
        let cart = service(MemoryCatalog::with_products(vec![product.clone()]));
        let user = Uuid::new_v4();

        let item = cart.add_item(user, product.id, 1).await.unwrap();

        cart.remove_item(user, item.id).await.unwrap();
        let err = cart.remove_item(user, item.id).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));

        assert!(cart.view(user).await.unwrap().summary.is_empty);
    }

    #[tokio::test]
    async fn clearing_empties_the_view_and_counts_removals() {
        let a = product_with_price(Decimal::from(10));
        let b = product_with_price(Decimal::from(20));
        let cart = service(MemoryCatalog::with_products(vec![a.clone(), b.clone()]));
        let user = Uuid::new_v4();

        cart.add_item(user, a.id, 2).await.unwrap();
        cart.add_item(user, b.id, 1).await.unwrap();

        assert_eq!(cart.clear(user).await.unwrap(), 2);
        assert_eq!(cart.clear(user).await.unwrap(), 0);

        let view = cart.view(user).await.unwrap();
        assert!(view.summary.is_empty);
        assert_eq!(view.summary.total_items, 0);
        assert_eq!(view.summary.total_price, Decimal::ZERO);
    }

    #[tokio::test]
    async fn view_totals_follow_current_prices() {
        let a = product_with_price(Decimal::from(500));
        let b = product_with_price(Decimal::from(1200));
        let catalog = MemoryCatalog::with_products(vec![a.clone(), b.clone()]);
        let cart = service(catalog.clone());
        let user = Uuid::new_v4();

        cart.add_item(user, a.id, 2).await.unwrap();
        cart.add_item(user, b.id, 1).await.unwrap();

        let view = cart.view(user).await.unwrap();
        assert_eq!(view.summary.total_items, 3);
        assert_eq!(view.summary.total_price, Decimal::from(2200));

        // A price change propagates into the next view; nothing was locked
        // in at add time.
        catalog.set_price(a.id, Decimal::from(600));
        let view = cart.view(user).await.unwrap();
        assert_eq!(view.summary.total_price, Decimal::from(2400));
    }

    #[tokio::test]
    async fn orphaned_product_does_not_crash_the_view() {
        let keep = product_with_price(Decimal::from(100));
        let gone = product_with_price(Decimal::from(999));
        let catalog = MemoryCatalog::with_products(vec![keep.clone(), gone.clone()]);
        let cart = service(catalog.clone());
        let user = Uuid::new_v4();

        cart.add_item(user, keep.id, 1).await.unwrap();
        cart.add_item(user, gone.id, 2).await.unwrap();

        catalog.delete_product(gone.id);

        let view = cart.view(user).await.unwrap();
        assert_eq!(view.items.len(), 2);
        assert_eq!(view.summary.total_items, 1);
        assert_eq!(view.summary.total_price, Decimal::from(100));
    }

    #[tokio::test]
    async fn item_count_sums_quantities_without_catalog() {
        let a = product_with_price(Decimal::from(10));
        let b = product_with_price(Decimal::from(20));
        let cart = service(MemoryCatalog::with_products(vec![a.clone(), b.clone()]));
        let user = Uuid::new_v4();

        assert_eq!(cart.item_count(user).await.unwrap(), 0);
        cart.add_item(user, a.id, 2).await.unwrap();
        cart.add_item(user, b.id, 5).await.unwrap();
        assert_eq!(cart.item_count(user).await.unwrap(), 7);
    }
}
