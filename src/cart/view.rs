//! Cart read model, recomputed from scratch on every request.
//!
//! The summary is always exactly derivable from the line items and current
//! product prices handed to [`CartView::assemble`]; nothing here is cached
//! or persisted.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

use super::CartLineItem;
use crate::catalog::view::{AssetUrls, ProductView};
use crate::catalog::{Category, Product};
use crate::domain::money::{format_price, line_subtotal};

/// A cart line joined against live catalog data.
///
/// A line item whose product has been deleted from the catalog surfaces as
/// `Orphaned` with its product fields absent, and contributes nothing to the
/// summary totals.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CartEntry {
    Resolved {
        id: Uuid,
        quantity: i32,
        product: ProductView,
        subtotal: Decimal,
        formatted_subtotal: String,
    },
    Orphaned {
        id: Uuid,
        product_id: Uuid,
        quantity: i32,
    },
}

#[derive(Debug, Serialize)]
pub struct CartSummary {
    pub total_items: i64,
    pub total_price: Decimal,
    pub formatted_total: String,
    pub is_empty: bool,
}

#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartEntry>,
    pub summary: CartSummary,
}

impl CartView {
    /// Builds the view from raw line items and whatever products could be
    /// resolved for them. Pure: no storage access, no side effects.
    pub fn assemble(
        items: &[CartLineItem],
        products: &HashMap<Uuid, Product>,
        categories: &HashMap<Uuid, Category>,
        assets: &AssetUrls,
    ) -> Self {
        let mut entries = Vec::with_capacity(items.len());
        let mut total_items: i64 = 0;
        let mut total_price = Decimal::ZERO;

        for item in items {
            match products.get(&item.product_id) {
                Some(product) => {
                    let subtotal = line_subtotal(product.price, item.quantity);
                    total_items += i64::from(item.quantity);
                    total_price += subtotal;
                    let category = product
                        .category_id
                        .and_then(|id| categories.get(&id));
                    entries.push(CartEntry::Resolved {
                        id: item.id,
                        quantity: item.quantity,
                        product: ProductView::from_product(product, category, assets),
                        subtotal,
                        formatted_subtotal: format_price(subtotal),
                    });
                }
                None => {
                    entries.push(CartEntry::Orphaned {
                        id: item.id,
                        product_id: item.product_id,
                        quantity: item.quantity,
                    });
                }
            }
        }

        CartView {
            summary: CartSummary {
                total_items,
                total_price,
                formatted_total: format_price(total_price),
                is_empty: items.is_empty(),
            },
            items: entries,
        }
    }
}

/// A single line item with its product joined, returned by the add and
/// update operations. `product` is absent when the catalog row has vanished
/// between the write and the read.
#[derive(Debug, Serialize)]
pub struct LineItemView {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub product: Option<ProductView>,
}

impl LineItemView {
    pub fn new(
        item: &CartLineItem,
        product: Option<&Product>,
        category: Option<&Category>,
        assets: &AssetUrls,
    ) -> Self {
        Self {
            id: item.id,
            product_id: item.product_id,
            quantity: item.quantity,
            product: product.map(|p| ProductView::from_product(p, category, assets)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::testing::{line_item, product_with_price};

    fn assets() -> AssetUrls {
        AssetUrls::new("http://localhost:8083")
    }

    #[test]
    fn summary_is_derived_from_lines_and_prices() {
        let user = Uuid::new_v4();
        let a = product_with_price(Decimal::from(500));
        let b = product_with_price(Decimal::from(1200));
        let items = vec![line_item(user, a.id, 2), line_item(user, b.id, 1)];
        let products: HashMap<_, _> = [(a.id, a), (b.id, b)].into();

        let view = CartView::assemble(&items, &products, &HashMap::new(), &assets());

        assert_eq!(view.summary.total_items, 3);
        assert_eq!(view.summary.total_price, Decimal::from(2200));
        assert_eq!(view.summary.formatted_total, "Rs. 2,200.00");
        assert!(!view.summary.is_empty);
        assert_eq!(view.items.len(), 2);
    }

    #[test]
    fn empty_cart_view() {
        let view = CartView::assemble(&[], &HashMap::new(), &HashMap::new(), &assets());
        assert!(view.summary.is_empty);
        assert_eq!(view.summary.total_items, 0);
        assert_eq!(view.summary.total_price, Decimal::ZERO);
        assert_eq!(view.summary.formatted_total, "Rs. 0.00");
    }

    #[test]
    fn orphaned_lines_are_surfaced_but_not_totalled() {
        let user = Uuid::new_v4();
        let live = product_with_price(Decimal::from(100));
        let items = vec![
            line_item(user, live.id, 1),
            line_item(user, Uuid::new_v4(), 4),
        ];
        let products: HashMap<_, _> = [(live.id, live)].into();

        let view = CartView::assemble(&items, &products, &HashMap::new(), &assets());

        assert_eq!(view.items.len(), 2);
        assert_eq!(view.summary.total_items, 1);
        assert_eq!(view.summary.total_price, Decimal::from(100));
        assert!(matches!(view.items[1], CartEntry::Orphaned { quantity: 4, .. }));
    }

    #[test]
    fn line_subtotals_use_the_same_value_both_ways() {
        let user = Uuid::new_v4();
        let p = product_with_price(Decimal::new(149999, 2));
        let items = vec![line_item(user, p.id, 3)];
        let products: HashMap<_, _> = [(p.id, p)].into();

        let view = CartView::assemble(&items, &products, &HashMap::new(), &assets());

        match &view.items[0] {
            CartEntry::Resolved {
                subtotal,
                formatted_subtotal,
                ..
            } => {
                assert_eq!(*subtotal, Decimal::new(449997, 2));
                assert_eq!(formatted_subtotal, &format_price(*subtotal));
            }
            CartEntry::Orphaned { .. } => panic!("expected a resolved entry"),
        }
    }
}
