//! Per-user shopping cart: line items, storage, and the aggregation engine.

pub mod service;
pub mod store;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// One row per (user, product) pair. Quantity is always at least one; a
/// removed item is deleted, never stored with quantity zero.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CartLineItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
