//! Cart persistence.
//!
//! Ownership is enforced here: every mutation is scoped by `user_id`, so a
//! line item belonging to someone else behaves exactly like one that does
//! not exist.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::CartLineItem;
use crate::error::Result;

#[async_trait]
pub trait CartStore: Send + Sync {
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<CartLineItem>>;

    /// Inserts the line item, or atomically increments the quantity of the
    /// existing (user, product) row. Concurrent adds must never lose an
    /// update.
    async fn add_or_increment(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<CartLineItem>;

    /// Replaces the quantity of an owned line item. `None` when the item
    /// does not exist or belongs to another user.
    async fn set_quantity(
        &self,
        user_id: Uuid,
        item_id: Uuid,
        quantity: i32,
    ) -> Result<Option<CartLineItem>>;

    /// Deletes one owned line item; `false` when absent or not owned.
    async fn remove(&self, user_id: Uuid, item_id: Uuid) -> Result<bool>;

    /// Deletes every line item for the user, returning how many went.
    async fn clear(&self, user_id: Uuid) -> Result<u64>;

    /// Sum of quantities across the user's line items; zero when empty.
    async fn quantity_sum(&self, user_id: Uuid) -> Result<i64>;
}

#[derive(Debug, Clone)]
pub struct PgCartStore {
    db: PgPool,
}

impl PgCartStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CartStore for PgCartStore {
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<CartLineItem>> {
        sqlx::query_as::<_, CartLineItem>(
            "SELECT * FROM cart_items WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .map_err(Into::into)
    }

    async fn add_or_increment(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<CartLineItem> {
        sqlx::query_as::<_, CartLineItem>(
            "INSERT INTO cart_items (id, user_id, product_id, quantity, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, NOW(), NOW()) \
             ON CONFLICT (user_id, product_id) \
             DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity, updated_at = NOW() \
             RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(user_id)
        .bind(product_id)
        .bind(quantity)
        .fetch_one(&self.db)
        .await
        .map_err(Into::into)
    }

    async fn set_quantity(
        &self,
        user_id: Uuid,
        item_id: Uuid,
        quantity: i32,
    ) -> Result<Option<CartLineItem>> {
        sqlx::query_as::<_, CartLineItem>(
            "UPDATE cart_items SET quantity = $3, updated_at = NOW() \
             WHERE id = $2 AND user_id = $1 RETURNING *",
        )
        .bind(user_id)
        .bind(item_id)
        .bind(quantity)
        .fetch_optional(&self.db)
        .await
        .map_err(Into::into)
    }

    async fn remove(&self, user_id: Uuid, item_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM cart_items WHERE id = $2 AND user_id = $1")
            .bind(user_id)
            .bind(item_id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn clear(&self, user_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected())
    }

    async fn quantity_sum(&self, user_id: Uuid) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(quantity), 0)::BIGINT FROM cart_items WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.db)
        .await
        .map_err(Into::into)
    }
}
