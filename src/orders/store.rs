//! Order persistence and the checkout transaction.

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use super::{Order, OrderItem};
use crate::domain::money::line_subtotal;
use crate::error::{ApiError, Result};

#[derive(Debug, sqlx::FromRow)]
struct CheckoutLine {
    product_id: Uuid,
    name: String,
    unit_price: Decimal,
    quantity: i32,
}

#[derive(Debug, Clone)]
pub struct PgOrderStore {
    db: PgPool,
}

impl PgOrderStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Snapshots the user's cart into an order and empties the cart, all in
    /// one transaction. Only lines whose product still exists are charged;
    /// a cart with nothing chargeable is rejected as empty.
    pub async fn checkout(
        &self,
        user_id: Uuid,
        shipping_address: serde_json::Value,
    ) -> Result<Order> {
        let mut tx = self.db.begin().await?;

        let lines = sqlx::query_as::<_, CheckoutLine>(
            "SELECT ci.product_id, p.name, p.price AS unit_price, ci.quantity \
             FROM cart_items ci \
             JOIN products p ON p.id = ci.product_id \
             WHERE ci.user_id = $1 \
             ORDER BY ci.created_at",
        )
        .bind(user_id)
        .fetch_all(&mut *tx)
        .await?;

        if lines.is_empty() {
            return Err(ApiError::Validation("Cart is empty".to_string()));
        }

        let total: Decimal = lines
            .iter()
            .map(|line| line_subtotal(line.unit_price, line.quantity))
            .sum();

        let order_number = format!("ORD-{:08}", rand::random::<u32>());
        let order = sqlx::query_as::<_, Order>(
            "INSERT INTO orders (id, order_number, user_id, status, total, shipping_address, \
                                 created_at, updated_at) \
             VALUES ($1, $2, $3, 'pending', $4, $5, NOW(), NOW()) RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(&order_number)
        .bind(user_id)
        .bind(total)
        .bind(&shipping_address)
        .fetch_one(&mut *tx)
        .await?;

        for line in &lines {
            sqlx::query(
                "INSERT INTO order_items (id, order_id, product_id, name, unit_price, quantity, line_total) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(Uuid::now_v7())
            .bind(order.id)
            .bind(line.product_id)
            .bind(&line.name)
            .bind(line.unit_price)
            .bind(line.quantity)
            .bind(line_subtotal(line.unit_price, line.quantity))
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(order)
    }

    pub async fn orders_for_user(&self, user_id: Uuid) -> Result<Vec<Order>> {
        sqlx::query_as::<_, Order>(
            "SELECT * FROM orders WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .map_err(Into::into)
    }

    /// Order with its items, scoped to the owner. Someone else's order id
    /// resolves to nothing.
    pub async fn find_for_user(
        &self,
        user_id: Uuid,
        order_id: Uuid,
    ) -> Result<Option<(Order, Vec<OrderItem>)>> {
        let order = sqlx::query_as::<_, Order>(
            "SELECT * FROM orders WHERE id = $1 AND user_id = $2",
        )
        .bind(order_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        let Some(order) = order else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, OrderItem>(
            "SELECT * FROM order_items WHERE order_id = $1",
        )
        .bind(order.id)
        .fetch_all(&self.db)
        .await?;

        Ok(Some((order, items)))
    }
}
