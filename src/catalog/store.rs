//! Catalog persistence.
//!
//! [`CatalogReader`] is the narrow seam the cart engine joins against;
//! [`PgCatalogStore`] adds the browsing and admin queries used by the HTTP
//! layer directly.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{slugify, Category, Product};
use crate::error::{is_unique_violation, ApiError, Result};

/// Read access the cart aggregation engine needs at view time.
#[async_trait]
pub trait CatalogReader: Send + Sync {
    async fn find_product(&self, id: Uuid) -> Result<Option<Product>>;
    async fn find_products_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Product>>;
    async fn find_categories_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Category>>;
}

#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub category_id: Option<Uuid>,
    pub featured: bool,
    pub search: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub page: u32,
    pub per_page: u32,
}

impl Page {
    pub fn new(page: Option<u32>, per_page: Option<u32>, default_per_page: u32) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page.unwrap_or(default_per_page).clamp(1, 100),
        }
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.per_page)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category_id: Option<Uuid>,
    pub stock: i32,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub category_id: Option<Uuid>,
    pub stock: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct PgCatalogStore {
    db: PgPool,
}

impl PgCatalogStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Active products matching the filter, newest first, with the total
    /// match count for pagination.
    pub async fn list_products(
        &self,
        filter: &ProductFilter,
        page: Page,
    ) -> Result<(Vec<Product>, i64)> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM products");
        push_filter(&mut query, filter);
        query.push(" ORDER BY created_at DESC LIMIT ");
        query.push_bind(page.limit());
        query.push(" OFFSET ");
        query.push_bind(page.offset());
        let products = query
            .build_query_as::<Product>()
            .fetch_all(&self.db)
            .await?;

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM products");
        push_filter(&mut count, filter);
        let total: i64 = count.build_query_scalar().fetch_one(&self.db).await?;

        Ok((products, total))
    }

    /// Featured or recently added products, capped.
    pub async fn featured_products(&self, limit: i64) -> Result<Vec<Product>> {
        sqlx::query_as::<_, Product>(
            "SELECT * FROM products \
             WHERE is_active = TRUE \
               AND (is_featured = TRUE OR created_at >= NOW() - INTERVAL '30 days') \
             ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.db)
        .await
        .map_err(Into::into)
    }

    pub async fn find_product_by_slug(&self, slug: &str) -> Result<Option<Product>> {
        sqlx::query_as::<_, Product>("SELECT * FROM products WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.db)
            .await
            .map_err(Into::into)
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY name")
            .fetch_all(&self.db)
            .await
            .map_err(Into::into)
    }

    pub async fn find_category(&self, id: Uuid) -> Result<Option<Category>> {
        sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .map_err(Into::into)
    }

    pub async fn find_category_by_slug(&self, slug: &str) -> Result<Option<Category>> {
        sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.db)
            .await
            .map_err(Into::into)
    }

    pub async fn categories_by_slugs(&self, slugs: &[String]) -> Result<Vec<Category>> {
        sqlx::query_as::<_, Category>(
            "SELECT * FROM categories WHERE slug = ANY($1) ORDER BY name",
        )
        .bind(slugs)
        .fetch_all(&self.db)
        .await
        .map_err(Into::into)
    }

    pub async fn create_product(&self, new: NewProduct) -> Result<Product> {
        let slug = slugify(&new.name);
        sqlx::query_as::<_, Product>(
            "INSERT INTO products (id, name, slug, description, price, image, stock, \
                                   is_active, is_featured, category_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE, FALSE, $8, NOW(), NOW()) \
             RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(&new.name)
        .bind(&slug)
        .bind(&new.description)
        .bind(new.price)
        .bind(&new.image)
        .bind(new.stock)
        .bind(new.category_id)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::Conflict(format!("A product with slug '{slug}' already exists"))
            } else {
                e.into()
            }
        })
    }

    pub async fn update_product(
        &self,
        id: Uuid,
        changes: ProductChanges,
    ) -> Result<Option<Product>> {
        sqlx::query_as::<_, Product>(
            "UPDATE products SET \
                 name = COALESCE($2, name), \
                 description = COALESCE($3, description), \
                 price = COALESCE($4, price), \
                 category_id = COALESCE($5, category_id), \
                 stock = COALESCE($6, stock), \
                 updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(changes.name)
        .bind(changes.description)
        .bind(changes.price)
        .bind(changes.category_id)
        .bind(changes.stock)
        .fetch_optional(&self.db)
        .await
        .map_err(Into::into)
    }

    pub async fn delete_product(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn create_category(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Category> {
        let slug = slugify(name);
        sqlx::query_as::<_, Category>(
            "INSERT INTO categories (id, name, slug, description, created_at) \
             VALUES ($1, $2, $3, $4, NOW()) RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(name)
        .bind(&slug)
        .bind(description)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::Conflict(format!("A category with slug '{slug}' already exists"))
            } else {
                e.into()
            }
        })
    }
}

fn push_filter(query: &mut QueryBuilder<'_, Postgres>, filter: &ProductFilter) {
    query.push(" WHERE is_active = TRUE");
    if let Some(category_id) = filter.category_id {
        query.push(" AND category_id = ");
        query.push_bind(category_id);
    }
    if filter.featured {
        query.push(" AND (is_featured = TRUE OR created_at >= NOW() - INTERVAL '30 days')");
    }
    if let Some(term) = &filter.search {
        let pattern = format!("%{term}%");
        query.push(" AND (name ILIKE ");
        query.push_bind(pattern.clone());
        query.push(" OR description ILIKE ");
        query.push_bind(pattern);
        query.push(")");
    }
    if let Some(min) = filter.min_price {
        query.push(" AND price >= ");
        query.push_bind(min);
    }
    if let Some(max) = filter.max_price {
        query.push(" AND price <= ");
        query.push_bind(max);
    }
}

#[async_trait]
impl CatalogReader for PgCatalogStore {
    async fn find_product(&self, id: Uuid) -> Result<Option<Product>> {
        sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .map_err(Into::into)
    }

    async fn find_products_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.db)
            .await
            .map_err(Into::into)
    }

    async fn find_categories_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Category>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.db)
            .await
            .map_err(Into::into)
    }
}
