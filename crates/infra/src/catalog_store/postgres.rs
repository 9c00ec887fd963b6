//! Postgres-backed catalog store.
//!
//! Bulk lookups use `id = ANY($1)` and order the rows by the position of their
//! id in the bind array, so results come back in request order.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use ecom_catalog::{Product, ProductFields};
use ecom_core::{Money, ProductId};

use super::CatalogStore;
use crate::db::{from_db, map_sqlx_error, to_db};
use crate::error::StoreError;

const PRODUCT_COLUMNS: &str = "id, name, description, image, price, quantity, created_at";

#[derive(Debug, Clone)]
pub struct PostgresCatalogStore {
    pool: PgPool,
}

impl PostgresCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub(crate) fn product_from_row(operation: &'static str, row: &PgRow) -> Result<Product, StoreError> {
    let get = |e: sqlx::Error| map_sqlx_error(operation, e);

    let id = ProductId::new(row.try_get::<i64, _>("id").map_err(get)?)
        .map_err(|e| StoreError::storage(operation, e.to_string()))?;
    Ok(Product {
        id,
        name: row.try_get("name").map_err(get)?,
        description: row.try_get("description").map_err(get)?,
        image: row.try_get("image").map_err(get)?,
        price: Money::from_minor(from_db(operation, row.try_get("price").map_err(get)?)?),
        quantity: from_db(operation, row.try_get("quantity").map_err(get)?)?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at").map_err(get)?,
    })
}

#[async_trait::async_trait]
impl CatalogStore for PostgresCatalogStore {
    #[instrument(skip(self), err)]
    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query(&format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_products", e))?;

        rows.iter()
            .map(|row| product_from_row("list_products", row))
            .collect()
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    async fn product_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"))
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("product_by_id", e))?;

        row.as_ref()
            .map(|row| product_from_row("product_by_id", row))
            .transpose()
    }

    #[instrument(skip(self, ids), fields(id_count = ids.len()), err)]
    async fn products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let raw: Vec<i64> = ids.iter().map(ProductId::get).collect();
        let rows = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE id = ANY($1) \
             ORDER BY array_position($1, id)"
        ))
        .bind(raw)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("products_by_ids", e))?;

        rows.iter()
            .map(|row| product_from_row("products_by_ids", row))
            .collect()
    }

    #[instrument(skip(self, draft), fields(name = %draft.name), err)]
    async fn create_product(&self, draft: ProductFields) -> Result<Product, StoreError> {
        let row = sqlx::query(&format!(
            "INSERT INTO products (name, description, image, price, quantity) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(&draft.image)
        .bind(to_db("create_product", draft.price.minor_units())?)
        .bind(to_db("create_product", draft.quantity)?)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_product", e))?;

        product_from_row("create_product", &row)
    }

    #[instrument(skip(self, draft), fields(product_id = %id), err)]
    async fn update_product(
        &self,
        id: ProductId,
        draft: ProductFields,
    ) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query(&format!(
            "UPDATE products \
             SET name = $2, description = $3, image = $4, price = $5, quantity = $6 \
             WHERE id = $1 \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id.get())
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(&draft.image)
        .bind(to_db("update_product", draft.price.minor_units())?)
        .bind(to_db("update_product", draft.quantity)?)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_product", e))?;

        row.as_ref()
            .map(|row| product_from_row("update_product", row))
            .transpose()
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    async fn delete_product(&self, id: ProductId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_product", e))?;

        Ok(result.rows_affected() > 0)
    }
}
