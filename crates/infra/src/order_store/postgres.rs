//! Postgres-backed order store.
//!
//! `create_order` runs in one transaction:
//! 1. conditionally decrement stock per product (`quantity >= requested`),
//!    visiting products in id order so concurrent checkouts lock rows in the
//!    same sequence
//! 2. insert the order header
//! 3. insert every line item
//! 4. commit
//!
//! Any failure rolls the whole transaction back. Row locks taken by the
//! conditional `UPDATE` serialize concurrent checkouts of the same product, so
//! stock can never go negative.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Row, Transaction};
use tracing::{Span, instrument};

use ecom_core::{Money, OrderId, ProductId, UserId};
use ecom_orders::{AssembledOrder, Order, OrderLine};

use super::OrderStore;
use crate::db::{from_db, map_sqlx_error, to_db};
use crate::error::StoreError;

#[derive(Debug, Clone)]
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Roll back after a stock rejection and hand the rejection back.
///
/// A failed rollback is only logged: the connection discards the open
/// transaction anyway, and the caller needs to see why the order was refused.
async fn reject(tx: Transaction<'_, Postgres>, rejected: StoreError) -> StoreError {
    settle_rejection(rejected, tx.rollback().await)
}

fn settle_rejection(rejected: StoreError, rollback: Result<(), sqlx::Error>) -> StoreError {
    if let Err(e) = rollback {
        tracing::warn!(error = %map_sqlx_error("rollback", e), "rollback after rejected order failed");
    }
    rejected
}

/// Take `requested` units of `product_id`, or explain why not.
async fn decrement_stock(
    tx: &mut Transaction<'_, Postgres>,
    product_id: ProductId,
    requested: u64,
) -> Result<Result<(), StoreError>, StoreError> {
    let requested_db = to_db("decrement_stock", requested)?;
    let updated = sqlx::query(
        r#"
        UPDATE products
        SET quantity = quantity - $2
        WHERE id = $1 AND quantity >= $2
        "#,
    )
    .bind(product_id.get())
    .bind(requested_db)
    .execute(&mut **tx)
    .await
    .map_err(|e| map_sqlx_error("decrement_stock", e))?;

    if updated.rows_affected() == 1 {
        return Ok(Ok(()));
    }

    let available: Option<i64> = sqlx::query_scalar("SELECT quantity FROM products WHERE id = $1")
        .bind(product_id.get())
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| map_sqlx_error("decrement_stock", e))?;

    Ok(Err(match available {
        None => StoreError::ProductMissing(product_id),
        Some(available) => StoreError::InsufficientStock {
            product_id,
            requested,
            available: from_db("decrement_stock", available)?,
        },
    }))
}

#[async_trait::async_trait]
impl OrderStore for PostgresOrderStore {
    #[instrument(
        skip(self, order),
        fields(
            user_id = %order.user_id,
            line_count = order.lines.len(),
            order_id = tracing::field::Empty
        ),
        err
    )]
    async fn create_order(&self, order: &AssembledOrder) -> Result<Order, StoreError> {
        let mut demand = order.demand();
        demand.sort_by_key(|(id, _)| *id);

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        for (product_id, requested) in demand {
            if let Err(rejected) = decrement_stock(&mut tx, product_id, requested).await? {
                return Err(reject(tx, rejected).await);
            }
        }

        let header = sqlx::query(
            r#"
            INSERT INTO orders (user_id, total_price)
            VALUES ($1, $2)
            RETURNING id, created_at
            "#,
        )
        .bind(order.user_id.get())
        .bind(to_db("insert_order", order.total_price.minor_units())?)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("insert_order", e))?;

        let id = OrderId::new(header.try_get("id").map_err(|e| map_sqlx_error("insert_order", e))?)
            .map_err(|e| StoreError::storage("insert_order", e.to_string()))?;
        let created_at: DateTime<Utc> = header
            .try_get("created_at")
            .map_err(|e| map_sqlx_error("insert_order", e))?;

        let lines = order.order_lines();
        for line in &lines {
            sqlx::query(
                r#"
                INSERT INTO order_items (order_id, line_no, product_id, quantity, unit_price)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(id.get())
            .bind(line.line_no as i32)
            .bind(line.product_id.get())
            .bind(to_db("insert_order_item", line.quantity)?)
            .bind(to_db("insert_order_item", line.unit_price.minor_units())?)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("insert_order_item", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;

        Span::current().record("order_id", id.get());
        Ok(Order {
            id,
            user_id: order.user_id,
            total_price: order.total_price,
            created_at,
            lines,
        })
    }

    #[instrument(skip(self), fields(order_id = %id), err)]
    async fn order_by_id(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        let op = "order_by_id";
        let Some(header) = sqlx::query(
            "SELECT id, user_id, total_price, created_at FROM orders WHERE id = $1",
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(op, e))?
        else {
            return Ok(None);
        };

        let rows = sqlx::query(
            r#"
            SELECT line_no, product_id, quantity, unit_price
            FROM order_items
            WHERE order_id = $1
            ORDER BY line_no ASC
            "#,
        )
        .bind(id.get())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(op, e))?;

        let get = |e: sqlx::Error| map_sqlx_error(op, e);
        let invalid = |e: ecom_core::DomainError| StoreError::storage(op, e.to_string());

        let mut lines = Vec::with_capacity(rows.len());
        for row in &rows {
            let line_no: i32 = row.try_get("line_no").map_err(get)?;
            lines.push(OrderLine {
                line_no: u32::try_from(line_no)
                    .map_err(|_| StoreError::storage(op, format!("negative line_no {line_no}")))?,
                product_id: ProductId::new(row.try_get("product_id").map_err(get)?).map_err(invalid)?,
                quantity: from_db(op, row.try_get("quantity").map_err(get)?)?,
                unit_price: Money::from_minor(from_db(op, row.try_get("unit_price").map_err(get)?)?),
            });
        }

        Ok(Some(Order {
            id,
            user_id: UserId::new(header.try_get("user_id").map_err(get)?).map_err(invalid)?,
            total_price: Money::from_minor(from_db(op, header.try_get("total_price").map_err(get)?)?),
            created_at: header.try_get("created_at").map_err(get)?,
            lines,
        }))
    }
}
