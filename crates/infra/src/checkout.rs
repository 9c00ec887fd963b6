//! Checkout pipeline: turn a cart into a persisted order.
//!
//! ```text
//! CheckoutPayload
//!   ↓ validate (InvalidPayload)
//! distinct product ids
//!   ↓ CatalogStore::products_by_ids
//! assemble_order (ProductNotFound / InsufficientStock)
//!   ↓ OrderStore::create_order (atomic; stock re-checked at write time)
//! CheckoutReceipt { order_id, total_price }
//! ```
//!
//! Everything before the order write is read-only, so a failure there leaves
//! no trace. Store failures are surfaced once and never retried.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use ecom_core::{DomainError, Money, OrderId, UserId};
use ecom_orders::{CheckoutPayload, Order, assemble_order, distinct_product_ids};

use crate::catalog_store::CatalogStore;
use crate::error::ServiceError;
use crate::order_store::OrderStore;

/// Result of a successful checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutReceipt {
    pub order_id: OrderId,
    pub total_price: Money,
}

#[derive(Debug, Clone)]
pub struct CheckoutService<C, O> {
    catalog: C,
    orders: O,
}

impl<C, O> CheckoutService<C, O> {
    pub fn new(catalog: C, orders: O) -> Self {
        Self { catalog, orders }
    }
}

impl<C, O> CheckoutService<C, O>
where
    C: CatalogStore,
    O: OrderStore,
{
    #[instrument(skip(self, payload), fields(user_id = %user_id, items = payload.items.len()), err)]
    pub async fn checkout(
        &self,
        user_id: UserId,
        payload: &CheckoutPayload,
    ) -> Result<CheckoutReceipt, ServiceError> {
        let lines = payload.validate()?;
        let ids = distinct_product_ids(&lines);
        let products = self.catalog.products_by_ids(&ids).await?;
        let assembled = assemble_order(user_id, &lines, &products)?;

        let order = self.orders.create_order(&assembled).await?;
        tracing::info!(
            order_id = %order.id,
            total_price = %order.total_price,
            lines = order.lines.len(),
            "order placed"
        );

        Ok(CheckoutReceipt {
            order_id: order.id,
            total_price: order.total_price,
        })
    }

    /// Load an order on behalf of `user_id`. Orders owned by someone else are
    /// reported as not found.
    #[instrument(skip(self), err)]
    pub async fn find_order(&self, user_id: UserId, order_id: OrderId) -> Result<Order, ServiceError> {
        match self.orders.order_by_id(order_id).await? {
            Some(order) if order.is_owned_by(user_id) => Ok(order),
            _ => Err(DomainError::NotFound.into()),
        }
    }
}
