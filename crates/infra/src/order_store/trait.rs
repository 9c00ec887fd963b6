use std::sync::Arc;

use ecom_core::OrderId;
use ecom_orders::{AssembledOrder, Order};

use crate::error::StoreError;

/// Order persistence capability.
#[async_trait::async_trait]
pub trait OrderStore: Send + Sync {
    /// Persist an assembled order atomically and return it with its assigned id.
    ///
    /// Implementations must decrement on-hand stock for every product in the
    /// order within the same unit of work, failing with
    /// `StoreError::InsufficientStock` (and writing nothing) if any product
    /// would go negative.
    async fn create_order(&self, order: &AssembledOrder) -> Result<Order, StoreError>;

    /// Load an order with its lines. `None` if it does not exist.
    async fn order_by_id(&self, id: OrderId) -> Result<Option<Order>, StoreError>;
}

#[async_trait::async_trait]
impl<S> OrderStore for Arc<S>
where
    S: OrderStore + ?Sized,
{
    async fn create_order(&self, order: &AssembledOrder) -> Result<Order, StoreError> {
        (**self).create_order(order).await
    }

    async fn order_by_id(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        (**self).order_by_id(id).await
    }
}
