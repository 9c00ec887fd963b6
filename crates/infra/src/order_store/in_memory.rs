use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use chrono::Utc;

use ecom_core::OrderId;
use ecom_orders::{AssembledOrder, Order};

use super::OrderStore;
use crate::catalog_store::InMemoryCatalogStore;
use crate::error::StoreError;

/// In-memory order store for tests/dev.
///
/// Shares the catalog it decrements stock from. Lock order is always catalog
/// first, then orders.
#[derive(Debug)]
pub struct InMemoryOrderStore {
    catalog: Arc<InMemoryCatalogStore>,
    inner: RwLock<OrderState>,
}

#[derive(Debug)]
struct OrderState {
    orders: BTreeMap<OrderId, Order>,
    next_id: i64,
}

fn poisoned(operation: &'static str) -> StoreError {
    StoreError::storage(operation, "order lock poisoned")
}

impl InMemoryOrderStore {
    pub fn new(catalog: Arc<InMemoryCatalogStore>) -> Self {
        Self {
            catalog,
            inner: RwLock::new(OrderState {
                orders: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Number of persisted orders.
    pub fn count(&self) -> Result<usize, StoreError> {
        let state = self.inner.read().map_err(|_| poisoned("count"))?;
        Ok(state.orders.len())
    }
}

#[async_trait::async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn create_order(&self, order: &AssembledOrder) -> Result<Order, StoreError> {
        self.catalog.reserve_stock(&order.demand(), || {
            let mut state = self.inner.write().map_err(|_| poisoned("create_order"))?;
            let id = OrderId::new(state.next_id)
                .map_err(|e| StoreError::storage("create_order", e.to_string()))?;
            state.next_id += 1;

            let persisted = Order {
                id,
                user_id: order.user_id,
                total_price: order.total_price,
                created_at: Utc::now(),
                lines: order.order_lines(),
            };
            state.orders.insert(id, persisted.clone());
            Ok(persisted)
        })
    }

    async fn order_by_id(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        let state = self.inner.read().map_err(|_| poisoned("order_by_id"))?;
        Ok(state.orders.get(&id).cloned())
    }
}
