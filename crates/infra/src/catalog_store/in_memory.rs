use std::collections::BTreeMap;
use std::sync::RwLock;

use chrono::Utc;

use ecom_catalog::{Product, ProductFields};
use ecom_core::ProductId;

use super::CatalogStore;
use crate::error::StoreError;

/// In-memory catalog for tests/dev.
#[derive(Debug)]
pub struct InMemoryCatalogStore {
    inner: RwLock<CatalogState>,
}

#[derive(Debug)]
struct CatalogState {
    products: BTreeMap<ProductId, Product>,
    next_id: i64,
}

fn poisoned(operation: &'static str) -> StoreError {
    StoreError::storage(operation, "catalog lock poisoned")
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(CatalogState {
                products: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Insert a fully-formed record, keeping its id. Later creations get higher ids.
    pub fn insert(&self, product: Product) -> Result<(), StoreError> {
        let mut state = self.inner.write().map_err(|_| poisoned("insert"))?;
        state.next_id = state.next_id.max(product.id.get() + 1);
        state.products.insert(product.id, product);
        Ok(())
    }

    /// Check every demanded quantity, run `commit`, then decrement stock.
    ///
    /// The catalog write lock is held throughout, so no other order write can
    /// observe or consume the same stock in between. Nothing is decremented if
    /// a check or `commit` fails.
    pub(crate) fn reserve_stock<T>(
        &self,
        demand: &[(ProductId, u64)],
        commit: impl FnOnce() -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut state = self.inner.write().map_err(|_| poisoned("reserve_stock"))?;

        for (id, requested) in demand {
            let product = state
                .products
                .get(id)
                .ok_or(StoreError::ProductMissing(*id))?;
            if !product.has_stock_for(*requested) {
                return Err(StoreError::InsufficientStock {
                    product_id: *id,
                    requested: *requested,
                    available: product.quantity,
                });
            }
        }

        let out = commit()?;

        for (id, requested) in demand {
            if let Some(product) = state.products.get_mut(id) {
                product.quantity -= requested;
            }
        }

        Ok(out)
    }
}

impl Default for InMemoryCatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let state = self.inner.read().map_err(|_| poisoned("list_products"))?;
        Ok(state.products.values().cloned().collect())
    }

    async fn product_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let state = self.inner.read().map_err(|_| poisoned("product_by_id"))?;
        Ok(state.products.get(&id).cloned())
    }

    async fn products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, StoreError> {
        let state = self.inner.read().map_err(|_| poisoned("products_by_ids"))?;
        Ok(ids
            .iter()
            .filter_map(|id| state.products.get(id).cloned())
            .collect())
    }

    async fn create_product(&self, fields: ProductFields) -> Result<Product, StoreError> {
        let mut state = self.inner.write().map_err(|_| poisoned("create_product"))?;
        let id = ProductId::new(state.next_id)
            .map_err(|e| StoreError::storage("create_product", e.to_string()))?;
        state.next_id += 1;

        let product = Product::from_fields(id, fields, Utc::now());
        state.products.insert(id, product.clone());
        Ok(product)
    }

    async fn update_product(
        &self,
        id: ProductId,
        fields: ProductFields,
    ) -> Result<Option<Product>, StoreError> {
        let mut state = self.inner.write().map_err(|_| poisoned("update_product"))?;
        Ok(state.products.get_mut(&id).map(|product| {
            product.apply(fields);
            product.clone()
        }))
    }

    async fn delete_product(&self, id: ProductId) -> Result<bool, StoreError> {
        let mut state = self.inner.write().map_err(|_| poisoned("delete_product"))?;
        Ok(state.products.remove(&id).is_some())
    }
}
