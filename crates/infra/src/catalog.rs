//! Catalog reads and mutations on top of a `CatalogStore`.

use tracing::instrument;

use ecom_catalog::{Product, ProductFields, parse_id_list};
use ecom_core::{DomainError, ProductId};

use crate::catalog_store::CatalogStore;
use crate::error::ServiceError;

#[derive(Debug, Clone)]
pub struct CatalogService<C> {
    store: C,
}

impl<C> CatalogService<C> {
    pub fn new(store: C) -> Self {
        Self { store }
    }
}

impl<C: CatalogStore> CatalogService<C> {
    pub async fn list(&self) -> Result<Vec<Product>, ServiceError> {
        Ok(self.store.list_products().await?)
    }

    pub async fn get(&self, id: ProductId) -> Result<Product, ServiceError> {
        self.store
            .product_by_id(id)
            .await?
            .ok_or(ServiceError::Domain(DomainError::NotFound))
    }

    /// Resolve a comma-separated id list and return the products that exist,
    /// in resolved order.
    ///
    /// The whole list is rejected on the first bad token; nothing is fetched
    /// in that case.
    #[instrument(skip(self), err)]
    pub async fn lookup_many(&self, raw: &str) -> Result<Vec<Product>, ServiceError> {
        let ids = parse_id_list(raw)?;
        let products = self.store.products_by_ids(&ids).await?;
        tracing::debug!(requested = ids.len(), found = products.len(), "bulk product lookup");
        Ok(products)
    }

    #[instrument(skip(self, draft), fields(name = %draft.name), err)]
    pub async fn create(&self, draft: ProductFields) -> Result<Product, ServiceError> {
        let product = self.store.create_product(draft).await?;
        tracing::info!(product_id = %product.id, "product created");
        Ok(product)
    }

    #[instrument(skip(self, draft), err)]
    pub async fn update(&self, id: ProductId, draft: ProductFields) -> Result<Product, ServiceError> {
        self.store
            .update_product(id, draft)
            .await?
            .ok_or(ServiceError::Domain(DomainError::NotFound))
    }

    #[instrument(skip(self), err)]
    pub async fn delete(&self, id: ProductId) -> Result<(), ServiceError> {
        if self.store.delete_product(id).await? {
            tracing::info!(product_id = %id, "product deleted");
            Ok(())
        } else {
            Err(DomainError::NotFound.into())
        }
    }
}
