use std::sync::Arc;

use ecom_catalog::{Product, ProductFields};
use ecom_core::ProductId;

use crate::error::StoreError;

/// Product storage capability.
#[async_trait::async_trait]
pub trait CatalogStore: Send + Sync {
    /// All products, ordered by id.
    async fn list_products(&self) -> Result<Vec<Product>, StoreError>;

    /// Lookup by id. `None` means the product does not exist.
    async fn product_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    /// Bulk lookup.
    ///
    /// `ids` is expected to be deduplicated. The result keeps the order of `ids`
    /// and silently omits ids that do not exist; an empty input yields an empty
    /// result.
    async fn products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, StoreError>;

    /// Insert a product; the store assigns its id and creation time.
    async fn create_product(&self, fields: ProductFields) -> Result<Product, StoreError>;

    /// Replace the mutable fields of an existing product. `None` if it does not exist.
    async fn update_product(
        &self,
        id: ProductId,
        fields: ProductFields,
    ) -> Result<Option<Product>, StoreError>;

    /// Delete a product. Returns whether a record was removed.
    async fn delete_product(&self, id: ProductId) -> Result<bool, StoreError>;
}

#[async_trait::async_trait]
impl<S> CatalogStore for Arc<S>
where
    S: CatalogStore + ?Sized,
{
    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        (**self).list_products().await
    }

    async fn product_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        (**self).product_by_id(id).await
    }

    async fn products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, StoreError> {
        (**self).products_by_ids(ids).await
    }

    async fn create_product(&self, fields: ProductFields) -> Result<Product, StoreError> {
        (**self).create_product(fields).await
    }

    async fn update_product(
        &self,
        id: ProductId,
        fields: ProductFields,
    ) -> Result<Option<Product>, StoreError> {
        (**self).update_product(id, fields).await
    }

    async fn delete_product(&self, id: ProductId) -> Result<bool, StoreError> {
        (**self).delete_product(id).await
    }
}
