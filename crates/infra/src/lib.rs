//! Infrastructure layer: store adapters and request-level orchestration.

pub mod catalog;
pub mod catalog_store;
pub mod checkout;
pub mod db;
pub mod error;
pub mod order_store;

pub use catalog::CatalogService;
pub use catalog_store::{CatalogStore, InMemoryCatalogStore, PostgresCatalogStore};
pub use checkout::{CheckoutReceipt, CheckoutService};
pub use error::{ServiceError, StoreError};
pub use order_store::{InMemoryOrderStore, OrderStore, PostgresOrderStore};
