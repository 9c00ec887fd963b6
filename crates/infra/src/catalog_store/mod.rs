//! Catalog storage boundary.
//!
//! `CatalogStore` owns product records. Any engine satisfying the trait is
//! substitutable; the in-memory variant backs dev/test and the Postgres variant
//! backs persistent deployments.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryCatalogStore;
pub use postgres::PostgresCatalogStore;
pub use r#trait::CatalogStore;
