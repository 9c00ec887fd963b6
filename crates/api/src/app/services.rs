use std::sync::Arc;

use anyhow::Context;

use ecom_infra::{
    CatalogService, CatalogStore, CheckoutService, InMemoryCatalogStore, InMemoryOrderStore,
    OrderStore, PostgresCatalogStore, PostgresOrderStore, db,
};
use ecom_infra::db::PgPool;

use crate::config::StoreConfig;

pub type DynCatalogStore = Arc<dyn CatalogStore>;
pub type DynOrderStore = Arc<dyn OrderStore>;

/// Services shared by every handler, independent of the store backend.
#[derive(Clone)]
pub struct AppServices {
    pub catalog: CatalogService<DynCatalogStore>,
    pub checkout: CheckoutService<DynCatalogStore, DynOrderStore>,
}

impl AppServices {
    pub fn new(catalog: DynCatalogStore, orders: DynOrderStore) -> Self {
        Self {
            catalog: CatalogService::new(catalog.clone()),
            checkout: CheckoutService::new(catalog, orders),
        }
    }

    /// Process-local stores; state is lost on restart.
    pub fn in_memory() -> Self {
        let catalog = Arc::new(InMemoryCatalogStore::new());
        let orders = Arc::new(InMemoryOrderStore::new(catalog.clone()));
        Self::new(catalog, orders)
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self::new(
            Arc::new(PostgresCatalogStore::new(pool.clone())),
            Arc::new(PostgresOrderStore::new(pool)),
        )
    }
}

pub async fn build_services(store: &StoreConfig) -> anyhow::Result<AppServices> {
    match store {
        StoreConfig::InMemory => {
            tracing::info!("using in-memory stores");
            Ok(AppServices::in_memory())
        }
        StoreConfig::Postgres {
            url,
            max_connections,
        } => {
            let pool = db::connect(url, *max_connections)
                .await
                .context("failed to connect to Postgres")?;
            db::ensure_schema(&pool)
                .await
                .context("failed to apply database schema")?;
            tracing::info!(max_connections, "using Postgres stores");
            Ok(AppServices::postgres(pool))
        }
    }
}
