//! Infrastructure wiring for the API process.

use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use amara_catalog::CatalogService;
use amara_infra::{
    InMemoryAttributeRegistry, InMemoryCounterAllocator, InMemoryProductStore,
    PostgresProductStore, PostgresSequenceAllocator,
};
use amara_sku::{AttributeResolver, SkuService};

/// Backend selection for the service wiring.
///
/// With `database_url` unset everything runs on the in-memory adapters
/// (tests/dev); set, the counter and product store move to Postgres. The
/// attribute registry is in-memory either way and seeded with the standard
/// jewelry codes unless `seed_registry` is off.
#[derive(Debug, Clone)]
pub struct ServicesConfig {
    pub database_url: Option<String>,
    pub seed_registry: bool,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            seed_registry: true,
        }
    }
}

impl ServicesConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").ok(),
            seed_registry: true,
        }
    }
}

/// Shared service graph handed to handlers via `Extension`.
pub struct AppServices {
    pub catalog: CatalogService,
    pub registry: Arc<InMemoryAttributeRegistry>,
}

pub async fn build_services(config: ServicesConfig) -> anyhow::Result<AppServices> {
    let registry = if config.seed_registry {
        Arc::new(InMemoryAttributeRegistry::with_seed_data())
    } else {
        Arc::new(InMemoryAttributeRegistry::new())
    };

    let catalog = match config.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(&url)
                .await
                .context("failed to connect to postgres")?;

            let allocator = PostgresSequenceAllocator::new(pool.clone());
            allocator
                .ensure_schema()
                .await
                .context("failed to create sku_counters schema")?;

            let store = PostgresProductStore::new(pool);
            store
                .ensure_schema()
                .await
                .context("failed to create products schema")?;

            // Adopting an existing catalog: counters must start past the
            // SKUs already issued, or every creation collides with them.
            allocator
                .recover_counters()
                .await
                .context("failed to recover sku counters from existing products")?;

            tracing::info!("using postgres allocator and product store");
            let sku = SkuService::new(
                Arc::clone(&registry) as Arc<dyn AttributeResolver>,
                Arc::new(allocator),
            );
            CatalogService::new(sku, Arc::new(store))
        }
        None => {
            tracing::info!("DATABASE_URL not set; using in-memory allocator and product store");
            let sku = SkuService::new(
                Arc::clone(&registry) as Arc<dyn AttributeResolver>,
                Arc::new(InMemoryCounterAllocator::new()),
            );
            CatalogService::new(sku, Arc::new(InMemoryProductStore::new()))
        }
    };

    Ok(AppServices { catalog, registry })
}
