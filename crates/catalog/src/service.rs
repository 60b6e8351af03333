//! Allocate-and-create orchestration.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use amara_core::{DomainError, ProductId};
use amara_sku::{AttributeSelection, SkuError, SkuPreview, SkuService};

use crate::product::{NewProduct, Product};
use crate::store::{ProductStore, StoreError};

/// Full allocate-and-persist cycles attempted before giving up on a
/// duplicate-SKU collision.
const MAX_CREATE_ATTEMPTS: u32 = 5;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Sku(#[from] SkuError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(StoreError),
}

/// Product catalog entry points: preview and allocate-and-create.
pub struct CatalogService {
    sku: SkuService,
    store: Arc<dyn ProductStore>,
}

impl CatalogService {
    pub fn new(sku: SkuService, store: Arc<dyn ProductStore>) -> Self {
        Self { sku, store }
    }

    /// Advisory SKU preview; see [`SkuService::preview`].
    pub async fn preview_sku(&self, selection: &AttributeSelection) -> Result<SkuPreview, CatalogError> {
        Ok(self.sku.preview(selection).await?)
    }

    /// Validate the selection, reserve a sequence number, and persist the
    /// product with its SKU.
    ///
    /// Any unresolved attribute rejects the request before a number is
    /// taken. If the insert loses to a row that bypassed the allocator, the
    /// whole cycle is retried with a fresh number; a reserved number whose
    /// insert fails is never re-issued, so each failed cycle leaves a
    /// permanent gap in the sequence.
    pub async fn create_product(&self, new: NewProduct) -> Result<Product, CatalogError> {
        if new.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty").into());
        }

        let mut attempt = 1;
        loop {
            let allocated = self.sku.allocate(&new.selection).await?;
            let product = Product::create(ProductId::new(), new.clone(), &allocated, Utc::now())?;

            match self.store.insert(product).await {
                Ok(stored) => {
                    tracing::info!(
                        product_id = %stored.id_typed(),
                        sku = %stored.sku(),
                        sequence = stored.sequence().value(),
                        "product created"
                    );
                    return Ok(stored);
                }
                Err(StoreError::DuplicateSku(sku)) if attempt < MAX_CREATE_ATTEMPTS => {
                    tracing::warn!(%sku, attempt, "sku collision on insert, retrying with fresh sequence");
                    attempt += 1;
                }
                Err(StoreError::DuplicateSku(sku)) => {
                    return Err(SkuError::AllocationConflict(format!(
                        "sku {sku} still colliding after {attempt} attempts"
                    ))
                    .into());
                }
                Err(e) => return Err(CatalogError::Store(e)),
            }
        }
    }

    pub async fn get_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.store.get(id).await.map_err(CatalogError::Store)
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        self.store.list().await.map_err(CatalogError::Store)
    }

    pub async fn deactivate_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        let product = self.store.deactivate(id).await.map_err(CatalogError::Store)?;
        tracing::info!(product_id = %id, sku = %product.sku(), "product deactivated");
        Ok(product)
    }
}
