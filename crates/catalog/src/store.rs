//! Product persistence seam.

use async_trait::async_trait;
use thiserror::Error;

use amara_core::ProductId;

use crate::product::Product;

/// Storage-level failures of the product store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The SKU uniqueness constraint fired on insert. With the counter
    /// allocator in front this only happens when rows exist that bypassed
    /// the allocator (legacy or foreign data); the creation flow treats it
    /// as a transient conflict and retries with a fresh number.
    #[error("duplicate sku: {0}")]
    DuplicateSku(String),

    #[error("product not found")]
    NotFound,

    #[error("storage failure: {0}")]
    Backend(String),
}

/// Capability for persisting and reading products.
///
/// `insert` must enforce global SKU uniqueness; everything else is plain
/// record access. No method mutates `sku` or `sequence` after insert.
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn insert(&self, product: Product) -> Result<Product, StoreError>;

    async fn get(&self, id: ProductId) -> Result<Product, StoreError>;

    /// All products, newest first.
    async fn list(&self) -> Result<Vec<Product>, StoreError>;

    /// Soft delete: mark inactive, keep the SKU issued.
    async fn deactivate(&self, id: ProductId) -> Result<Product, StoreError>;
}
