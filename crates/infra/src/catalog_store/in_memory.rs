//! In-memory product store.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use amara_catalog::{Product, ProductStore, StoreError};
use amara_core::ProductId;

#[derive(Debug, Default)]
struct Inner {
    products: HashMap<ProductId, Product>,
    by_sku: HashMap<String, ProductId>,
}

/// In-memory product store with a unique index on SKU.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    inner: RwLock<Inner>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All stored SKUs, for counter recovery.
    pub fn skus(&self) -> Vec<String> {
        match self.inner.read() {
            Ok(inner) => inner.by_sku.keys().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn insert(&self, product: Product) -> Result<Product, StoreError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))?;

        let sku = product.sku().to_string();
        if inner.by_sku.contains_key(&sku) {
            return Err(StoreError::DuplicateSku(sku));
        }

        let id = product.id_typed();
        inner.by_sku.insert(sku, id);
        inner.products.insert(id, product.clone());
        Ok(product)
    }

    async fn get(&self, id: ProductId) -> Result<Product, StoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))?;
        inner.products.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))?;
        let mut products: Vec<Product> = inner.products.values().cloned().collect();
        products.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(products)
    }

    async fn deactivate(&self, id: ProductId) -> Result<Product, StoreError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))?;
        let product = inner.products.get_mut(&id).ok_or(StoreError::NotFound)?;
        product.deactivate();
        Ok(product.clone())
    }
}
