//! Product record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use amara_core::{DomainError, Entity, ProductId};
use amara_sku::{AllocatedSku, AttributeSelection, SequenceNumber};

/// Caller-supplied product data, before a SKU exists for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub selection: AttributeSelection,
}

/// A catalog product.
///
/// `sku` and `sequence` are assigned exactly once at creation and never
/// change; there is no setter for either. Deactivation flips `is_active`
/// only — the SKU stays issued forever.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    id: ProductId,
    name: String,
    description: Option<String>,
    sku: String,
    sequence: SequenceNumber,
    selection: AttributeSelection,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl Product {
    /// Build a new product around a freshly allocated SKU.
    pub fn create(
        id: ProductId,
        new: NewProduct,
        allocated: &AllocatedSku,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if new.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }

        Ok(Self {
            id,
            name: new.name,
            description: new.description,
            sku: allocated.sku.clone(),
            sequence: allocated.sequence,
            selection: new.selection,
            is_active: true,
            created_at,
        })
    }

    /// Rehydrate a product from stored fields (infrastructure use).
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: ProductId,
        name: String,
        description: Option<String>,
        sku: String,
        sequence: SequenceNumber,
        selection: AttributeSelection,
        is_active: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            description,
            sku,
            sequence,
            selection,
            is_active,
            created_at,
        }
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn sequence(&self) -> SequenceNumber {
        self.sequence
    }

    pub fn selection(&self) -> &AttributeSelection {
        &self.selection
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Soft delete. The SKU and sequence number remain consumed.
    pub fn deactivate(&mut self) {
        self.is_active = false;
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
