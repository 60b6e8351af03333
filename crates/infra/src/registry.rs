//! In-memory attribute registry.
//!
//! The registry is the allocator's only collaborator for attribute lookups;
//! it is deliberately small because everything downstream goes through the
//! `AttributeResolver` seam.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::Serialize;

use amara_core::{AttributeId, DomainError};
use amara_sku::{AttributeCode, AttributeResolver, Dimension};

/// One registered attribute within a dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeEntry {
    pub id: AttributeId,
    pub code: AttributeCode,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Registry of (code, name) pairs per classification dimension.
///
/// Codes are unique within their dimension. Intended for tests/dev and as
/// the seed-backed default; a relational registry would sit behind the same
/// resolver seam.
#[derive(Debug, Default)]
pub struct InMemoryAttributeRegistry {
    entries: RwLock<HashMap<Dimension, Vec<AttributeEntry>>>,
}

impl InMemoryAttributeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the workshop's standard jewelry codes.
    pub fn with_seed_data() -> Self {
        let registry = Self::new();
        let seed: [(Dimension, &[(&str, &str)]); 7] = [
            (Dimension::FaceValue, &[("0", "Plain"), ("1", "Single stone"), ("2", "Multi stone")]),
            (Dimension::Category, &[("B", "Bangle"), ("R", "Ring"), ("E", "Earring"), ("P", "Pendant")]),
            (Dimension::Material, &[("S", "Silver"), ("G", "Gold"), ("C", "Copper")]),
            (Dimension::Motif, &[("F", "Floral"), ("G", "Geometric"), ("T", "Traditional")]),
            (Dimension::Finding, &[("X", "None"), ("H", "Hook"), ("J", "Jump ring")]),
            (Dimension::Locking, &[("S", "Screw"), ("C", "Clasp"), ("M", "Magnetic")]),
            (Dimension::Size, &[("S", "Small"), ("M", "Medium"), ("L", "Large")]),
        ];
        for (dimension, codes) in seed {
            for (code, name) in codes {
                registry
                    .insert(dimension, AttributeCode::new(*code).expect("seed code"), name, None)
                    .expect("seed data is conflict-free");
            }
        }
        registry
    }

    /// Register a new attribute. Fails on a duplicate code within the
    /// dimension.
    pub fn insert(
        &self,
        dimension: Dimension,
        code: AttributeCode,
        name: &str,
        description: Option<String>,
    ) -> Result<AttributeEntry, DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::validation("attribute name cannot be empty"));
        }

        let mut entries = self
            .entries
            .write()
            .map_err(|_| DomainError::conflict("registry lock poisoned"))?;

        let items = entries.entry(dimension).or_default();
        if items.iter().any(|e| e.code == code) {
            return Err(DomainError::conflict(format!(
                "code {code} already exists in dimension {dimension}"
            )));
        }

        let entry = AttributeEntry {
            id: AttributeId::new(),
            code,
            name: name.to_string(),
            description,
            created_at: Utc::now(),
        };
        items.push(entry.clone());
        Ok(entry)
    }

    /// All entries of a dimension, ordered by code.
    pub fn list(&self, dimension: Dimension) -> Vec<AttributeEntry> {
        let entries = match self.entries.read() {
            Ok(guard) => guard,
            Err(_) => return Vec::new(),
        };
        let mut items = entries.get(&dimension).cloned().unwrap_or_default();
        items.sort_by(|a, b| a.code.as_str().cmp(b.code.as_str()));
        items
    }

    /// Find an entry by dimension and code (test convenience).
    pub fn find_by_code(&self, dimension: Dimension, code: &str) -> Option<AttributeEntry> {
        self.list(dimension).into_iter().find(|e| e.code.as_str() == code)
    }
}

impl AttributeResolver for InMemoryAttributeRegistry {
    fn resolve(&self, dimension: Dimension, id: AttributeId) -> Option<AttributeCode> {
        let entries = self.entries.read().ok()?;
        entries
            .get(&dimension)?
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.code.clone())
    }
}
