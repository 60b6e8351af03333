//! Attribute codes, per-dimension selections and the resolver seam.

use serde::{Deserialize, Serialize};

use amara_core::{AttributeId, DomainError, ValueObject};

use crate::dimension::Dimension;

/// Short uppercase code identifying one attribute within its dimension
/// (e.g. `"B"` for bangle, `"S"` for silver).
///
/// Codes are 1–4 uppercase ASCII alphanumeric characters; they become literal
/// characters of issued SKUs, so the constructor is the only way in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeCode(String);

impl AttributeCode {
    pub const MAX_LEN: usize = 4;

    pub fn new(code: impl Into<String>) -> Result<Self, DomainError> {
        let code = code.into();
        if code.is_empty() || code.len() > Self::MAX_LEN {
            return Err(DomainError::validation(format!(
                "attribute code must be 1-{} characters, got {:?}",
                Self::MAX_LEN,
                code
            )));
        }
        if !code.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()) {
            return Err(DomainError::validation(format!(
                "attribute code must be uppercase ASCII alphanumeric, got {code:?}"
            )));
        }
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for AttributeCode {}

impl core::fmt::Display for AttributeCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One attribute id per dimension, as supplied by the caller at preview or
/// creation time.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSelection {
    pub face_value_id: AttributeId,
    pub category_id: AttributeId,
    pub material_id: AttributeId,
    pub motif_id: AttributeId,
    pub finding_id: AttributeId,
    pub locking_id: AttributeId,
    pub size_id: AttributeId,
}

impl AttributeSelection {
    pub fn get(&self, dimension: Dimension) -> AttributeId {
        match dimension {
            Dimension::FaceValue => self.face_value_id,
            Dimension::Category => self.category_id,
            Dimension::Material => self.material_id,
            Dimension::Motif => self.motif_id,
            Dimension::Finding => self.finding_id,
            Dimension::Locking => self.locking_id,
            Dimension::Size => self.size_id,
        }
    }

    /// Iterate `(dimension, id)` pairs in canonical prefix order.
    pub fn iter(&self) -> impl Iterator<Item = (Dimension, AttributeId)> + '_ {
        Dimension::ALL.into_iter().map(move |d| (d, self.get(d)))
    }
}

/// Capability for looking attribute codes up by id.
///
/// Keeps the encoder and allocator decoupled from how the attribute registry
/// is stored. A miss is simply `None`; policy (placeholder vs. rejection)
/// belongs to the caller.
pub trait AttributeResolver: Send + Sync {
    fn resolve(&self, dimension: Dimension, id: AttributeId) -> Option<AttributeCode>;
}
