//! Composite key encoder: seven attribute codes → one prefix.

use serde::{Deserialize, Serialize};

use amara_core::ValueObject;

use crate::code::{AttributeResolver, AttributeSelection};
use crate::dimension::Dimension;
use crate::error::SkuError;
use crate::suffix::SUFFIX_WIDTH;

/// Marker substituted for an unresolved dimension in lenient previews.
pub const PLACEHOLDER: &str = "?";

/// Ordered concatenation of the seven attribute codes.
///
/// Opaque grouping key for sequencing: it exists at allocation time only and
/// is never re-derived from a product after creation. A `Prefix` is always
/// fully resolved — lenient preview output lives in [`PrefixPreview`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Prefix(String);

impl Prefix {
    /// Resolve all seven attribute ids and concatenate their codes in
    /// canonical dimension order.
    ///
    /// Strict: the first lookup miss fails the whole composition with
    /// [`SkuError::UnknownAttribute`]. Product creation must never persist a
    /// prefix with unresolved segments.
    pub fn compose(
        selection: &AttributeSelection,
        resolver: &dyn AttributeResolver,
    ) -> Result<Self, SkuError> {
        let mut text = String::new();
        for (dimension, id) in selection.iter() {
            let code = resolver
                .resolve(dimension, id)
                .ok_or(SkuError::UnknownAttribute { dimension, id })?;
            text.push_str(code.as_str());
        }
        Ok(Self(text))
    }

    /// Lenient composition for previews: a lookup miss yields a `"?"`
    /// placeholder for that dimension instead of failing.
    pub fn compose_lenient(
        selection: &AttributeSelection,
        resolver: &dyn AttributeResolver,
    ) -> PrefixPreview {
        let mut codes = Vec::with_capacity(Dimension::COUNT);
        let mut unresolved = Vec::new();
        for (dimension, id) in selection.iter() {
            match resolver.resolve(dimension, id) {
                Some(code) => codes.push(code.as_str().to_string()),
                None => {
                    codes.push(PLACEHOLDER.to_string());
                    unresolved.push(dimension);
                }
            }
        }
        PrefixPreview {
            text: codes.concat(),
            codes,
            unresolved,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Full SKU for a given encoded suffix.
    pub fn join(&self, suffix: &crate::suffix::Suffix) -> String {
        format!("{}{}", self.0, suffix.as_str())
    }

    /// Split a stored SKU into `(prefix_text, suffix_text)`.
    ///
    /// Purely positional: the suffix is always the trailing
    /// [`SUFFIX_WIDTH`] characters.
    pub fn split_sku(sku: &str) -> Option<(&str, &str)> {
        if sku.len() <= SUFFIX_WIDTH || !sku.is_ascii() {
            return None;
        }
        Some(sku.split_at(sku.len() - SUFFIX_WIDTH))
    }
}

impl ValueObject for Prefix {}

impl core::fmt::Display for Prefix {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of lenient composition: prefix text that may contain `"?"`
/// segments, the per-dimension codes, and which dimensions missed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixPreview {
    pub text: String,
    pub codes: Vec<String>,
    pub unresolved: Vec<Dimension>,
}

impl PrefixPreview {
    pub fn fully_resolved(&self) -> bool {
        self.unresolved.is_empty()
    }
}
