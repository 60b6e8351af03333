//! The seven SKU classification dimensions.

use serde::{Deserialize, Serialize};

/// One classification axis of a product.
///
/// Every product selects exactly one attribute per dimension; the selected
/// codes, concatenated in [`Dimension::ALL`] order, form the SKU prefix.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    FaceValue,
    Category,
    Material,
    Motif,
    Finding,
    Locking,
    Size,
}

impl Dimension {
    /// Canonical prefix order. Part of the wire contract: reordering would
    /// change the grouping key of every previously issued SKU.
    pub const ALL: [Dimension; 7] = [
        Dimension::FaceValue,
        Dimension::Category,
        Dimension::Material,
        Dimension::Motif,
        Dimension::Finding,
        Dimension::Locking,
        Dimension::Size,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Stable snake_case key, used in URLs and log fields.
    pub fn key(&self) -> &'static str {
        match self {
            Dimension::FaceValue => "face_value",
            Dimension::Category => "category",
            Dimension::Material => "material",
            Dimension::Motif => "motif",
            Dimension::Finding => "finding",
            Dimension::Locking => "locking",
            Dimension::Size => "size",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|d| d.key() == key)
    }
}

impl core::fmt::Display for Dimension {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_order_is_stable() {
        let keys: Vec<&str> = Dimension::ALL.iter().map(|d| d.key()).collect();
        assert_eq!(
            keys,
            vec!["face_value", "category", "material", "motif", "finding", "locking", "size"]
        );
    }

    #[test]
    fn from_key_round_trips() {
        for dim in Dimension::ALL {
            assert_eq!(Dimension::from_key(dim.key()), Some(dim));
        }
        assert_eq!(Dimension::from_key("colour"), None);
    }
}
