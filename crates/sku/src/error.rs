//! Allocation error taxonomy.

use thiserror::Error;

use amara_core::AttributeId;

use crate::dimension::Dimension;

/// Errors surfaced by the SKU allocation subsystem.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SkuError {
    /// An attribute id did not resolve to a code in its dimension.
    /// Rejected before any reservation is attempted.
    #[error("unknown {dimension} attribute: {id}")]
    UnknownAttribute { dimension: Dimension, id: AttributeId },

    /// No suffix values remain for this prefix. Fatal for the prefix; the
    /// caller needs a finer attribute split, not a retry.
    #[error("sequence space exhausted for prefix {prefix:?}")]
    SequenceExhausted { prefix: String },

    /// Two concurrent reservations collided. Transient; the service retries
    /// with a freshly computed counter value before surfacing this.
    #[error("allocation conflict: {0}")]
    AllocationConflict(String),

    /// A stored suffix is not 3 base-36 characters. Data-integrity problem:
    /// logged and excluded from max-sequence computation, never a crash.
    #[error("invalid suffix {raw:?}")]
    InvalidSuffix { raw: String },

    /// Backing-store failure outside the taxonomy above.
    #[error("allocator storage failure: {0}")]
    Storage(String),
}
