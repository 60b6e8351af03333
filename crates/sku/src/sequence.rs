//! Per-prefix sequence numbers and the allocator seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SkuError;
use crate::prefix::Prefix;

/// A per-prefix sequence number. Assigned once, never reused — deleting the
/// owning product does not return its number to the pool.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SequenceNumber(u32);

impl SequenceNumber {
    pub const ZERO: SequenceNumber = SequenceNumber(0);

    pub fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl core::fmt::Display for SequenceNumber {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Capability for reserving per-prefix sequence numbers.
///
/// Implementations maintain a dedicated monotonic counter per prefix with an
/// atomic increment-and-fetch, rather than scanning existing rows on every
/// allocation. The contract for `reserve`:
///
/// - numbers issued for one prefix are pairwise distinct and contiguous from
///   0 under normal operation;
/// - a number handed out is never issued again, even if the caller aborts
///   before persisting (the gap is permanent);
/// - past `36^3 - 1` the call fails with [`SkuError::SequenceExhausted`]
///   instead of wrapping.
///
/// Different prefixes are independent; implementations must not serialize
/// allocations across prefixes on a single shared lock held during I/O.
#[async_trait]
pub trait SequenceAllocator: Send + Sync {
    /// The number the next `reserve` for this prefix would return, without
    /// reserving it. Advisory only: a concurrent creation can consume it
    /// between this call and a later `reserve`.
    ///
    /// Accepts raw prefix text so previews with unresolved (`"?"`) segments
    /// can still be answered; such a prefix has no counter and peeks as 0.
    async fn peek(&self, prefix: &str) -> Result<SequenceNumber, SkuError>;

    /// Atomically reserve the next unused number for `prefix`.
    async fn reserve(&self, prefix: &Prefix) -> Result<SequenceNumber, SkuError>;
}
