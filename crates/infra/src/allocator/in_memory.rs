//! In-memory per-prefix counter.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use amara_sku::{Prefix, SequenceAllocator, SequenceNumber, SkuError, SEQUENCE_CAPACITY};

/// Per-prefix monotonic counters behind a single mutex.
///
/// Intended for tests/dev. The critical section is a map lookup and an
/// increment; no I/O happens under the lock, so cross-prefix contention is
/// negligible at this scale.
#[derive(Debug, Default)]
pub struct InMemoryCounterAllocator {
    counters: Mutex<HashMap<String, u32>>,
}

impl InMemoryCounterAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild counters from existing SKUs, e.g. when adopting a catalog
    /// that predates the counter table.
    ///
    /// For each SKU the trailing 3 characters are decoded as base-36; a
    /// counter is raised to `max + 1` of the decoded values. SKUs whose tail
    /// does not parse are foreign-format data: logged and excluded rather
    /// than fatal.
    pub fn recover_from<'a>(&self, skus: impl IntoIterator<Item = &'a str>) -> Result<(), SkuError> {
        let recovered = super::next_values_from_skus(skus);

        let mut counters = self
            .counters
            .lock()
            .map_err(|_| SkuError::Storage("counter lock poisoned".to_string()))?;
        for (prefix, next) in recovered {
            let counter = counters.entry(prefix).or_insert(0);
            *counter = (*counter).max(next);
        }

        Ok(())
    }
}

#[async_trait]
impl SequenceAllocator for InMemoryCounterAllocator {
    async fn peek(&self, prefix: &str) -> Result<SequenceNumber, SkuError> {
        let counters = self
            .counters
            .lock()
            .map_err(|_| SkuError::Storage("counter lock poisoned".to_string()))?;
        Ok(SequenceNumber::new(counters.get(prefix).copied().unwrap_or(0)))
    }

    async fn reserve(&self, prefix: &Prefix) -> Result<SequenceNumber, SkuError> {
        let mut counters = self
            .counters
            .lock()
            .map_err(|_| SkuError::Storage("counter lock poisoned".to_string()))?;

        let next = counters.entry(prefix.as_str().to_string()).or_insert(0);
        if *next >= SEQUENCE_CAPACITY {
            return Err(SkuError::SequenceExhausted {
                prefix: prefix.as_str().to_string(),
            });
        }

        let issued = *next;
        *next += 1;
        Ok(SequenceNumber::new(issued))
    }
}
