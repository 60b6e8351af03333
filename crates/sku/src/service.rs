//! Orchestration: preview and allocate.

use std::sync::Arc;

use serde::Serialize;

use crate::code::{AttributeResolver, AttributeSelection};
use crate::error::SkuError;
use crate::prefix::Prefix;
use crate::sequence::{SequenceAllocator, SequenceNumber};
use crate::suffix::Suffix;

/// Bounded retries of the reservation step when the backing store reports a
/// transient conflict.
const MAX_RESERVE_ATTEMPTS: u32 = 3;

/// Advisory result of a preview. Never a reservation: a concurrent creation
/// can consume `next_sequence` before the caller commits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkuPreview {
    pub prefix: String,
    pub suffix: String,
    pub full_sku: String,
    pub next_sequence: u32,
    pub codes: Vec<String>,
}

/// A reserved sequence number with its encoded suffix and full SKU.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocatedSku {
    pub prefix: Prefix,
    pub sequence: SequenceNumber,
    pub suffix: Suffix,
    pub sku: String,
}

/// Composes the prefix encoder, sequence allocator and suffix codec into the
/// two operations of the allocation subsystem.
pub struct SkuService {
    resolver: Arc<dyn AttributeResolver>,
    allocator: Arc<dyn SequenceAllocator>,
}

impl SkuService {
    pub fn new(resolver: Arc<dyn AttributeResolver>, allocator: Arc<dyn SequenceAllocator>) -> Self {
        Self { resolver, allocator }
    }

    /// Read-only computation of what the next SKU for this selection would
    /// be. Unresolved attributes yield `"?"` segments instead of failing.
    pub async fn preview(&self, selection: &AttributeSelection) -> Result<SkuPreview, SkuError> {
        let preview = Prefix::compose_lenient(selection, self.resolver.as_ref());
        let next = self.allocator.peek(&preview.text).await?;
        let suffix = Suffix::encode(next).map_err(|_| SkuError::SequenceExhausted {
            prefix: preview.text.clone(),
        })?;

        Ok(SkuPreview {
            full_sku: format!("{}{}", preview.text, suffix.as_str()),
            prefix: preview.text,
            suffix: suffix.as_str().to_string(),
            next_sequence: next.value(),
            codes: preview.codes,
        })
    }

    /// Reserve the next sequence number for this selection and encode the
    /// resulting SKU.
    ///
    /// Strict: any unresolved attribute rejects the operation before a
    /// number is taken. The returned number is permanently consumed even if
    /// the caller fails to persist it afterwards.
    pub async fn allocate(&self, selection: &AttributeSelection) -> Result<AllocatedSku, SkuError> {
        let prefix = Prefix::compose(selection, self.resolver.as_ref())?;

        let mut attempt = 1;
        let sequence = loop {
            match self.allocator.reserve(&prefix).await {
                Ok(seq) => break seq,
                Err(SkuError::AllocationConflict(reason)) if attempt < MAX_RESERVE_ATTEMPTS => {
                    tracing::warn!(
                        prefix = %prefix,
                        attempt,
                        %reason,
                        "sequence reservation conflict, retrying"
                    );
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        };

        let suffix = Suffix::encode(sequence).map_err(|_| SkuError::SequenceExhausted {
            prefix: prefix.as_str().to_string(),
        })?;
        let sku = prefix.join(&suffix);

        tracing::debug!(%prefix, sequence = sequence.value(), %sku, "sequence reserved");

        Ok(AllocatedSku {
            prefix,
            sequence,
            suffix,
            sku,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use amara_core::AttributeId;
    use async_trait::async_trait;

    use super::*;
    use crate::code::AttributeCode;
    use crate::dimension::Dimension;
    use crate::suffix::SEQUENCE_CAPACITY;

    struct MapResolver(HashMap<(Dimension, AttributeId), AttributeCode>);

    impl AttributeResolver for MapResolver {
        fn resolve(&self, dimension: Dimension, id: AttributeId) -> Option<AttributeCode> {
            self.0.get(&(dimension, id)).cloned()
        }
    }

    /// Per-prefix counter double mirroring the production allocator contract.
    #[derive(Default)]
    struct CounterDouble {
        counters: Mutex<HashMap<String, u32>>,
    }

    impl CounterDouble {
        fn seeded(prefix: &str, next: u32) -> Self {
            let double = Self::default();
            double.counters.lock().unwrap().insert(prefix.to_string(), next);
            double
        }
    }

    #[async_trait]
    impl SequenceAllocator for CounterDouble {
        async fn peek(&self, prefix: &str) -> Result<SequenceNumber, SkuError> {
            let counters = self.counters.lock().unwrap();
            Ok(SequenceNumber::new(counters.get(prefix).copied().unwrap_or(0)))
        }

        async fn reserve(&self, prefix: &Prefix) -> Result<SequenceNumber, SkuError> {
            let mut counters = self.counters.lock().unwrap();
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

    fn fixture(codes: [&str; 7]) -> (AttributeSelection, Arc<MapResolver>) {
        let ids: Vec<AttributeId> = (0..7).map(|_| AttributeId::new()).collect();
        let selection = AttributeSelection {
            face_value_id: ids[0],
            category_id: ids[1],
            material_id: ids[2],
            motif_id: ids[3],
            finding_id: ids[4],
            locking_id: ids[5],
            size_id: ids[6],
        };
        let map = Dimension::ALL
            .into_iter()
            .zip(ids)
            .zip(codes)
            .map(|((dim, id), code)| ((dim, id), AttributeCode::new(code).unwrap()))
            .collect();
        (selection, Arc::new(MapResolver(map)))
    }

    fn service(resolver: Arc<MapResolver>, allocator: CounterDouble) -> SkuService {
        SkuService::new(resolver, Arc::new(allocator))
    }

    #[tokio::test]
    async fn first_allocation_yields_sequence_zero() {
        let (selection, resolver) = fixture(["0", "B", "S", "F", "X", "S", "S"]);
        let svc = service(resolver, CounterDouble::default());

        let first = svc.allocate(&selection).await.unwrap();
        assert_eq!(first.sku, "0BSFXSS000");
        assert_eq!(first.sequence, SequenceNumber::ZERO);

        let second = svc.allocate(&selection).await.unwrap();
        assert_eq!(second.sku, "0BSFXSS001");
        assert_eq!(second.sequence.value(), 1);
    }

    #[tokio::test]
    async fn preview_is_deterministic_without_intervening_creation() {
        let (selection, resolver) = fixture(["0", "B", "S", "F", "X", "S", "S"]);
        let svc = service(resolver, CounterDouble::default());

        let a = svc.preview(&selection).await.unwrap();
        let b = svc.preview(&selection).await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.full_sku, "0BSFXSS000");
        assert_eq!(a.next_sequence, 0);
        assert_eq!(a.codes, vec!["0", "B", "S", "F", "X", "S", "S"]);
    }

    #[tokio::test]
    async fn preview_advances_past_consumed_sequences() {
        let (selection, resolver) = fixture(["0", "B", "S", "F", "X", "S", "S"]);
        let svc = service(resolver, CounterDouble::default());

        let consumed = svc.allocate(&selection).await.unwrap();
        let preview = svc.preview(&selection).await.unwrap();
        assert!(preview.next_sequence > consumed.sequence.value());
    }

    #[tokio::test]
    async fn preview_tolerates_unknown_attribute_with_placeholder() {
        let (mut selection, resolver) = fixture(["0", "B", "S", "F", "X", "S", "S"]);
        selection.material_id = AttributeId::new();
        let svc = service(resolver, CounterDouble::default());

        let preview = svc.preview(&selection).await.unwrap();
        assert_eq!(preview.prefix, "0B?FXSS");
        assert_eq!(preview.codes[2], "?");
        assert_eq!(preview.next_sequence, 0);
    }

    #[tokio::test]
    async fn allocate_rejects_unknown_attribute() {
        let (mut selection, resolver) = fixture(["0", "B", "S", "F", "X", "S", "S"]);
        let rogue = AttributeId::new();
        selection.material_id = rogue;
        let svc = service(resolver, CounterDouble::default());

        let err = svc.allocate(&selection).await.unwrap_err();
        assert_eq!(
            err,
            SkuError::UnknownAttribute {
                dimension: Dimension::Material,
                id: rogue,
            }
        );
    }

    #[tokio::test]
    async fn last_sequence_encodes_zzz_then_exhausts() {
        let (selection, resolver) = fixture(["0", "B", "S", "F", "X", "S", "S"]);
        let svc = service(resolver, CounterDouble::seeded("0BSFXSS", SEQUENCE_CAPACITY - 1));

        let last = svc.allocate(&selection).await.unwrap();
        assert_eq!(last.sku, "0BSFXSSZZZ");

        let err = svc.allocate(&selection).await.unwrap_err();
        assert!(matches!(err, SkuError::SequenceExhausted { .. }));
    }

    #[tokio::test]
    async fn concurrent_allocations_receive_distinct_contiguous_sequences() {
        let (selection, resolver) = fixture(["0", "B", "S", "F", "X", "S", "S"]);
        let svc = Arc::new(service(resolver, CounterDouble::default()));

        let mut handles = Vec::new();
        for _ in 0..32 {
            let svc = Arc::clone(&svc);
            handles.push(tokio::spawn(async move { svc.allocate(&selection).await }));
        }

        let mut sequences = Vec::new();
        for handle in handles {
            sequences.push(handle.await.unwrap().unwrap().sequence.value());
        }
        sequences.sort_unstable();
        assert_eq!(sequences, (0..32).collect::<Vec<u32>>());
    }
}
