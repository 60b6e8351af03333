//! Sequence allocator adapters.
//!
//! Both adapters keep a dedicated per-prefix counter advanced by an atomic
//! increment-and-fetch, instead of scanning catalog rows on every
//! allocation. Scanning survives
//! only as an explicit recovery path for bootstrapping counters from an
//! existing catalog.

use std::collections::HashMap;

use amara_sku::{Prefix, Suffix};

mod in_memory;
mod postgres;

pub use in_memory::InMemoryCounterAllocator;
pub use postgres::PostgresSequenceAllocator;

/// Fold existing SKUs into the next counter value per prefix: one past the
/// highest decodable suffix. SKUs whose tail does not parse as base-36 are
/// foreign-format data, logged and excluded rather than fatal.
pub(crate) fn next_values_from_skus<'a>(
    skus: impl IntoIterator<Item = &'a str>,
) -> HashMap<String, u32> {
    let mut next_values: HashMap<String, u32> = HashMap::new();
    for sku in skus {
        let Some((prefix, tail)) = Prefix::split_sku(sku) else {
            tracing::warn!(%sku, "sku too short to carry a suffix, excluded from recovery");
            continue;
        };
        match Suffix::decode(tail) {
            Ok(sequence) => {
                let next = next_values.entry(prefix.to_string()).or_insert(0);
                *next = (*next).max(sequence.value() + 1);
            }
            Err(_) => {
                tracing::warn!(%sku, suffix = %tail, "invalid suffix, excluded from recovery");
            }
        }
    }
    next_values
}
