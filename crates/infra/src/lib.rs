//! Infrastructure layer: attribute registry, sequence counters, product
//! storage. In-memory adapters for tests/dev, Postgres adapters for
//! production.

pub mod allocator;
pub mod catalog_store;
pub mod registry;


pub use allocator::{InMemoryCounterAllocator, PostgresSequenceAllocator};
pub use catalog_store::{InMemoryProductStore, PostgresProductStore};
pub use registry::{AttributeEntry, InMemoryAttributeRegistry};
