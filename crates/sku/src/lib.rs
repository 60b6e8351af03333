//! `amara-sku` — SKU allocation subsystem.
//!
//! A SKU is `Prefix || Suffix`: a composite prefix concatenated from seven
//! classification attribute codes in a fixed canonical order, followed by a
//! 3-character base-36 suffix encoding a per-prefix sequence number. This
//! crate owns the prefix encoder, the suffix codec, the sequence-allocator
//! capability trait and the orchestration service. It performs no I/O;
//! storage lives behind the `AttributeResolver` and `SequenceAllocator`
//! seams in `amara-infra`.

pub mod code;
pub mod dimension;
pub mod error;
pub mod prefix;
pub mod sequence;
pub mod service;
pub mod suffix;

pub use code::{AttributeCode, AttributeResolver, AttributeSelection};
pub use dimension::Dimension;
pub use error::SkuError;
pub use prefix::{Prefix, PrefixPreview, PLACEHOLDER};
pub use sequence::{SequenceAllocator, SequenceNumber};
pub use service::{AllocatedSku, SkuPreview, SkuService};
pub use suffix::{Suffix, SEQUENCE_CAPACITY, SUFFIX_ALPHABET, SUFFIX_WIDTH};
