//! `amara-catalog` — product records and the allocate-and-create flow.
//!
//! The catalog persists the allocator's output: each product owns exactly
//! one SKU and one sequence number, assigned atomically at creation time and
//! immutable afterwards. Soft deletion marks a product inactive without ever
//! reclaiming its SKU.

pub mod product;
pub mod service;
pub mod store;

pub use product::{NewProduct, Product};
pub use service::{CatalogError, CatalogService};
pub use store::{ProductStore, StoreError};
