//! `amara-api` — HTTP boundary for the SKU allocation service.

pub mod app;
