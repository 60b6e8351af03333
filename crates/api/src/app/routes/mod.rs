use axum::Router;

pub mod lookups;
pub mod products;
pub mod sku;
pub mod system;

/// Router for all service endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/sku", sku::router())
        .nest("/products", products::router())
        .nest("/lookups", lookups::router())
}
