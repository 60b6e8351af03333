use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, routing::post, Json, Router};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/preview", post(preview_sku))
}

/// Advisory SKU preview. Computes the next SKU for the submitted selection
/// without reserving anything; a later concurrent creation can consume the
/// previewed sequence. Unresolved attributes show as `"?"` segments.
pub async fn preview_sku(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateProductRequest>,
) -> axum::response::Response {
    match services.catalog.preview_sku(&body.selection()).await {
        Ok(preview) => (StatusCode::OK, Json(preview)).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}
