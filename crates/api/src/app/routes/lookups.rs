//! Attribute registry maintenance for the seven SKU dimensions.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use amara_sku::{AttributeCode, Dimension};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/:dimension", get(list_lookup_items).post(create_lookup_item))
}

fn parse_dimension(key: &str) -> Result<Dimension, axum::response::Response> {
    Dimension::from_key(key).ok_or_else(|| {
        errors::json_error(
            StatusCode::NOT_FOUND,
            "unknown_lookup",
            format!("unknown lookup: {key}"),
        )
    })
}

pub async fn list_lookup_items(
    Extension(services): Extension<Arc<AppServices>>,
    Path(dimension): Path<String>,
) -> axum::response::Response {
    let dimension = match parse_dimension(&dimension) {
        Ok(d) => d,
        Err(resp) => return resp,
    };

    let items: Vec<serde_json::Value> = services
        .registry
        .list(dimension)
        .iter()
        .map(dto::lookup_to_json)
        .collect();
    (StatusCode::OK, Json(serde_json::json!(items))).into_response()
}

pub async fn create_lookup_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(dimension): Path<String>,
    Json(body): Json<dto::CreateLookupRequest>,
) -> axum::response::Response {
    let dimension = match parse_dimension(&dimension) {
        Ok(d) => d,
        Err(resp) => return resp,
    };

    // Codes are stored uppercase regardless of input case.
    let code = match AttributeCode::new(body.code.to_uppercase()) {
        Ok(c) => c,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.registry.insert(dimension, code, &body.name, body.description) {
        Ok(entry) => (StatusCode::CREATED, Json(dto::lookup_to_json(&entry))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
