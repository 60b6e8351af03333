use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use amara_catalog::{CatalogError, StoreError};
use amara_core::DomainError;
use amara_sku::SkuError;

pub fn catalog_error_to_response(err: CatalogError) -> axum::response::Response {
    match err {
        CatalogError::Sku(e) => sku_error_to_response(e),
        CatalogError::Domain(e) => domain_error_to_response(e),
        CatalogError::Store(StoreError::NotFound) => {
            json_error(StatusCode::NOT_FOUND, "not_found", "product not found")
        }
        CatalogError::Store(StoreError::DuplicateSku(sku)) => {
            json_error(StatusCode::CONFLICT, "conflict", format!("duplicate sku {sku}"))
        }
        CatalogError::Store(StoreError::Backend(msg)) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", msg)
        }
    }
}

pub fn sku_error_to_response(err: SkuError) -> axum::response::Response {
    match err {
        SkuError::UnknownAttribute { .. } => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "unknown_attribute", err.to_string())
        }
        // Capacity, not a transient failure: the prefix needs a finer
        // attribute split.
        SkuError::SequenceExhausted { .. } => {
            json_error(StatusCode::CONFLICT, "sequence_exhausted", err.to_string())
        }
        SkuError::AllocationConflict(_) => {
            json_error(StatusCode::SERVICE_UNAVAILABLE, "allocation_conflict", err.to_string())
        }
        SkuError::InvalidSuffix { .. } => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "invalid_suffix", err.to_string())
        }
        SkuError::Storage(msg) => json_error(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", msg),
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvariantViolation(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", msg)
        }
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
