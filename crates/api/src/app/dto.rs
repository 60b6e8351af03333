//! Request/response DTOs and JSON mapping helpers.

use serde::Deserialize;

use amara_catalog::Product;
use amara_core::AttributeId;
use amara_infra::AttributeEntry;
use amara_sku::AttributeSelection;

// -------------------------
// Request DTOs
// -------------------------

/// Body of `POST /products` and `POST /sku/preview` (the preview takes the
/// same shape so clients can submit the form they are about to commit).
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub face_value_id: AttributeId,
    pub category_id: AttributeId,
    pub material_id: AttributeId,
    pub motif_id: AttributeId,
    pub finding_id: AttributeId,
    pub locking_id: AttributeId,
    pub size_id: AttributeId,
}

impl CreateProductRequest {
    pub fn selection(&self) -> AttributeSelection {
        AttributeSelection {
            face_value_id: self.face_value_id,
            category_id: self.category_id,
            material_id: self.material_id,
            motif_id: self.motif_id,
            finding_id: self.finding_id,
            locking_id: self.locking_id,
            size_id: self.size_id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateLookupRequest {
    pub name: String,
    pub code: String,
    pub description: Option<String>,
}

// -------------------------
// Response mapping
// -------------------------

pub fn product_to_json(product: &Product) -> serde_json::Value {
    let selection = product.selection();
    serde_json::json!({
        "id": product.id_typed().to_string(),
        "name": product.name(),
        "description": product.description(),
        "sku": product.sku(),
        "sequence_num": product.sequence().value(),
        "face_value_id": selection.face_value_id,
        "category_id": selection.category_id,
        "material_id": selection.material_id,
        "motif_id": selection.motif_id,
        "finding_id": selection.finding_id,
        "locking_id": selection.locking_id,
        "size_id": selection.size_id,
        "is_active": product.is_active(),
        "created_at": product.created_at().to_rfc3339(),
    })
}

pub fn lookup_to_json(entry: &AttributeEntry) -> serde_json::Value {
    serde_json::json!({
        "id": entry.id.to_string(),
        "name": entry.name,
        "code": entry.code.as_str(),
        "description": entry.description,
        "created_at": entry.created_at.to_rfc3339(),
    })
}
