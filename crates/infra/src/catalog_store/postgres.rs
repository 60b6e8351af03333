//! Postgres-backed product store.
//!
//! A unique index on `sku` is the last line of defense for SKU uniqueness;
//! with the counter allocator in front it only fires against rows that
//! bypassed the allocator, and the creation flow retries on it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use amara_catalog::{Product, ProductStore, StoreError};
use amara_core::{AttributeId, ProductId};
use amara_sku::{AttributeSelection, SequenceNumber};

#[derive(Debug, Clone)]
pub struct PostgresProductStore {
    pool: PgPool,
}

impl PostgresProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the products table if missing.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS products (
                id            UUID PRIMARY KEY,
                name          TEXT NOT NULL,
                description   TEXT,
                sku           TEXT NOT NULL UNIQUE,
                sequence_num  BIGINT NOT NULL CHECK (sequence_num >= 0),
                face_value_id UUID NOT NULL,
                category_id   UUID NOT NULL,
                material_id   UUID NOT NULL,
                motif_id      UUID NOT NULL,
                finding_id    UUID NOT NULL,
                locking_id    UUID NOT NULL,
                size_id       UUID NOT NULL,
                is_active     BOOLEAN NOT NULL DEFAULT TRUE,
                created_at    TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }
}

const PRODUCT_COLUMNS: &str = "id, name, description, sku, sequence_num, \
     face_value_id, category_id, material_id, motif_id, finding_id, locking_id, size_id, \
     is_active, created_at";

#[async_trait]
impl ProductStore for PostgresProductStore {
    #[instrument(skip(self, product), fields(sku = %product.sku()))]
    async fn insert(&self, product: Product) -> Result<Product, StoreError> {
        let selection = *product.selection();
        sqlx::query(
            r#"
            INSERT INTO products
                (id, name, description, sku, sequence_num,
                 face_value_id, category_id, material_id, motif_id,
                 finding_id, locking_id, size_id, is_active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(product.id_typed().as_uuid())
        .bind(product.name())
        .bind(product.description())
        .bind(product.sku())
        .bind(product.sequence().value() as i64)
        .bind(selection.face_value_id.as_uuid())
        .bind(selection.category_id.as_uuid())
        .bind(selection.material_id.as_uuid())
        .bind(selection.motif_id.as_uuid())
        .bind(selection.finding_id.as_uuid())
        .bind(selection.locking_id.as_uuid())
        .bind(selection.size_id.as_uuid())
        .bind(product.is_active())
        .bind(product.created_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if unique_violation(&e) {
                StoreError::DuplicateSku(product.sku().to_string())
            } else {
                map_sqlx_error("insert", e)
            }
        })?;

        Ok(product)
    }

    async fn get(&self, id: ProductId) -> Result<Product, StoreError> {
        let row = sqlx::query(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get", e))?;

        row.map(|r| row_to_product(&r)).transpose()?.ok_or(StoreError::NotFound)
    }

    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list", e))?;

        rows.iter().map(row_to_product).collect()
    }

    async fn deactivate(&self, id: ProductId) -> Result<Product, StoreError> {
        let row = sqlx::query(&format!(
            "UPDATE products SET is_active = FALSE WHERE id = $1 RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("deactivate", e))?;

        row.map(|r| row_to_product(&r)).transpose()?.ok_or(StoreError::NotFound)
    }
}

fn row_to_product(row: &PgRow) -> Result<Product, StoreError> {
    let get_id = |column: &str| -> Result<AttributeId, StoreError> {
        Ok(AttributeId::from_uuid(
            row.try_get(column).map_err(|e| map_sqlx_error("decode row", e))?,
        ))
    };

    let selection = AttributeSelection {
        face_value_id: get_id("face_value_id")?,
        category_id: get_id("category_id")?,
        material_id: get_id("material_id")?,
        motif_id: get_id("motif_id")?,
        finding_id: get_id("finding_id")?,
        locking_id: get_id("locking_id")?,
        size_id: get_id("size_id")?,
    };

    let map = |e: sqlx::Error| map_sqlx_error("decode row", e);
    let id: uuid::Uuid = row.try_get("id").map_err(map)?;
    let sequence: i64 = row.try_get("sequence_num").map_err(map)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(map)?;

    Ok(Product::restore(
        ProductId::from_uuid(id),
        row.try_get("name").map_err(map)?,
        row.try_get("description").map_err(map)?,
        row.try_get("sku").map_err(map)?,
        SequenceNumber::new(sequence as u32),
        selection,
        row.try_get("is_active").map_err(map)?,
        created_at,
    ))
}

fn unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    StoreError::Backend(format!("{operation}: {err}"))
}
