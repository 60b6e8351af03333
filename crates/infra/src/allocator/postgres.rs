//! Postgres-backed per-prefix counter.
//!
//! Counter state lives in a dedicated `sku_counters` table; a reservation is
//! one upsert statement, so the read-increment-write cycle is atomic at the
//! database without an explicit transaction:
//!
//! | SQLx error | PG code | Mapped to | Scenario |
//! |---|---|---|---|
//! | Database (unique violation) | `23505` | `AllocationConflict` | concurrent first insert for a prefix |
//! | Database (serialization) | `40001`/`40P01` | `AllocationConflict` | transaction manager aborted the upsert |
//! | other | any | `Storage` | connectivity, pool closed, ... |
//!
//! `AllocationConflict` is transient by contract; the service layer retries
//! with a freshly computed counter value.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::instrument;

use amara_sku::{Prefix, SequenceAllocator, SequenceNumber, SkuError, SEQUENCE_CAPACITY};

/// Per-prefix monotonic counters in a Postgres table.
#[derive(Debug, Clone)]
pub struct PostgresSequenceAllocator {
    pool: PgPool,
}

impl PostgresSequenceAllocator {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the counter table if missing.
    pub async fn ensure_schema(&self) -> Result<(), SkuError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sku_counters (
                prefix     TEXT PRIMARY KEY,
                next_value BIGINT NOT NULL DEFAULT 0 CHECK (next_value >= 0)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }

    /// Bootstrap counters from SKUs already in the `products` table, e.g.
    /// when adopting a catalog that predates the counter table. Runs once at
    /// startup; rows with undecodable suffixes are logged and excluded.
    ///
    /// `GREATEST` keeps the upsert monotonic, so counters already ahead of
    /// the catalog (gaps from aborted reservations) are never lowered.
    #[instrument(skip(self))]
    pub async fn recover_counters(&self) -> Result<(), SkuError> {
        let rows = sqlx::query("SELECT sku FROM products")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("recover", e))?;

        let mut skus = Vec::with_capacity(rows.len());
        for row in rows {
            skus.push(
                row.try_get::<String, _>("sku")
                    .map_err(|e| map_sqlx_error("recover", e))?,
            );
        }

        for (prefix, next) in super::next_values_from_skus(skus.iter().map(String::as_str)) {
            sqlx::query(
                r#"
                INSERT INTO sku_counters (prefix, next_value) VALUES ($1, $2)
                ON CONFLICT (prefix) DO UPDATE
                SET next_value = GREATEST(sku_counters.next_value, EXCLUDED.next_value)
                "#,
            )
            .bind(&prefix)
            .bind(next as i64)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("recover", e))?;
            tracing::info!(%prefix, next_value = next, "sku counter recovered from catalog");
        }

        Ok(())
    }
}

#[async_trait]
impl SequenceAllocator for PostgresSequenceAllocator {
    #[instrument(skip(self), err)]
    async fn peek(&self, prefix: &str) -> Result<SequenceNumber, SkuError> {
        let row = sqlx::query("SELECT next_value FROM sku_counters WHERE prefix = $1")
            .bind(prefix)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("peek", e))?;

        let next = row
            .map(|r| r.try_get::<i64, _>("next_value"))
            .transpose()
            .map_err(|e| map_sqlx_error("peek", e))?
            .unwrap_or(0);

        Ok(SequenceNumber::new(next as u32))
    }

    /// Single-statement increment-and-fetch. The `WHERE` guard keeps the
    /// counter saturated at capacity instead of wrapping: once no row
    /// matches, every further reservation fails with `SequenceExhausted`.
    #[instrument(skip(self, prefix), fields(prefix = %prefix), err)]
    async fn reserve(&self, prefix: &Prefix) -> Result<SequenceNumber, SkuError> {
        let row = sqlx::query(
            r#"
            INSERT INTO sku_counters (prefix, next_value) VALUES ($1, 1)
            ON CONFLICT (prefix) DO UPDATE
            SET next_value = sku_counters.next_value + 1
            WHERE sku_counters.next_value < $2
            RETURNING next_value - 1 AS issued
            "#,
        )
        .bind(prefix.as_str())
        .bind(SEQUENCE_CAPACITY as i64)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("reserve", e))?;

        match row {
            Some(r) => {
                let issued: i64 = r.try_get("issued").map_err(|e| map_sqlx_error("reserve", e))?;
                Ok(SequenceNumber::new(issued as u32))
            }
            None => Err(SkuError::SequenceExhausted {
                prefix: prefix.as_str().to_string(),
            }),
        }
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> SkuError {
    if let sqlx::Error::Database(ref db) = err {
        if let Some(code) = db.code() {
            if code == "23505" || code == "40001" || code == "40P01" {
                return SkuError::AllocationConflict(format!("{operation}: {db}"));
            }
        }
    }
    SkuError::Storage(format!("{operation}: {err}"))
}
