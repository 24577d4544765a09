//! PostgreSQL implementation of DatasetStore.

use async_trait::async_trait;
use idset_core::ports::DatasetStore;
use idset_core::{DatasetRecord, Error, Result};
use sqlx::{PgPool, Row};
use tracing::debug;

/// Reads definitions from the `interactive_datasets` table.
#[derive(Clone)]
pub struct PgDatasetStore {
    pool: PgPool,
}

impl PgDatasetStore {
    /// Create a new PgDatasetStore.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DatasetStore for PgDatasetStore {
    async fn load_all(&self) -> Result<Vec<DatasetRecord>> {
        let rows = sqlx::query(
            "SELECT id, query, chart, title, presentation_place, presentation_order, \
             cache_expiration_duration, query_params::text AS query_params, deleted_at \
             FROM interactive_datasets",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Error::Database(e.to_string()))?;

        let mut records = Vec::with_capacity(rows.len());
        for r in rows {
            records.push(DatasetRecord {
                id: r.try_get("id").map_err(|e| Error::Database(e.to_string()))?,
                query: r.try_get("query").map_err(|e| Error::Database(e.to_string()))?,
                chart: r.try_get("chart").map_err(|e| Error::Database(e.to_string()))?,
                title: r.try_get("title").map_err(|e| Error::Database(e.to_string()))?,
                presentation_place: r
                    .try_get("presentation_place")
                    .map_err(|e| Error::Database(e.to_string()))?,
                presentation_order: r
                    .try_get("presentation_order")
                    .map_err(|e| Error::Database(e.to_string()))?,
                cache_expiration_secs: r
                    .try_get("cache_expiration_duration")
                    .map_err(|e| Error::Database(e.to_string()))?,
                query_params: r
                    .try_get("query_params")
                    .map_err(|e| Error::Database(e.to_string()))?,
                deleted_at: r
                    .try_get("deleted_at")
                    .map_err(|e| Error::Database(e.to_string()))?,
            });
        }

        debug!(count = records.len(), "Interactive datasets loaded");
        Ok(records)
    }
}
