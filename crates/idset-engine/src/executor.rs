//! Cached execution of dataset queries.

use crate::registry::DatasetRegistry;
use idset_cache::{ResultCache, fingerprint};
use idset_core::ports::DataSource;
use idset_core::{DatasetDefinition, Error, Filter, Result, ResultSet, apply_sort};
use std::sync::Arc;
use tracing::debug;

/// Runs dataset queries, serving repeated request shapes from the cache
/// when the dataset opts into caching.
pub struct QueryExecutor {
    registry: Arc<DatasetRegistry>,
    source: Arc<dyn DataSource>,
    cache: Arc<ResultCache>,
}

impl QueryExecutor {
    pub fn new(
        registry: Arc<DatasetRegistry>,
        source: Arc<dyn DataSource>,
        cache: Arc<ResultCache>,
    ) -> Self {
        Self {
            registry,
            source,
            cache,
        }
    }

    /// Full, unsliced result of dataset `id` for `filter`.
    pub async fn execute(&self, id: &str, filter: &Filter) -> Result<Arc<ResultSet>> {
        let def = self
            .registry
            .lookup(id)
            .await
            .ok_or_else(|| Error::DatasetNotFound(id.to_string()))?;

        let result = self.execute_definition(&def, filter).await?;

        if def.columns.is_empty() {
            self.registry
                .assign_columns(&def.id, result.columns.clone())
                .await;
        }

        Ok(result)
    }

    /// Execute an already looked-up definition.
    pub async fn execute_definition(
        &self,
        def: &DatasetDefinition,
        filter: &Filter,
    ) -> Result<Arc<ResultSet>> {
        let query = def
            .query
            .as_deref()
            .ok_or_else(|| Error::QueryNotConfigured(def.id.clone()))?;

        let sql = apply_sort(query, &filter.order_by());
        let params = bind_params(def, filter);

        debug!(
            id = %def.id,
            sort_by = %filter.sort_by,
            desc = filter.desc,
            params = ?params,
            "Interactive execution request"
        );

        let Some(ttl) = def.cache_ttl() else {
            return self.fetch(&sql, &params).await;
        };

        let key = fingerprint(&sql, &params);
        if let Some(hit) = self.cache.get(&key).await {
            debug!(id = %def.id, key = %key, "Cached resultset found");
            return Ok(hit);
        }

        let result = self.fetch(&sql, &params).await?;
        self.cache.put(key.clone(), Arc::clone(&result), ttl).await;
        debug!(id = %def.id, key = %key, rows = result.len(), "Resultset cached");

        Ok(result)
    }

    async fn fetch(&self, sql: &str, params: &[Option<String>]) -> Result<Arc<ResultSet>> {
        let raw = self.source.query(sql, params).await?;
        Ok(Arc::new(ResultSet::from_raw(raw)?))
    }
}

/// Positional values for the dataset's declared parameters. Missing
/// positions bind NULL.
fn bind_params(def: &DatasetDefinition, filter: &Filter) -> Vec<Option<String>> {
    let mut params = filter.params.clone();
    if params.len() < def.param_count() {
        params.resize(def.param_count(), None);
    }
    params
}
