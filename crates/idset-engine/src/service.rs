//! Interactive dataset service.

use crate::chart::TemplateChartRenderer;
use crate::executor::QueryExecutor;
use crate::registry::DatasetRegistry;
use idset_cache::{CacheSweeper, DEFAULT_SWEEP_INTERVAL, ResultCache};
use idset_core::ports::{ChartRenderer, DataSource, DatasetStore};
use idset_core::{
    Clock, DatasetDefinition, DatasetHeader, Error, Filter, Result, ResultSet, SystemClock,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

/// Configuration for the dataset service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Period between cache sweeps.
    pub sweep_interval: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}

/// Entry point for listing and executing interactive datasets.
pub struct DatasetService {
    registry: Arc<DatasetRegistry>,
    cache: Arc<ResultCache>,
    executor: QueryExecutor,
    charts: Arc<dyn ChartRenderer>,
    config: ServiceConfig,
}

impl DatasetService {
    pub fn new(
        store: Arc<dyn DatasetStore>,
        source: Arc<dyn DataSource>,
        config: ServiceConfig,
    ) -> Self {
        Self::with_clock(store, source, Arc::new(SystemClock), config)
    }

    pub fn with_clock(
        store: Arc<dyn DatasetStore>,
        source: Arc<dyn DataSource>,
        clock: Arc<dyn Clock>,
        config: ServiceConfig,
    ) -> Self {
        let registry = Arc::new(DatasetRegistry::new(store));
        let cache = Arc::new(ResultCache::new(clock));
        let executor = QueryExecutor::new(registry.clone(), source, cache.clone());

        Self {
            registry,
            cache,
            executor,
            charts: Arc::new(TemplateChartRenderer),
            config,
        }
    }

    /// Replace the chart renderer.
    pub fn with_chart_renderer(mut self, charts: Arc<dyn ChartRenderer>) -> Self {
        self.charts = charts;
        self
    }

    /// Load the initial set of definitions.
    pub async fn init(&self) -> Result<usize> {
        self.registry.refresh().await
    }

    /// Start the background cache sweeper.
    pub fn start(&self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        CacheSweeper::new(self.cache.clone(), self.config.sweep_interval).spawn(shutdown)
    }

    pub async fn refresh(&self) -> Result<usize> {
        self.registry.refresh().await
    }

    pub async fn lookup(&self, id: &str) -> Option<DatasetDefinition> {
        self.registry.lookup(id).await
    }

    pub async fn traverse<F>(&self, visit: F)
    where
        F: FnMut(&DatasetDefinition),
    {
        self.registry.traverse(visit).await
    }

    /// Full result of dataset `id`. Callers slice it with [`Filter::cut`].
    pub async fn execute(&self, id: &str, filter: &Filter) -> Result<Arc<ResultSet>> {
        self.executor.execute(id, filter).await
    }

    /// Execute dataset `id` and render it through its chart template.
    pub async fn chart(&self, id: &str, filter: &Filter) -> Result<Vec<u8>> {
        let def = self
            .registry
            .lookup(id)
            .await
            .ok_or_else(|| Error::DatasetNotFound(id.to_string()))?;

        let template = match def.chart.as_deref() {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => return Err(Error::ChartNotConfigured(id.to_string())),
        };

        let result = self.executor.execute(id, filter).await?;
        self.charts.render(&template, &result)
    }

    /// Headers of live datasets in any of `places`, in presentation order.
    /// An empty `places` matches every place.
    pub async fn available(&self, places: &[&str]) -> Vec<DatasetHeader> {
        let mut headers = Vec::new();
        self.registry
            .traverse(|def| {
                if def.is_deleted() {
                    return;
                }
                if !places.is_empty() && !places.contains(&def.presentation_place.as_str()) {
                    return;
                }
                headers.push(DatasetHeader::from_definition(def));
            })
            .await;

        debug!(places = ?places, count = headers.len(), "Available datasets listed");
        headers
    }

    pub fn registry(&self) -> &Arc<DatasetRegistry> {
        &self.registry
    }

    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }
}
