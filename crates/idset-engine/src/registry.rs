//! In-memory registry of dataset definitions.

use idset_core::ports::DatasetStore;
use idset_core::{DatasetDefinition, Error, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

#[derive(Default)]
struct Snapshot {
    list: Vec<DatasetDefinition>,
    index: HashMap<String, usize>,
}

/// Dataset definitions loaded from a [`DatasetStore`], kept sorted by
/// presentation place and order.
///
/// Readers always get copies. A refresh replaces the whole list at once or
/// not at all.
pub struct DatasetRegistry {
    store: Arc<dyn DatasetStore>,
    inner: RwLock<Snapshot>,
}

impl DatasetRegistry {
    pub fn new(store: Arc<dyn DatasetStore>) -> Self {
        Self {
            store,
            inner: RwLock::new(Snapshot::default()),
        }
    }

    /// Reload every definition from the store. Returns how many were loaded.
    ///
    /// Any fetch or decode failure leaves the current definitions in place.
    pub async fn refresh(&self) -> Result<usize> {
        let records = self
            .store
            .load_all()
            .await
            .map_err(|e| Error::Refresh(e.to_string()))?;

        let mut list = records
            .into_iter()
            .map(DatasetDefinition::from_record)
            .collect::<Result<Vec<_>>>()?;

        list.sort_by(|a, b| {
            a.presentation_place
                .cmp(&b.presentation_place)
                .then(a.presentation_order.cmp(&b.presentation_order))
        });

        let index: HashMap<String, usize> = list
            .iter()
            .enumerate()
            .map(|(i, def)| (def.id.clone(), i))
            .collect();

        let count = list.len();
        *self.inner.write().await = Snapshot { list, index };

        info!(count, "Interactive datasets refreshed");
        Ok(count)
    }

    /// Copy of the definition with this id.
    pub async fn lookup(&self, id: &str) -> Option<DatasetDefinition> {
        let inner = self.inner.read().await;
        inner.index.get(id).map(|&i| inner.list[i].clone())
    }

    /// Visit every definition in sorted order. Refreshes wait until the visit
    /// completes.
    pub async fn traverse<F>(&self, mut visit: F)
    where
        F: FnMut(&DatasetDefinition),
    {
        let inner = self.inner.read().await;
        for def in &inner.list {
            visit(def);
        }
    }

    /// Record the column names discovered for a dataset.
    pub async fn assign_columns(&self, id: &str, columns: Vec<String>) {
        let mut inner = self.inner.write().await;
        if let Some(&i) = inner.index.get(id) {
            debug!(id, columns = columns.len(), "Dataset columns assigned");
            inner.list[i].columns = columns;
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.list.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.list.is_empty()
    }
}
