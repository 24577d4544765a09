//! Port traits (hexagonal architecture).
//!
//! These traits define the interfaces between the dataset engine and the
//! adapters around it.

use crate::dataset::DatasetRecord;
use crate::result::{RawRows, ResultSet};
use crate::Result;
use async_trait::async_trait;

/// Backing store holding the dataset definitions.
#[async_trait]
pub trait DatasetStore: Send + Sync {
    /// Load every dataset row.
    async fn load_all(&self) -> Result<Vec<DatasetRecord>>;
}

/// Executes report SQL.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Run `sql` binding `params` positionally (`$1`, `$2`, ...). Cells come
    /// back stringified; NULL becomes an empty string.
    async fn query(&self, sql: &str, params: &[Option<String>]) -> Result<RawRows>;
}

/// Renders a chart template over a result.
pub trait ChartRenderer: Send + Sync {
    fn render(&self, template: &str, result: &ResultSet) -> Result<Vec<u8>>;
}
