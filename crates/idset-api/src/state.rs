//! Application state shared across handlers.

use idset_engine::DatasetService;
use std::sync::Arc;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<DatasetService>,
    /// Prepended to relative link hrefs in table output.
    pub link_prefix: String,
}

impl AppState {
    pub fn new(service: Arc<DatasetService>, link_prefix: impl Into<String>) -> Self {
        Self {
            service,
            link_prefix: link_prefix.into(),
        }
    }
}
