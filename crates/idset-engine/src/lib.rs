//! Dataset registry and cached query execution for interactive datasets.

pub mod chart;
pub mod executor;
pub mod registry;
pub mod service;

pub use chart::TemplateChartRenderer;
pub use executor::QueryExecutor;
pub use registry::DatasetRegistry;
pub use service::{DatasetService, ServiceConfig};
