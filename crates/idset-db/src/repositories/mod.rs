//! Repository implementations for PostgreSQL.

mod dataset;
mod source;

pub use dataset::PgDatasetStore;
pub use source::PgDataSource;
