//! Idset Core
//!
//! Domain types, collaborator traits, and error handling for interactive
//! datasets. Pure logic lives here too: sort templating, pagination, and the
//! grid projection used by renderers.

pub mod clock;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod grid;
pub mod ports;
pub mod result;
pub mod sort;

pub use clock::{Clock, ManualClock, SystemClock};
pub use dataset::{DatasetDefinition, DatasetHeader, DatasetRecord, Display, MAX_PARAM_POSITION};
pub use error::{Error, Result};
pub use filter::{DEFAULT_PAGE_SIZE, Filter, cut};
pub use grid::{Grid, GridColumn};
pub use result::{RawRows, ResultSet};
pub use sort::apply_sort;
