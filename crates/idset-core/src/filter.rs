//! Request filter and pagination.

use serde::{Deserialize, Serialize};

/// Page size used when a request does not specify one.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Per-request execution parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    /// 0-based page number.
    pub page_number: usize,
    pub page_size: usize,
    /// Sort column. Empty means no explicit sort.
    #[serde(default)]
    pub sort_by: String,
    #[serde(default)]
    pub desc: bool,
    /// Bound values by 0-based position. `None` binds NULL.
    #[serde(default)]
    pub params: Vec<Option<String>>,
}

impl Filter {
    pub fn new(page_number: usize, page_size: usize) -> Self {
        Self {
            page_number,
            page_size,
            ..Default::default()
        }
    }

    /// Set the sort column and direction.
    pub fn with_sort(mut self, sort_by: impl Into<String>, desc: bool) -> Self {
        self.sort_by = sort_by.into();
        self.desc = desc;
        self
    }

    /// Set the positional parameter values.
    pub fn with_params(mut self, params: Vec<Option<String>>) -> Self {
        self.params = params;
        self
    }

    /// ORDER BY clause body built from the sort settings, empty when unsorted.
    pub fn order_by(&self) -> String {
        if self.sort_by.is_empty() {
            return String::new();
        }
        if self.desc {
            format!("{} desc", self.sort_by)
        } else {
            self.sort_by.clone()
        }
    }

    /// Row window of this filter's page within `total` rows.
    pub fn cut(&self, total: usize) -> (usize, usize) {
        cut(total, self.page_number, self.page_size)
    }
}

/// Half-open row range `[from, to)` for a 0-based page.
///
/// Pages past the end, and a zero page size, yield an empty window.
pub fn cut(total: usize, page_number: usize, page_size: usize) -> (usize, usize) {
    let from = page_number.saturating_mul(page_size);
    if from >= total {
        return (0, 0);
    }
    let to = from.saturating_add(page_size).min(total);
    (from, to)
}
