//! Query result sets.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Empty column format descriptor.
pub const EMPTY_FORMAT: &str = "{}";

/// Column names and stringified rows as a data source returns them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRows {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Tabular result of a dataset execution.
///
/// `formats` holds one JSON object per column; every row has one cell per column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub formats: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ResultSet {
    /// Build a result from raw rows. The first raw row carries the column
    /// format descriptors; the rest is data.
    pub fn from_raw(raw: RawRows) -> Result<Self> {
        let width = raw.columns.len();
        let mut rows = raw.rows.into_iter();

        let formats = match rows.next() {
            Some(first) => first,
            None => vec![EMPTY_FORMAT.to_string(); width],
        };
        if formats.len() != width {
            return Err(Error::Execution(format!(
                "format row has {} cells, expected {}",
                formats.len(),
                width
            )));
        }

        let rows: Vec<Vec<String>> = rows.collect();
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(Error::Execution(format!(
                "row {} has {} cells, expected {}",
                i,
                row.len(),
                width
            )));
        }

        Ok(Self {
            columns: raw.columns,
            formats,
            rows,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Copy of this result restricted to rows `[from, to)`.
    pub fn slice(&self, from: usize, to: usize) -> ResultSet {
        let to = to.min(self.rows.len());
        let from = from.min(to);
        ResultSet {
            columns: self.columns.clone(),
            formats: self.formats.clone(),
            rows: self.rows[from..to].to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_from_raw_splits_format_row() {
        let raw = RawRows {
            columns: strings(&["id", "name"]),
            rows: vec![
                strings(&[r#"{"hidden": true}"#, "{}"]),
                strings(&["1", "Ann"]),
                strings(&["2", "Bob"]),
            ],
        };

        let res = ResultSet::from_raw(raw).unwrap();
        assert_eq!(res.formats, strings(&[r#"{"hidden": true}"#, "{}"]));
        assert_eq!(res.rows, vec![strings(&["1", "Ann"]), strings(&["2", "Bob"])]);
        assert_eq!(res.len(), 2);
    }

    #[test]
    fn test_from_raw_empty() {
        let raw = RawRows {
            columns: strings(&["id"]),
            rows: vec![],
        };
        let res = ResultSet::from_raw(raw).unwrap();
        assert_eq!(res.formats, strings(&["{}"]));
        assert!(res.is_empty());
    }

    #[test]
    fn test_from_raw_rejects_ragged_rows() {
        let raw = RawRows {
            columns: strings(&["id", "name"]),
            rows: vec![strings(&["{}", "{}"]), strings(&["1"])],
        };
        assert!(matches!(ResultSet::from_raw(raw), Err(Error::Execution(_))));

        let raw = RawRows {
            columns: strings(&["id", "name"]),
            rows: vec![strings(&["{}"])],
        };
        assert!(ResultSet::from_raw(raw).is_err());
    }

    #[test]
    fn test_slice_clamps() {
        let res = ResultSet {
            columns: strings(&["n"]),
            formats: strings(&["{}"]),
            rows: (0..5).map(|i| vec![i.to_string()]).collect(),
        };
        assert_eq!(res.slice(1, 3).rows, vec![strings(&["1"]), strings(&["2"])]);
        assert!(res.slice(0, 0).is_empty());
        assert_eq!(res.slice(4, 99).len(), 1);
    }
}
