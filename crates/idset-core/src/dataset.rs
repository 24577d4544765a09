//! Interactive dataset definitions.

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// A dataset row as the backing store yields it, before decoding.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatasetRecord {
    pub id: String,
    pub query: Option<String>,
    pub chart: Option<String>,
    pub title: Option<String>,
    pub presentation_place: String,
    pub presentation_order: i32,
    /// Seconds. Zero or negative disables result caching.
    pub cache_expiration_secs: i32,
    /// JSON object mapping parameter name to 1-based bind position.
    pub query_params: Option<String>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// A parameterized SQL report definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetDefinition {
    pub id: String,
    pub query: Option<String>,
    pub chart: Option<String>,
    pub title: Option<String>,
    pub presentation_place: String,
    pub presentation_order: i32,
    pub cache_expiration_secs: u64,
    /// Declared parameter name -> 1-based bind position.
    pub params: HashMap<String, usize>,
    pub deleted_at: Option<DateTime<Utc>>,
    /// Column names memoized from the first successful execution.
    #[serde(default)]
    pub columns: Vec<String>,
}

impl DatasetDefinition {
    /// Decode a store record, including its serialized parameter map.
    pub fn from_record(record: DatasetRecord) -> Result<Self> {
        let params = match record.query_params.as_deref().map(str::trim) {
            None | Some("") => HashMap::new(),
            Some(raw) => decode_params(&record.id, raw)?,
        };

        Ok(Self {
            id: record.id,
            query: record.query,
            chart: record.chart,
            title: record.title,
            presentation_place: record.presentation_place,
            presentation_order: record.presentation_order,
            cache_expiration_secs: record.cache_expiration_secs.max(0) as u64,
            params,
            deleted_at: record.deleted_at,
            columns: Vec::new(),
        })
    }

    /// Result-cache lifetime, or `None` when the dataset always executes fresh.
    pub fn cache_ttl(&self) -> Option<chrono::Duration> {
        if self.cache_expiration_secs == 0 {
            return None;
        }
        Some(chrono::Duration::seconds(self.cache_expiration_secs as i64))
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn has_chart(&self) -> bool {
        self.chart.as_deref().is_some_and(|c| !c.is_empty())
    }

    /// Number of positional parameters the query binds.
    pub fn param_count(&self) -> usize {
        self.params.values().copied().max().unwrap_or(0)
    }

    /// Bind position (0-based) of a declared parameter.
    pub fn param_slot(&self, name: &str) -> Option<usize> {
        self.params.get(name).map(|pos| pos - 1)
    }
}

/// Highest bind position a parameter may declare. PostgreSQL binds at most
/// this many parameters per statement.
pub const MAX_PARAM_POSITION: usize = 65535;

fn decode_params(id: &str, raw: &str) -> Result<HashMap<String, usize>> {
    let params: HashMap<String, usize> =
        serde_json::from_str(raw).map_err(|e| Error::InvalidParams {
            id: id.to_string(),
            reason: e.to_string(),
        })?;

    if let Some((name, _)) = params.iter().find(|(_, pos)| **pos == 0) {
        return Err(Error::InvalidParams {
            id: id.to_string(),
            reason: format!("parameter {} has position 0, positions start from 1", name),
        });
    }

    if let Some((name, pos)) = params.iter().find(|(_, pos)| **pos > MAX_PARAM_POSITION) {
        return Err(Error::InvalidParams {
            id: id.to_string(),
            reason: format!(
                "parameter {} has position {}, at most {} allowed",
                name, pos, MAX_PARAM_POSITION
            ),
        });
    }

    Ok(params)
}

/// Output kinds a dataset can be displayed as.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Display {
    #[default]
    Table,
    Chart,
}

impl Display {
    pub fn as_str(&self) -> &'static str {
        match self {
            Display::Table => "table",
            Display::Chart => "chart",
        }
    }
}

impl fmt::Display for Display {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Display {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "table" => Ok(Display::Table),
            "chart" => Ok(Display::Chart),
            other => Err(Error::Internal(format!("unknown display: {}", other))),
        }
    }
}

/// Listing entry for datasets available in a presentation place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetHeader {
    pub id: String,
    pub title: String,
    pub displays: Vec<Display>,
}

impl DatasetHeader {
    pub fn from_definition(def: &DatasetDefinition) -> Self {
        let title = match def.title.as_deref() {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => def.id.clone(),
        };

        let mut displays = vec![Display::Table];
        if def.has_chart() {
            displays.push(Display::Chart);
        }

        Self {
            id: def.id.clone(),
            title,
            displays,
        }
    }
}
