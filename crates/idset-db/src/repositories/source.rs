//! PostgreSQL implementation of DataSource.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use idset_core::ports::DataSource;
use idset_core::{Error, RawRows, Result};
use sqlx::postgres::PgRow;
use sqlx::types::Uuid;
use sqlx::{Column, Executor, PgPool, Row, TypeInfo, ValueRef};
use tracing::debug;

/// Executes report SQL against a PostgreSQL pool.
#[derive(Clone)]
pub struct PgDataSource {
    pool: PgPool,
}

impl PgDataSource {
    /// Create a new PgDataSource.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DataSource for PgDataSource {
    async fn query(&self, sql: &str, params: &[Option<String>]) -> Result<RawRows> {
        let mut query = sqlx::query(sql);
        for param in params {
            query = query.bind(param.as_deref());
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Error::Execution(e.to_string()))?;

        let columns: Vec<String> = match rows.first() {
            Some(first) => first.columns().iter().map(|c| c.name().to_string()).collect(),
            None => {
                // column names are only reachable through a describe
                let described = (&self.pool)
                    .describe(sql)
                    .await
                    .map_err(|e| Error::Execution(e.to_string()))?;
                described
                    .columns()
                    .iter()
                    .map(|c| c.name().to_string())
                    .collect()
            }
        };

        let mut out = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut cells = Vec::with_capacity(columns.len());
            for i in 0..columns.len() {
                cells.push(cell_to_string(row, i)?);
            }
            out.push(cells);
        }

        debug!(rows = out.len(), columns = columns.len(), "Query executed");
        Ok(RawRows { columns, rows: out })
    }
}

/// Stringify one cell. NULL becomes an empty string.
fn cell_to_string(row: &PgRow, i: usize) -> Result<String> {
    let raw = row
        .try_get_raw(i)
        .map_err(|e| Error::Execution(e.to_string()))?;
    if raw.is_null() {
        return Ok(String::new());
    }

    let type_name = row.column(i).type_info().name().to_string();
    let cell = match type_name.as_str() {
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" | "CHAR" | "UNKNOWN" => row.try_get::<String, _>(i),
        "BOOL" => row.try_get::<bool, _>(i).map(|v| v.to_string()),
        "INT2" => row.try_get::<i16, _>(i).map(|v| v.to_string()),
        "INT4" => row.try_get::<i32, _>(i).map(|v| v.to_string()),
        "INT8" => row.try_get::<i64, _>(i).map(|v| v.to_string()),
        "FLOAT4" => row.try_get::<f32, _>(i).map(|v| v.to_string()),
        "FLOAT8" => row.try_get::<f64, _>(i).map(|v| v.to_string()),
        "DATE" => row
            .try_get::<NaiveDate, _>(i)
            .map(|v| v.format("%Y-%m-%d").to_string()),
        "TIME" => row
            .try_get::<NaiveTime, _>(i)
            .map(|v| v.format("%H:%M:%S").to_string()),
        "TIMESTAMP" => row
            .try_get::<NaiveDateTime, _>(i)
            .map(|v| v.format("%Y-%m-%dT%H:%M:%S").to_string()),
        "TIMESTAMPTZ" => row.try_get::<DateTime<Utc>, _>(i).map(|v| v.to_rfc3339()),
        "UUID" => row.try_get::<Uuid, _>(i).map(|v| v.to_string()),
        "JSON" | "JSONB" => row
            .try_get::<serde_json::Value, _>(i)
            .map(|v| v.to_string()),
        other => {
            return Err(Error::Execution(format!(
                "column {} has unsupported type {}, cast it to text",
                row.column(i).name(),
                other
            )));
        }
    };

    cell.map_err(|e| Error::Execution(e.to_string()))
}
