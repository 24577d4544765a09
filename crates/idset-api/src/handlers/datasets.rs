//! Interactive dataset handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderName, StatusCode, header},
    response::{IntoResponse, Response},
};
use idset_core::{DEFAULT_PAGE_SIZE, DatasetDefinition, DatasetHeader, Display, Error, Filter};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use super::error_response;
use crate::middleware::{X_BODY_HASH, X_TOTAL_COUNT};
use crate::state::AppState;

// Listing the reports place also shows dashboard reports.
const REPORTS_PLACE: &str = "reports";
const DASHBOARD_REPORTS_PLACE: &str = "dashboardReports";

#[derive(Deserialize)]
pub struct ListParams {
    /// Presentation place. Absent lists every place.
    pub page: Option<String>,
}

pub async fn list_datasets(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Json<Vec<DatasetHeader>> {
    let places: Vec<&str> = match params.page.as_deref() {
        None => Vec::new(),
        Some(REPORTS_PLACE) => vec![REPORTS_PLACE, DASHBOARD_REPORTS_PLACE],
        Some(page) => vec![page],
    };

    Json(state.service.available(&places).await)
}

#[derive(Serialize)]
pub struct RefreshResponse {
    pub result: bool,
    pub count: usize,
}

pub async fn refresh_datasets(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RefreshResponse>, (StatusCode, String)> {
    let count = state.service.refresh().await.map_err(error_response)?;
    Ok(Json(RefreshResponse {
        result: true,
        count,
    }))
}

/// Execution options decoded from a query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecRequest {
    pub display: Display,
    pub filter: Filter,
}

impl ExecRequest {
    /// Decode paging, sort and display options. Any other key naming a
    /// declared parameter of `def` binds that parameter; repeated values are
    /// joined with `:`.
    pub fn parse(
        def: &DatasetDefinition,
        query: &[(String, String)],
    ) -> Result<Self, (StatusCode, String)> {
        let mut display = Display::Table;
        let mut filter = Filter::new(0, DEFAULT_PAGE_SIZE);
        let mut values: Vec<Vec<&str>> = vec![Vec::new(); def.param_count()];

        for (key, value) in query {
            match key.as_str() {
                "Display" => {
                    display = value
                        .parse()
                        .map_err(|e: Error| (StatusCode::BAD_REQUEST, e.to_string()))?;
                }
                "pageNumber" => filter.page_number = parse_number(key, value)?,
                "pageSize" => filter.page_size = parse_number(key, value)?,
                "sortBy" => filter.sort_by = value.clone(),
                "desc" => filter.desc = matches!(value.as_str(), "true" | "1"),
                name => {
                    if let Some(slot) = def.param_slot(name) {
                        values[slot].push(value.as_str());
                    }
                }
            }
        }

        if filter.page_size == 0 {
            filter.page_size = DEFAULT_PAGE_SIZE;
        }
        filter.params = values
            .into_iter()
            .map(|v| (!v.is_empty()).then(|| v.join(":")))
            .collect();

        Ok(Self { display, filter })
    }
}

fn parse_number(key: &str, value: &str) -> Result<usize, (StatusCode, String)> {
    value.parse().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            format!("{} got invalid value", key),
        )
    })
}

pub async fn execute_dataset(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<Vec<(String, String)>>,
) -> Result<Response, (StatusCode, String)> {
    let def = state
        .service
        .lookup(&id)
        .await
        .ok_or_else(|| error_response(Error::DatasetNotFound(id.clone())))?;

    let request = ExecRequest::parse(&def, &query)?;
    debug!(
        id = %id,
        display = %request.display,
        page_number = request.filter.page_number,
        page_size = request.filter.page_size,
        "Interactive execution request"
    );

    let (body, total) = match request.display {
        Display::Table => {
            let result = state
                .service
                .execute(&id, &request.filter)
                .await
                .map_err(error_response)?;

            let total = result.len();
            let (from, to) = request.filter.cut(total);
            let mut grid = result
                .slice(from, to)
                .to_grid()
                .map_err(error_response)?;
            grid.expand_links(&state.link_prefix)
                .map_err(error_response)?;

            (grid.to_json().map_err(error_response)?, total)
        }
        Display::Chart => {
            let body = state
                .service
                .chart(&id, &request.filter)
                .await
                .map_err(error_response)?;
            (body, 0)
        }
    };

    let headers = [
        (header::CONTENT_TYPE, "application/json".to_string()),
        (HeaderName::from_static(X_TOTAL_COUNT), total.to_string()),
        (
            HeaderName::from_static(X_BODY_HASH),
            crc32fast::hash(&body).to_string(),
        ),
    ];
    Ok((StatusCode::OK, headers, body).into_response())
}
