//! Centrality rankings.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use cdk46kb_common::ApiError;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::handlers::{file_stems, read_table, records};
use crate::state::SharedState;

pub const DEFAULT_TOP: i64 = 30;

#[derive(Debug, Deserialize)]
pub struct TopFilter {
    pub top: Option<i64>,
}

/// GET /api/centrality: metric names
pub async fn api_centrality_metrics(State(state): State<SharedState>) -> Result<Json<Value>, ApiError> {
    let metrics = file_stems(&state.paths.centrality_dir(), "csv").await?;
    Ok(Json(json!({ "metrics": metrics })))
}

/// GET /api/centrality/{metric}?top=N
pub async fn api_centrality_metric(
    State(state): State<SharedState>,
    Path(metric): Path<String>,
    Query(filter): Query<TopFilter>,
) -> Result<Json<Value>, ApiError> {
    let top = filter.top.unwrap_or(DEFAULT_TOP);
    if top < 1 {
        return Err(ApiError::BadRequest(format!("top must be at least 1, got {}", top)));
    }
    if metric.is_empty() || metric.contains(['/', '\\']) || metric.starts_with('.') {
        return Err(ApiError::NotFound(format!("no centrality metric '{}'", metric)));
    }

    let table = read_table(&state.paths.centrality_dir().join(format!("{}.csv", metric))).await?;
    let rows = table.head(usize::try_from(top).unwrap_or(usize::MAX));

    Ok(Json(json!({ "metric": metric, "top": top, "rows": records(&rows) })))
}
